use chrono::Local;
use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Same layout as C `ctime()`, without the trailing newline.
pub const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// `Thu Oct 16 14:03:12 2026: <message> <fields>`
#[derive(Debug, Clone, Copy, Default)]
pub struct CtimeFormat;

impl<S, N> FormatEvent<S, N> for CtimeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{}: ", Local::now().format(CTIME_FORMAT))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
