use super::EntrySpec;
use std::path::Path;
use tracing::debug;

/// Accumulates entries from one or more configuration files.
///
/// A file is admitted whole or not at all: the first bad line aborts the
/// load and nothing from that file is kept.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    entries: Vec<EntrySpec>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load_file(&mut self, path: &Path) -> crate::Result<usize> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            crate::Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.load_str(path, &content)
    }

    pub fn load_str(&mut self, path: &Path, content: &str) -> crate::Result<usize> {
        let mut parsed = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let spec = EntrySpec::from_line(line).map_err(|e| crate::Error::ConfigLine {
                path: path.to_path_buf(),
                line: idx + 1,
                reason: match e {
                    crate::Error::Config(reason) => reason,
                    other => other.to_string(),
                },
            })?;
            parsed.push(spec);
        }

        let count = parsed.len();
        debug!("Loaded {} entries from {}", count, path.display());
        self.entries.extend(parsed);
        Ok(count)
    }

    pub fn entries(&self) -> &[EntrySpec] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn into_entries(self) -> Vec<EntrySpec> {
        self.entries
    }
}
