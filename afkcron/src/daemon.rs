use afkcron_core::{
    DaemonConfig, EntrySpec, Error, GraceTimer, IdleSource, Registry, Scheduler, SupervisorEvent,
};
use afkcron_supervisor::{ChildReaper, PlatformSupervisor, create_supervisor};
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, trace};

const EVENT_QUEUE_DEPTH: usize = 1024;

pub struct Daemon<I> {
    scheduler: Scheduler<Arc<PlatformSupervisor>>,
    supervisor: Arc<PlatformSupervisor>,
    idle: I,
    config: DaemonConfig,
    events_tx: mpsc::Sender<SupervisorEvent>,
    events_rx: mpsc::Receiver<SupervisorEvent>,
}

impl<I: IdleSource> Daemon<I> {
    pub fn new(specs: Vec<EntrySpec>, idle: I, config: DaemonConfig) -> Self {
        let supervisor = create_supervisor();
        let scheduler = Scheduler::new(
            Registry::new(specs),
            supervisor.clone(),
            config.launch_policy,
        );
        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);

        Self {
            scheduler,
            supervisor,
            idle,
            config,
            events_tx,
            events_rx,
        }
    }

    #[cfg(test)]
    pub fn scheduler(&self) -> &Scheduler<Arc<PlatformSupervisor>> {
        &self.scheduler
    }

    /// Polls until a shutdown signal arrives or a fatal error occurs. Suspended
    /// children are continued on the way out either way.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        info!(
            "afkcron starting with {} entries, polling every {}s",
            self.scheduler.registry().len(),
            self.config.poll_interval.as_secs()
        );

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        Self::setup_signal_handlers(shutdown_tx)?;

        let reaper = ChildReaper::spawn(self.supervisor.registry(), self.events_tx.clone())
            .context("Failed to install SIGCHLD handler")?;

        let mut poll = time::interval(self.config.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let result = loop {
            tokio::select! {
                _ = poll.tick() => {
                    if let Err(e) = self.poll().await {
                        break Err(e);
                    }
                }

                Some(event) = self.events_rx.recv() => {
                    if let Err(e) = self.handle_event(event) {
                        break Err(e);
                    }
                }

                _ = shutdown_rx.recv() => {
                    info!("Shutting down");
                    break Ok(());
                }
            }
        };

        reaper.abort();
        self.scheduler.release_suspended();
        result
    }

    async fn poll(&mut self) -> anyhow::Result<()> {
        let idle = self
            .idle
            .idle_seconds()
            .await
            .context("Error querying idle time")?;
        trace!("Idle for {}s", idle);

        let outcome = self.scheduler.on_idle_sample(idle)?;
        if outcome.comeback {
            debug!(
                "Comeback handled, {} kills pending",
                outcome.grace_timers.len()
            );
        }
        for timer in outcome.grace_timers {
            self.schedule_kill(timer);
        }
        Ok(())
    }

    fn schedule_kill(&self, timer: GraceTimer) {
        let tx = self.events_tx.clone();
        let grace = self.config.grace_period;
        tokio::spawn(async move {
            time::sleep(grace).await;
            let _ = tx.send(SupervisorEvent::GraceExpired(timer)).await;
        });
    }

    fn handle_event(&mut self, event: SupervisorEvent) -> anyhow::Result<()> {
        match event {
            SupervisorEvent::ChildExited { entry, pid, status } => {
                self.scheduler.on_child_exit(entry, pid, status);
            }
            SupervisorEvent::ReapFailed { pid, reason } => {
                return Err(Error::Reap { pid, reason }.into());
            }
            SupervisorEvent::GraceExpired(timer) => {
                self.scheduler.on_grace_expired(timer);
            }
        }
        Ok(())
    }

    fn setup_signal_handlers(shutdown_tx: mpsc::Sender<()>) -> anyhow::Result<()> {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM");
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT");
                }
            }
            let _ = shutdown_tx.send(()).await;
        });
        Ok(())
    }
}
