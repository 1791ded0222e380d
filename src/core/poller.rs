//! Poll loop for sampling the registry and notifying on changes

use super::Registry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use switchwatch_core::{ChangeNotice, Notifier, SampleOutcome};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Lifecycle of a poller. There is no stopped state: the host ends the
/// loop by dropping or aborting its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// Constructed, loop not started
    Idle,
    /// Loop active
    Running,
}

impl PollerState {
    fn from_running(running: bool) -> Self {
        if running {
            Self::Running
        } else {
            Self::Idle
        }
    }
}

/// Read-only handle to the registry a poller owns
///
/// Rendering through the handle waits for an in-progress sampling step to
/// finish, so it always sees a consistent tree.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    registry: Arc<RwLock<Registry>>,
    running: Arc<AtomicBool>,
}

impl StatusHandle {
    /// State of the poller this handle came from
    pub fn state(&self) -> PollerState {
        PollerState::from_running(self.running.load(Ordering::Acquire))
    }

    /// Render the current report, without a "Triggered by" line
    pub async fn render_report(&self) -> String {
        self.registry.read().await.render_report(&[])
    }

    pub async fn failed_names(&self) -> Vec<String> {
        let registry = self.registry.read().await;
        registry
            .failed_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Samples every source on a fixed interval and hands reportable changes
/// to a notifier
pub struct Poller {
    registry: Arc<RwLock<Registry>>,
    interval: Duration,
    running: Arc<AtomicBool>,
}

impl Poller {
    pub fn new(registry: Registry, interval: Duration) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            interval,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> PollerState {
        PollerState::from_running(self.running.load(Ordering::Acquire))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn handle(&self) -> StatusHandle {
        StatusHandle {
            registry: self.registry.clone(),
            running: self.running.clone(),
        }
    }

    /// Run one sampling cycle, notifying if anything reportable changed.
    ///
    /// Notifier errors are logged and swallowed. The returned outcome is what
    /// the registry reported, whether or not the notification succeeded.
    pub async fn poll_once<N: Notifier>(&mut self, notifier: &N) -> SampleOutcome {
        let start = Instant::now();

        // Sample and render under the write lock, notify after releasing it
        let (outcome, report) = {
            let mut registry = self.registry.write().await;
            let outcome = registry.sample_all();
            let report = outcome
                .changed
                .then(|| registry.render_report(&outcome.triggered_by));
            (outcome, report)
        };

        if let Some(report) = report {
            log::info!("Status changed, triggered by {:?}", outcome.triggered_by);
            let notice = ChangeNotice {
                triggered_by: outcome.triggered_by.clone(),
                report,
            };
            if let Err(e) = notifier.notify(&notice).await {
                log::error!("Error during change notification: {:#}", e);
            }
        }

        log::trace!("Poll cycle took {:?}", start.elapsed());
        outcome
    }

    /// Start the poll loop
    ///
    /// This runs indefinitely: the first cycle runs immediately, then one
    /// cycle per interval. A slow notifier delays the next cycle rather than
    /// overlapping it.
    pub async fn run<N: Notifier>(&mut self, notifier: &N) {
        self.running.store(true, Ordering::Release);
        log::info!("Starting monitoring every {:?}", self.interval);

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            self.poll_once(notifier).await;
        }
    }

    /// Run the poll loop on its own task
    pub fn spawn<N: Notifier + 'static>(mut self, notifier: N) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(&notifier).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use std::sync::Mutex;
    use switchwatch_core::{MockDigitalInput, SharedDigitalInput, StatusDeclaration};

    /// Records every notice, failing the calls whose index is listed
    #[derive(Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<ChangeNotice>>,
        calls: Mutex<usize>,
        fail_on: Vec<usize>,
    }

    impl RecordingNotifier {
        fn failing_on(fail_on: Vec<usize>) -> Self {
            Self {
                fail_on,
                ..Self::default()
            }
        }

        fn notices(&self) -> Vec<ChangeNotice> {
            self.notices.lock().unwrap().clone()
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl Notifier for RecordingNotifier {
        async fn notify(&self, notice: &ChangeNotice) -> Result<()> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls - 1
            };
            if self.fail_on.contains(&call) {
                return Err(anyhow!("chat unavailable"));
            }
            self.notices.lock().unwrap().push(notice.clone());
            Ok(())
        }
    }

    fn poller(mock: &Arc<MockDigitalInput>) -> Poller {
        let shared: SharedDigitalInput = mock.clone();
        let registry = Registry::build(
            &[
                StatusDeclaration::digital("Main", 1).in_group("Power"),
                StatusDeclaration::digital("Generator", 2).in_group("Power"),
            ],
            &shared,
        );
        Poller::new(registry, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_no_change_no_notification() {
        let mock = Arc::new(MockDigitalInput::new());
        let mut poller = poller(&mock);
        let notifier = RecordingNotifier::default();

        assert_eq!(poller.state(), PollerState::Idle);
        let outcome = poller.poll_once(&notifier).await;

        assert!(!outcome.changed);
        assert_eq!(notifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_change_notifies_with_report() {
        let mock = Arc::new(MockDigitalInput::new());
        let mut poller = poller(&mock);
        let notifier = RecordingNotifier::default();

        mock.set_level(2, true);
        poller.poll_once(&notifier).await;

        let notices = notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].triggered_by, vec!["Generator"]);
        assert!(notices[0].report.contains("   Generator    ✅"));
        assert!(notices[0].report.contains("Triggered by: ['Generator']"));
    }

    #[tokio::test]
    async fn test_failed_notification_does_not_stop_next_cycle() {
        let mock = Arc::new(MockDigitalInput::new());
        let mut poller = poller(&mock);
        let notifier = RecordingNotifier::failing_on(vec![0]);

        mock.set_level(1, true);
        let first = poller.poll_once(&notifier).await;
        assert!(first.changed);
        assert!(notifier.notices().is_empty());

        mock.set_level(2, true);
        let second = poller.poll_once(&notifier).await;
        assert!(second.changed);
        assert_eq!(notifier.calls(), 2);
        assert_eq!(notifier.notices()[0].triggered_by, vec!["Generator"]);
    }

    #[tokio::test]
    async fn test_handle_renders_without_trigger_line() {
        let mock = Arc::new(MockDigitalInput::new());
        let poller = poller(&mock);
        let handle = poller.handle();

        let report = handle.render_report().await;
        assert_eq!(report, handle.render_report().await);
        assert!(report.starts_with("```\nPower\n"));
        assert!(!report.contains("Triggered by"));
        assert!(handle.failed_names().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_loop_samples_on_interval() {
        let mock = Arc::new(MockDigitalInput::new());
        let poller = poller(&mock);
        let handle = poller.handle();
        let notifier = Arc::new(RecordingNotifier::failing_on(vec![0]));

        assert_eq!(handle.state(), PollerState::Idle);
        let task = poller.spawn(notifier.clone());

        // First cycle runs immediately and sees nothing
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(handle.state(), PollerState::Running);
        assert_eq!(notifier.calls(), 0);

        // Cycle at t=5s: change, notifier fails
        mock.set_level(1, true);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(notifier.calls(), 1);
        assert!(notifier.notices().is_empty());

        // Cycle at t=10s: another change, delivered
        mock.set_level(2, true);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(notifier.calls(), 2);
        assert_eq!(notifier.notices()[0].triggered_by, vec!["Generator"]);

        assert!(handle.render_report().await.contains("   Main         ✅"));
        task.abort();
    }
}
