//! Event routing and dispatching implementation

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::OnceCell;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, error, info, warn};

use crate::{
    config::ConfigValidator,
    error::{NotifyError, Result},
    executor::{ActionCatalog, ActionContext},
    registry::{EventRegistry, RegisteredAction},
    types::{
        ActionResult, ActionStatus, DispatchOutcome, DispatchResult, Event, HostInfo,
        NotificationConfig, Settings,
    },
};

/// Summary of a dispatcher shutdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShutdownReport {
    /// Whether in-flight actions outlived the grace period
    pub timed_out: bool,

    /// In-flight dispatches that were cancelled
    pub cancelled: usize,

    /// Actions whose resources were released
    pub released: usize,

    /// Total shutdown duration in milliseconds
    pub duration_ms: u64,
}

/// Routes events to their configured actions
///
/// Actions for one event run in registration order and are awaited, so the
/// returned [`DispatchResult`] is complete. `dispatch` holds no lock while
/// actions run; independent events may be dispatched concurrently.
///
/// Implements failure isolation: if one action fails, the remaining actions for
/// the same event still run.
pub struct Dispatcher {
    registry: Arc<EventRegistry>,
    host: HostInfo,
    settings: Settings,
    tracker: TaskTracker,
    cancel: CancellationToken,
    accepting: AtomicBool,
    shutdown: OnceCell<ShutdownReport>,
}

impl Dispatcher {
    /// Build a dispatcher from a configuration
    ///
    /// Action references resolve against the configuration's `actions` table and
    /// against actions already registered on `catalog`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for duplicate kinds, unresolved action
    /// references or malformed entries. No events are accepted in that case.
    pub fn initialize(config: NotificationConfig, mut catalog: ActionCatalog) -> Result<Self> {
        ConfigValidator::validate_with(&config, |name| catalog.contains(name))?;
        catalog.add_definitions(&config.actions, &config.settings)?;
        let registry = EventRegistry::build(&config, &catalog)?;

        info!(
            kinds = registry.len(),
            actions = catalog.len(),
            fallback = ?config.on_unmatched,
            "Dispatcher initialized"
        );

        Ok(Self {
            registry: Arc::new(registry),
            host: HostInfo::default(),
            settings: config.settings,
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
            accepting: AtomicBool::new(true),
            shutdown: OnceCell::new(),
        })
    }

    /// Attach the host session identity exposed to actions
    pub fn with_host(mut self, host: HostInfo) -> Self {
        self.host = host;
        self
    }

    /// The registry this dispatcher routes with
    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// Host session identity
    pub fn host(&self) -> &HostInfo {
        &self.host
    }

    /// Runtime settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether shutdown has started
    pub fn is_shut_down(&self) -> bool {
        !self.accepting.load(Ordering::SeqCst)
    }

    /// Dispatch an event to its actions
    ///
    /// This method:
    /// 1. Looks up the actions registered for the event kind
    /// 2. Falls back to `on_unmatched` or returns "no action" for unknown kinds
    /// 3. Runs each action in order under the per-action timeout
    /// 4. Records failures and continues with the next action
    ///
    /// Once shutdown cancels in-flight work, actions that have not started yet
    /// are reported as cancelled without running.
    pub async fn dispatch(&self, event: &Event) -> DispatchResult {
        let start = Instant::now();

        // Spans every action of the event, including the gaps between them.
        let _in_flight = self.tracker.token();

        if self.is_shut_down() {
            debug!(event_kind = %event.kind, "Dispatcher shut down, ignoring event");
            return DispatchResult {
                event_kind: event.kind.clone(),
                outcome: DispatchOutcome::ShutDown,
                actions: Vec::new(),
                duration_ms: 0,
            };
        }

        debug!(
            event_kind = %event.kind,
            received_at = %event.received_at,
            "Dispatching event"
        );

        let matched = self.registry.actions_for(&event.kind);
        let (outcome, targets) = if !matched.is_empty() {
            (DispatchOutcome::Dispatched, matched)
        } else if let Some(fallback) = self.registry.fallback() {
            debug!(
                event_kind = %event.kind,
                action = %fallback.name,
                "No entry for event, running fallback"
            );
            (DispatchOutcome::Fallback, std::slice::from_ref(fallback))
        } else {
            debug!(event_kind = %event.kind, "No actions registered for event");
            return DispatchResult::no_action(&event.kind);
        };

        info!(
            event_kind = %event.kind,
            action_count = targets.len(),
            "Found actions for event"
        );

        let ctx = ActionContext {
            event,
            host: &self.host,
        };

        let mut actions = Vec::with_capacity(targets.len());
        for registered in targets {
            actions.push(self.run_action(registered, &ctx).await);
        }

        let result = DispatchResult {
            event_kind: event.kind.clone(),
            outcome,
            actions,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        if result.failure_count() > 0 {
            warn!(
                event_kind = %event.kind,
                failed = result.failure_count(),
                succeeded = result.success_count(),
                "Some actions did not complete"
            );
        }

        result
    }

    /// Run one action, converting every outcome into an [`ActionResult`]
    async fn run_action(
        &self,
        registered: &RegisteredAction,
        ctx: &ActionContext<'_>,
    ) -> ActionResult {
        let start = Instant::now();
        let timeout_ms = registered
            .action
            .timeout_ms()
            .unwrap_or(self.settings.action_timeout_ms);

        if self.cancel.is_cancelled() {
            debug!(action = %registered.name, "Skipping action after shutdown");
            return Self::cancelled(registered, start);
        }

        debug!(action = %registered.name, timeout_ms, "Running action");

        let run = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            registered.action.run(ctx),
        );
        let guarded = tokio::select! {
            finished = run => Some(finished),
            _ = self.cancel.cancelled() => None,
        };

        let (status, output, error) = match guarded {
            Some(Ok(Ok(output))) => {
                debug!(action = %registered.name, "Action completed");
                (ActionStatus::Success, Some(output), None)
            }
            Some(Ok(Err(e))) => {
                error!(action = %registered.name, error = %e, "Action failed");
                let status = match e {
                    NotifyError::ActionTimeout { .. } => ActionStatus::Timeout,
                    _ => ActionStatus::Failed,
                };
                (status, None, Some(e.to_string()))
            }
            Some(Err(_)) => {
                let e = NotifyError::ActionTimeout {
                    action: registered.name.clone(),
                    timeout_ms,
                };
                warn!(action = %registered.name, error = %e, "Action timed out");
                (ActionStatus::Timeout, None, Some(e.to_string()))
            }
            None => {
                warn!(action = %registered.name, "Action cancelled by shutdown");
                return Self::cancelled(registered, start);
            }
        };

        ActionResult {
            action: registered.name.clone(),
            status,
            output,
            error,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn cancelled(registered: &RegisteredAction, start: Instant) -> ActionResult {
        ActionResult {
            action: registered.name.clone(),
            status: ActionStatus::Cancelled,
            output: None,
            error: Some("Action cancelled by shutdown".to_string()),
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Stop accepting events, drain or cancel in-flight actions, release resources
    ///
    /// In-flight dispatches get `settings.shutdown_timeout_ms` to run their
    /// remaining actions; whatever is still running afterwards is cancelled.
    /// Each distinct action is then shut down once. Concurrent callers share a
    /// single run and receive the same report.
    pub async fn shutdown(&self) -> ShutdownReport {
        self.shutdown
            .get_or_init(|| self.run_shutdown())
            .await
            .clone()
    }

    async fn run_shutdown(&self) -> ShutdownReport {
        let start = Instant::now();
        let grace_ms = self.settings.shutdown_timeout_ms;
        let grace = Duration::from_millis(grace_ms);

        info!(in_flight = self.tracker.len(), "Shutting down dispatcher");
        self.accepting.store(false, Ordering::SeqCst);
        self.tracker.close();

        let (timed_out, cancelled) = match tokio::time::timeout(grace, self.tracker.wait()).await {
            Ok(()) => (false, 0),
            Err(_) => {
                let in_flight = self.tracker.len();
                let e = NotifyError::ShutdownTimeout(grace_ms);
                warn!(in_flight, error = %e, "Cancelling in-flight actions");
                self.cancel.cancel();
                if tokio::time::timeout(grace, self.tracker.wait()).await.is_err() {
                    error!(
                        in_flight = self.tracker.len(),
                        "In-flight actions ignored cancellation"
                    );
                }
                (true, in_flight)
            }
        };

        let actions = self.registry.unique_actions();
        for registered in &actions {
            debug!(action = %registered.name, "Releasing action");
            registered.action.shutdown().await;
        }

        let report = ShutdownReport {
            timed_out,
            cancelled,
            released: actions.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            timed_out = report.timed_out,
            cancelled = report.cancelled,
            released = report.released,
            duration_ms = report.duration_ms,
            "Dispatcher shut down"
        );

        report
    }
}

#[async_trait]
impl super::EventDispatcher for Dispatcher {
    async fn dispatch(&self, event: &Event) -> DispatchResult {
        Dispatcher::dispatch(self, event).await
    }

    async fn shutdown(&self) -> ShutdownReport {
        Dispatcher::shutdown(self).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use super::*;
    use crate::{
        dispatcher::EventDispatcher,
        executor::{MemorySink, NotificationAction},
        types::{ActionDefinition, EventEntry, LogDefinition, LogLevel},
    };

    struct RecordingAction {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl NotificationAction for RecordingAction {
        async fn run(&self, ctx: &ActionContext<'_>) -> Result<String> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, ctx.event.kind));
            Ok(self.name.to_string())
        }
    }

    struct FailingAction;

    #[async_trait]
    impl NotificationAction for FailingAction {
        async fn run(&self, _ctx: &ActionContext<'_>) -> Result<String> {
            Err(NotifyError::action("broken", "audio device unavailable"))
        }
    }

    struct SlowAction {
        sleep: Duration,
    }

    #[async_trait]
    impl NotificationAction for SlowAction {
        async fn run(&self, _ctx: &ActionContext<'_>) -> Result<String> {
            tokio::time::sleep(self.sleep).await;
            Ok("slow".to_string())
        }
    }

    /// Sleeps, then records its run; records its release too
    struct LifecycleAction {
        name: &'static str,
        sleep: Duration,
        timeout_ms: Option<u64>,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl NotificationAction for LifecycleAction {
        fn timeout_ms(&self) -> Option<u64> {
            self.timeout_ms
        }

        async fn run(&self, _ctx: &ActionContext<'_>) -> Result<String> {
            tokio::time::sleep(self.sleep).await;
            self.log.lock().unwrap().push(format!("run:{}", self.name));
            Ok(self.name.to_string())
        }

        async fn shutdown(&self) {
            self.log
                .lock()
                .unwrap()
                .push(format!("shutdown:{}", self.name));
        }
    }

    fn lifecycle_dispatcher(
        sleep: Duration,
        settings: Settings,
        log: &Arc<Mutex<Vec<String>>>,
    ) -> Arc<Dispatcher> {
        let mut catalog = ActionCatalog::new();
        for name in ["first", "second"] {
            catalog
                .register(
                    name,
                    Arc::new(LifecycleAction {
                        name,
                        sleep,
                        timeout_ms: None,
                        log: log.clone(),
                    }),
                )
                .unwrap();
        }
        let mut cfg = config(vec![EventEntry::new("session.error", ["first", "second"])]);
        cfg.settings = settings;
        Arc::new(Dispatcher::initialize(cfg, catalog).unwrap())
    }

    struct CountingShutdown {
        shutdowns: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl NotificationAction for CountingShutdown {
        async fn run(&self, _ctx: &ActionContext<'_>) -> Result<String> {
            Ok("counted".to_string())
        }

        async fn shutdown(&self) {
            tokio::task::yield_now().await;
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn recording_catalog(names: &[&'static str], log: &Arc<Mutex<Vec<String>>>) -> ActionCatalog {
        let mut catalog = ActionCatalog::new();
        for &name in names {
            catalog
                .register(
                    name,
                    Arc::new(RecordingAction {
                        name,
                        log: log.clone(),
                    }),
                )
                .unwrap();
        }
        catalog
    }

    fn config(events: Vec<EventEntry>) -> NotificationConfig {
        NotificationConfig {
            events,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_dispatch_runs_actions_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let catalog = recording_catalog(&["playAlertSound", "logWarning"], &log);
        let dispatcher = Dispatcher::initialize(
            config(vec![EventEntry::new(
                "session-error",
                ["playAlertSound", "logWarning"],
            )]),
            catalog,
        )
        .unwrap();

        let result = dispatcher.dispatch(&Event::new("session-error")).await;

        assert_eq!(result.outcome, DispatchOutcome::Dispatched);
        assert_eq!(result.action_names(), vec!["playAlertSound", "logWarning"]);
        assert_eq!(result.success_count(), 2);
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "playAlertSound:session-error".to_string(),
                "logWarning:session-error".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_dispatch_empty_config_is_no_action() {
        let dispatcher = Dispatcher::initialize(config(vec![]), ActionCatalog::new()).unwrap();

        let result = dispatcher.dispatch(&Event::new("file-edited")).await;

        assert!(result.is_no_action());
        assert!(result.actions.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_kind_is_no_action() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let catalog = recording_catalog(&["a"], &log);
        let dispatcher =
            Dispatcher::initialize(config(vec![EventEntry::new("session.created", ["a"])]), catalog)
                .unwrap();

        let result = dispatcher.dispatch(&Event::new("tool.execute.before")).await;

        assert!(result.is_no_action());
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_failure_isolation() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut catalog = recording_catalog(&["after"], &log);
        catalog.register("broken", Arc::new(FailingAction)).unwrap();

        let dispatcher = Dispatcher::initialize(
            config(vec![EventEntry::new("session.error", ["broken", "after"])]),
            catalog,
        )
        .unwrap();

        let result = dispatcher.dispatch(&Event::new("session.error")).await;

        assert_eq!(result.actions.len(), 2);
        assert_eq!(result.actions[0].status, ActionStatus::Failed);
        assert!(result.actions[0]
            .error
            .as_deref()
            .unwrap()
            .contains("audio device unavailable"));
        assert_eq!(result.actions[1].status, ActionStatus::Success);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_action_timeout_does_not_stop_next_action() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut catalog = recording_catalog(&["after"], &log);
        catalog
            .register(
                "slow",
                Arc::new(SlowAction {
                    sleep: Duration::from_secs(5),
                }),
            )
            .unwrap();

        let mut cfg = config(vec![EventEntry::new("file.edited", ["slow", "after"])]);
        cfg.settings.action_timeout_ms = 50;
        let dispatcher = Dispatcher::initialize(cfg, catalog).unwrap();

        let result = dispatcher.dispatch(&Event::new("file.edited")).await;

        assert_eq!(result.actions[0].status, ActionStatus::Timeout);
        assert_eq!(result.actions[1].status, ActionStatus::Success);
    }

    #[tokio::test]
    async fn test_dispatch_fallback_for_unmatched() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let catalog = recording_catalog(&["known", "fallback"], &log);
        let mut cfg = config(vec![EventEntry::new("session.created", ["known"])]);
        cfg.on_unmatched = Some("fallback".to_string());
        let dispatcher = Dispatcher::initialize(cfg, catalog).unwrap();

        let matched = dispatcher.dispatch(&Event::new("session.created")).await;
        let unmatched = dispatcher.dispatch(&Event::new("session.idle")).await;

        assert_eq!(matched.outcome, DispatchOutcome::Dispatched);
        assert_eq!(matched.action_names(), vec!["known"]);
        assert_eq!(unmatched.outcome, DispatchOutcome::Fallback);
        assert_eq!(unmatched.action_names(), vec!["fallback"]);
    }

    #[test]
    fn test_initialize_rejects_duplicate_kind() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let catalog = recording_catalog(&["a"], &log);
        let result = Dispatcher::initialize(
            config(vec![
                EventEntry::new("session.error", ["a"]),
                EventEntry::new("session.error", ["a"]),
            ]),
            catalog,
        );

        assert!(matches!(result, Err(NotifyError::Configuration(_))));
    }

    #[test]
    fn test_initialize_rejects_unresolved_action() {
        let result = Dispatcher::initialize(
            config(vec![EventEntry::new("session.error", ["playAlertSound"])]),
            ActionCatalog::new(),
        );

        assert!(matches!(result, Err(NotifyError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_config_log_actions_reach_sink() {
        let sink = MemorySink::new();
        let mut cfg = config(vec![EventEntry::new("session.error", ["logWarning"])]);
        cfg.actions.insert(
            "logWarning".to_string(),
            ActionDefinition::Log(LogDefinition {
                message: "{{kind}} in {{project}}".to_string(),
                level: LogLevel::Warn,
            }),
        );
        let catalog = ActionCatalog::with_sink(Arc::new(sink.clone()));
        let dispatcher = Dispatcher::initialize(cfg, catalog)
            .unwrap()
            .with_host(HostInfo {
                project_id: "p1".to_string(),
                worktree: "/tmp/w".to_string(),
            });

        let result = dispatcher.dispatch(&Event::new("session.error")).await;

        assert_eq!(result.success_count(), 1);
        assert_eq!(
            sink.messages(),
            vec![(LogLevel::Warn, "session.error in p1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_concurrent_shutdown_releases_once() {
        let shutdowns = Arc::new(AtomicUsize::new(0));
        let mut catalog = ActionCatalog::new();
        catalog
            .register(
                "counted",
                Arc::new(CountingShutdown {
                    shutdowns: shutdowns.clone(),
                }),
            )
            .unwrap();
        let dispatcher = Dispatcher::initialize(
            config(vec![
                EventEntry::new("session.created", ["counted"]),
                EventEntry::new("session.error", ["counted"]),
            ]),
            catalog,
        )
        .unwrap();

        let (first, second) = tokio::join!(dispatcher.shutdown(), dispatcher.shutdown());

        assert_eq!(first, second);
        assert_eq!(first.released, 1);
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);

        dispatcher.shutdown().await;
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispatch_after_shutdown_is_rejected() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let catalog = recording_catalog(&["a"], &log);
        let dispatcher =
            Dispatcher::initialize(config(vec![EventEntry::new("file.edited", ["a"])]), catalog)
                .unwrap();

        dispatcher.shutdown().await;
        let result = dispatcher.dispatch(&Event::new("file.edited")).await;

        assert_eq!(result.outcome, DispatchOutcome::ShutDown);
        assert!(log.lock().unwrap().is_empty());
        assert!(dispatcher.is_shut_down());
    }

    #[tokio::test]
    async fn test_shutdown_cancels_in_flight_after_grace_period() {
        let mut catalog = ActionCatalog::new();
        catalog
            .register(
                "slow",
                Arc::new(SlowAction {
                    sleep: Duration::from_secs(30),
                }),
            )
            .unwrap();
        let mut cfg = config(vec![EventEntry::new("command.executed", ["slow"])]);
        cfg.settings.shutdown_timeout_ms = 50;
        cfg.settings.action_timeout_ms = 60_000;
        let dispatcher = Arc::new(Dispatcher::initialize(cfg, catalog).unwrap());

        let in_flight = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.dispatch(&Event::new("command.executed")).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let report = EventDispatcher::shutdown(dispatcher.as_ref()).await;
        let result = in_flight.await.unwrap();

        assert!(report.timed_out);
        assert_eq!(report.cancelled, 1);
        assert_eq!(result.actions[0].status, ActionStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_short_in_flight_actions() {
        let mut catalog = ActionCatalog::new();
        catalog
            .register(
                "quick",
                Arc::new(SlowAction {
                    sleep: Duration::from_millis(30),
                }),
            )
            .unwrap();
        let mut cfg = config(vec![EventEntry::new("command.executed", ["quick"])]);
        cfg.settings.shutdown_timeout_ms = 5_000;
        let dispatcher = Arc::new(Dispatcher::initialize(cfg, catalog).unwrap());

        let in_flight = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.dispatch(&Event::new("command.executed")).await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;

        let report = dispatcher.shutdown().await;
        let result = in_flight.await.unwrap();

        assert!(!report.timed_out);
        assert_eq!(result.actions[0].status, ActionStatus::Success);
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_every_action_of_in_flight_dispatch() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let settings = Settings {
            shutdown_timeout_ms: 5_000,
            ..Settings::default()
        };
        let dispatcher = lifecycle_dispatcher(Duration::from_millis(100), settings, &log);

        let in_flight = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.dispatch(&Event::new("session.error")).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let report = dispatcher.shutdown().await;
        let result = in_flight.await.unwrap();

        assert!(!report.timed_out);
        assert_eq!(result.success_count(), 2);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["run:first", "run:second", "shutdown:first", "shutdown:second"]
        );
    }

    #[tokio::test]
    async fn test_shutdown_cancels_remaining_actions_of_in_flight_dispatch() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let settings = Settings {
            shutdown_timeout_ms: 50,
            action_timeout_ms: 60_000,
            ..Settings::default()
        };
        let dispatcher = lifecycle_dispatcher(Duration::from_secs(30), settings, &log);

        let in_flight = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.dispatch(&Event::new("session.error")).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let report = dispatcher.shutdown().await;
        let result = in_flight.await.unwrap();

        assert!(report.timed_out);
        assert_eq!(report.cancelled, 1);
        assert_eq!(result.actions.len(), 2);
        assert!(result
            .actions
            .iter()
            .all(|a| a.status == ActionStatus::Cancelled));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["shutdown:first", "shutdown:second"]
        );
    }

    #[tokio::test]
    async fn test_action_timeout_replaces_global_timeout() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut catalog = ActionCatalog::new();
        catalog
            .register(
                "patient",
                Arc::new(LifecycleAction {
                    name: "patient",
                    sleep: Duration::from_millis(200),
                    timeout_ms: Some(5_000),
                    log: log.clone(),
                }),
            )
            .unwrap();
        let mut cfg = config(vec![EventEntry::new("file.edited", ["patient"])]);
        cfg.settings.action_timeout_ms = 20;
        let dispatcher = Dispatcher::initialize(cfg, catalog).unwrap();

        let result = dispatcher.dispatch(&Event::new("file.edited")).await;

        assert_eq!(result.actions[0].status, ActionStatus::Success);
        assert_eq!(*log.lock().unwrap(), vec!["run:patient"]);
    }
}
