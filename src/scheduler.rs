//! Reminder scheduler: a permission-gated polling loop that fires each due
//! reminder exactly once per due window.
//!
//! The clock, notification sink and record store are injected so the tick
//! logic is testable without wall-clock waits. De-duplication state lives
//! in memory only and is cleared on restart.

use chrono::{DurationRound, NaiveDateTime, TimeDelta};
use std::collections::HashSet;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::config::AgendaConfig;
use crate::store::RecordStore;

/// Outcome of the host platform's one-time permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// The user dismissed the prompt without deciding.
    Default,
}

/// One-time, user-initiated capability check gating the scheduler.
pub trait PermissionGate {
    fn request_permission(&self) -> Permission;
}

/// Fire-and-forget notification capability. Delivery is not confirmed.
pub trait NotificationSink {
    fn notify(&self, title: &str, body: &str, tag: &str);
}

/// Host clock, injected so ticks can be evaluated against a fixed time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in host-local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No notification permission yet; polls are no-ops.
    Unarmed,
    /// Armed, waiting for the next tick.
    Idle,
    /// Evaluating due reminders.
    Polling,
}

/// Dedup key: entity id plus its due window floored to the minute. `due_at`
/// is fixed per reminder, so the key is stable across polling ticks.
type DedupKey = (Uuid, NaiveDateTime);

pub struct ReminderScheduler<S, N, C = SystemClock> {
    store: S,
    sink: N,
    clock: C,
    config: AgendaConfig,
    state: SchedulerState,
    notified: HashSet<DedupKey>,
}

impl<S, N, C> ReminderScheduler<S, N, C>
where
    S: RecordStore,
    N: NotificationSink,
    C: Clock,
{
    pub fn new(store: S, sink: N, clock: C, config: AgendaConfig) -> Self {
        Self {
            store,
            sink,
            clock,
            config,
            state: SchedulerState::Unarmed,
            notified: HashSet::new(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Request notification permission through the host gate. Only a grant
    /// arms the scheduler; denial is terminal for this session and a new
    /// explicit user action is needed to try again.
    pub fn arm(&mut self, gate: &dyn PermissionGate) -> Permission {
        if self.state != SchedulerState::Unarmed {
            return Permission::Granted;
        }
        let permission = gate.request_permission();
        match permission {
            Permission::Granted => {
                log::debug!("notification permission granted, scheduler armed");
                self.state = SchedulerState::Idle;
            }
            Permission::Denied | Permission::Default => {
                log::info!("notification permission not granted, scheduler stays unarmed");
            }
        }
        permission
    }

    /// Run a single poll tick. Returns the number of notifications fired.
    ///
    /// A failed store query is logged and the tick skipped; the reminder is
    /// observed again on the next tick as long as its due window has not
    /// fully passed.
    pub async fn poll_once(&mut self) -> usize {
        if self.state == SchedulerState::Unarmed {
            return 0;
        }
        self.state = SchedulerState::Polling;
        let fired = self.check_reminders().await;
        self.state = SchedulerState::Idle;
        fired
    }

    async fn check_reminders(&mut self) -> usize {
        let now = self.clock.now();
        let lookahead = self.config.lookahead();

        // Prune keys whose due window has fully elapsed; they can never
        // match a pending reminder again.
        self.notified.retain(|(_, window)| *window + lookahead >= now);

        let due = match self.store.list_pending_reminders(now, now + lookahead).await {
            Ok(due) => due,
            Err(err) => {
                log::warn!("reminder query failed, retrying next tick: {}", err);
                return 0;
            }
        };

        let mut fired = 0;
        for reminder in due {
            let window = reminder
                .due_at
                .duration_trunc(TimeDelta::minutes(1))
                .unwrap_or(reminder.due_at);
            if !self.notified.insert((reminder.event_id, window)) {
                continue;
            }

            let body = format!(
                "{}\nTijd: {}",
                reminder.title,
                reminder.event_time.format("%d-%m-%Y %H:%M")
            );
            let tag = format!(
                "reminder-{}-{}",
                reminder.event_id,
                window.format("%Y%m%d%H%M")
            );
            self.sink.notify("Herinnering", &body, &tag);
            fired += 1;
        }

        if fired > 0 {
            log::debug!("fired {} reminder notification(s)", fired);
        }
        fired
    }

    /// Spawn the polling loop. The first tick runs immediately, then once
    /// per configured period until [`SchedulerHandle::stop`].
    pub fn run(mut self) -> SchedulerHandle
    where
        S: Send + 'static,
        N: Send + 'static,
        C: Send + 'static,
    {
        if !self.config.covers_every_window() {
            log::warn!(
                "tick period ({}s) exceeds lookahead window ({}s); reminders may be missed",
                self.config.tick_secs,
                self.config.lookahead_secs
            );
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let tick_period = self.config.tick_period();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick_period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        self.poll_once().await;
                    }
                }
            }
            log::debug!("reminder scheduler stopped");
        });

        SchedulerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Owner handle for a running scheduler. Dropping it without calling
/// [`stop`](Self::stop) also ends the loop: the shutdown channel closes and
/// the next wakeup exits.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal shutdown and wait for the loop to finish. No tick fires after
    /// this returns.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}
