//! ProductivityStore - the authoritative in-memory integrations and tasks.
//!
//! Concurrency patterns:
//! - `RwLock<Arc<[T]>>` per collection: readers clone the `Arc` and walk away
//!   with an immutable snapshot, writers build a new collection and swap it in
//! - `mpsc` channels for change notifications (pub/sub pattern)

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use flowdeck_models::{
    seed_integrations, seed_tasks, Integration, Task, TaskUpdate, SUGGESTION_CANDIDATES,
};
use tracing::{debug, trace, warn};

use crate::error::{Result, StoreError};

/// Immutable view of the integrations collection.
pub type IntegrationSnapshot = Arc<[Integration]>;

/// Immutable view of the tasks collection.
pub type TaskSnapshot = Arc<[Task]>;

/// Both collections read back to back.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub integrations: IntegrationSnapshot,
    pub tasks: TaskSnapshot,
}

/// Notification sent to subscribers after a collection changed.
#[derive(Debug, Clone)]
pub enum StoreChange {
    /// The integrations collection was replaced.
    Integrations(IntegrationSnapshot),
    /// The tasks collection was replaced.
    Tasks(TaskSnapshot),
}

/// Thread-safe store of integrations and tasks.
///
/// Every mutation returns the collection as it stands after the call. If
/// the call changed nothing (for example an unknown id) the returned
/// snapshot is the same `Arc` that was current before, and no subscriber is
/// notified.
///
/// # Example
///
/// ```
/// use flowdeck_store::ProductivityStore;
///
/// let store = ProductivityStore::new();
/// let rx = store.subscribe();
///
/// let integrations = store.connect("notion");
/// assert!(integrations.iter().any(|i| i.id == "notion" && i.connected));
/// assert!(rx.try_recv().is_ok());
/// ```
pub struct ProductivityStore {
    integrations: RwLock<IntegrationSnapshot>,
    tasks: RwLock<TaskSnapshot>,
    subscribers: RwLock<Vec<Sender<StoreChange>>>,
}

impl Default for ProductivityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductivityStore {
    /// Creates a store seeded with the sample dataset.
    pub fn new() -> Self {
        let now = Utc::now();
        Self::with_data(seed_integrations(now), seed_tasks(now))
    }

    /// Creates a store from explicit collections.
    ///
    /// A disconnected integration never has a last sync; any such
    /// timestamp in `integrations` is dropped.
    pub fn with_data(mut integrations: Vec<Integration>, tasks: Vec<Task>) -> Self {
        for integration in integrations.iter_mut() {
            if !integration.connected && integration.last_sync.is_some() {
                warn!(integration = %integration.id, "dropping last sync of disconnected integration");
                integration.last_sync = None;
            }
        }

        debug!(
            integrations = integrations.len(),
            tasks = tasks.len(),
            "creating productivity store"
        );
        Self {
            integrations: RwLock::new(Arc::from(integrations)),
            tasks: RwLock::new(Arc::from(tasks)),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Subscribes to change notifications.
    ///
    /// The receiver gets one [`StoreChange`] per mutation that actually
    /// changed a collection. Dropped receivers are pruned on the next send.
    pub fn subscribe(&self) -> Receiver<StoreChange> {
        let (tx, rx) = mpsc::channel();
        write(&self.subscribers).push(tx);
        rx
    }

    /// Returns the number of live subscribers as of the last broadcast.
    pub fn subscriber_count(&self) -> usize {
        read(&self.subscribers).len()
    }

    fn broadcast(&self, change: StoreChange) {
        let mut subs = write(&self.subscribers);
        subs.retain(|tx| tx.send(change.clone()).is_ok());
    }

    /// Returns the current integrations.
    pub fn integrations(&self) -> IntegrationSnapshot {
        Arc::clone(&read(&self.integrations))
    }

    /// Returns the current tasks.
    pub fn tasks(&self) -> TaskSnapshot {
        Arc::clone(&read(&self.tasks))
    }

    /// Returns both collections.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            integrations: self.integrations(),
            tasks: self.tasks(),
        }
    }

    /// Looks up one integration by id.
    pub fn integration(&self, id: impl AsRef<str>) -> Option<Integration> {
        let id = id.as_ref();
        read(&self.integrations)
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    /// Looks up one task by id.
    pub fn task(&self, id: impl AsRef<str>) -> Option<Task> {
        let id = id.as_ref();
        read(&self.tasks).iter().find(|t| t.id == id).cloned()
    }

    /// Connects an integration and stamps its last sync with the current
    /// time. Unknown ids are ignored.
    pub fn connect(&self, id: impl AsRef<str>) -> IntegrationSnapshot {
        self.connect_inner(id.as_ref()).0
    }

    /// Like [`connect`](Self::connect) but reports an unknown id.
    pub fn try_connect(&self, id: impl AsRef<str>) -> Result<IntegrationSnapshot> {
        let id = id.as_ref();
        match self.connect_inner(id) {
            (snapshot, true) => Ok(snapshot),
            (_, false) => Err(StoreError::IntegrationNotFound(id.to_string())),
        }
    }

    fn connect_inner(&self, id: &str) -> (IntegrationSnapshot, bool) {
        let now = Utc::now();
        let (snapshot, matched) = self.mutate_integrations(|integrations| {
            let mut matched = false;
            for integration in integrations.iter_mut().filter(|i| i.id == id) {
                integration.connect(now);
                matched = true;
            }
            matched
        });

        if matched {
            debug!(integration = %id, "integration connected");
        } else {
            trace!(integration = %id, "connect ignored, no such integration");
        }
        (snapshot, matched)
    }

    /// Disconnects an integration and clears its last sync. Unknown ids are
    /// ignored.
    pub fn disconnect(&self, id: impl AsRef<str>) -> IntegrationSnapshot {
        self.disconnect_inner(id.as_ref()).0
    }

    /// Like [`disconnect`](Self::disconnect) but reports an unknown id.
    pub fn try_disconnect(&self, id: impl AsRef<str>) -> Result<IntegrationSnapshot> {
        let id = id.as_ref();
        match self.disconnect_inner(id) {
            (snapshot, true) => Ok(snapshot),
            (_, false) => Err(StoreError::IntegrationNotFound(id.to_string())),
        }
    }

    fn disconnect_inner(&self, id: &str) -> (IntegrationSnapshot, bool) {
        let (snapshot, matched) = self.mutate_integrations(|integrations| {
            let mut matched = false;
            for integration in integrations.iter_mut().filter(|i| i.id == id) {
                integration.disconnect();
                matched = true;
            }
            matched
        });

        if matched {
            debug!(integration = %id, "integration disconnected");
        } else {
            trace!(integration = %id, "disconnect ignored, no such integration");
        }
        (snapshot, matched)
    }

    /// Merges `update` into the task with the given id. Unknown ids are
    /// ignored.
    pub fn update_task(&self, id: impl AsRef<str>, update: &TaskUpdate) -> TaskSnapshot {
        self.update_task_inner(id.as_ref(), update).0
    }

    /// Like [`update_task`](Self::update_task) but reports an unknown id.
    pub fn try_update_task(&self, id: impl AsRef<str>, update: &TaskUpdate) -> Result<TaskSnapshot> {
        let id = id.as_ref();
        match self.update_task_inner(id, update) {
            (snapshot, true) => Ok(snapshot),
            (_, false) => Err(StoreError::TaskNotFound(id.to_string())),
        }
    }

    fn update_task_inner(&self, id: &str, update: &TaskUpdate) -> (TaskSnapshot, bool) {
        let mut matched = false;
        let snapshot = self.mutate_tasks(|tasks| {
            let mut changed = false;
            for task in tasks.iter_mut().filter(|t| t.id == id) {
                matched = true;
                let before = task.clone();
                task.apply(update);
                changed |= *task != before;
            }
            changed
        });

        if matched {
            debug!(task = %id, status = ?update.status, "task updated");
        } else {
            trace!(task = %id, "update ignored, no such task");
        }
        (snapshot, matched)
    }

    /// Gives every task without a suggestion one of the fixed candidates.
    /// An empty suggestion counts as none.
    ///
    /// The candidate is picked by the task's position in the whole
    /// collection, `index % 4`, so skipping tasks that already have a
    /// suggestion does not shift the assignment. Calling this again once
    /// every task has a suggestion changes nothing.
    pub fn generate_suggestions(&self) -> TaskSnapshot {
        let mut assigned = 0usize;
        let snapshot = self.mutate_tasks(|tasks| {
            for (index, task) in tasks.iter_mut().enumerate() {
                if !task.has_suggestion() {
                    let candidate = SUGGESTION_CANDIDATES[index % SUGGESTION_CANDIDATES.len()];
                    task.ai_suggestion = Some(candidate.to_string());
                    assigned += 1;
                }
            }
            assigned > 0
        });

        debug!(assigned, "generated task suggestions");
        snapshot
    }

    /// Advances the last sync of every connected integration to now.
    ///
    /// Driven on a timer by the runtime; disconnected integrations and tasks
    /// are left alone.
    pub fn refresh_sync(&self) -> IntegrationSnapshot {
        let now = Utc::now();
        let mut refreshed = 0usize;
        let (snapshot, _) = self.mutate_integrations(|integrations| {
            for integration in integrations.iter_mut() {
                if integration.touch_sync(now) {
                    refreshed += 1;
                }
            }
            refreshed > 0
        });

        trace!(refreshed, "refreshed integration sync times");
        snapshot
    }

    /// Applies `f` to a copy of the integrations and swaps it in if `f`
    /// reports a change. The write lock is held for the whole step,
    /// broadcast included, so concurrent mutations neither lose each
    /// other's writes nor reach subscribers out of order.
    ///
    /// Lock order is always collection, then subscribers.
    fn mutate_integrations<F>(&self, f: F) -> (IntegrationSnapshot, bool)
    where
        F: FnOnce(&mut Vec<Integration>) -> bool,
    {
        let mut current = write(&self.integrations);
        let mut next = current.to_vec();
        if !f(&mut next) {
            return (Arc::clone(&current), false);
        }
        *current = Arc::from(next);
        let snapshot = Arc::clone(&current);

        // still under the collection lock, so subscribers see changes in
        // the order they were applied
        self.broadcast(StoreChange::Integrations(Arc::clone(&snapshot)));
        (snapshot, true)
    }

    /// Task counterpart of [`mutate_integrations`](Self::mutate_integrations).
    fn mutate_tasks<F>(&self, f: F) -> TaskSnapshot
    where
        F: FnOnce(&mut Vec<Task>) -> bool,
    {
        let mut current = write(&self.tasks);
        let mut next = current.to_vec();
        if !f(&mut next) {
            return Arc::clone(&current);
        }
        *current = Arc::from(next);
        let snapshot = Arc::clone(&current);

        self.broadcast(StoreChange::Tasks(Arc::clone(&snapshot)));
        snapshot
    }
}

// The guarded values are whole snapshots that are only ever replaced, never
// edited in place, so a panic elsewhere cannot leave them half-written.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdeck_models::{IntegrationKind, TaskPriority, TaskStatus};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_new_store_is_seeded() {
        let store = ProductivityStore::new();
        assert_eq!(store.integrations().len(), 4);
        assert_eq!(store.tasks().len(), 5);
    }

    #[test]
    fn test_lookup_by_id() {
        let store = ProductivityStore::new();
        assert_eq!(store.integration("slack").unwrap().name, "Slack");
        assert_eq!(store.task("5").unwrap().priority, TaskPriority::High);
        assert!(store.integration("jira").is_none());
        assert!(store.task("42").is_none());
    }

    #[test]
    fn test_connect_unknown_returns_same_snapshot() {
        let store = ProductivityStore::new();
        let before = store.integrations();

        let after = store.connect("jira");

        assert!(Arc::ptr_eq(&before, &after));
        assert!(Arc::ptr_eq(&before, &store.integrations()));
    }

    #[test]
    fn test_connect_leaves_other_records_equal() {
        let store = ProductivityStore::new();
        let before = store.integrations();

        let after = store.connect("notion");

        for (old, new) in before.iter().zip(after.iter()) {
            if old.id == "notion" {
                assert!(new.connected);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_disconnect_clears_last_sync() {
        let store = ProductivityStore::new();
        store.disconnect("github");

        let github = store.integration("github").unwrap();
        assert!(!github.connected);
        assert!(github.last_sync.is_none());
    }

    #[test]
    fn test_try_variants_report_not_found() {
        let store = ProductivityStore::new();

        assert_eq!(
            store.try_connect("jira").unwrap_err(),
            StoreError::IntegrationNotFound("jira".to_string())
        );
        assert_eq!(
            store.try_disconnect("jira").unwrap_err(),
            StoreError::IntegrationNotFound("jira".to_string())
        );
        assert_eq!(
            store
                .try_update_task("999", &TaskUpdate::status(TaskStatus::Completed))
                .unwrap_err(),
            StoreError::TaskNotFound("999".to_string())
        );
    }

    #[test]
    fn test_try_variants_succeed_on_known_ids() {
        let store = ProductivityStore::new();
        assert!(store.try_connect("notion").is_ok());
        assert!(store.try_disconnect("notion").is_ok());

        let tasks = store
            .try_update_task("2", &TaskUpdate::status(TaskStatus::Completed))
            .unwrap();
        assert_eq!(tasks[1].status, TaskStatus::Completed);
    }

    #[test]
    fn test_try_update_same_value_is_found_but_silent() {
        let store = ProductivityStore::new();
        let rx = store.subscribe();

        // task 1 is already pending
        let result = store.try_update_task("1", &TaskUpdate::status(TaskStatus::Pending));

        assert!(result.is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_subscribe_receives_changes() {
        let store = ProductivityStore::new();
        let rx = store.subscribe();

        store.connect("notion");
        store.update_task("4", &TaskUpdate::status(TaskStatus::InProgress));

        match rx.recv_timeout(Duration::from_secs(1)).unwrap() {
            StoreChange::Integrations(snapshot) => {
                assert!(snapshot.iter().all(|i| i.connected));
            }
            other => panic!("expected integrations change, got {:?}", other),
        }
        match rx.recv_timeout(Duration::from_secs(1)).unwrap() {
            StoreChange::Tasks(snapshot) => {
                assert_eq!(snapshot[3].status, TaskStatus::InProgress);
            }
            other => panic!("expected tasks change, got {:?}", other),
        }
    }

    #[test]
    fn test_noop_does_not_notify() {
        let store = ProductivityStore::new();
        let rx = store.subscribe();

        store.connect("jira");
        store.disconnect("jira");
        store.update_task("999", &TaskUpdate::status(TaskStatus::Completed));

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let store = ProductivityStore::new();
        let rx1 = store.subscribe();
        let rx2 = store.subscribe();
        assert_eq!(store.subscriber_count(), 2);

        drop(rx2);
        store.connect("notion");

        assert_eq!(store.subscriber_count(), 1);
        assert!(rx1.try_recv().is_ok());
    }

    #[test]
    fn test_refresh_sync_skips_disconnected() {
        let store = ProductivityStore::new();
        let before = store.integrations();

        thread::sleep(Duration::from_millis(5));
        let after = store.refresh_sync();

        for (old, new) in before.iter().zip(after.iter()) {
            if old.connected {
                assert!(new.last_sync > old.last_sync, "{} not refreshed", old.id);
            } else {
                assert!(new.last_sync.is_none());
            }
        }
    }

    #[test]
    fn test_refresh_sync_leaves_tasks_alone() {
        let store = ProductivityStore::new();
        let tasks = store.tasks();
        store.refresh_sync();
        assert!(Arc::ptr_eq(&tasks, &store.tasks()));
    }

    #[test]
    fn test_refresh_sync_with_nothing_connected_is_silent() {
        let store = ProductivityStore::new();
        for id in ["github", "slack", "calendar"] {
            store.disconnect(id);
        }
        let rx = store.subscribe();

        store.refresh_sync();

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_concurrent_mutations_are_not_lost() {
        let store = Arc::new(ProductivityStore::new());

        let handles: Vec<_> = ["1", "2", "3", "4", "5"]
            .into_iter()
            .map(|id| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store.update_task(id, &TaskUpdate::status(TaskStatus::Completed));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(store
            .tasks()
            .iter()
            .all(|t| t.status == TaskStatus::Completed));
    }

    #[test]
    fn test_concurrent_changes_reach_subscribers_in_order() {
        let store = Arc::new(ProductivityStore::new());
        let rx = store.subscribe();

        let handles: Vec<_> = ["1", "2", "3", "4", "5"]
            .into_iter()
            .map(|id| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for round in 0..50 {
                        let update = TaskUpdate::new().with_title(format!("{}-{}", id, round));
                        store.update_task(id, &update);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let mut last = None;
        let mut received = 0;
        while let Ok(change) = rx.try_recv() {
            if let StoreChange::Tasks(tasks) = change {
                last = Some(tasks);
                received += 1;
            }
        }

        assert_eq!(received, 250);
        let last = last.expect("at least one task change");
        assert!(Arc::ptr_eq(&last, &store.tasks()));
    }

    #[test]
    fn test_with_data_drops_sync_of_disconnected() {
        let now = Utc::now();
        let mut stale = Integration::new("notion", "Notion", IntegrationKind::Notes, "📝");
        stale.last_sync = Some(now);
        let live = Integration::new("github", "GitHub", IntegrationKind::SourceControl, "🐙")
            .connected_at(now);

        let store = ProductivityStore::with_data(vec![stale, live], Vec::new());

        assert!(store.integration("notion").unwrap().last_sync.is_none());
        assert_eq!(store.integration("github").unwrap().last_sync, Some(now));
    }
}
