//! Task manager for the controller's async work
//!
//! Three lifecycles are needed:
//! - [`TaskManager::spawn`]: one task per key, a new spawn aborts the old one
//! - [`TaskManager::spawn_overlapping`]: every spawn runs to completion, results
//!   arrive in completion order (weather lookups)
//! - [`TaskManager::debounce`]: wait, then run; re-arming resets the timer
//!   (error notification auto-hide)
//!
//! Every task sends exactly one [`Action`] back through the action channel
//! unless it is aborted first.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::action::Action;

/// Identifies a task (or a group of overlapping tasks)
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(&'static str);

impl TaskKey {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

pub struct TaskManager {
    tasks: HashMap<TaskKey, Vec<AbortHandle>>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl TaskManager {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            tasks: HashMap::new(),
            action_tx,
        }
    }

    /// Spawn a task, aborting any running task with the same key.
    pub fn spawn<F>(&mut self, key: TaskKey, future: F) -> &mut Self
    where
        F: Future<Output = Action> + Send + 'static,
    {
        self.cancel(&key);
        let handle = self.start(future);
        self.tasks.insert(key, vec![handle]);
        self
    }

    /// Spawn a task alongside any running tasks with the same key.
    ///
    /// Nothing is aborted; each task reports when it finishes, so the last
    /// task to complete is the last one whose action is delivered.
    pub fn spawn_overlapping<F>(&mut self, key: TaskKey, future: F) -> &mut Self
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let handle = self.start(future);
        let handles = self.tasks.entry(key).or_default();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
        self
    }

    /// Spawn a task that waits `duration` first.
    ///
    /// Calling again with the same key before the timer fires restarts it.
    pub fn debounce<F>(&mut self, key: TaskKey, duration: Duration, future: F) -> &mut Self
    where
        F: Future<Output = Action> + Send + 'static,
    {
        self.spawn(key, async move {
            tokio::time::sleep(duration).await;
            future.await
        })
    }

    fn start<F>(&self, future: F) -> AbortHandle
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let action = future.await;
            // Receiver dropped means the app is shutting down
            let _ = tx.send(action);
        });
        handle.abort_handle()
    }

    /// Abort every task under `key`. No-op if none exist.
    pub fn cancel(&mut self, key: &TaskKey) {
        if let Some(handles) = self.tasks.remove(key) {
            for handle in handles {
                handle.abort();
            }
        }
    }

    /// Abort all running tasks (shutdown).
    pub fn cancel_all(&mut self) {
        for (_, handles) in self.tasks.drain() {
            for handle in handles {
                handle.abort();
            }
        }
    }

    /// Number of unfinished tasks under `key`
    pub fn running(&self, key: &TaskKey) -> usize {
        self.tasks
            .get(key)
            .map(|handles| handles.iter().filter(|h| !h.is_finished()).count())
            .unwrap_or(0)
    }

    pub fn is_running(&self, key: &TaskKey) -> bool {
        self.running(key) > 0
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
