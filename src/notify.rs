//! Toast notification queue with timed auto-dismiss.
//!
//! Each queued notification with a non-zero duration owns a sleeping task;
//! its abort handle lives beside the entry so an early dismiss cancels the
//! timer instead of leaving it to fire on a removed entry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::AbortHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    pub fn default_duration(self) -> Duration {
        Duration::from_millis(match self {
            NotificationKind::Success => 3000,
            NotificationKind::Error => 5000,
            NotificationKind::Info | NotificationKind::Warning => 4000,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
    /// Zero keeps the notification until dismissed.
    #[serde(rename = "duration", serialize_with = "as_millis")]
    pub duration: Duration,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

#[derive(Default)]
struct Queue {
    items: Vec<Notification>,
    timers: HashMap<String, AbortHandle>,
}

struct Inner {
    queue: Mutex<Queue>,
    tx: watch::Sender<Vec<Notification>>,
}

#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Vec::new());
        NotificationCenter {
            inner: Arc::new(Inner {
                queue: Mutex::new(Queue::default()),
                tx,
            }),
        }
    }

    /// Enqueue and return the notification id. `duration` defaults per kind.
    pub fn notify(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        title: Option<&str>,
        duration: Option<Duration>,
    ) -> String {
        let notification = Notification {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            title: title.map(str::to_string),
            message: message.into(),
            duration: duration.unwrap_or_else(|| kind.default_duration()),
        };
        let id = notification.id.clone();
        let delay = notification.duration;
        tracing::debug!(id = %id, kind = ?kind, message = %notification.message, "notification");

        let mut queue = self.lock();
        queue.items.push(notification);
        if !delay.is_zero() {
            if let Some(handle) = self.schedule_removal(&id, delay) {
                queue.timers.insert(id.clone(), handle);
            }
        }
        self.publish(&queue);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.notify(NotificationKind::Success, message, None, None)
    }

    pub fn error(&self, message: impl Into<String>, title: Option<&str>) -> String {
        self.notify(NotificationKind::Error, message, title, None)
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.notify(NotificationKind::Info, message, None, None)
    }

    pub fn warning(&self, message: impl Into<String>) -> String {
        self.notify(NotificationKind::Warning, message, None, None)
    }

    /// Remove now and cancel the pending timer. Returns whether it was queued.
    pub fn dismiss(&self, id: &str) -> bool {
        let mut queue = self.lock();
        if let Some(timer) = queue.timers.remove(id) {
            timer.abort();
        }
        let removed = remove_item(&mut queue, id);
        if removed {
            self.publish(&queue);
        }
        removed
    }

    pub fn clear(&self) {
        let mut queue = self.lock();
        for (_, timer) in queue.timers.drain() {
            timer.abort();
        }
        queue.items.clear();
        self.publish(&queue);
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Receiver of queue snapshots, updated on every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.tx.subscribe()
    }

    /// Outside a tokio runtime there is nothing to drive the timer; the
    /// notification then stays until dismissed.
    fn schedule_removal(&self, id: &str, delay: Duration) -> Option<AbortHandle> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(id, "no runtime, notification will not auto-dismiss");
            return None;
        };
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let id = id.to_string();
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                NotificationCenter { inner }.expire(&id);
            }
        });
        Some(task.abort_handle())
    }

    fn expire(&self, id: &str) {
        let mut queue = self.lock();
        queue.timers.remove(id);
        if remove_item(&mut queue, id) {
            self.publish(&queue);
        }
    }

    fn publish(&self, queue: &Queue) {
        self.inner.tx.send_replace(queue.items.clone());
    }

    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.inner.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn remove_item(queue: &mut Queue, id: &str) -> bool {
    let before = queue.items.len();
    queue.items.retain(|n| n.id != id);
    queue.items.len() != before
}
