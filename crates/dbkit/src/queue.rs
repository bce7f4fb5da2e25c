//! Fire-and-forget statement queue.
//!
//! A single worker task pops statements in FIFO order and executes them on a
//! shared connection. Nothing is reported back to the caller that queued a
//! statement: failures are logged and dropped.
//!
//! ```ignore
//! let queue = SqlQueue::start(Arc::new(conn), QueueConfig::default());
//! queue.push("UPDATE counter SET hits = hits + 1 WHERE id = ?", vec![1.into()]);
//! queue.stop().await;
//! ```

use crate::client::Connection;
use crate::config::QueueConfig;
use crate::dialect::Dialect;
use crate::query::Query;
use crate::value::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// One queued statement.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueItem {
    pub sql: String,
    pub args: Vec<Value>,
}

#[derive(Debug, Default)]
struct QueueState {
    items: VecDeque<QueueItem>,
    quited: bool,
}

/// Pending items and the exit flag share one lock, so a push either lands
/// before the worker's final pop or sees the flag.
#[derive(Debug, Default)]
struct QueueShared {
    state: Mutex<QueueState>,
}

impl QueueShared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `item`, handing it back if the worker has already exited.
    fn push(&self, item: QueueItem) -> Result<(), QueueItem> {
        let mut state = self.lock();
        if state.quited {
            return Err(item);
        }
        state.items.push_back(item);
        Ok(())
    }

    fn pop(&self) -> Option<QueueItem> {
        self.lock().items.pop_front()
    }

    /// Pop the next item, marking the queue as exited once it is empty.
    fn pop_or_quit(&self) -> Option<QueueItem> {
        let mut state = self.lock();
        let item = state.items.pop_front();
        if item.is_none() {
            state.quited = true;
        }
        item
    }

    /// Mark the queue as exited and drop whatever is still pending.
    fn quit(&self) -> usize {
        let mut state = self.lock();
        state.quited = true;
        let dropped = state.items.len();
        state.items.clear();
        dropped
    }

    fn len(&self) -> usize {
        self.lock().items.len()
    }

    fn is_quited(&self) -> bool {
        self.lock().quited
    }
}

/// Background FIFO executor bound to one connection.
///
/// Must be started inside a tokio runtime. Dropping the queue signals the
/// worker to stop without waiting for it.
pub struct SqlQueue<C: Connection + 'static> {
    conn: Arc<C>,
    shared: Arc<QueueShared>,
    stop_tx: watch::Sender<bool>,
    worker: Option<JoinHandle<()>>,
}

impl<C: Connection + 'static> SqlQueue<C> {
    /// Spawn the worker task.
    pub fn start(conn: Arc<C>, config: QueueConfig) -> Self {
        let shared = Arc::new(QueueShared::default());
        let (stop_tx, stop_rx) = watch::channel(false);
        let worker = tokio::spawn(run_worker(
            Arc::clone(&conn),
            Arc::clone(&shared),
            stop_rx,
            config,
        ));
        Self {
            conn,
            shared,
            stop_tx,
            worker: Some(worker),
        }
    }

    /// Dialect of the underlying connection.
    pub fn dialect(&self) -> Dialect {
        self.conn.dialect()
    }

    /// Append a statement to the queue.
    pub fn push(&self, sql: impl Into<String>, args: Vec<Value>) {
        let item = QueueItem {
            sql: sql.into(),
            args,
        };
        if let Err(item) = self.shared.push(item) {
            tracing::warn!(target: "dbkit.queue", sql = %item.sql, "queue stopped, statement dropped");
        }
    }

    /// Append a hand-written query.
    pub fn push_query(&self, query: Query) {
        self.push(query.sql(), query.args().to_vec());
    }

    /// Number of statements waiting to run.
    pub fn len(&self) -> usize {
        self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the worker has exited.
    pub fn is_stopped(&self) -> bool {
        self.shared.is_quited()
    }

    /// Signal the worker to stop and wait for it to exit.
    pub async fn stop(&mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(worker) = self.worker.take() {
            if let Err(err) = worker.await {
                tracing::warn!(target: "dbkit.queue", error = %err, "queue worker ended abnormally");
            }
        }
    }
}

impl<C: Connection + 'static> Drop for SqlQueue<C> {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}

async fn run_worker<C: Connection>(
    conn: Arc<C>,
    shared: Arc<QueueShared>,
    mut stop_rx: watch::Receiver<bool>,
    config: QueueConfig,
) {
    tracing::debug!(target: "dbkit.queue", "queue worker started");

    loop {
        if *stop_rx.borrow() {
            break;
        }
        match shared.pop() {
            Some(item) => run_item(conn.as_ref(), item).await,
            None => {
                tokio::select! {
                    changed = stop_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = tokio::time::sleep(config.poll_interval) => {}
                }
            }
        }
    }

    let dropped = if config.drain_on_stop {
        while let Some(item) = shared.pop_or_quit() {
            run_item(conn.as_ref(), item).await;
        }
        0
    } else {
        shared.quit()
    };

    if dropped > 0 {
        tracing::warn!(target: "dbkit.queue", dropped, "queue stopped with pending statements");
    }
    tracing::debug!(target: "dbkit.queue", "queue worker stopped");
}

async fn run_item<C: Connection>(conn: &C, item: QueueItem) {
    if let Err(err) = conn.execute(&item.sql, &item.args).await {
        tracing::warn!(
            target: "dbkit.queue",
            error = %err,
            sql = %item.sql,
            "queued statement failed"
        );
    }
}
