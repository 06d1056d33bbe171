//! # TopicExecutor: FIFO per topic, concurrent across topics.
//!
//! ## Rules
//! - **Per-topic FIFO**: tasks of one topic start in submission order, never overlapping.
//! - **Cross-topic concurrency**: topic A may run its 5th task while B runs its 1st.
//! - **Liveness**: a failing or panicking task is logged and the topic moves on.
//! - **Lazy topics**: created on first use, never removed.
//! - **Pool limit**: an optional semaphore caps how many tasks run at once overall.
//!
//! Submitting requires a running Tokio runtime (tasks are `tokio::spawn`ed).

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use futures::FutureExt;
use tokio::sync::Semaphore;

use super::topic::{Job, TopicQueue, TopicStatus};
use crate::error::panic_message;

/// Output accepted from a submitted task.
///
/// Implemented for `()` (infallible notifications) and `Result<(), E>` where the
/// error is displayable; errors are logged, never propagated.
pub trait TaskOutput: Send + 'static {
    /// Normalizes the output, rendering any error as text.
    fn into_result(self) -> Result<(), String>;
}

impl TaskOutput for () {
    fn into_result(self) -> Result<(), String> {
        Ok(())
    }
}

impl<E> TaskOutput for Result<(), E>
where
    E: fmt::Display + Send + 'static,
{
    fn into_result(self) -> Result<(), String> {
        self.map_err(|e| e.to_string())
    }
}

struct Inner<K> {
    topics: Mutex<HashMap<K, TopicQueue>>,
    semaphore: Option<Arc<Semaphore>>,
}

impl<K> Inner<K> {
    fn topics(&self) -> MutexGuard<'_, HashMap<K, TopicQueue>> {
        self.topics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Executor that orders tasks per topic.
///
/// Cheap to clone; clones share topics and the pool limit.
///
/// # Example
/// ```
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
/// use lifevisor::{Latch, TopicExecutor};
///
/// # #[tokio::main]
/// # async fn main() {
/// let exec: TopicExecutor = TopicExecutor::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let done = Arc::new(Latch::new());
///
/// for (i, ms) in [30u64, 10, 0].into_iter().enumerate() {
///     let seen = Arc::clone(&seen);
///     let done = Arc::clone(&done);
///     exec.execute_on("orders".to_string(), async move {
///         tokio::time::sleep(Duration::from_millis(ms)).await;
///         seen.lock().unwrap().push(i);
///         if i == 2 { done.signal(); }
///     });
/// }
/// done.wait().await;
/// assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
/// # }
/// ```
pub struct TopicExecutor<K = String> {
    inner: Arc<Inner<K>>,
}

impl<K> Clone for TopicExecutor<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K> Default for TopicExecutor<K> {
    fn default() -> Self {
        Self::with_limit(None)
    }
}

impl<K> fmt::Debug for TopicExecutor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (topics, longest_running) = {
            let topics = self.inner.topics();
            let longest = topics.values().filter_map(TopicQueue::running_for).max();
            (topics.len(), longest)
        };
        f.debug_struct("TopicExecutor")
            .field("topics", &topics)
            .field("longest_running", &longest_running)
            .field("limited", &self.inner.semaphore.is_some())
            .finish()
    }
}

impl<K> TopicExecutor<K> {
    /// Creates an executor without a pool limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor running at most `limit` tasks at once (`None` = unlimited).
    ///
    /// A limit of `Some(0)` is treated as `Some(1)`.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            inner: Arc::new(Inner {
                topics: Mutex::new(HashMap::new()),
                semaphore: limit.map(|n| Arc::new(Semaphore::new(n.max(1)))),
            }),
        }
    }
}

impl<K> TopicExecutor<K>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
{
    /// Submits `task` to the default topic (`K::default()`).
    pub fn execute<F>(&self, task: F)
    where
        K: Default,
        F: Future + Send + 'static,
        F::Output: TaskOutput,
    {
        self.execute_on(K::default(), task);
    }

    /// Appends `task` to `topic`'s queue, spawning it at once if the topic is idle.
    pub fn execute_on<F>(&self, topic: K, task: F)
    where
        F: Future + Send + 'static,
        F::Output: TaskOutput,
    {
        let job: Job = Box::pin(task.map(TaskOutput::into_result));

        let ready = {
            let mut topics = self.inner.topics();
            let queue = topics.entry(topic.clone()).or_insert_with(TopicQueue::new);
            match queue.status {
                TopicStatus::Idle => {
                    queue.status = TopicStatus::Running {
                        since: Instant::now(),
                    };
                    Some(job)
                }
                TopicStatus::Running { .. } => {
                    queue.queue.push_back(job);
                    None
                }
            }
        };

        if let Some(job) = ready {
            Self::submit(Arc::clone(&self.inner), topic, job);
        }
    }

    /// Number of tasks queued or running on `topic`.
    pub fn pending(&self, topic: &K) -> usize {
        self.inner.topics().get(topic).map_or(0, TopicQueue::pending)
    }

    /// Every topic seen so far (order unspecified).
    pub fn topics(&self) -> Vec<K> {
        self.inner.topics().keys().cloned().collect()
    }

    /// Returns true if no topic has work queued or running.
    pub fn is_idle(&self) -> bool {
        self.inner
            .topics()
            .values()
            .all(|q| q.status == TopicStatus::Idle)
    }

    /// Spawns `job` on the pool; when it ends, promotes the topic's next job.
    fn submit(inner: Arc<Inner<K>>, topic: K, job: Job) {
        tokio::spawn(async move {
            let permit = match &inner.semaphore {
                Some(sem) => Arc::clone(sem).acquire_owned().await.ok(),
                None => None,
            };
            run_job(&topic, job).await;
            drop(permit);

            let next = {
                let mut topics = inner.topics();
                match topics.get_mut(&topic) {
                    Some(queue) => match queue.queue.pop_front() {
                        Some(next) => {
                            queue.status = TopicStatus::Running {
                                since: Instant::now(),
                            };
                            Some(next)
                        }
                        None => {
                            queue.status = TopicStatus::Idle;
                            None
                        }
                    },
                    None => None,
                }
            };

            if let Some(next) = next {
                Self::submit(inner, topic, next);
            }
        });
    }
}

/// Runs one job, logging failures and catching panics.
async fn run_job<K: fmt::Debug>(topic: &K, job: Job) {
    match AssertUnwindSafe(job).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(error)) => {
            tracing::warn!(?topic, %error, "topic task failed");
        }
        Err(payload) => {
            let info = panic_message(&*payload);
            tracing::error!(?topic, %info, "topic task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::Latch;
    use std::time::Duration;

    type Journal = Arc<Mutex<Vec<String>>>;

    fn record(journal: &Journal, entry: impl Into<String>) {
        journal.lock().unwrap().push(entry.into());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_topic_runs_in_submission_order() {
        let exec: TopicExecutor = TopicExecutor::new();
        let journal: Journal = Arc::default();
        let done = Arc::new(Latch::new());

        let durations = [40u64, 5, 25, 0, 10];
        for (i, ms) in durations.into_iter().enumerate() {
            let journal = Arc::clone(&journal);
            let done = Arc::clone(&done);
            exec.execute_on("t".to_string(), async move {
                record(&journal, format!("begin-{i}"));
                tokio::time::sleep(Duration::from_millis(ms)).await;
                record(&journal, format!("end-{i}"));
                if i == durations.len() - 1 {
                    done.signal();
                }
            });
        }

        assert!(done.wait_timeout(Duration::from_secs(5)).await);
        let expected: Vec<String> = (0..durations.len())
            .flat_map(|i| [format!("begin-{i}"), format!("end-{i}")])
            .collect();
        assert_eq!(*journal.lock().unwrap(), expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_different_topics_run_concurrently() {
        let exec: TopicExecutor<&'static str> = TopicExecutor::new();
        let journal: Journal = Arc::default();
        let slow_may_finish = Arc::new(Latch::new());
        let done = Arc::new(Latch::new());

        {
            let journal = Arc::clone(&journal);
            let gate = Arc::clone(&slow_may_finish);
            let done = Arc::clone(&done);
            exec.execute_on("slow", async move {
                // Blocks its topic until the fast topic has run.
                gate.wait().await;
                record(&journal, "slow");
                done.signal();
            });
        }
        {
            let journal = Arc::clone(&journal);
            let gate = Arc::clone(&slow_may_finish);
            exec.execute_on("fast", async move {
                record(&journal, "fast");
                gate.signal();
            });
        }

        assert!(done.wait_timeout(Duration::from_secs(5)).await);
        assert_eq!(*journal.lock().unwrap(), vec!["fast", "slow"]);
    }

    #[tokio::test]
    async fn test_failure_and_panic_do_not_block_topic() {
        let exec: TopicExecutor = TopicExecutor::new();
        let journal: Journal = Arc::default();
        let done = Arc::new(Latch::new());

        exec.execute(async { Err::<(), _>("boom") });
        exec.execute(async {
            let explode = true;
            if explode {
                panic!("kaboom");
            }
        });
        {
            let journal = Arc::clone(&journal);
            let done = Arc::clone(&done);
            exec.execute(async move {
                record(&journal, "after");
                done.signal();
            });
        }

        assert!(done.wait_timeout(Duration::from_secs(5)).await);
        assert_eq!(*journal.lock().unwrap(), vec!["after"]);
    }

    #[tokio::test]
    async fn test_pending_and_idle_tracking() {
        let exec: TopicExecutor = TopicExecutor::new();
        let gate = Arc::new(Latch::new());
        let done = Arc::new(Latch::new());

        {
            let gate = Arc::clone(&gate);
            exec.execute_on("a".to_string(), async move { gate.wait().await });
        }
        {
            let done = Arc::clone(&done);
            exec.execute_on("a".to_string(), async move { done.signal() });
        }

        assert_eq!(exec.pending(&"a".to_string()), 2);
        assert_eq!(exec.pending(&"b".to_string()), 0);
        assert!(!exec.is_idle());
        assert_eq!(exec.topics(), vec!["a".to_string()]);
        assert!(format!("{exec:?}").contains("longest_running: Some("));

        gate.signal();
        assert!(done.wait_timeout(Duration::from_secs(5)).await);

        // The topic flips to idle right after its last job returns.
        for _ in 0..100 {
            if exec.is_idle() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(exec.is_idle());
        assert_eq!(exec.pending(&"a".to_string()), 0);
        assert!(format!("{exec:?}").contains("longest_running: None"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pool_limit_serializes_topics() {
        let exec: TopicExecutor<usize> = TopicExecutor::with_limit(Some(1));
        let running = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let peak = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let finished = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let done = Arc::new(Latch::new());

        for topic in 0..4 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            let finished = Arc::clone(&finished);
            let done = Arc::clone(&done);
            exec.execute_on(topic, async move {
                use std::sync::atomic::Ordering::SeqCst;
                let now = running.fetch_add(1, SeqCst) + 1;
                peak.fetch_max(now, SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, SeqCst);
                if finished.fetch_add(1, SeqCst) + 1 == 4 {
                    done.signal();
                }
            });
        }

        assert!(done.wait_timeout(Duration::from_secs(5)).await);
        assert_eq!(peak.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
