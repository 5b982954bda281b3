//! Fixed-size worker pool with a drain barrier.
//!
//! Tasks are queued FIFO and picked up by long-lived worker threads. The
//! queue and the active-task count live behind one mutex, so
//! [`WorkerPool::await_drain`] always sees `queued + active` as a single
//! consistent snapshot, even while other threads keep submitting.

use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Worker count used when hardware parallelism cannot be detected.
pub const FALLBACK_WORKERS: usize = 4;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct PoolState {
    queue: VecDeque<Job>,
    active: usize,
    stop: bool,
}

impl PoolState {
    fn is_drained(&self) -> bool {
        self.queue.is_empty() && self.active == 0
    }
}

struct Shared {
    state: Mutex<PoolState>,
    work_available: Condvar,
    drained: Condvar,
}

/// Bounded executor for independent `FnOnce()` tasks.
///
/// Dropping the pool stops it: workers finish the task they are running,
/// tasks still queued are discarded without running, and every thread is
/// joined before `drop` returns.
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `num_threads` workers (at least one).
    pub fn new(num_threads: usize) -> std::io::Result<Self> {
        let num_threads = num_threads.max(1);
        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                queue: VecDeque::new(),
                active: 0,
                stop: false,
            }),
            work_available: Condvar::new(),
            drained: Condvar::new(),
        });

        // Built before spawning so an early return joins what already started.
        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(num_threads),
        };
        for id in 0..num_threads {
            let shared = Arc::clone(&pool.shared);
            let handle = thread::Builder::new()
                .name(format!("lumabatch-worker-{id}"))
                .spawn(move || worker_loop(id, &shared))?;
            pool.workers.push(handle);
        }

        tracing::debug!("Worker pool started with {} thread(s)", num_threads);
        Ok(pool)
    }

    /// Queue a task and wake one idle worker. Never waits for the task.
    pub fn submit<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.state.lock().queue.push_back(Box::new(task));
        self.shared.work_available.notify_one();
    }

    /// Block until no task is queued or running.
    ///
    /// Tasks submitted while waiting are included. Any number of threads may
    /// wait at once; all are released when the pool goes quiet.
    pub fn await_drain(&self) {
        let mut state = self.shared.state.lock();
        self.shared
            .drained
            .wait_while(&mut state, |s| !s.is_drained());
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.workers.len()
    }

    /// Tasks waiting to be picked up.
    pub fn queued(&self) -> usize {
        self.shared.state.lock().queue.len()
    }

    /// Tasks currently executing.
    pub fn active(&self) -> usize {
        self.shared.state.lock().active
    }

    /// Submitted tasks that have not finished: `queued + active`.
    pub fn pending(&self) -> usize {
        let state = self.shared.state.lock();
        state.queue.len() + state.active
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        let discarded = {
            let mut state = self.shared.state.lock();
            state.stop = true;
            std::mem::take(&mut state.queue)
        };
        if !discarded.is_empty() {
            tracing::warn!(
                "Worker pool shutting down with {} queued task(s) discarded",
                discarded.len()
            );
        }
        drop(discarded);

        self.shared.work_available.notify_all();
        self.shared.drained.notify_all();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("Worker thread exited abnormally");
            }
        }
    }
}

fn worker_loop(id: usize, shared: &Shared) {
    loop {
        let job = {
            let mut state = shared.state.lock();
            shared
                .work_available
                .wait_while(&mut state, |s| !s.stop && s.queue.is_empty());
            // Stopping always leaves the queue empty.
            let Some(job) = state.queue.pop_front() else {
                tracing::trace!("Worker {} exiting", id);
                return;
            };
            state.active += 1;
            job
        };

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            tracing::error!("Task panicked on worker {}: {}", id, panic_message(&*payload));
        }

        let mut state = shared.state.lock();
        state.active -= 1;
        if state.is_drained() {
            shared.drained.notify_all();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Resolve a requested worker count; `0` means one per available CPU.
pub fn resolve_worker_count(requested: usize) -> usize {
    if requested > 0 {
        return requested;
    }
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(FALLBACK_WORKERS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_every_task_runs_exactly_once() {
        for threads in [1, 2, 8] {
            let slots: Arc<Vec<AtomicUsize>> =
                Arc::new((0..200).map(|_| AtomicUsize::new(0)).collect());
            let pool = WorkerPool::new(threads).unwrap();

            for i in 0..slots.len() {
                let slots = Arc::clone(&slots);
                pool.submit(move || {
                    slots[i].fetch_add(1, Ordering::SeqCst);
                });
            }
            pool.await_drain();

            assert!(slots.iter().all(|s| s.load(Ordering::SeqCst) == 1));
            assert_eq!(pool.pending(), 0);
        }
    }

    #[test]
    fn test_zero_threads_still_runs() {
        let pool = WorkerPool::new(0).unwrap();
        assert_eq!(pool.num_threads(), 1);

        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        pool.submit(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        pool.await_drain();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_await_drain_on_idle_pool_returns() {
        let pool = WorkerPool::new(2).unwrap();
        pool.await_drain();
        assert_eq!(pool.queued(), 0);
        assert_eq!(pool.active(), 0);
    }

    #[test]
    fn test_waiter_sees_tasks_submitted_while_waiting() {
        const TASKS: usize = 50;

        for _ in 0..50 {
            let pool = Arc::new(WorkerPool::new(3).unwrap());
            let counter = Arc::new(AtomicUsize::new(0));

            // The gate task holds the pool busy until every other task is in.
            let (gate_tx, gate_rx) = mpsc::channel::<()>();
            {
                let counter = Arc::clone(&counter);
                pool.submit(move || {
                    gate_rx.recv().unwrap();
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }

            let waiter = {
                let pool = Arc::clone(&pool);
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    pool.await_drain();
                    counter.load(Ordering::SeqCst)
                })
            };

            let submitter = {
                let pool = Arc::clone(&pool);
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..TASKS {
                        let counter = Arc::clone(&counter);
                        pool.submit(move || {
                            counter.fetch_add(1, Ordering::SeqCst);
                        });
                    }
                    gate_tx.send(()).unwrap();
                })
            };

            submitter.join().unwrap();
            let seen = waiter.join().unwrap();
            assert_eq!(seen, TASKS + 1);
        }
    }

    #[test]
    fn test_multiple_waiters_are_released() {
        let pool = Arc::new(WorkerPool::new(2).unwrap());
        for _ in 0..10 {
            pool.submit(|| thread::sleep(Duration::from_millis(5)));
        }

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    pool.await_drain();
                    pool.pending()
                })
            })
            .collect();

        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), 0);
        }
    }

    #[test]
    fn test_panicking_task_does_not_poison_pool() {
        let pool = WorkerPool::new(1).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        pool.submit(|| panic!("boom"));
        for _ in 0..5 {
            let counter = Arc::clone(&counter);
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.await_drain();

        assert_eq!(counter.load(Ordering::SeqCst), 5);
        assert_eq!(pool.pending(), 0);
    }

    #[test]
    fn test_drop_discards_queued_tasks() {
        struct SignalOnDrop(mpsc::Sender<()>);
        impl Drop for SignalOnDrop {
            fn drop(&mut self) {
                let _ = self.0.send(());
            }
        }

        let pool = WorkerPool::new(1).unwrap();
        let ran = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel::<()>();

        // Blocks the only worker until the queued task below is dropped.
        pool.submit(move || {
            let _ = rx.recv();
        });
        {
            let ran = Arc::clone(&ran);
            let signal = SignalOnDrop(tx);
            pool.submit(move || {
                let _signal = signal;
                ran.fetch_add(1, Ordering::SeqCst);
            });
        }

        drop(pool);
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_resolve_worker_count() {
        assert_eq!(resolve_worker_count(3), 3);
        assert!(resolve_worker_count(0) >= 1);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(&*payload), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*payload), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7u32);
        assert_eq!(panic_message(&*payload), "non-string panic payload");
    }
}
