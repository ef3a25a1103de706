// web_app/discovery/debounce.rs - Trailing-edge debounce
//
// A `Debouncer` wraps a handler so that a burst of calls results in a single
// invocation with the last value, `delay` after the burst ends. The timer
// backend is a `Scheduler`: Tokio on native targets, `setTimeout` in the
// browser (see `components::search`).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Boxed unit of work handed to a scheduler
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Timer backend for [`Debouncer`]
pub trait Scheduler: Send + Sync + 'static {
    type Handle: Send + 'static;

    /// Run `task` once after `delay`
    fn schedule(&self, delay: Duration, task: Task) -> Self::Handle;

    /// Prevent a scheduled task from running; a no-op if it already ran
    fn cancel(&self, handle: Self::Handle);
}

type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Trailing-edge debouncer
///
/// Every [`call`](Debouncer::call) supersedes the previous one. The handler
/// is looked up when the timer fires, so [`set_handler`](Debouncer::set_handler)
/// takes effect for calls that are already pending. Dropping the debouncer
/// cancels whatever is pending.
pub struct Debouncer<T, S: Scheduler> {
    delay: Duration,
    scheduler: S,
    handler: Arc<Mutex<Handler<T>>>,
    pending: Mutex<Option<S::Handle>>,
    // Bumped on every call and cancel; a task only fires if it still holds
    // the latest generation.
    generation: Arc<AtomicU64>,
}

impl<T: Send + 'static, S: Scheduler> Debouncer<T, S> {
    pub fn new(scheduler: S, delay: Duration, handler: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            scheduler,
            handler: Arc::new(Mutex::new(Arc::new(handler))),
            pending: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Schedule `value` for delivery, discarding any earlier pending value
    pub fn call(&self, value: T) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut pending = lock(&self.pending);
        if let Some(handle) = pending.take() {
            self.scheduler.cancel(handle);
        }

        let handler = Arc::clone(&self.handler);
        let latest = Arc::clone(&self.generation);
        let task: Task = Box::new(move || {
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }
            let handler = lock(&handler).clone();
            handler(value);
        });
        *pending = Some(self.scheduler.schedule(self.delay, task));
    }

    /// Replace the handler, including for an already pending call
    pub fn set_handler(&self, handler: impl Fn(T) + Send + Sync + 'static) {
        *lock(&self.handler) = Arc::new(handler);
    }
}

impl<T, S: Scheduler> Debouncer<T, S> {
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Drop the pending call, if any
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = lock(&self.pending).take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl<T, S: Scheduler> Drop for Debouncer<T, S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tokio-backed scheduler; must be used from within a runtime
#[cfg(feature = "native")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioScheduler;

#[cfg(feature = "native")]
impl Scheduler for TokioScheduler {
    type Handle = tokio::task::JoinHandle<()>;

    fn schedule(&self, delay: Duration, task: Task) -> Self::Handle {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        })
    }

    fn cancel(&self, handle: Self::Handle) {
        handle.abort();
    }
}

#[cfg(all(test, feature = "native"))]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |value: String| sink.lock().unwrap().push(value))
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_delivers_only_last_value() {
        let (calls, handler) = recorder();
        let debouncer = Debouncer::new(TokioScheduler, Duration::from_millis(300), handler);

        for text in ["m", "mu", "mug"] {
            debouncer.call(text.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(*calls.lock().unwrap(), vec!["mug".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_leading_edge_call() {
        let (calls, handler) = recorder();
        let debouncer = Debouncer::new(TokioScheduler, Duration::from_millis(300), handler);

        debouncer.call("a".to_string());
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(calls.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*calls.lock().unwrap(), vec!["a".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let (calls, handler) = recorder();
        let debouncer = Debouncer::new(TokioScheduler, Duration::from_millis(300), handler);

        debouncer.call("cup".to_string());
        tokio::time::sleep(Duration::from_millis(500)).await;
        debouncer.call("mug".to_string());
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(*calls.lock().unwrap(), vec!["cup".to_string(), "mug".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_prevent_firing() {
        let (calls, handler) = recorder();
        let debouncer = Debouncer::new(TokioScheduler, Duration::from_millis(300), handler);

        debouncer.call("cancelled".to_string());
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(calls.lock().unwrap().is_empty());

        debouncer.call("dropped".to_string());
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replaced_handler_receives_pending_call() {
        let (old_calls, old_handler) = recorder();
        let (new_calls, new_handler) = recorder();
        let debouncer = Debouncer::new(TokioScheduler, Duration::from_millis(300), old_handler);

        debouncer.call("taza".to_string());
        debouncer.set_handler(new_handler);
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(old_calls.lock().unwrap().is_empty());
        assert_eq!(*new_calls.lock().unwrap(), vec!["taza".to_string()]);
    }
}
