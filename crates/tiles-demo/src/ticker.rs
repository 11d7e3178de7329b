#![forbid(unsafe_code)]

//! Fixed-interval clock thread.
//!
//! The ticker waits on a [`StopSignal`] with the tick interval as timeout, so
//! stopping it takes effect immediately instead of after the next tick.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

type Shared = Arc<(Mutex<bool>, Condvar)>;

/// Receiving side of a stop request.
#[derive(Clone)]
pub struct StopSignal {
    inner: Shared,
}

impl StopSignal {
    /// Create a connected (signal, trigger) pair.
    pub fn new() -> (Self, StopTrigger) {
        let inner: Shared = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Self {
            inner: Arc::clone(&inner),
        };
        (signal, StopTrigger { inner })
    }

    /// Wait for a stop or a timeout. Returns `true` if stopped.
    ///
    /// Spurious wakeups are absorbed by re-waiting for the remainder.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let start = Instant::now();
        loop {
            if *stopped {
                return true;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            let (guard, _) = cvar
                .wait_timeout(stopped, duration - elapsed)
                .unwrap_or_else(PoisonError::into_inner);
            stopped = guard;
        }
    }
}

/// Sending side of a stop request.
pub struct StopTrigger {
    inner: Shared,
}

impl StopTrigger {
    pub fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }
}

/// A running clock thread.
pub struct Ticker {
    trigger: StopTrigger,
    thread: Option<thread::JoinHandle<u64>>,
}

impl Ticker {
    /// Call `on_tick` every `interval` on a new thread until stopped.
    pub fn start(interval: Duration, mut on_tick: impl FnMut() + Send + 'static) -> Self {
        let (signal, trigger) = StopSignal::new();
        let thread = thread::Builder::new()
            .name("tiles-clock".into())
            .spawn(move || {
                let mut ticks: u64 = 0;
                tracing::debug!(?interval, "ticker started");
                while !signal.wait_timeout(interval) {
                    on_tick();
                    ticks += 1;
                }
                tracing::debug!(ticks, "ticker stopped");
                ticks
            });
        let thread = match thread {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::error!(%err, "failed to spawn clock thread");
                None
            }
        };
        Self { trigger, thread }
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop and join. Returns the number of ticks delivered.
    pub fn stop(mut self) -> u64 {
        self.trigger.stop();
        self.thread
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.trigger.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    #[test]
    fn wait_times_out_when_not_stopped() {
        let (signal, _trigger) = StopSignal::new();
        assert!(!signal.wait_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn stop_wakes_a_waiter() {
        let (signal, trigger) = StopSignal::new();
        let waiter = thread::spawn(move || signal.wait_timeout(Duration::from_secs(30)));
        trigger.stop();
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn ticker_delivers_ticks_until_stopped() {
        let count = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&count);
        let ticker = Ticker::start(Duration::from_millis(1), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        while count.load(Ordering::SeqCst) < 3 {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(ticker.is_running());
        let delivered = ticker.stop();
        assert!(delivered >= 3);
        assert_eq!(delivered, count.load(Ordering::SeqCst));
    }
}
