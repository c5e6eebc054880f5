//! Request coalescing: concurrent callers for the same key share one execution.
//!
//! Mirrors the original GeeCache `singleflight.Group`: the first caller for a key runs the
//! function and every other concurrent caller for that same key blocks until it finishes, then
//! all of them observe the same result. Unlike the Go original (which parks goroutines on a
//! `sync.WaitGroup`), this blocks real OS threads on a [`Condvar`], so it is built on
//! `std::sync` rather than `parking_lot` — the wait here must suspend the calling thread, not
//! just guard a critical section.
//!
//! # Panic safety
//!
//! Go's goroutines don't unwind, so the original has no equivalent concern. Rust's `fn()` can
//! panic, so the in-flight call is driven through [`std::panic::catch_unwind`]: waiters are
//! always released (with an error if the function panicked) rather than left hanging forever.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};

/// The outcome shared by every caller that coalesced onto the same in-flight call.
#[derive(Clone)]
enum Outcome<T> {
    Done(T),
    /// The function panicked; carries a message, not the panic payload (which usually is not
    /// `Clone`/`Send`-shareable across the waiters that receive a clone of this).
    Panicked(String),
}

struct Call<T> {
    done: Mutex<Option<Outcome<T>>>,
    condvar: Condvar,
}

/// Coalesces concurrent calls for the same key into one execution of the supplied function.
pub struct SingleFlight<T> {
    in_flight: Mutex<HashMap<String, Arc<Call<T>>>>,
}

impl<T> std::fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_flight", &self.in_flight.lock().unwrap().len())
            .finish()
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        SingleFlight::new()
    }
}

impl<T: Clone> SingleFlight<T> {
    /// Creates an empty coalescing group.
    pub fn new() -> Self {
        SingleFlight {
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `f()` for `key`, or, if another thread is already running it, waits for that call
    /// and returns its result instead. Returns `Err` (as a display string) if the executing call
    /// panicked.
    pub fn do_call(&self, key: &str, f: impl FnOnce() -> T) -> Result<T, String> {
        let mut table = self.in_flight.lock().unwrap();
        if let Some(call) = table.get(key).cloned() {
            drop(table);
            return SingleFlight::wait(&call);
        }

        let call = Arc::new(Call {
            done: Mutex::new(None),
            condvar: Condvar::new(),
        });
        table.insert(key.to_string(), Arc::clone(&call));
        drop(table);

        let result = catch_unwind(AssertUnwindSafe(f));

        self.in_flight.lock().unwrap().remove(key);

        let outcome = match result {
            Ok(value) => Outcome::Done(value),
            Err(payload) => Outcome::Panicked(panic_message(&payload)),
        };
        *call.done.lock().unwrap() = Some(outcome);
        call.condvar.notify_all();

        SingleFlight::wait(&call)
    }

    fn wait(call: &Call<T>) -> Result<T, String> {
        let mut done = call.done.lock().unwrap();
        while done.is_none() {
            done = call.condvar.wait(done).unwrap();
        }
        match done.clone().expect("loop only exits once Some") {
            Outcome::Done(value) => Ok(value),
            Outcome::Panicked(message) => Err(message),
        }
    }
}

fn panic_message(payload: &Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "single-flight call panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn s5_concurrent_callers_see_one_execution() {
        let flight: Arc<SingleFlight<String>> = Arc::new(SingleFlight::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let flight = Arc::clone(&flight);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    flight
                        .do_call("key", || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            "bar".to_string()
                        })
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "bar");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn distinct_keys_run_independently() {
        let flight: SingleFlight<i32> = SingleFlight::new();
        assert_eq!(flight.do_call("a", || 1).unwrap(), 1);
        assert_eq!(flight.do_call("b", || 2).unwrap(), 2);
    }

    #[test]
    fn a_panicking_call_releases_waiters_with_an_error() {
        let flight: SingleFlight<i32> = SingleFlight::new();
        let result = flight.do_call("key", || panic!("boom"));
        assert!(result.is_err());
        // The key must be cleared so a later call can retry successfully.
        assert_eq!(flight.do_call("key", || 7).unwrap(), 7);
    }
}
