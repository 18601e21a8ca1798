//! In-memory message bus standing in for the network transport between SMC parties.
//!
//! Real parties talk over sockets; a single process running every party as a thread has no
//! socket, so this bus plays the same role with a `Mutex`-guarded mailbox and a `Condvar`
//! to park readers until their message arrives. `send`/`recv` are private point-to-point channels
//! keyed by `(sender, label)`; `publish`/`fetch` are the "broadcast to everyone" counterpart used
//! for the Beaver `D`/`E` openings and the final result reconstruction.

use std::collections::HashMap;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::error::SmcError;

pub trait MessageBus {
    fn send(&self, from: &str, to: &str, label: &str, payload: Vec<u8>);
    fn recv(&self, from: &str, to: &str, label: &str) -> Result<Vec<u8>, SmcError>;
    fn publish(&self, from: &str, label: &str, payload: Vec<u8>);
    fn fetch(&self, from: &str, label: &str) -> Result<Vec<u8>, SmcError>;
}

#[derive(Default)]
struct BusState {
    private: HashMap<(String, String, String), Vec<u8>>,
    public: HashMap<(String, String), Vec<u8>>,
}

/// A bus shared by every party in one process. Messages are never consumed on read, so a value
/// can be fetched by more than one waiter (needed since every party reconstructs the same
/// published Beaver openings and final shares).
pub struct InMemoryBus {
    state: Mutex<BusState>,
    ready: Condvar,
    timeout: Duration,
}

impl InMemoryBus {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: Mutex::new(BusState::default()),
            ready: Condvar::new(),
            timeout,
        }
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl MessageBus for InMemoryBus {
    fn send(&self, from: &str, to: &str, label: &str, payload: Vec<u8>) {
        let mut state = self.state.lock().expect("bus mutex poisoned");
        state
            .private
            .insert((from.to_string(), to.to_string(), label.to_string()), payload);
        self.ready.notify_all();
    }

    fn recv(&self, from: &str, to: &str, label: &str) -> Result<Vec<u8>, SmcError> {
        let key = (from.to_string(), to.to_string(), label.to_string());
        let state = self.state.lock().expect("bus mutex poisoned");
        let (state, _) = self
            .ready
            .wait_timeout_while(state, self.timeout, |s| !s.private.contains_key(&key))
            .expect("bus mutex poisoned");
        match state.private.get(&key) {
            Some(payload) => Ok(payload.clone()),
            None => Err(SmcError::Aborted(format!("timed out waiting for {label} from {from} to {to}"))),
        }
    }

    fn publish(&self, from: &str, label: &str, payload: Vec<u8>) {
        let mut state = self.state.lock().expect("bus mutex poisoned");
        state.public.insert((from.to_string(), label.to_string()), payload);
        self.ready.notify_all();
    }

    fn fetch(&self, from: &str, label: &str) -> Result<Vec<u8>, SmcError> {
        let key = (from.to_string(), label.to_string());
        let state = self.state.lock().expect("bus mutex poisoned");
        let (state, _) = self
            .ready
            .wait_timeout_while(state, self.timeout, |s| !s.public.contains_key(&key))
            .expect("bus mutex poisoned");
        match state.public.get(&key) {
            Some(payload) => Ok(payload.clone()),
            None => Err(SmcError::Aborted(format!("timed out waiting for {label} from {from}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn recv_observes_a_send_from_another_thread() {
        let bus = Arc::new(InMemoryBus::new(Duration::from_secs(5)));
        let writer = Arc::clone(&bus);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            writer.send("alice", "bob", "d:0", vec![1, 2, 3]);
        });
        let received = bus.recv("alice", "bob", "d:0").unwrap();
        assert_eq!(received, vec![1, 2, 3]);
        handle.join().unwrap();
    }

    #[test]
    fn fetch_can_be_observed_by_multiple_readers() {
        let bus = InMemoryBus::new(Duration::from_secs(5));
        bus.publish("alice", "final", vec![9]);
        assert_eq!(bus.fetch("alice", "final").unwrap(), vec![9]);
        assert_eq!(bus.fetch("alice", "final").unwrap(), vec![9]);
    }

    #[test]
    fn recv_times_out_when_nothing_arrives() {
        let bus = InMemoryBus::new(Duration::from_millis(50));
        let err = bus.recv("alice", "bob", "never").unwrap_err();
        assert!(matches!(err, SmcError::Aborted(_)));
    }
}
