//! In-process work queue: FIFO order, coalesces equal pending actions, tracks in-flight work.

use std::collections::{HashSet, VecDeque};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::trace;

use crate::action::Action;
use crate::collab::WorkQueue;

#[derive(Default)]
struct QueueState {
    pending: VecDeque<Action>,
    queued: HashSet<Action>,
    in_flight: usize,
    closed: bool,
}

/// What [`TaskQueue::next`] hands back.
pub enum Next<'a> {
    Ready(Running<'a>),
    /// Nothing arrived within the timeout.
    Idle,
    Closed,
}

/// An action popped from the queue. Counts toward [`WorkQueue::pending_count`] until dropped.
pub struct Running<'a> {
    queue: &'a TaskQueue,
    action: Action,
}

impl Running<'_> {
    pub fn action(&self) -> &Action {
        &self.action
    }
}

impl Drop for Running<'_> {
    fn drop(&mut self) {
        let mut state = self.queue.lock();
        state.in_flight -= 1;
        drop(state);
        self.queue.ready.notify_all();
    }
}

#[derive(Default)]
pub struct TaskQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait up to `timeout` for the next action.
    pub fn next(&self, timeout: Duration) -> Next<'_> {
        let mut state = self.lock();
        if state.pending.is_empty() && !state.closed {
            state = self
                .ready
                .wait_timeout_while(state, timeout, |s| s.pending.is_empty() && !s.closed)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|e| e.into_inner().0);
        }
        if state.closed {
            return Next::Closed;
        }
        match state.pending.pop_front() {
            Some(action) => {
                state.queued.remove(&action);
                state.in_flight += 1;
                Next::Ready(Running {
                    queue: self,
                    action,
                })
            }
            None => Next::Idle,
        }
    }

    /// Actions waiting (not counting in-flight ones).
    pub fn queued_len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Stop handing out work and wake every waiter. Later enqueues are dropped.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.pending.clear();
        state.queued.clear();
        drop(state);
        self.ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl WorkQueue for TaskQueue {
    fn enqueue(&self, action: Action) {
        let mut state = self.lock();
        if state.closed {
            return;
        }
        if !state.queued.insert(action.clone()) {
            trace!("coalesced {}", action);
            return;
        }
        state.pending.push_back(action);
        drop(state);
        self.ready.notify_one();
    }

    fn pending_count(&self) -> usize {
        let state = self.lock();
        state.pending.len() + state.in_flight
    }
}
