//! Worker threads that pull actions from the [`TaskQueue`] and execute them.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use crate::action::{Action, ActionContext, Control, IssueSystemExit, new_action};
use crate::collab::WorkQueue;
use crate::engine::queue::{Next, TaskQueue};
use crate::utils::config::PollConsts;

/// Pool tuning.
#[derive(Clone, Debug)]
pub struct PoolSettings {
    pub num_threads: usize,
    /// How long an idle worker waits before seeding (or re-checking for close).
    pub idle_timeout: Duration,
    /// Pause after each termination poll so polls don't spin the queue.
    pub poll_interval: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            num_threads: 1,
            idle_timeout: PollConsts::IDLE_TIMEOUT,
            poll_interval: PollConsts::POLL_INTERVAL,
        }
    }
}

/// Single worker: run actions until the queue closes. When idle outside download-only mode, seed
/// fresh discovery work via [`new_action`].
fn worker_loop(id: usize, queue: Arc<TaskQueue>, ctx: ActionContext, settings: PoolSettings) {
    loop {
        let running = match queue.next(settings.idle_timeout) {
            Next::Ready(running) => running,
            Next::Idle => {
                if !ctx.download_only() {
                    queue.enqueue(new_action(&ctx));
                }
                continue;
            }
            Next::Closed => break,
        };
        let action = running.action();
        let is_poll = action.is_poll();
        if action.main_only() {
            debug!("worker {}: handing {} to the main context", id, action);
            ctx.main.run_in_main(action.clone(), false);
            queue.close();
            continue;
        }
        match action.execute(&ctx) {
            Ok(Control::Continue) => {}
            Ok(Control::Exit) => {
                warn!("worker {}: {} asked to exit; stopping", id, action);
                ctx.main.run_in_main(Action::IssueSystemExit(IssueSystemExit::new()), false);
                queue.close();
            }
            Err(e) => warn!("{}: {:#}", action, e),
        }
        // Release the in-flight slot first, or the next poll would count this one.
        drop(running);
        if is_poll && !settings.poll_interval.is_zero() {
            thread::sleep(settings.poll_interval);
        }
    }
    debug!("worker {} exiting", id);
}

/// Spawn `settings.num_threads` workers. Close the queue to stop them.
pub fn spawn_workers(
    queue: &Arc<TaskQueue>,
    ctx: &ActionContext,
    settings: &PoolSettings,
) -> Vec<JoinHandle<()>> {
    (0..settings.num_threads.max(1))
        .map(|id| {
            let queue = Arc::clone(queue);
            let ctx = ctx.clone();
            let settings = settings.clone();
            thread::spawn(move || worker_loop(id, queue, ctx, settings))
        })
        .collect()
}

/// Join workers after the queue was closed.
pub fn join_workers(handles: Vec<JoinHandle<()>>) {
    for h in handles {
        if h.join().is_err() {
            warn!("worker thread panicked");
        }
    }
}
