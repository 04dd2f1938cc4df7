//! The distinguished main execution context: a single-consumer channel drained on the thread that
//! calls [`MainContext::run`].

use anyhow::Result;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use log::{debug, warn};

use crate::action::{Action, ActionContext, Control};
use crate::collab::MainDispatcher;

enum MainMessage {
    Run {
        action: Action,
        done: Option<Sender<()>>,
    },
    Interrupt,
}

/// Why [`MainContext::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainExit {
    /// An action asked for the process to stop.
    Requested,
    /// Ctrl-C or an explicit [`MainHandle::interrupt`].
    Interrupted,
    /// Every handle was dropped.
    Disconnected,
}

/// Producer side. Cloned into the action context and the Ctrl-C handler.
#[derive(Clone)]
pub struct MainHandle {
    tx: Sender<MainMessage>,
}

pub struct MainContext {
    rx: Receiver<MainMessage>,
}

/// Create a connected handle/context pair.
pub fn main_context() -> (MainHandle, MainContext) {
    let (tx, rx) = unbounded();
    (MainHandle { tx }, MainContext { rx })
}

impl MainHandle {
    pub fn interrupt(&self) {
        let _ = self.tx.send(MainMessage::Interrupt);
    }
}

impl MainDispatcher for MainHandle {
    /// With `wait = true` this blocks until the main context has run the action; never call it
    /// that way from the main context itself.
    fn run_in_main(&self, action: Action, wait: bool) {
        if !wait {
            if self.tx.send(MainMessage::Run { action, done: None }).is_err() {
                warn!("main context is gone; dropping action");
            }
            return;
        }
        let (done_tx, done_rx) = bounded(1);
        let sent = self.tx.send(MainMessage::Run {
            action,
            done: Some(done_tx),
        });
        if sent.is_err() {
            warn!("main context is gone; dropping action");
            return;
        }
        let _ = done_rx.recv();
    }
}

impl MainContext {
    /// Execute dispatched actions on the current thread until one asks to exit, an interrupt
    /// arrives or every handle is dropped.
    pub fn run(&self, ctx: &ActionContext) -> Result<MainExit> {
        while let Ok(msg) = self.rx.recv() {
            let (action, done) = match msg {
                MainMessage::Run { action, done } => (action, done),
                MainMessage::Interrupt => return Ok(MainExit::Interrupted),
            };
            debug!("main: {}", action);
            let control = action.execute(ctx);
            if let Some(done) = done {
                let _ = done.send(());
            }
            match control {
                Ok(Control::Exit) => return Ok(MainExit::Requested),
                Ok(Control::Continue) => {}
                Err(e) => warn!("{}: {:#}", action, e),
            }
        }
        Ok(MainExit::Disconnected)
    }
}
