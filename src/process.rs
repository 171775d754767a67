/* Copyright © 2018 Gianmarco Garrisi

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>. */

use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::awaitable::Awaitable;
use crate::event::{Event, Handler};
use crate::simulation::Simulation;

#[derive(Debug, Clone, Copy)]
enum Reason {
    Processed,
    Aborted,
}

/// Payload of the two-way rendezvous channel. A process sends `Yield` when
/// it suspends; the kernel, via a handler, sends `Resume` when the thing
/// it was waiting on settles.
enum Token {
    Resume(Reason),
    Yield,
}

/// Private panic payload used to unwind a process's thread when it waits
/// on an awaitable that is or becomes aborted. Never observed outside this
/// module; the installed panic hook keeps it from printing.
struct ProcessAborted;

static INSTALL_HOOK: Once = Once::new();

fn install_abort_hook() {
    INSTALL_HOOK.call_once(|| {
        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if info.payload().downcast_ref::<ProcessAborted>().is_some() {
                return;
            }
            default_hook(info);
        }));
    });
}

/// A cooperative task: an underlying [`Event`] that fires when the runner
/// returns, a rendezvous channel shared with its own OS thread, and
/// [`wait`](Process::wait) for suspending on another awaitable.
///
/// Cloning a `Process` is cheap — every clone refers to the same runner
/// thread and the same channel.
#[derive(Clone)]
pub struct Process {
    sim: Simulation,
    event: Event,
    tx: Sender<Token>,
    rx: Receiver<Token>,
}

impl Process {
    pub(crate) fn spawn<F>(sim: &Simulation, runner: F) -> Process
    where
        F: FnOnce(Process) + Send + 'static,
    {
        install_abort_hook();

        let (tx, rx) = bounded::<Token>(0);
        let proc = Process { sim: sim.clone(), event: sim.event(), tx, rx };

        // The bootstrap event gets the runner its first turn on the next
        // kernel step, keeping `process()` itself non-suspending.
        let bootstrap = sim.event();
        let resume = proc.clone();
        bootstrap.add_handler(Box::new(move |_ev| {
            resume.hand_off(Reason::Processed);
        }));
        bootstrap.trigger();

        let thread_proc = proc.clone();
        thread::Builder::new()
            .name("desim-process".into())
            .spawn(move || {
                let _ = thread_proc.rx.recv();

                let result = {
                    let runner_proc = thread_proc.clone();
                    panic::catch_unwind(AssertUnwindSafe(move || runner(runner_proc)))
                };

                match result {
                    Ok(()) => {
                        thread_proc.event.trigger();
                        let _ = thread_proc.tx.send(Token::Yield);
                    }
                    Err(payload) => {
                        if payload.downcast_ref::<ProcessAborted>().is_some() {
                            let _ = thread_proc.tx.send(Token::Yield);
                        } else {
                            panic::resume_unwind(payload);
                        }
                    }
                }
            })
            .expect("failed to spawn process thread");

        proc
    }

    fn hand_off(&self, reason: Reason) {
        let _ = self.tx.send(Token::Resume(reason));
        let _ = self.rx.recv();
    }

    /// The simulation this process belongs to.
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// The current virtual time.
    pub fn now(&self) -> f64 {
        self.sim.now()
    }

    /// Creates a new pending event bound to this process's simulation.
    pub fn event(&self) -> Event {
        self.sim.event()
    }

    /// Creates a pending event delay-triggered `delay` time units from now.
    pub fn timeout(&self, delay: f64) -> Event {
        self.sim.timeout(delay)
    }

    /// Spawns a sibling process in the same simulation.
    pub fn process<F>(&self, runner: F) -> Process
    where
        F: FnOnce(Process) + Send + 'static,
    {
        self.sim.process(runner)
    }

    /// An event that triggers as soon as any one of `awaitables` is
    /// processed, or aborts once every one of them has aborted.
    pub fn any_of(&self, awaitables: &[&dyn Awaitable]) -> Event {
        self.sim.any_of(awaitables)
    }

    /// An event that triggers once every one of `awaitables` is processed,
    /// or aborts as soon as any one of them aborts.
    pub fn all_of(&self, awaitables: &[&dyn Awaitable]) -> Event {
        self.sim.all_of(awaitables)
    }

    /// Suspends the calling process until `awaitable` is processed.
    ///
    /// If `awaitable` is already aborted, or becomes aborted while this
    /// process is suspended on it, this process itself aborts: its
    /// underlying event transitions to aborted and no code after this
    /// call runs.
    pub fn wait(&self, awaitable: &dyn Awaitable) {
        if awaitable.processed() {
            return;
        }

        if awaitable.aborted() {
            log::trace!("wait: awaitable was already aborted");
            self.event.abort();
            panic::panic_any(ProcessAborted);
        }

        let resume = self.clone();
        awaitable.add_handler(Box::new(move |_ev| resume.hand_off(Reason::Processed)));

        let abort = self.clone();
        awaitable.add_abort_handler(Box::new(move |_ev| abort.hand_off(Reason::Aborted)));

        let _ = self.tx.send(Token::Yield);
        match self.rx.recv() {
            Ok(Token::Resume(Reason::Processed)) => {}
            Ok(Token::Resume(Reason::Aborted)) => {
                log::trace!("wait: resumed via abort propagation");
                self.event.abort();
                panic::panic_any(ProcessAborted);
            }
            _ => unreachable!("process rendezvous protocol violated"),
        }
    }

    /// Triggers this process's underlying event for immediate processing.
    pub fn trigger(&self) -> bool {
        self.event.trigger()
    }

    /// Delay-triggers this process's underlying event.
    pub fn trigger_delayed(&self, delay: f64) -> bool {
        self.event.trigger_delayed(delay)
    }

    /// Aborts this process's underlying event if it is still pending.
    pub fn abort(&self) -> bool {
        self.event.abort()
    }

    /// `true` while the process's underlying event has not yet been
    /// triggered or aborted.
    pub fn pending(&self) -> bool {
        self.event.pending()
    }

    /// `true` once the process's underlying event has been triggered.
    pub fn triggered(&self) -> bool {
        self.event.triggered()
    }

    /// `true` once the process has finished running (its runner returned).
    pub fn processed(&self) -> bool {
        self.event.processed()
    }

    /// `true` once the process has aborted.
    pub fn aborted(&self) -> bool {
        self.event.aborted()
    }

    /// Registers a handler to run when the process finishes.
    pub fn add_handler(&self, handler: Handler) {
        self.event.add_handler(handler);
    }

    /// Registers a handler to run when the process aborts.
    pub fn add_abort_handler(&self, handler: Handler) {
        self.event.add_abort_handler(handler);
    }
}

impl Awaitable for Process {
    fn processed(&self) -> bool {
        Process::processed(self)
    }

    fn aborted(&self) -> bool {
        Process::aborted(self)
    }

    fn add_handler(&self, handler: Handler) {
        Process::add_handler(self, handler);
    }

    fn add_abort_handler(&self, handler: Handler) {
        Process::add_abort_handler(self, handler);
    }
}
