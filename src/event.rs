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

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Fault;
use crate::simulation::Simulation;

/// A callback fired once, with the event it was registered on.
///
/// A handler receives the event as an argument so that a single closure
/// may serve several events (the `AnyOf`/`AllOf` combinators both do this).
pub type Handler = Box<dyn FnOnce(&Event) + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Pending,
    Triggered,
    Processed,
    Aborted,
}

struct StateData {
    state: State,
    handlers: Vec<Handler>,
    abort_handlers: Vec<Handler>,
}

struct Inner {
    sim: Simulation,
    data: Mutex<StateData>,
}

/// The kernel's single synchronization primitive.
///
/// An `Event` moves through the state machine pending → triggered →
/// processed, or pending → aborted. `Event` is a cheap `Arc`-backed handle;
/// cloning it refers to the same underlying state.
#[derive(Clone)]
pub struct Event {
    inner: Arc<Inner>,
}

impl Event {
    pub(crate) fn new(sim: Simulation) -> Event {
        Event {
            inner: Arc::new(Inner {
                sim,
                data: Mutex::new(StateData {
                    state: State::Pending,
                    handlers: Vec::new(),
                    abort_handlers: Vec::new(),
                }),
            }),
        }
    }

    /// Marks the event triggered (if it is pending or already triggered)
    /// and schedules it to fire at the current time.
    ///
    /// Returns `false`, doing nothing, if the event is already processed
    /// or aborted.
    pub fn trigger(&self) -> bool {
        if !self.mark_triggered() {
            return false;
        }
        log::trace!("event triggered for immediate processing");
        self.inner.sim.schedule(self.clone(), 0.0);
        true
    }

    /// Like [`trigger`](Event::trigger), but schedules the event `delay`
    /// time units from now. `delay` must not be negative.
    ///
    /// An event may be delay-triggered more than once; only the earliest
    /// enqueuement actually fires, and a subsequent [`trigger`](Event::trigger)
    /// call can pre-empt a pending delay to fire immediately.
    pub fn trigger_delayed(&self, delay: f64) -> bool {
        if delay < 0.0 {
            Fault::NegativeDelay(delay).raise();
        }
        if !self.mark_triggered() {
            return false;
        }
        log::trace!("event scheduled with delay {delay}");
        self.inner.sim.schedule(self.clone(), delay);
        true
    }

    /// Aborts the event if it is still pending: clears its handler lists,
    /// transitions it to aborted, and fires its abort handlers.
    ///
    /// Returns `false`, doing nothing, if the event is no longer pending.
    pub fn abort(&self) -> bool {
        let abort_handlers = {
            let mut data = self.inner.data.lock();
            if data.state != State::Pending {
                return false;
            }
            data.state = State::Aborted;
            data.handlers.clear();
            std::mem::take(&mut data.abort_handlers)
        };
        log::trace!("event aborted");
        for handler in abort_handlers {
            handler(self);
        }
        true
    }

    /// `true` while the event has not yet been triggered or aborted.
    pub fn pending(&self) -> bool {
        self.inner.data.lock().state == State::Pending
    }

    /// `true` once the event has been triggered, whether or not it has
    /// since been processed.
    pub fn triggered(&self) -> bool {
        matches!(self.inner.data.lock().state, State::Triggered | State::Processed)
    }

    /// `true` once the kernel has popped this event from the queue and run
    /// its handlers.
    pub fn processed(&self) -> bool {
        self.inner.data.lock().state == State::Processed
    }

    /// `true` once the event has been aborted.
    pub fn aborted(&self) -> bool {
        self.inner.data.lock().state == State::Aborted
    }

    /// Registers a handler to run when the event is processed.
    ///
    /// Silently discarded if the event is already processed or aborted.
    pub fn add_handler(&self, handler: Handler) {
        let mut data = self.inner.data.lock();
        match data.state {
            State::Pending | State::Triggered => data.handlers.push(handler),
            State::Processed | State::Aborted => {
                log::trace!("handler discarded: event already in a terminal state");
            }
        }
    }

    /// Registers a handler to run when the event is aborted.
    ///
    /// Silently discarded if the event is already processed or aborted.
    pub fn add_abort_handler(&self, handler: Handler) {
        let mut data = self.inner.data.lock();
        match data.state {
            State::Pending | State::Triggered => data.abort_handlers.push(handler),
            State::Processed | State::Aborted => {
                log::trace!("abort handler discarded: event already in a terminal state");
            }
        }
    }

    /// Runs this event's handlers if it is due (i.e. triggered), then
    /// marks it processed. Called only by the kernel's step loop.
    pub(crate) fn process(&self) {
        let handlers = {
            let mut data = self.inner.data.lock();
            if data.state != State::Triggered {
                return;
            }
            data.state = State::Processed;
            data.abort_handlers.clear();
            std::mem::take(&mut data.handlers)
        };
        log::trace!("event processed, running {} handler(s)", handlers.len());
        for handler in handlers {
            handler(self);
        }
    }

    fn mark_triggered(&self) -> bool {
        let mut data = self.inner.data.lock();
        match data.state {
            State::Pending => {
                data.state = State::Triggered;
                true
            }
            State::Triggered => true,
            State::Processed | State::Aborted => false,
        }
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event").field("state", &self.inner.data.lock().state).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::simulation::Simulation;

    #[test]
    fn trigger_once_then_process() {
        let sim = Simulation::new();
        let ev = sim.event();
        assert!(ev.pending());
        assert!(ev.trigger());
        assert!(ev.triggered());
        assert!(!ev.processed());
        sim.run();
        assert!(ev.processed());
    }

    #[test]
    fn trigger_after_processed_is_a_no_op() {
        let sim = Simulation::new();
        let ev = sim.event();
        ev.trigger();
        sim.run();
        assert!(!ev.trigger());
    }

    #[test]
    fn trigger_can_preempt_a_delayed_trigger() {
        let sim = Simulation::new();
        let ev = sim.timeout(5.0);
        assert!(ev.trigger());
        sim.run();
        assert_eq!(sim.now(), 0.0);
    }

    #[test]
    fn abort_only_legal_while_pending() {
        let sim = Simulation::new();
        let ev = sim.event();
        ev.trigger();
        assert!(!ev.abort());
        let ev2 = sim.event();
        assert!(ev2.abort());
        assert!(ev2.aborted());
    }

    #[test]
    fn handlers_run_exactly_once_on_processing() {
        let sim = Simulation::new();
        let ev = sim.event();
        let count = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let c = count.clone();
        ev.add_handler(Box::new(move |_| {
            c.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }));
        ev.trigger();
        sim.run();
        assert_eq!(count.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
