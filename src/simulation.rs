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

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::awaitable::Awaitable;
use crate::error::Fault;
use crate::event::Event;
use crate::event_queue::{EventQueue, QueuedEvent};
use crate::process::Process;

struct Inner {
    now: Mutex<f64>,
    queue: Mutex<EventQueue>,
    next_id: AtomicU64,
}

/// Owns the virtual clock, the event queue, and the insertion-order
/// counter that breaks same-time ties.
///
/// `Simulation` is a cheap `Arc`-backed handle: cloning it shares the same
/// kernel state, which is how every `Event`, `Process`, `Resource`,
/// `Container`, and `Store` reaches back into the same clock and queue.
#[derive(Clone)]
pub struct Simulation {
    inner: Arc<Inner>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Creates a simulation with its clock at time zero.
    pub fn new() -> Simulation {
        Simulation {
            inner: Arc::new(Inner {
                now: Mutex::new(0.0),
                queue: Mutex::new(EventQueue::default()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// The current virtual time.
    pub fn now(&self) -> f64 {
        *self.inner.now.lock()
    }

    /// Creates a new pending event bound to this simulation.
    pub fn event(&self) -> Event {
        Event::new(self.clone())
    }

    /// Creates a pending event already delay-triggered `delay` time units
    /// from now. `delay` must not be negative.
    pub fn timeout(&self, delay: f64) -> Event {
        let ev = self.event();
        ev.trigger_delayed(delay);
        ev
    }

    /// Spawns a process: a runner closure that executes on its own thread,
    /// rendezvousing with the kernel every time it waits.
    ///
    /// The runner does not start executing until the kernel processes the
    /// process's bootstrap event, which happens on the next `step`.
    pub fn process<F>(&self, runner: F) -> Process
    where
        F: FnOnce(Process) + Send + 'static,
    {
        Process::spawn(self, runner)
    }

    /// An event that triggers as soon as any one of `awaitables` is
    /// processed, or aborts once every one of them has aborted.
    pub fn any_of(&self, awaitables: &[&dyn Awaitable]) -> Event {
        crate::anyof::any_of(self, awaitables)
    }

    /// An event that triggers once every one of `awaitables` is processed,
    /// or aborts as soon as any one of them aborts.
    pub fn all_of(&self, awaitables: &[&dyn Awaitable]) -> Event {
        crate::allof::all_of(self, awaitables)
    }

    /// Pops the next due event, advances the clock to its time, and
    /// processes it. Returns `false` if the queue is empty.
    pub fn step(&self) -> bool {
        let qe = match self.inner.queue.lock().pop() {
            Some(qe) => qe,
            None => return false,
        };
        *self.inner.now.lock() = qe.time;
        log::debug!("step: now = {}", qe.time);
        qe.event.process();
        true
    }

    /// Steps until the queue is empty.
    pub fn run(&self) {
        while self.step() {}
    }

    /// Steps until the queue head is due at or after `target`, then
    /// advances the clock to exactly `target`. `target` must not be
    /// before the current time.
    pub fn run_until(&self, target: f64) {
        let now = self.now();
        if target < now {
            Fault::TargetBeforeNow { target, now }.raise();
        }
        loop {
            let next_time = self.inner.queue.lock().peek_time();
            match next_time {
                Some(t) if t < target => {
                    self.step();
                }
                _ => break,
            }
        }
        *self.inner.now.lock() = target;
        log::debug!("run_until: now = {target}");
    }

    pub(crate) fn schedule(&self, event: Event, delay: f64) {
        let time = self.now() + delay;
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        log::trace!("scheduling event id={id} at time={time}");
        self.inner.queue.lock().push(QueuedEvent { event, time, id });
    }
}
