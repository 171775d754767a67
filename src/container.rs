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

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::awaitable::Awaitable;
use crate::error::Fault;
use crate::event::{Event, Handler};
use crate::simulation::Simulation;

struct Inner {
    sim: Simulation,
    level: f64,
    capacity: f64,
    gets: VecDeque<AmountEvent>,
    puts: VecDeque<AmountEvent>,
}

/// The event returned by [`Container::get`] and [`Container::put`],
/// carrying the amount that was requested or offered.
#[derive(Clone)]
pub struct AmountEvent {
    event: Event,
    amount: f64,
}

impl AmountEvent {
    /// The amount this request was for.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// `true` once the event has been triggered, whether or not it has
    /// since been processed.
    pub fn triggered(&self) -> bool {
        self.event.triggered()
    }
}

impl Awaitable for AmountEvent {
    fn processed(&self) -> bool {
        self.event.processed()
    }

    fn aborted(&self) -> bool {
        self.event.aborted()
    }

    fn add_handler(&self, handler: Handler) {
        self.event.add_handler(handler)
    }

    fn add_abort_handler(&self, handler: Handler) {
        self.event.add_abort_handler(handler)
    }
}

/// A level-bounded continuous quantity with FIFO `get`/`put` requests.
///
/// Unlike [`Store`](crate::Store), a `Container` holds an undifferentiated
/// amount rather than discrete items.
pub struct Container {
    inner: Mutex<Inner>,
}

impl Container {
    /// An empty, uncapped container.
    pub fn new(sim: &Simulation) -> Container {
        Self::filled_with_capacity(sim, 0.0, f64::INFINITY)
    }

    /// An empty container capped at `capacity`.
    pub fn with_capacity(sim: &Simulation, capacity: f64) -> Container {
        Self::filled_with_capacity(sim, 0.0, capacity)
    }

    /// An uncapped container starting at `level`.
    pub fn filled(sim: &Simulation, level: f64) -> Container {
        Self::filled_with_capacity(sim, level, f64::INFINITY)
    }

    /// A container capped at `capacity`, starting at `level`.
    pub fn filled_with_capacity(sim: &Simulation, level: f64, capacity: f64) -> Container {
        Container {
            inner: Mutex::new(Inner {
                sim: sim.clone(),
                level,
                capacity,
                gets: VecDeque::new(),
                puts: VecDeque::new(),
            }),
        }
    }

    /// The current level.
    pub fn level(&self) -> f64 {
        self.inner.lock().level
    }

    /// The container's capacity.
    pub fn capacity(&self) -> f64 {
        self.inner.lock().capacity
    }

    /// Requests `amount` be withdrawn. `amount` must not be negative.
    pub fn get(&self, amount: f64) -> AmountEvent {
        if amount < 0.0 {
            Fault::NegativeAmount(amount).raise();
        }
        let mut inner = self.inner.lock();
        let ev = AmountEvent { event: inner.sim.event(), amount };
        inner.gets.push_back(ev.clone());
        Self::trigger_gets(&mut inner, true);
        ev
    }

    /// Offers `amount` to be deposited. `amount` must not be negative.
    pub fn put(&self, amount: f64) -> AmountEvent {
        if amount < 0.0 {
            Fault::NegativeAmount(amount).raise();
        }
        let mut inner = self.inner.lock();
        let ev = AmountEvent { event: inner.sim.event(), amount };
        inner.puts.push_back(ev.clone());
        Self::trigger_puts(&mut inner, true);
        ev
    }

    // Head-of-line only: a get/put that doesn't yet fit blocks everyone
    // behind it, even if a later one would fit.
    fn trigger_gets(inner: &mut Inner, also_reconsider_puts: bool) {
        loop {
            let mut granted_any = false;
            while let Some(front) = inner.gets.front() {
                if front.amount > inner.level {
                    break;
                }
                let get = inner.gets.pop_front().unwrap();
                if get.event.aborted() {
                    continue;
                }
                inner.level -= get.amount;
                get.event.trigger();
                granted_any = true;
                log::debug!("container get granted, amount={}, level={}", get.amount, inner.level);
            }
            if granted_any && also_reconsider_puts {
                Self::trigger_puts(inner, false);
            } else {
                break;
            }
        }
    }

    fn trigger_puts(inner: &mut Inner, also_reconsider_gets: bool) {
        loop {
            let mut granted_any = false;
            while let Some(front) = inner.puts.front() {
                if front.amount > inner.capacity - inner.level {
                    break;
                }
                let put = inner.puts.pop_front().unwrap();
                if put.event.aborted() {
                    continue;
                }
                inner.level += put.amount;
                put.event.trigger();
                granted_any = true;
                log::debug!("container put granted, amount={}, level={}", put.amount, inner.level);
            }
            if granted_any && also_reconsider_gets {
                Self::trigger_gets(inner, false);
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_is_granted_immediately_when_enough_is_available() {
        let sim = Simulation::new();
        let c = Container::filled(&sim, 10.0);
        let ev = c.get(4.0);
        assert!(ev.event.triggered());
        assert_eq!(c.level(), 6.0);
    }

    #[test]
    fn get_blocks_until_enough_is_put() {
        let sim = Simulation::new();
        let c = Container::new(&sim);
        let ev = c.get(5.0);
        assert!(ev.event.pending());
        c.put(5.0);
        assert!(ev.event.triggered());
        assert_eq!(c.level(), 0.0);
    }

    #[test]
    fn head_of_line_get_blocks_a_smaller_one_behind_it() {
        let sim = Simulation::new();
        let c = Container::new(&sim);
        let blocked = c.get(10.0);
        let smaller = c.get(1.0);
        c.put(2.0);
        assert!(blocked.event.pending());
        assert!(smaller.event.pending());
    }

    #[test]
    fn put_respects_capacity_fifo() {
        let sim = Simulation::new();
        let c = Container::with_capacity(&sim, 200.0);
        let first = c.put(160.0);
        let second = c.put(140.0);
        assert!(first.event.triggered());
        assert!(second.event.pending());
        c.get(160.0);
        assert!(second.event.triggered());
    }
}
