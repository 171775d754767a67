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
use std::sync::Arc;

use parking_lot::Mutex;

use crate::awaitable::Awaitable;
use crate::error::Fault;
use crate::event::{Event, Handler};
use crate::simulation::Simulation;

struct Inner<T> {
    sim: Simulation,
    items: VecDeque<T>,
    capacity: usize,
    gets: VecDeque<GetEvent<T>>,
    puts: VecDeque<PutEvent<T>>,
}

/// The event returned by [`Store::get`], carrying the retrieved item once
/// processed.
pub struct GetEvent<T> {
    event: Event,
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for GetEvent<T> {
    fn clone(&self) -> Self {
        GetEvent { event: self.event.clone(), slot: self.slot.clone() }
    }
}

impl<T> GetEvent<T> {
    /// Takes the retrieved item.
    ///
    /// Panics if called before the event has been triggered.
    pub fn item(&self) -> T {
        self.slot.lock().take().expect("GetEvent::item called before the event was triggered")
    }

    /// `true` once the event has been triggered, whether or not it has
    /// since been processed.
    pub fn triggered(&self) -> bool {
        self.event.triggered()
    }
}

impl<T: Send + 'static> Awaitable for GetEvent<T> {
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

/// The event returned by [`Store::put`].
pub struct PutEvent<T> {
    event: Event,
    item: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for PutEvent<T> {
    fn clone(&self) -> Self {
        PutEvent { event: self.event.clone(), item: self.item.clone() }
    }
}

impl<T> PutEvent<T> {
    /// `true` once the event has been triggered, whether or not it has
    /// since been processed.
    pub fn triggered(&self) -> bool {
        self.event.triggered()
    }
}

impl<T: Send + 'static> Awaitable for PutEvent<T> {
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

/// A capacity-bounded FIFO of items of type `T`.
pub struct Store<T> {
    state: Arc<Mutex<Inner<T>>>,
}

impl<T: Send + 'static> Clone for Store<T> {
    fn clone(&self) -> Self {
        Store { state: Arc::clone(&self.state) }
    }
}

impl<T: Send + 'static> Store<T> {
    /// A store with unbounded capacity.
    pub fn new(sim: &Simulation) -> Store<T> {
        Self::with_capacity(sim, usize::MAX)
    }

    /// A store that can hold at most `capacity` items. `capacity` must be
    /// at least 1.
    pub fn with_capacity(sim: &Simulation, capacity: usize) -> Store<T> {
        if capacity == 0 {
            Fault::NonPositiveCapacity(0).raise();
        }
        Store {
            state: Arc::new(Mutex::new(Inner {
                sim: sim.clone(),
                items: VecDeque::new(),
                capacity,
                gets: VecDeque::new(),
                puts: VecDeque::new(),
            })),
        }
    }

    /// This store's capacity.
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity
    }

    /// The number of items currently held.
    pub fn available(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Requests one item. Returns an event that triggers, with the item
    /// attached, once one is available; requests are served strictly
    /// FIFO.
    pub fn get(&self) -> GetEvent<T> {
        let mut inner = self.state.lock();
        let ev = GetEvent { event: inner.sim.event(), slot: Arc::new(Mutex::new(None)) };
        inner.gets.push_back(ev.clone());
        Self::trigger_gets(&mut inner, true);
        ev
    }

    /// Offers `item` for storage. Returns an event that triggers once a
    /// slot is available and the item has been stored.
    pub fn put(&self, item: T) -> PutEvent<T> {
        let mut inner = self.state.lock();
        let ev = PutEvent { event: inner.sim.event(), item: Arc::new(Mutex::new(Some(item))) };
        inner.puts.push_back(ev.clone());
        Self::trigger_puts(&mut inner, true);
        ev
    }

    // Head-of-line only, same discipline as `Container`: freeing a slot or
    // an item is reconsidered synchronously, not deferred to the next
    // kernel step.
    fn trigger_gets(inner: &mut Inner<T>, also_reconsider_puts: bool) {
        loop {
            let mut granted_any = false;
            while !inner.gets.is_empty() && !inner.items.is_empty() {
                let get = inner.gets.pop_front().unwrap();
                if !get.event.trigger() {
                    continue;
                }
                let item = inner.items.pop_front().unwrap();
                *get.slot.lock() = Some(item);
                granted_any = true;
                log::debug!("store get granted, available={}", inner.items.len());
            }
            if granted_any && also_reconsider_puts {
                Self::trigger_puts(inner, false);
            } else {
                break;
            }
        }
    }

    fn trigger_puts(inner: &mut Inner<T>, also_reconsider_gets: bool) {
        loop {
            let mut granted_any = false;
            while !inner.puts.is_empty() && inner.items.len() < inner.capacity {
                let put = inner.puts.pop_front().unwrap();
                if !put.event.trigger() {
                    continue;
                }
                let item = put.item.lock().take().expect("PutEvent item already taken");
                inner.items.push_back(item);
                granted_any = true;
                log::debug!("store put granted, available={}", inner.items.len());
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
    fn put_then_get_round_trips_an_item() {
        let sim = Simulation::new();
        let store: Store<&'static str> = Store::new(&sim);
        store.put("widget");
        let get = store.get();
        assert!(get.event.triggered());
        assert_eq!(get.item(), "widget");
    }

    #[test]
    fn get_blocks_until_an_item_is_put() {
        let sim = Simulation::new();
        let store: Store<i32> = Store::new(&sim);
        let get = store.get();
        assert!(get.event.pending());
        store.put(7);
        assert!(get.event.triggered());
        assert_eq!(get.item(), 7);
    }

    #[test]
    fn put_blocks_at_capacity_and_unblocks_on_get() {
        let sim = Simulation::new();
        let store: Store<i32> = Store::with_capacity(&sim, 1);
        store.put(1);
        let blocked_put = store.put(2);
        assert!(blocked_put.event.pending());

        let get = store.get();
        assert_eq!(get.item(), 1);
        assert!(blocked_put.event.triggered());
    }

    #[test]
    fn third_put_waits_for_first_get_capacity_two() {
        let sim = Simulation::new();
        let store: Store<i32> = Store::with_capacity(&sim, 2);
        store.put(1);
        store.put(2);
        let third = store.put(3);
        assert!(third.event.pending());

        let get = store.get();
        assert_eq!(get.item(), 1);
        assert!(third.event.triggered());
    }

    #[test]
    #[should_panic]
    fn zero_capacity_is_fatal() {
        let sim = Simulation::new();
        let _store: Store<i32> = Store::with_capacity(&sim, 0);
    }
}
