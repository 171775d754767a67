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

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::event::Event;

/// One entry in the kernel's event queue: an event plus the time it's due
/// and a monotonic insertion id used to break ties in FIFO order.
pub(crate) struct QueuedEvent {
    pub(crate) event: Event,
    pub(crate) time: f64,
    pub(crate) id: u64,
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.id == other.id
    }
}

impl Eq for QueuedEvent {}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedEvent {
    // `BinaryHeap` is a max-heap; reverse the comparison so the smallest
    // (time, id) pair surfaces first.
    fn cmp(&self, other: &Self) -> Ordering {
        let time_order = other
            .time
            .partial_cmp(&self.time)
            .unwrap_or_else(|| panic!("event time was not comparable, maybe NaN"));
        time_order.then_with(|| other.id.cmp(&self.id))
    }
}

/// A min-heap over `(time, id)`, giving FIFO order among events due at the
/// same time.
#[derive(Default)]
pub(crate) struct EventQueue {
    heap: BinaryHeap<QueuedEvent>,
}

impl EventQueue {
    pub(crate) fn push(&mut self, qe: QueuedEvent) {
        self.heap.push(qe);
    }

    pub(crate) fn pop(&mut self) -> Option<QueuedEvent> {
        self.heap.pop()
    }

    pub(crate) fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|qe| qe.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Simulation;

    #[test]
    fn pops_in_time_then_insertion_order() {
        let sim = Simulation::new();
        let mut q = EventQueue::default();
        q.push(QueuedEvent { event: sim.event(), time: 5.0, id: 0 });
        q.push(QueuedEvent { event: sim.event(), time: 1.0, id: 1 });
        q.push(QueuedEvent { event: sim.event(), time: 1.0, id: 2 });

        let first = q.pop().unwrap();
        assert_eq!((first.time, first.id), (1.0, 1));
        let second = q.pop().unwrap();
        assert_eq!((second.time, second.id), (1.0, 2));
        let third = q.pop().unwrap();
        assert_eq!((third.time, third.id), (5.0, 0));
        assert!(q.pop().is_none());
    }
}
