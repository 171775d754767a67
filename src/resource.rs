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

use crate::event::Event;
use crate::simulation::Simulation;

struct Inner {
    sim: Simulation,
    reqs: VecDeque<Event>,
    available: usize,
}

/// A counted semaphore expressed in events: requests queue up FIFO and are
/// granted as instances become available.
pub struct Resource {
    inner: Mutex<Inner>,
}

impl Resource {
    /// Creates a resource with `available` instances free at time zero.
    pub fn new(sim: &Simulation, available: usize) -> Resource {
        Resource {
            inner: Mutex::new(Inner { sim: sim.clone(), reqs: VecDeque::new(), available }),
        }
    }

    /// The number of instances currently free.
    pub fn available(&self) -> usize {
        self.inner.lock().available
    }

    /// Requests one instance. Returns an event that triggers once an
    /// instance is granted; requests are served strictly FIFO.
    pub fn request(&self) -> Event {
        let mut inner = self.inner.lock();
        let req = inner.sim.event();
        inner.reqs.push_back(req.clone());
        Self::grant_pending(&mut inner);
        req
    }

    /// Releases one instance back to the resource, potentially granting
    /// the next queued request.
    pub fn release(&self) {
        let mut inner = self.inner.lock();
        inner.available += 1;
        log::debug!("resource released, available={}", inner.available);
        Self::grant_pending(&mut inner);
    }

    fn grant_pending(inner: &mut Inner) {
        while inner.available > 0 {
            let Some(req) = inner.reqs.pop_front() else {
                break;
            };
            if !req.trigger() {
                continue;
            }
            inner.available -= 1;
            log::debug!("resource request granted, available={}", inner.available);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_granted_immediately_when_available() {
        let sim = Simulation::new();
        let res = Resource::new(&sim, 1);
        let req = res.request();
        assert!(req.triggered());
        assert_eq!(res.available(), 0);
    }

    #[test]
    fn requests_queue_fifo_when_unavailable() {
        let sim = Simulation::new();
        let res = Resource::new(&sim, 1);
        let first = res.request();
        let second = res.request();
        assert!(first.triggered());
        assert!(second.pending());

        res.release();
        assert!(second.triggered());
    }

    #[test]
    fn an_aborted_request_is_skipped_when_granting() {
        let sim = Simulation::new();
        let res = Resource::new(&sim, 1);
        let first = res.request();
        let second = res.request();
        second.abort();
        let third = res.request();

        res.release();
        sim.run();
        assert!(first.processed());
        assert!(third.processed());
    }
}
