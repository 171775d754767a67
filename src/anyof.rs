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

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::awaitable::Awaitable;
use crate::event::Event;
use crate::simulation::Simulation;

/// Returns an event that fires as soon as any one of `awaitables`
/// processes, or aborts once every one of them has aborted.
///
/// An empty slice and an already-processed input both short-circuit to an
/// immediately-triggered event.
pub(crate) fn any_of(sim: &Simulation, awaitables: &[&dyn Awaitable]) -> Event {
    if awaitables.is_empty() {
        log::trace!("any_of: no inputs, triggers immediately");
        return sim.timeout(0.0);
    }

    if awaitables.iter().any(|a| a.processed()) {
        log::trace!("any_of: an input was already processed");
        return sim.timeout(0.0);
    }

    let remaining = awaitables.iter().filter(|a| !a.aborted()).count();
    if remaining == 0 {
        log::trace!("any_of: every input was already aborted");
        let out = sim.event();
        out.abort();
        return out;
    }

    let out = sim.event();
    let n = Arc::new(AtomicUsize::new(remaining));

    for awaitable in awaitables {
        let fire = out.clone();
        awaitable.add_handler(Box::new(move |_ev| {
            fire.trigger();
        }));

        let abort = out.clone();
        let n = Arc::clone(&n);
        awaitable.add_abort_handler(Box::new(move |_ev| {
            if n.fetch_sub(1, Ordering::SeqCst) == 1 {
                abort.abort();
            }
        }));
    }

    out
}
