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

/// Returns an event that fires once every one of `awaitables` has
/// processed, or aborts as soon as any one of them aborts.
///
/// An empty slice and an all-already-processed input set both
/// short-circuit to an immediately-triggered event.
pub(crate) fn all_of(sim: &Simulation, awaitables: &[&dyn Awaitable]) -> Event {
    if awaitables.iter().any(|a| a.aborted()) {
        log::trace!("all_of: an input was already aborted");
        let out = sim.event();
        out.abort();
        return out;
    }

    let remaining = awaitables.iter().filter(|a| !a.processed()).count();
    if remaining == 0 {
        log::trace!("all_of: every input was already processed");
        return sim.timeout(0.0);
    }

    let out = sim.event();
    let n = Arc::new(AtomicUsize::new(remaining));

    for awaitable in awaitables {
        let fire = out.clone();
        let n = Arc::clone(&n);
        awaitable.add_handler(Box::new(move |_ev| {
            if n.fetch_sub(1, Ordering::SeqCst) == 1 {
                fire.trigger();
            }
        }));

        let abort = out.clone();
        awaitable.add_abort_handler(Box::new(move |_ev| {
            abort.abort();
        }));
    }

    out
}
