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

use crate::event::{Event, Handler};

/// Anything a [`Process`](crate::Process) can wait on: a terminal-state
/// predicate pair plus the ability to register callbacks for either
/// outcome.
///
/// `Event`, `Process`, and the request/amount/item events returned by
/// `Resource`, `Container`, and `Store` all implement this trait, which is
/// what lets `AnyOf`/`AllOf` and `Process::wait` treat them uniformly.
pub trait Awaitable {
    /// `true` once this awaitable has reached its processed state.
    fn processed(&self) -> bool;

    /// `true` once this awaitable has been aborted.
    fn aborted(&self) -> bool;

    /// Registers a handler to run when this awaitable is processed.
    fn add_handler(&self, handler: Handler);

    /// Registers a handler to run when this awaitable is aborted.
    fn add_abort_handler(&self, handler: Handler);
}

impl Awaitable for Event {
    fn processed(&self) -> bool {
        Event::processed(self)
    }

    fn aborted(&self) -> bool {
        Event::aborted(self)
    }

    fn add_handler(&self, handler: Handler) {
        Event::add_handler(self, handler)
    }

    fn add_abort_handler(&self, handler: Handler) {
        Event::add_abort_handler(self, handler)
    }
}
