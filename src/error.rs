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

//! Every precondition violation the kernel treats as fatal.
//!
//! `Fault` is never returned from a public operation as a `Result` — these
//! are programmer errors, not recoverable conditions. It exists so that
//! every panicking call site shares one message format, and so tests can
//! assert on *which* fault fired by downcasting a caught panic payload.

use thiserror::Error;

/// A programmer-error condition the kernel refuses to proceed past.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Fault {
    /// `Event::trigger_delayed` or `Simulation::timeout` was given a
    /// negative delay.
    #[error("delay must not be negative: {0}")]
    NegativeDelay(f64),

    /// `Simulation::run_until` was given a target before the current time.
    #[error("run_until target {target} is before the current time {now}")]
    TargetBeforeNow {
        /// The requested target time.
        target: f64,
        /// The simulation's current time.
        now: f64,
    },

    /// A `Store` was constructed with a capacity of zero.
    #[error("store capacity must be >= 1, got {0}")]
    NonPositiveCapacity(i64),

    /// `Container::get` or `Container::put` was given a negative amount.
    #[error("amount must not be negative: {0}")]
    NegativeAmount(f64),
}

impl Fault {
    /// Panics with this fault's message. The panic itself is the signal;
    /// logging it first would just duplicate it.
    pub(crate) fn raise(self) -> ! {
        panic!("{self}");
    }
}
