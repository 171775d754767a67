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

//! A process-oriented discrete-event simulation kernel, in the spirit of
//! Python's SimPy.
//!
//! A [`Simulation`] owns a virtual clock and an event queue. Work is
//! expressed as [`Process`]es: closures that run on their own thread and
//! suspend cooperatively by calling [`Process::wait`] on an [`Event`] (or
//! anything else implementing [`Awaitable`]) — a timeout, another
//! process, a [`Resource`] request, a [`Container`] transfer, a [`Store`]
//! item, or an [`any_of`](Simulation::any_of)/[`all_of`](Simulation::all_of)
//! combination of these.
//!
//! At any instant exactly one party — the kernel or a single process — is
//! actually running; everyone else is parked on a rendezvous channel. This
//! keeps the whole model single-threaded in effect despite each process
//! owning a real OS thread.
//!
//! ```
//! use desim::Simulation;
//!
//! let sim = Simulation::new();
//! let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
//!
//! let a_log = log.clone();
//! sim.process(move |proc| {
//!     for _ in 0..3 {
//!         a_log.lock().unwrap().push(proc.now());
//!         let ev = proc.timeout(2.0);
//!         proc.wait(&ev);
//!     }
//! });
//!
//! sim.run_until(6.0);
//! assert_eq!(sim.now(), 6.0);
//! assert_eq!(*log.lock().unwrap(), vec![0.0, 2.0, 4.0]);
//! ```

mod allof;
mod anyof;
mod awaitable;
mod container;
mod error;
mod event;
mod event_queue;
mod process;
mod resource;
mod simulation;
mod store;

pub use awaitable::Awaitable;
pub use container::{AmountEvent, Container};
pub use error::Fault;
pub use event::{Event, Handler};
pub use process::Process;
pub use resource::Resource;
pub use simulation::Simulation;
pub use store::{GetEvent, PutEvent, Store};
