//! Optional cloud account/sync boundary.
//!
//! The cloud module exposes request/update types and a worker loop that
//! owns a blocking HTTP agent on a dedicated `std::thread::spawn` thread.
//! Requests go in over a crossbeam channel, results come back as
//! `AppEvent::Cloud`. When the `[cloud]` config is disabled the thread is
//! never spawned and this module is inert.
pub mod types;
pub mod worker;

pub use types::{CloudRequest, CloudUpdate, RemoteMoodEntry};
