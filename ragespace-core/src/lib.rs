//! ragespace-core — the rendering-free core of RageSpace.
//!
//! Everything a flow needs except a terminal: the stressor/emotion
//! catalogs, the flow state machine, the particle engine, the analytics
//! aggregator, and the session store. No ratatui or crossterm types appear
//! anywhere in this crate; colors are RGB tuples and time is explicit
//! milliseconds, so every transition and every statistic is unit testable
//! in isolation.

pub mod analytics;
pub mod catalog;
pub mod flow;
pub mod particles;
pub mod schema;
pub mod store;
pub mod types;

pub use catalog::{EmotionRating, StressorType};
pub use flow::{FlowState, HitOutcome, Screen};
pub use particles::{Particle, ParticleEngine};
pub use types::SessionRecord;
