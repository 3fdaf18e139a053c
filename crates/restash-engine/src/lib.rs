//! Restash Engine - Session orchestration for snapshot capture and restore
//!
//! The engine is the host-facing surface of restash:
//! - RON configuration with defaults for every option
//! - An [`Engine`] facade over the snapshot, history, and profile stores
//! - The capture-to-restore pipeline, ending in a published summary
//! - A shared [`PriceCache`] for externally computed template prices
//!
//! Hosts hand the engine raw session id strings and a [`CaptureSource`]
//! view of their live inventory; everything else stays inside.
//!
//! [`CaptureSource`]: restash_core::CaptureSource

mod config;
mod engine;
mod error;
mod price_cache;

pub use config::EngineConfig;
pub use engine::{Engine, RestoreReport};
pub use error::{Error, Result};
pub use price_cache::PriceCache;
