//! Ports Layer - Trait definitions for external dependencies
//!
//! The simulation core never touches the outside world directly. These
//! seams abstract:
//! - Random draws (injectable for deterministic tests)
//! - Timer scheduling (owned, cancellable handles)
//! - Seed persistence (base liquidity carried between sessions)

pub mod mocks;
pub mod random;
pub mod scheduler;
pub mod seed_store;

pub use mocks::ScriptedRandom;
pub use random::{source_from_seed, RandomSource, SeededRandom, ThreadRandom};
pub use scheduler::{schedule_every, schedule_once, TimerHandle};
pub use seed_store::{InMemorySeedStore, SeedStore, SeedStoreError};
