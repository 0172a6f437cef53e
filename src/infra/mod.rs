//! Инфраструктурный слой вокруг движка:
//! - конфигурация;
//! - RNG-реализации для движка;
//! - журнал событий (абстракция + in-memory);
//! - пробное выполнение и локальный координатор.

pub mod config;
pub mod local_runtime;
pub mod persistence;
pub mod rng;
pub mod rng_seed;
pub mod speculative;

pub use config::{ConfigError, EngineConfig};
pub use local_runtime::{LocalRuntime, RuntimeError};
pub use persistence::{EventLog, InMemoryEventLog, LogError};
pub use rng::*;
pub use rng_seed::RngSeed;
pub use speculative::{SpeculativeExecutor, SpeculativeOutcome};
