//! mockexam-providers: Question supplies, stats stores, and configuration.
//!
//! Implements the `QuestionSupply` and `StatsStore` traits over TOML bank
//! directories, JSON files, and in-memory maps.

pub mod config;
pub mod error;
pub mod memory;
pub mod pool;
pub mod stats_file;
pub mod toml_supply;

pub use config::{load_config, load_config_from, MockexamConfig, SessionDefaults};
pub use error::StoreError;
pub use memory::{InMemoryQuestionSupply, InMemoryStatsStore};
pub use stats_file::JsonStatsStore;
pub use toml_supply::TomlQuestionSupply;
