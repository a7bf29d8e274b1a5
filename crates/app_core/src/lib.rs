//! DataShelf core domain logic
//!
//! This crate contains:
//! - The catalog data model
//! - The JSON metadata store
//! - The directory manager (`Library`)
//! - The command system
//! - Configuration
//! - Error types

pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod library;
pub mod record;
pub mod store;

pub use clock::{LocalClock, TimeSource};
pub use command::{AssumeYes, Command, CommandDispatcher, Outcome, Prompt};
pub use config::{AppConfig, GeneralConfig, StorageConfig};
pub use error::{AppError, Result};
pub use library::Library;
pub use record::{format_timestamp, Catalog, FileRecord, TIMESTAMP_FORMAT};
pub use store::MetadataStore;
