//! Storage for Trim: the [`Persistence`] port, its backends, and the
//! [`Workspace`] session that ties storage to the pure model.

pub mod config;
pub mod error;
pub mod json_store;
pub mod memory;
pub mod port;
pub mod workspace;

pub use config::Config;
pub use error::StoreError;
pub use json_store::JsonStore;
pub use memory::MemoryStore;
pub use port::Persistence;
pub use workspace::{Settings, Workspace};
