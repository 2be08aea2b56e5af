//! Application layer for taskflow.
//!
//! Wires the domain list to durable storage and exposes the user-facing
//! actions, the current view selection and configuration loading.

/// `config.toml` loading.
pub mod config;
/// Load/save boundary between the task store and durable storage.
pub mod persistence;
/// Session façade over the task store.
pub mod service;
/// Task list that saves itself after every change.
pub mod task_store;

pub use config::{AppConfig, CONFIG_FILE, IdStrategy, IdsConfig, StorageConfig, ViewConfig};
pub use persistence::{DEFAULT_STORAGE_KEY, KeyValueGateway, PersistenceError, TaskPersistence};
pub use service::{FileTaskService, ResolveIdError, TaskService, ViewSelection};
pub use task_store::TaskStore;
