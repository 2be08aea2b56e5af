use taskflow_core::Task;
use taskflow_store::{KeyValueStore, StoreError, check_key};
use thiserror::Error;
use tracing::debug;

/// Key the task collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "todoTasks";

/// Whole-collection persistence used by [`TaskStore`](crate::TaskStore).
pub trait TaskPersistence {
    /// Error type bubbled up from the backing storage.
    type Error: Into<anyhow::Error>;

    /// Previously saved tasks, or `None` if nothing was ever saved.
    ///
    /// # Errors
    /// Returns a storage-specific error when the collection cannot be read or decoded.
    fn load(&self) -> Result<Option<Vec<Task>>, Self::Error>;

    /// Replace the stored collection with `tasks`.
    ///
    /// # Errors
    /// Returns a storage-specific error when the write fails.
    fn save(&self, tasks: &[Task]) -> Result<(), Self::Error>;
}

/// Failures of [`KeyValueGateway`].
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The underlying key-value store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The stored value is not a JSON task array.
    #[error("stored tasks under {key:?} could not be decoded: {source}")]
    Decode {
        /// Storage key.
        key: String,
        /// Parser failure.
        #[source]
        source: serde_json::Error,
    },
    /// Tasks could not be encoded.
    #[error("failed to encode tasks: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Stores the task collection as one JSON array under a single key.
#[derive(Debug, Clone)]
pub struct KeyValueGateway<S> {
    store: S,
    key: String,
}

impl<S> KeyValueGateway<S> {
    /// Gateway using [`DEFAULT_STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }

    /// Gateway using a custom key.
    ///
    /// # Errors
    /// Returns an error if `key` is not usable by the store.
    pub fn with_key(store: S, key: impl Into<String>) -> Result<Self, PersistenceError> {
        let key = key.into();
        check_key(&key)?;
        Ok(Self { store, key })
    }

    /// Storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> TaskPersistence for KeyValueGateway<S> {
    type Error = PersistenceError;

    fn load(&self) -> Result<Option<Vec<Task>>, Self::Error> {
        let Some(raw) = self.store.get(&self.key)? else {
            debug!(key = %self.key, "No stored tasks");
            return Ok(None);
        };
        let tasks: Vec<Task> = serde_json::from_str(&raw).map_err(|source| PersistenceError::Decode {
            key: self.key.clone(),
            source,
        })?;
        debug!(key = %self.key, count = tasks.len(), "Loaded stored tasks");
        Ok(Some(tasks))
    }

    fn save(&self, tasks: &[Task]) -> Result<(), Self::Error> {
        let body = serde_json::to_string(tasks).map_err(PersistenceError::Encode)?;
        self.store.set(&self.key, &body)?;
        Ok(())
    }
}

impl<P> TaskPersistence for &P
where
    P: TaskPersistence + ?Sized,
{
    type Error = P::Error;

    fn load(&self) -> Result<Option<Vec<Task>>, Self::Error> {
        (*self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), Self::Error> {
        (*self).save(tasks)
    }
}

impl<P> TaskPersistence for std::sync::Arc<P>
where
    P: TaskPersistence,
{
    type Error = P::Error;

    fn load(&self) -> Result<Option<Vec<Task>>, Self::Error> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), Self::Error> {
        (**self).save(tasks)
    }
}
