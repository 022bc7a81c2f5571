//! Durable key-value storage
//!
//! The storefront persists its cart and availability blobs through a single
//! narrow interface. A backend is probed once when the store opens; if the
//! probe fails the store transparently degrades to a process-lifetime
//! in-memory map so the rest of the system is unaffected.

use std::{fs, io, path::PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::warn;

const PROBE_KEY: &str = "__storage_probe__";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failure.
    #[error("storage I/O failure: {0}")]
    Io(#[from] io::Error),
}

/// A minimal string key-value backend.
pub trait StorageBackend {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] on write failure.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value stored under `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] on write failure.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Process-lifetime in-memory backend. Never fails.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: FxHashMap<String, String>,
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);

        Ok(())
    }
}

/// File-per-key backend under a directory.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `dir`. The directory is created on first
    /// write, not here, so an unwritable location degrades at probe time.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBackend { dir: dir.into() }
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.dir.join(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(key), value)?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.dir.join(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug)]
enum Engine<B> {
    Durable(B),
    Transient(MemoryBackend),
}

/// The storage seam all persistence goes through.
///
/// Opened over a durable backend; falls back to [`MemoryBackend`] for the
/// rest of the process lifetime if the availability probe fails.
#[derive(Debug)]
pub struct Store<B: StorageBackend = FileBackend> {
    engine: Engine<B>,
}

impl Store<MemoryBackend> {
    /// A store that never touches durable storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Store {
            engine: Engine::Transient(MemoryBackend::default()),
        }
    }
}

impl<B: StorageBackend> Store<B> {
    /// Opens the store, probing the backend with a test write and delete.
    #[must_use]
    pub fn open(mut backend: B) -> Self {
        let probe = backend
            .set(PROBE_KEY, "1")
            .and_then(|()| backend.remove(PROBE_KEY));

        match probe {
            Ok(()) => Store {
                engine: Engine::Durable(backend),
            },
            Err(err) => {
                warn!(%err, "storage unavailable; falling back to in-memory store");

                Store {
                    engine: Engine::Transient(MemoryBackend::default()),
                }
            }
        }
    }

    /// Whether writes are going to the durable backend.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        matches!(self.engine, Engine::Durable(_))
    }

    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    pub fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match &self.engine {
            Engine::Durable(backend) => backend.get(key),
            Engine::Transient(backend) => backend.get(key),
        }
    }

    /// Writes `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] on write failure.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match &mut self.engine {
            Engine::Durable(backend) => backend.set(key, value),
            Engine::Transient(backend) => backend.set(key, value),
        }
    }

    /// Removes the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] on write failure.
    pub fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match &mut self.engine {
            Engine::Durable(backend) => backend.remove(key),
            Engine::Transient(backend) => backend.remove(key),
        }
    }
}

/// Test backends for exercising storage failure paths.
#[cfg(test)]
pub(crate) mod testing {
    use super::{MemoryBackend, StorageBackend, StorageError};

    /// Backend that survives the open-time probe, then fails every write.
    #[derive(Debug)]
    pub(crate) struct FailsAfterProbe {
        inner: MemoryBackend,
        writes_left: u32,
    }

    impl FailsAfterProbe {
        pub(crate) fn new() -> Self {
            // The probe is one set and one remove.
            FailsAfterProbe {
                inner: MemoryBackend::default(),
                writes_left: 2,
            }
        }

        fn spend(&mut self) -> Result<(), StorageError> {
            if self.writes_left == 0 {
                return Err(std::io::Error::other("disk full").into());
            }
            self.writes_left -= 1;

            Ok(())
        }
    }

    impl StorageBackend for FailsAfterProbe {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.spend()?;
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.spend()?;
            self.inner.remove(key)
        }
    }
}
