//! JSON values kept in a [`KeyValueStore`].
//!
//! Reads never fail: a missing key, an unreadable store or a value that does
//! not parse all yield the caller's fallback. Writes through [`Persisted`]
//! always update the in-memory copy, even when the store rejects them.

use crate::error::AppError;
use crate::storage::kv::KeyValueStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

pub fn read<S, T>(store: &S, key: &str, fallback: T) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "no stored value, using fallback");
            return fallback;
        }
        Err(err) => {
            error!(key, error = %err, "error reading from storage");
            return fallback;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            error!(key, error = %err, "error reading from storage");
            fallback
        }
    }
}

pub fn write<S, T>(store: &S, key: &str, value: &T) -> Result<(), AppError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set_item(key, &raw)
}

/// A value mirrored to one storage key on every change.
#[derive(Debug)]
pub struct Persisted<S, T> {
    store: S,
    key: String,
    value: T,
}

impl<S, T> Persisted<S, T>
where
    S: KeyValueStore,
    T: Serialize + DeserializeOwned,
{
    pub fn load<K: Into<String>>(store: S, key: K, fallback: T) -> Self {
        let key = key.into();
        let value = read(&store, &key, fallback);
        Self { store, key, value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.flush();
    }

    /// Applies `change` in place, then writes the result.
    pub fn update<R, F>(&mut self, change: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let result = change(&mut self.value);
        self.flush();
        result
    }

    fn flush(&self) {
        if let Err(err) = write(&self.store, &self.key, &self.value) {
            error!(key = %self.key, error = %err, "error saving to storage");
        }
    }
}
