//! Key-value storage
//!
//! Settings and the local backend tables are JSON strings under fixed keys.
//! On wasm32 the store is the page's LocalStorage; native builds and tests use
//! an in-memory map.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage rejected `{key}`: {reason}")]
    Rejected { key: String, reason: String },
    #[error("corrupt data under `{key}`")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode `{key}`")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value store
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Lets a store be picked at runtime, e.g. LocalStorage with an in-memory fallback
impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Read and decode a JSON value. A missing key is `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(
    store: &impl KvStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn write_json<T: Serialize>(
    store: &mut impl KvStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

/// In-memory store for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// The page's LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct BrowserStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    pub fn open() -> Result<Self, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
            .ok_or(StorageError::Unavailable)
    }

    fn rejected(key: &str, err: wasm_bindgen::JsValue) -> StorageError {
        StorageError::Rejected {
            key: key.to_string(),
            reason: format!("{:?}", err),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl KvStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| Self::rejected(key, e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| Self::rejected(key, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| Self::rejected(key, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip_and_missing() {
        let mut store = MemoryStore::new();
        assert!(read_json::<Vec<u32>>(&store, "scores").unwrap().is_none());

        write_json(&mut store, "scores", &vec![3u32, 1, 2]).unwrap();
        let back: Option<Vec<u32>> = read_json(&store, "scores").unwrap();
        assert_eq!(back, Some(vec![3, 1, 2]));

        store.remove("scores").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn KvStore> = Box::new(MemoryStore::new());
        write_json(&mut store, "wave", &7u32).unwrap();
        assert_eq!(read_json::<u32>(&store, "wave").unwrap(), Some(7));
    }

    #[test]
    fn test_corrupt_json_is_reported() {
        let mut store = MemoryStore::new();
        store.set("scores", "{not json").unwrap();
        let err = read_json::<Vec<u32>>(&store, "scores").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref key, .. } if key == "scores"));
    }
}
