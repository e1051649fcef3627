/// Completed-summary cache backed by chrome.storage.session

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use wasm_bindgen::JsValue;

use crate::chrome;
use crate::error::StorageError;
use crate::summary::{Summary, TabId};

const STORAGE_KEY_PREFIX: &str = "summary_";

/// Storage key for a tab's cached summary
pub fn storage_key(tab_id: TabId) -> String {
    format!("{}{}", STORAGE_KEY_PREFIX, tab_id)
}

/// Durable tier of the coordinator: survives service worker restarts,
/// cleared when the browser session ends.
#[async_trait(?Send)]
pub trait SummaryStore {
    async fn load(&self, tab_id: TabId) -> Result<Option<Summary>, StorageError>;
    async fn save(&self, tab_id: TabId, summary: &Summary) -> Result<(), StorageError>;
    async fn remove(&self, tab_id: TabId) -> Result<(), StorageError>;
}

/// In-process store, keyed the same way as session storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, Summary>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[async_trait(?Send)]
impl SummaryStore for MemoryStore {
    async fn load(&self, tab_id: TabId) -> Result<Option<Summary>, StorageError> {
        Ok(self.entries.borrow().get(&storage_key(tab_id)).cloned())
    }

    async fn save(&self, tab_id: TabId, summary: &Summary) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(storage_key(tab_id), summary.clone());
        Ok(())
    }

    async fn remove(&self, tab_id: TabId) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(&storage_key(tab_id));
        Ok(())
    }
}

/// `chrome.storage.session`
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionStore;

#[async_trait(?Send)]
impl SummaryStore for SessionStore {
    async fn load(&self, tab_id: TabId) -> Result<Option<Summary>, StorageError> {
        let key = storage_key(tab_id);
        let result = chrome::session_get(&key)
            .await
            .map_err(|e| StorageError::Access(format!("{:?}", e)))?;

        let value = js_sys::Reflect::get(&result, &JsValue::from_str(&key))
            .map_err(|e| StorageError::Access(format!("{:?}", e)))?;

        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }

        serde_wasm_bindgen::from_value(value)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn save(&self, tab_id: TabId, summary: &Summary) -> Result<(), StorageError> {
        let value = summary
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let items = js_sys::Object::new();
        js_sys::Reflect::set(&items, &JsValue::from_str(&storage_key(tab_id)), &value)
            .map_err(|e| StorageError::Access(format!("{:?}", e)))?;

        chrome::session_set(&items)
            .await
            .map_err(|e| StorageError::Access(format!("{:?}", e)))
    }

    async fn remove(&self, tab_id: TabId) -> Result<(), StorageError> {
        chrome::session_remove(&storage_key(tab_id))
            .await
            .map_err(|e| StorageError::Access(format!("{:?}", e)))
    }
}
