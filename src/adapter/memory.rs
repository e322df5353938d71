//! In-memory adapter
//!
//! A JSON-wire adapter backed by a mutex-guarded record list. Used by the
//! test suite and useful to consumers as a local backend or a stub while a
//! real transport is built. Supports scripted failures so commit rollback
//! paths can be exercised.
//!
//! Records are `serde_json::Value` objects identified by their `"id"`
//! field; creation replaces a missing or provisional ID with a
//! server-style `s-{n}` ID.

use serde_json::Value;
use std::sync::Mutex;

use super::{AdapterError, ApiAdapter};
use crate::domain::ItemId;

#[derive(Default)]
struct Inner {
    records: Vec<Value>,
    next_id: u64,
    fail_next: Option<String>,
}

/// Mutex-guarded in-memory backend speaking `serde_json::Value`
#[derive(Default)]
pub struct InMemoryAdapter {
    inner: Mutex<Inner>,
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

impl InMemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an adapter pre-populated with the given records
    pub fn seeded(records: Vec<Value>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                records,
                next_id: 0,
                fail_next: None,
            }),
        }
    }

    /// Makes the next adapter call fail with an `Unavailable` error
    pub fn fail_next(&self, message: impl Into<String>) {
        self.lock().fail_next = Some(message.into());
    }

    /// Snapshot of the stored records
    pub fn records(&self) -> Vec<Value> {
        self.lock().records.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a panicking test; propagate the data as-is.
        self.inner.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    fn take_failure(inner: &mut Inner) -> Result<(), AdapterError> {
        match inner.fail_next.take() {
            Some(message) => Err(AdapterError::Unavailable(message)),
            None => Ok(()),
        }
    }
}

impl ApiAdapter<Value> for InMemoryAdapter {
    fn fetch(&self, _context: &str) -> Result<Vec<Value>, AdapterError> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        Ok(inner.records.clone())
    }

    fn create(&self, _context: &str, payload: Value) -> Result<Value, AdapterError> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;

        if !payload.is_object() {
            return Err(AdapterError::Rejected(
                "payload must be a JSON object".to_string(),
            ));
        }
        let mut record = payload;
        let needs_id = record_id(&record)
            .map(|id| id.is_empty() || id.starts_with("d-"))
            .unwrap_or(true);
        if needs_id {
            inner.next_id += 1;
            record["id"] = Value::String(format!("s-{}", inner.next_id));
        }
        inner.records.push(record.clone());
        Ok(record)
    }

    fn update(&self, id: &ItemId, payload: Value) -> Result<Value, AdapterError> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;

        if !payload.is_object() {
            return Err(AdapterError::Rejected(
                "payload must be a JSON object".to_string(),
            ));
        }
        let position = inner
            .records
            .iter()
            .position(|record| record_id(record) == Some(id.as_str()))
            .ok_or_else(|| AdapterError::NotFound(id.clone()))?;

        let mut record = payload;
        record["id"] = Value::String(id.as_str().to_string());
        inner.records[position] = record.clone();
        Ok(record)
    }

    fn delete(&self, id: &ItemId) -> Result<(), AdapterError> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;

        let position = inner
            .records
            .iter()
            .position(|record| record_id(record) == Some(id.as_str()))
            .ok_or_else(|| AdapterError::NotFound(id.clone()))?;
        inner.records.remove(position);
        Ok(())
    }
}
