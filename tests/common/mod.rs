//! Shared fixture: a selection-rectangle domain over a JSON wire
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use stagehand::{
    create_domain_manager, AdapterError, DataTransforms, DomainManager, DomainManagerConfig,
    Entity, InMemoryAdapter, ItemId, Lifecycle,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: ItemId,
    pub page: u32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionPatch {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub label: Option<Option<String>>,
}

impl RegionPatch {
    pub fn width(value: i32) -> Self {
        Self {
            width: Some(value),
            ..Self::default()
        }
    }

    pub fn moved(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }
}

impl Entity for Region {
    type Patch = RegionPatch;
    type Scope = u32;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn assign_id(&mut self, id: ItemId) {
        self.id = id;
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        self.lifecycle = lifecycle;
    }

    fn apply_patch(&mut self, patch: &RegionPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
    }

    fn in_scope(&self, page: &u32) -> bool {
        self.page == *page
    }

    fn content_eq(&self, other: &Self) -> bool {
        self.page == other.page
            && self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
            && self.label == other.label
    }
}

pub struct RegionTransforms;

impl DataTransforms<Region, Value> for RegionTransforms {
    fn for_create(&self, item: &Region) -> Result<Value, AdapterError> {
        let mut region = item.clone();
        region.lifecycle = Lifecycle::StagedCreation;
        Ok(serde_json::to_value(region)?)
    }

    fn for_update(&self, item: &Region) -> Result<Value, AdapterError> {
        let mut region = item.clone();
        region.lifecycle = if item.lifecycle == Lifecycle::StagedDeletion {
            Lifecycle::StagedDeletion
        } else {
            Lifecycle::StagedEdition
        };
        Ok(serde_json::to_value(region)?)
    }

    fn from_wire(&self, wire: Value) -> Result<Region, AdapterError> {
        Ok(serde_json::from_value(wire)?)
    }
}

/// A never-dispatched region carrying the placeholder ID
pub fn unsaved_region(page: u32) -> Region {
    Region {
        id: ItemId::placeholder(),
        page,
        x: 0,
        y: 0,
        width: 10,
        height: 10,
        label: None,
        lifecycle: Lifecycle::Unstaged,
    }
}

/// A wire record the in-memory adapter can be seeded with
pub fn wire_region(id: &str, page: u32) -> Value {
    json!({
        "id": id,
        "page": page,
        "x": 0,
        "y": 0,
        "width": 10,
        "height": 10,
    })
}

/// A manager over an empty in-memory backend with all built-in behaviors
pub fn manager() -> DomainManager<Region, Value> {
    manager_with(InMemoryAdapter::new())
}

/// A manager over the given adapter with all built-in behaviors
pub fn manager_with(adapter: InMemoryAdapter) -> DomainManager<Region, Value> {
    create_domain_manager(DomainManagerConfig::new(
        "document_viewer",
        "selection",
        Box::new(adapter),
        Box::new(RegionTransforms),
    ))
    .expect("built-in composition is valid")
}

/// Parses an item ID
pub fn id(raw: &str) -> ItemId {
    raw.parse().expect("valid id")
}
