//! Test fixture: a selection-rectangle domain
//!
//! Mirrors the kind of entity the engine manages in production (a redaction
//! rectangle on a document page) with a patch type and a page-number scope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapter::{AdapterError, DataTransforms};
use crate::domain::{Entity, ItemId, Lifecycle};

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

/// JSON transforms for [`Region`]
///
/// `for_update` applies the deletion-wins policy: a `StagedDeletion`
/// lifecycle survives the edit, anything else goes out as `StagedEdition`.
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

/// A region with a parsed ID on the given page
pub fn region(id: &str, page: u32) -> Region {
    Region {
        id: id.parse().unwrap(),
        page,
        x: 0,
        y: 0,
        width: 10,
        height: 10,
        label: None,
        lifecycle: Lifecycle::Committed,
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
