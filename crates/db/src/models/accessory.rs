//! Accessory entity model and DTOs.

use catalog_core::catalog::ResourceKind;
use catalog_core::mutation::Resource;
use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::{FieldRule, ACCESSORY_RULES};
use catalog_core::version::Versioned;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::store::{CatalogResource, FieldRef};

/// An accessory row from the `accessories` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Accessory {
    pub id: DbId,
    pub name: String,
    /// Name of the character this accessory is exclusive to.
    pub owner: Option<String>,
    pub effect: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default, skip_serializing)]
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating a new accessory.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccessory {
    pub name: String,
    pub owner: Option<String>,
    pub effect: String,
}

impl Versioned for Accessory {
    fn created_at(&self) -> Option<Timestamp> {
        Some(self.created_at)
    }

    fn updated_at(&self) -> Option<Timestamp> {
        Some(self.updated_at)
    }
}

impl Resource for Accessory {
    const KIND: ResourceKind = ResourceKind::Accessory;

    fn id(&self) -> DbId {
        self.id
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }
}

impl CatalogResource for Accessory {
    type Create = CreateAccessory;

    const RULES: &'static [FieldRule] = ACCESSORY_RULES;

    fn from_create(id: DbId, input: &CreateAccessory, at: Timestamp) -> Self {
        Self {
            id,
            name: input.name.clone(),
            owner: input.owner.clone(),
            effect: input.effect.clone(),
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn deleted_at(&self) -> Option<Timestamp> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: Timestamp) {
        self.deleted_at = Some(at);
    }

    fn field(&self, column: &str) -> FieldRef<'_> {
        match column {
            "id" => FieldRef::Int(self.id),
            "name" => FieldRef::Text(&self.name),
            "owner" => self.owner.as_deref().map_or(FieldRef::Null, FieldRef::Text),
            "effect" => FieldRef::Text(&self.effect),
            "created_at" => FieldRef::Time(self.created_at),
            "updated_at" => FieldRef::Time(self.updated_at),
            _ => FieldRef::Null,
        }
    }
}
