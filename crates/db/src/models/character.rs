//! Character entity model and DTOs.

use catalog_core::catalog::ResourceKind;
use catalog_core::mutation::Resource;
use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::{FieldRule, CHARACTER_RULES};
use catalog_core::version::Versioned;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::store::{CatalogResource, FieldRef};

/// A character row from the `characters` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Character {
    pub id: DbId,
    pub name: String,
    /// One of [`catalog_core::catalog::JOBS`].
    pub job: String,
    /// One of [`catalog_core::catalog::INFLUENCES`].
    pub influence: String,
    /// Star rating, 3 to 5.
    pub rarity: i32,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default, skip_serializing)]
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating a new character. Validated against [`CHARACTER_RULES`]
/// before it is deserialized.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCharacter {
    pub name: String,
    pub job: String,
    pub influence: String,
    pub rarity: i32,
    pub description: Option<String>,
}

impl Versioned for Character {
    fn created_at(&self) -> Option<Timestamp> {
        Some(self.created_at)
    }

    fn updated_at(&self) -> Option<Timestamp> {
        Some(self.updated_at)
    }
}

impl Resource for Character {
    const KIND: ResourceKind = ResourceKind::Character;

    fn id(&self) -> DbId {
        self.id
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }
}

impl CatalogResource for Character {
    type Create = CreateCharacter;

    const RULES: &'static [FieldRule] = CHARACTER_RULES;

    fn from_create(id: DbId, input: &CreateCharacter, at: Timestamp) -> Self {
        Self {
            id,
            name: input.name.clone(),
            job: input.job.clone(),
            influence: input.influence.clone(),
            rarity: input.rarity,
            description: input.description.clone(),
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
            "job" => FieldRef::Text(&self.job),
            "influence" => FieldRef::Text(&self.influence),
            "rarity" => FieldRef::Int(i64::from(self.rarity)),
            "description" => self.description.as_deref().map_or(FieldRef::Null, FieldRef::Text),
            "created_at" => FieldRef::Time(self.created_at),
            "updated_at" => FieldRef::Time(self.updated_at),
            _ => FieldRef::Null,
        }
    }
}
