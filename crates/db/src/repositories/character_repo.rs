//! Repository for the `characters` table.

use catalog_core::listing::QuerySpec;
use catalog_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use super::filter::{count_matching, select_page};
use crate::models::character::{Character, CreateCharacter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, job, influence, rarity, description, created_at, updated_at, deleted_at";

/// Provides CRUD operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character stamped with `at`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCharacter,
        at: Timestamp,
    ) -> Result<Character, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters (name, job, influence, rarity, description, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(&input.name)
            .bind(&input.job)
            .bind(&input.influence)
            .bind(input.rarity)
            .bind(&input.description)
            .bind(at)
            .fetch_one(pool)
            .await
    }

    /// Find a character by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM characters WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of live characters matching `spec`.
    pub async fn list(pool: &PgPool, spec: &QuerySpec) -> Result<Vec<Character>, sqlx::Error> {
        select_page("characters", COLUMNS, spec)
            .build_query_as::<Character>()
            .fetch_all(pool)
            .await
    }

    /// Number of live characters matching `spec`'s filters.
    pub async fn count(pool: &PgPool, spec: &QuerySpec) -> Result<i64, sqlx::Error> {
        count_matching("characters", spec)
            .build_query_scalar::<i64>()
            .fetch_one(pool)
            .await
    }

    /// Overwrite the business fields and `updated_at` of a live character, but
    /// only if its `updated_at` still equals `expected_updated_at`.
    ///
    /// Returns `None` when no row matched: the character is gone or another
    /// writer got there first.
    pub async fn update_if_unmodified(
        pool: &PgPool,
        id: DbId,
        expected_updated_at: Timestamp,
        next: &Character,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                name = $3,
                job = $4,
                influence = $5,
                rarity = $6,
                description = $7,
                updated_at = $8
             WHERE id = $1 AND updated_at = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(expected_updated_at)
            .bind(&next.name)
            .bind(&next.job)
            .bind(&next.influence)
            .bind(next.rarity)
            .bind(&next.description)
            .bind(next.updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a character by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE characters SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
