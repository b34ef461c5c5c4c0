//! Repository for the `accessories` table.

use catalog_core::listing::QuerySpec;
use catalog_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use super::filter::{count_matching, select_page};
use crate::models::accessory::{Accessory, CreateAccessory};

const COLUMNS: &str = "id, name, owner, effect, created_at, updated_at, deleted_at";

/// Provides CRUD operations for accessories.
pub struct AccessoryRepo;

impl AccessoryRepo {
    /// Insert a new accessory stamped with `at`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAccessory,
        at: Timestamp,
    ) -> Result<Accessory, sqlx::Error> {
        let query = format!(
            "INSERT INTO accessories (name, owner, effect, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Accessory>(&query)
            .bind(&input.name)
            .bind(&input.owner)
            .bind(&input.effect)
            .bind(at)
            .fetch_one(pool)
            .await
    }

    /// Find an accessory by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Accessory>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM accessories WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Accessory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, spec: &QuerySpec) -> Result<Vec<Accessory>, sqlx::Error> {
        select_page("accessories", COLUMNS, spec)
            .build_query_as::<Accessory>()
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, spec: &QuerySpec) -> Result<i64, sqlx::Error> {
        count_matching("accessories", spec)
            .build_query_scalar::<i64>()
            .fetch_one(pool)
            .await
    }

    /// Conditional write keyed on `updated_at`; `None` if no live row matched.
    pub async fn update_if_unmodified(
        pool: &PgPool,
        id: DbId,
        expected_updated_at: Timestamp,
        next: &Accessory,
    ) -> Result<Option<Accessory>, sqlx::Error> {
        let query = format!(
            "UPDATE accessories SET
                name = $3,
                owner = $4,
                effect = $5,
                updated_at = $6
             WHERE id = $1 AND updated_at = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Accessory>(&query)
            .bind(id)
            .bind(expected_updated_at)
            .bind(&next.name)
            .bind(&next.owner)
            .bind(&next.effect)
            .bind(next.updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an accessory by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE accessories SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
