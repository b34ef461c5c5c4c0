//! Translation of a [`QuerySpec`] into SQL.
//!
//! This is the single place list queries get their WHERE clause, and the
//! soft-delete predicate is always its first term. Column names come from the
//! resolver's allow-lists (`&'static str`), never from user input; values are
//! always bound.

use catalog_core::listing::{FilterValue, Predicate, QuerySpec};
use sqlx::{Postgres, QueryBuilder};

/// Start a `SELECT {columns} FROM {table}` with filters, ordering and paging.
pub(crate) fn select_page<'a>(
    table: &str,
    columns: &str,
    spec: &'a QuerySpec,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {columns} FROM {table}"));
    push_where(&mut qb, spec);

    match spec.sort() {
        // `id` breaks ties so paging is stable under duplicate sort keys.
        Some(sort) => {
            qb.push(format!(" ORDER BY {} {}, id ASC", sort.field, sort.direction.as_sql()));
        }
        None => {
            qb.push(" ORDER BY id ASC");
        }
    }

    qb.push(" LIMIT ").push_bind(spec.limit());
    qb.push(" OFFSET ").push_bind(spec.offset());
    qb
}

/// `SELECT COUNT(*) FROM {table}` under the same filters as [`select_page`].
pub(crate) fn count_matching<'a>(table: &str, spec: &'a QuerySpec) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {table}"));
    push_where(&mut qb, spec);
    qb
}

fn push_where<'a>(qb: &mut QueryBuilder<'a, Postgres>, spec: &'a QuerySpec) {
    qb.push(" WHERE deleted_at IS NULL");

    for filter in spec.filters() {
        qb.push(" AND ").push(filter.field);
        match (&filter.predicate, &filter.value) {
            (Predicate::Contains, FilterValue::Text(text)) => {
                qb.push(" ILIKE ").push_bind(like_pattern(text));
            }
            (_, FilterValue::Text(text)) => {
                qb.push(" = ").push_bind(text.as_str());
            }
            (_, FilterValue::Int(n)) => {
                qb.push(" = ").push_bind(*n);
            }
        }
    }
}

/// Wrap `text` in `%...%`, escaping LIKE metacharacters so user input only
/// ever matches literally.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use catalog_core::catalog::ResourceKind;
    use catalog_core::listing::resolve;

    use super::*;

    fn spec(pairs: &[(&str, &str)], kind: ResourceKind) -> QuerySpec {
        let raw: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        resolve(&raw, kind).unwrap()
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("viola"), "%viola%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn soft_delete_predicate_is_always_present() {
        let spec = spec(&[], ResourceKind::Character);
        let qb = select_page("characters", "id, name", &spec);
        let sql = qb.sql();
        assert_eq!(
            sql,
            "SELECT id, name FROM characters WHERE deleted_at IS NULL ORDER BY id ASC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn filters_and_sort_render_in_order() {
        let spec = spec(
            &[
                ("name", "vio"),
                ("job", "dancer"),
                ("rarity", "5"),
                ("order_by", "name"),
                ("order_direction", "desc"),
            ],
            ResourceKind::Character,
        );
        let qb = select_page("characters", "id", &spec);
        let sql = qb.sql();
        assert_eq!(
            sql,
            "SELECT id FROM characters WHERE deleted_at IS NULL \
             AND name ILIKE $1 AND job = $2 AND rarity = $3 \
             ORDER BY name DESC, id ASC LIMIT $4 OFFSET $5"
        );
    }

    #[test]
    fn count_uses_same_filters_without_paging() {
        let spec = spec(&[("owner", "Viola")], ResourceKind::Accessory);
        let qb = count_matching("accessories", &spec);
        let sql = qb.sql();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM accessories WHERE deleted_at IS NULL AND owner ILIKE $1"
        );
    }
}
