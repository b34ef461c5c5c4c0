//! List-query resolution: raw query parameters in, an immutable
//! [`QuerySpec`] out.
//!
//! A `QuerySpec` carries no connection to storage. Repositories translate it into
//! SQL; the in-memory store evaluates it directly.

use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::{ResourceKind, INFLUENCES, JOBS};
use crate::error::{CoreError, FieldError};

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_PAGE: i64 = 1;

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Larger values are rejected, not clamped.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Query specification
// ---------------------------------------------------------------------------

/// How a filter value is compared against a stored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Equality.
    Exact,
    /// Case-insensitive substring.
    Contains,
    /// Membership in a fixed enumeration; the value is already canonical.
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Storage field (column) name.
    pub field: &'static str,
    pub predicate: Predicate,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: &'static str,
    pub direction: SortDirection,
}

/// A fully validated list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    filters: Vec<Filter>,
    sort: Option<Sort>,
    page: i64,
    page_size: i64,
}

impl QuerySpec {
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn sort(&self) -> Option<Sort> {
        self.sort
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Rows to skip. Saturates, so a far-out `page` reads as past the end.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

// ---------------------------------------------------------------------------
// Per-collection parameter tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum ParamKind {
    Substring,
    Member(&'static [&'static str]),
    Integer,
}

#[derive(Debug, Clone, Copy)]
struct FilterParam {
    param: &'static str,
    field: &'static str,
    kind: ParamKind,
}

const CHARACTER_FILTERS: &[FilterParam] = &[
    FilterParam {
        param: "name",
        field: "name",
        kind: ParamKind::Substring,
    },
    FilterParam {
        param: "job",
        field: "job",
        kind: ParamKind::Member(JOBS),
    },
    FilterParam {
        param: "influence",
        field: "influence",
        kind: ParamKind::Member(INFLUENCES),
    },
    FilterParam {
        param: "rarity",
        field: "rarity",
        kind: ParamKind::Integer,
    },
];

const CHARACTER_SORTABLE: &[&str] = &[
    "id",
    "name",
    "job",
    "influence",
    "rarity",
    "created_at",
    "updated_at",
];

const ACCESSORY_FILTERS: &[FilterParam] = &[
    FilterParam {
        param: "name",
        field: "name",
        kind: ParamKind::Substring,
    },
    FilterParam {
        param: "owner",
        field: "owner",
        kind: ParamKind::Substring,
    },
    FilterParam {
        param: "effect",
        field: "effect",
        kind: ParamKind::Substring,
    },
];

const ACCESSORY_SORTABLE: &[&str] = &["id", "name", "owner", "created_at", "updated_at"];

fn filter_params(kind: ResourceKind) -> &'static [FilterParam] {
    match kind {
        ResourceKind::Character => CHARACTER_FILTERS,
        ResourceKind::Accessory => ACCESSORY_FILTERS,
    }
}

/// Fields a collection may be ordered by.
pub fn sortable_fields(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Character => CHARACTER_SORTABLE,
        ResourceKind::Accessory => ACCESSORY_SORTABLE,
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Turn raw query parameters into a [`QuerySpec`] for `kind`.
///
/// Unknown parameters are ignored. Every invalid parameter is reported in a
/// single validation error.
pub fn resolve(raw: &HashMap<String, String>, kind: ResourceKind) -> Result<QuerySpec, CoreError> {
    let mut errors = Vec::new();

    let page = match raw.get("page") {
        None => DEFAULT_PAGE,
        Some(v) => match v.trim().parse::<i64>() {
            Ok(n) if n >= 1 => n,
            _ => {
                errors.push(FieldError::new("page", "must be a positive integer"));
                DEFAULT_PAGE
            }
        },
    };

    let page_size = match raw.get("page_size") {
        None => DEFAULT_PAGE_SIZE,
        Some(v) => match v.trim().parse::<i64>() {
            Ok(n) if (1..=MAX_PAGE_SIZE).contains(&n) => n,
            _ => {
                errors.push(FieldError::new(
                    "page_size",
                    format!("must be an integer between 1 and {MAX_PAGE_SIZE}"),
                ));
                DEFAULT_PAGE_SIZE
            }
        },
    };

    let mut filters = Vec::new();
    for param in filter_params(kind) {
        let Some(value) = raw.get(param.param).map(|v| v.trim()) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        match param.kind {
            ParamKind::Substring => filters.push(Filter {
                field: param.field,
                predicate: Predicate::Contains,
                value: FilterValue::Text(value.to_string()),
            }),
            ParamKind::Member(allowed) => match crate::catalog::canonical_member(allowed, value) {
                Some(canonical) => filters.push(Filter {
                    field: param.field,
                    predicate: Predicate::Member,
                    value: FilterValue::Text(canonical.to_string()),
                }),
                None => errors.push(FieldError::new(
                    param.param,
                    format!("must be one of: {}", allowed.join(", ")),
                )),
            },
            ParamKind::Integer => match value.parse::<i64>() {
                Ok(n) => filters.push(Filter {
                    field: param.field,
                    predicate: Predicate::Exact,
                    value: FilterValue::Int(n),
                }),
                Err(_) => errors.push(FieldError::new(param.param, "must be an integer")),
            },
        }
    }

    let direction = match raw.get("order_direction").map(|v| v.trim().to_ascii_lowercase()) {
        None => SortDirection::Asc,
        Some(d) if d == "asc" => SortDirection::Asc,
        Some(d) if d == "desc" => SortDirection::Desc,
        Some(_) => {
            errors.push(FieldError::new("order_direction", "must be 'asc' or 'desc'"));
            SortDirection::Asc
        }
    };

    let allowed = sortable_fields(kind);
    let sort = match raw.get("order_by").map(|v| v.trim()) {
        None | Some("") => None,
        Some(field) => match allowed.iter().copied().find(|f| *f == field) {
            Some(field) => Some(Sort { field, direction }),
            None => {
                errors.push(FieldError::new(
                    "order_by",
                    format!("must be one of: {}", allowed.join(", ")),
                ));
                None
            }
        },
    };

    if !errors.is_empty() {
        return Err(CoreError::Validation(errors));
    }

    Ok(QuerySpec {
        filters,
        sort,
        page,
        page_size,
    })
}

// ---------------------------------------------------------------------------
// Page metadata
// ---------------------------------------------------------------------------

/// Pagination figures reported alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(page: i64, page_size: i64, total: i64) -> Self {
        Self {
            page,
            page_size,
            total,
            total_pages: total_pages(total, page_size),
        }
    }

    pub fn for_spec(spec: &QuerySpec, total: i64) -> Self {
        Self::new(spec.page(), spec.page_size(), total)
    }
}

/// `ceil(total / page_size)`, with zero rows giving zero pages.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

/// One page of results plus its metadata.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}
