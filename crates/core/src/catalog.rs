//! Catalog vocabulary: resource kinds and the fixed enumerations that
//! character fields and list filters are checked against.
//!
//! The string values must match the CHECK constraints in
//! `20250101000001_create_characters.sql`.

/// The collections exposed by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Character,
    Accessory,
}

impl ResourceKind {
    /// Human-readable entity name used in error messages.
    pub fn entity_name(self) -> &'static str {
        match self {
            ResourceKind::Character => "Character",
            ResourceKind::Accessory => "Accessory",
        }
    }
}

/// Character job (class).
pub const JOBS: &[&str] = &[
    "warrior",
    "merchant",
    "thief",
    "apothecary",
    "hunter",
    "cleric",
    "scholar",
    "dancer",
];

/// Path of influence a character belongs to.
pub const INFLUENCES: &[&str] = &["wealth", "power", "fame"];

/// Case-insensitive membership check against one of the enumerations above.
///
/// Returns the canonical (lowercase) spelling on success.
pub fn canonical_member(allowed: &[&'static str], value: &str) -> Option<&'static str> {
    let needle = value.trim();
    allowed
        .iter()
        .copied()
        .find(|candidate| candidate.eq_ignore_ascii_case(needle))
}
