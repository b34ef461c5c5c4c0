//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//!
//! Updates are not modelled as DTOs: the mutation pipeline merges the
//! request's JSON over the stored row and validates the result.

pub mod accessory;
pub mod character;
