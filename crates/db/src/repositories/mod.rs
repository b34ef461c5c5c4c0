//! Repository layer: one zero-sized struct per table with async query
//! functions taking a `&PgPool`.

mod filter;

pub mod accessory_repo;
pub mod character_repo;

pub use accessory_repo::AccessoryRepo;
pub use character_repo::CharacterRepo;
