//! Domain logic for the game catalog service.
//!
//! Everything in this crate is free of database and HTTP dependencies:
//! version tokens, conditional-request evaluation, list-query resolution,
//! rule-table validation and the optimistic-locking update pipeline.

pub mod catalog;
pub mod conditional;
pub mod error;
pub mod listing;
pub mod mutation;
pub mod types;
pub mod validation;
pub mod version;
