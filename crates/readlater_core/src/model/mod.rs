//! Domain model for saved articles and notes.
//!
//! # Responsibility
//! - Define the canonical record consumed by tagging and persistence.
//!
//! # Invariants
//! - Links and manual notes share one record shape with optional fields.

pub mod article;
