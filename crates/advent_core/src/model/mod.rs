//! Domain model for memory pages.
//!
//! # Responsibility
//! - Define memory, block and formatting structures shared by retrieval,
//!   editing and rendering.
//!
//! # Invariants
//! - Blocks belong to exactly one memory and are explicitly ordered.
//! - Formatting layers are optional field-by-field.

pub mod block;
pub mod formatting;
pub mod memory;
