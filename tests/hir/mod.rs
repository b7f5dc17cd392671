//! HIR layer tests
//!
//! Tests for the semantic model:
//! - Name resolution and shadowing
//! - Cross-file and stdlib resolution
//! - TL-B and Fift resolution
//! - Type inference
//! - Index maintenance
//! - Totality on malformed input

pub mod tests_index;
pub mod tests_name_resolution;
pub mod tests_totality;
pub mod tests_type_inference;
