//! Semantic type resolution for C/AL.
//!
//! Converts the parser's syntactic [`cal_parser::ast::DataType`] nodes
//! into tagged [`SemanticType`] values, and provides type identity,
//! assignment compatibility, and display formatting for editor services.

mod compat;
mod resolve;
mod ty;

pub use compat::{are_types_equal, is_assignment_compatible};
pub use resolve::{resolve_type, resolve_variable_type, ResolveOptions};
pub use ty::{type_to_string, SemanticType, TypeDisplayOptions};
