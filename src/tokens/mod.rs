//! Design-token verification and fixing.
//!
//! Walks the source tree, checks each line for raw HTML elements, inline
//! styles with literal values and non-token class names, and rewrites the
//! literal style values that map cleanly onto `--ds-*` tokens.

pub mod fixer;
pub mod mapping;
pub mod orchestrator;
pub mod report;
pub mod scanner;
pub mod types;
pub mod walk;

pub use types::{DesignTokenViolation, ViolationKind};
