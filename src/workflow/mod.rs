//! Spec-first design workflow.
//!
//! Product documents live under `product/`, and each component has a
//! directory `specs/<name>/` holding `SPEC.md`, `COMPOSE.json`,
//! `TESTIDS.json` and `APPROVAL.json`. This module scaffolds them, validates
//! them, checks sign-off and exports them.

pub mod artifact;
pub mod export;
pub mod issue;
pub mod layout;
pub mod scaffold;
pub mod template;
pub mod validate;
