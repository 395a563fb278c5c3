//! Developer tooling for the platform-ui component library.
//!
//! - [`tokens`]: design-token verification and fixing for `.ts/.tsx/.jsx` sources
//! - [`workflow`]: the `specs/<component>/` design workflow (scaffold, validate, export)

pub mod cli;
pub mod config;
pub mod logging;
pub mod tokens;
pub mod workflow;

/// Process exit code for a clean run
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit code when violations or issues were found, or the run failed
pub const EXIT_FAILURE: i32 = 1;
