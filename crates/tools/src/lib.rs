//! Tool execution for toolbridge.
//!
//! The only tool the relay drives is an external command-line program,
//! run once per admitted message by the [`SubprocessExecutor`].

pub mod subprocess;

pub use subprocess::{
    ALLOWED_TOOLS_ENV, SubprocessConfig, SubprocessExecutor, clean_input, is_tool_installed,
};
