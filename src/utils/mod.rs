//! Path and filesystem utilities
//!
//! - [`fs`] - lexical normalization, existence checks, text output
//! - [`platform`] - `~`/`$VAR` expansion of user-supplied paths

pub mod fs;
pub mod platform;

pub use fs::{display_relative, existing_file, normalize_path, write_text_file};
pub use platform::resolve_path;
