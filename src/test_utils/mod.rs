//! Test utilities for bmad-resolver
//!
//! Helpers for building throwaway content trees and turning on logging inside
//! tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use bmad_resolver::resolver::{ResolveOptions, resolve};
//! use bmad_resolver::test_utils::ContentTreeFixture;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let tree = ContentTreeFixture::new()?;
//! tree.add_file("core/agents/a.md", "@task-b")?;
//! tree.add_file("core/tasks/b.md", "# B")?;
//!
//! let result = resolve(tree.root(), &[], &ResolveOptions::default()).await?;
//! assert_eq!(result.all_files.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod fixtures;

pub use fixtures::{ArtifactFixture, ContentTreeFixture};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` unset, logging is enabled
/// only when `RUST_LOG` is set.
///
/// ```bash
/// RUST_LOG=bmad_resolver=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
