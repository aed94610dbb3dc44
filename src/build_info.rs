//! Compile-time build metadata.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("CODELY_BUILD_GIT_HASH");

pub const BUILD_TIMESTAMP: &str = env!("CODELY_BUILD_TIMESTAMP");

/// Help trailer block that surfaces build metadata in `codely --help`.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build metadata:\n  commit: ",
    env!("CODELY_BUILD_GIT_HASH"),
    "\n  built: ",
    env!("CODELY_BUILD_TIMESTAMP")
);

/// Render the block printed by `codely --version`.
pub fn cli_version_text() -> String {
    format!("codely {VERSION}\ncommit: {GIT_COMMIT}\nbuilt: {BUILD_TIMESTAMP}")
}

/// One-line form for the tree view header and the debug log.
pub fn short_version() -> String {
    format!("v{VERSION} ({GIT_COMMIT})")
}
