//! Build-time information
//!
//! Metadata captured by `build.rs` at compile time. Git values are optional
//! because the crate may be built from a source archive.

/// Build timestamp (when the binary was compiled)
pub const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

/// Cargo optimization level (0, 1, 2, 3, s, z)
pub const CARGO_OPT_LEVEL: &str = env!("VERGEN_CARGO_OPT_LEVEL");

/// Target triple (e.g., x86_64-unknown-linux-gnu)
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

/// Rust compiler version (e.g., 1.88.0)
pub const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");

/// Rust channel (stable, beta, or nightly)
pub const RUSTC_CHANNEL: &str = env!("VERGEN_RUSTC_CHANNEL");

/// Git commit SHA, if built from a checkout
pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

/// Git branch name, if built from a checkout
pub const GIT_BRANCH: Option<&str> = option_env!("VERGEN_GIT_BRANCH");

/// Git dirty flag as emitted by vergen ("true"/"false")
pub const GIT_DIRTY: Option<&str> = option_env!("VERGEN_GIT_DIRTY");

/// Returns the first 8 characters of the git SHA, or "unknown"
pub fn git_sha_short() -> &'static str {
    match GIT_SHA {
        // vergen's placeholder when git was not reachable during the build
        Some("VERGEN_IDEMPOTENT_OUTPUT") => "unknown",
        Some(sha) if sha.len() >= 8 => &sha[..8],
        Some(sha) => sha,
        None => "unknown",
    }
}

/// Whether the working tree had uncommitted changes at build time
pub fn is_git_dirty() -> bool {
    GIT_DIRTY == Some("true")
}

/// Returns a formatted build version string
///
/// Format: `{pkg_version}+{sha}-opt{opt_level}`
pub fn version_string() -> String {
    format!(
        "{}+{}-opt{}",
        env!("CARGO_PKG_VERSION"),
        git_sha_short(),
        CARGO_OPT_LEVEL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha_short_is_bounded() {
        assert!(git_sha_short().len() <= 8 || git_sha_short() == "unknown");
    }

    #[test]
    fn test_version_string_contains_package_version() {
        assert!(version_string().starts_with(env!("CARGO_PKG_VERSION")));
    }
}
