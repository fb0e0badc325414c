//! Repository name validation.
//!
//! Registry keys double as directory names under `<vault>/repos/`, so a
//! name must never be able to produce an invalid path or escape that
//! directory once joined onto it.

use crate::errors::{ResteasyError, Result};

/// Maximum length of a repository name.
pub const MAX_NAME_LEN: usize = 64;

/// Device names Windows reserves in every directory, with or without an
/// extension.
const RESERVED_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Returns `true` if `name` is a well-formed repository name.
///
/// Allowed: ASCII letters, digits, underscores, hyphens, periods.
/// Must be 1-64 characters and must not start with a period or hyphen.
pub fn is_valid_repository_name(name: &str) -> bool {
    validate_repository_name(name).is_ok()
}

/// Validate a repository name, explaining what is wrong with it.
pub fn validate_repository_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ResteasyError::InvalidArgument(
            "repository name cannot be empty".into(),
        ));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ResteasyError::InvalidArgument(format!(
            "repository name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err(ResteasyError::InvalidArgument(format!(
            "repository name '{name}' contains invalid characters; only ASCII letters, digits, underscores, hyphens, and periods are allowed"
        )));
    }

    // Covers ".", "..", hidden directories and names restic would read as flags.
    if name.starts_with('.') || name.starts_with('-') {
        return Err(ResteasyError::InvalidArgument(format!(
            "repository name '{name}' cannot start with a period or hyphen"
        )));
    }

    if name.ends_with('.') {
        return Err(ResteasyError::InvalidArgument(format!(
            "repository name '{name}' cannot end with a period"
        )));
    }

    let stem = name.split('.').next().unwrap_or(name);
    if RESERVED_DEVICE_NAMES
        .iter()
        .any(|reserved| stem.eq_ignore_ascii_case(reserved))
    {
        return Err(ResteasyError::InvalidArgument(format!(
            "repository name '{name}' is a reserved device name"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(is_valid_repository_name("docs"));
        assert!(is_valid_repository_name("Photos"));
        assert!(is_valid_repository_name("home_2024"));
        assert!(is_valid_repository_name("work-laptop.v2"));
        assert!(is_valid_repository_name("a"));
    }

    #[test]
    fn rejects_empty_name() {
        assert!(!is_valid_repository_name(""));
    }

    #[test]
    fn rejects_path_separators() {
        assert!(!is_valid_repository_name("a/b"));
        assert!(!is_valid_repository_name("a\\b"));
        assert!(!is_valid_repository_name("/etc"));
    }

    #[test]
    fn rejects_dot_names() {
        assert!(!is_valid_repository_name("."));
        assert!(!is_valid_repository_name(".."));
        assert!(!is_valid_repository_name(".hidden"));
    }

    #[test]
    fn rejects_leading_hyphen() {
        assert!(!is_valid_repository_name("-r"));
        assert!(!is_valid_repository_name("--help"));
    }

    #[test]
    fn rejects_whitespace_and_special_chars() {
        assert!(!is_valid_repository_name("my docs"));
        assert!(!is_valid_repository_name("docs\n"));
        assert!(!is_valid_repository_name("docs:1"));
        assert!(!is_valid_repository_name("dócs"));
    }

    #[test]
    fn rejects_too_long_name() {
        assert!(is_valid_repository_name(&"a".repeat(MAX_NAME_LEN)));
        assert!(!is_valid_repository_name(&"a".repeat(MAX_NAME_LEN + 1)));
    }

    #[test]
    fn validate_reports_invalid_argument() {
        match validate_repository_name("a/b") {
            Err(ResteasyError::InvalidArgument(msg)) => assert!(msg.contains("a/b")),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn rejects_reserved_device_names() {
        for name in ["CON", "con", "Nul", "aux", "PRN", "com1", "LPT9", "nul.txt", "Con.backup"] {
            assert!(!is_valid_repository_name(name), "{name} should be rejected");
        }
        assert!(is_valid_repository_name("console"));
        assert!(is_valid_repository_name("com10"));
        assert!(is_valid_repository_name("my.con"));
    }

    #[test]
    fn rejects_trailing_period() {
        assert!(!is_valid_repository_name("docs."));
        assert!(is_valid_repository_name("docs.v1"));
    }
}
