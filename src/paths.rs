//! XDG-style path utilities for the configuration directory.
//!
//! Prefers XDG Base Directory conventions over OS-specific locations so the
//! config file sits in the same place on Linux and macOS.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const APP_DIR: &str = "sla-translate";

/// Returns the configuration directory.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/sla-translate` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/sla-translate` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(".config").join(APP_DIR)),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| Error::Config("failed to determine home directory".to_string()))
}

/// Output path used when none is given: `<stem>_translated_to_<TARGET>.<ext>`
/// next to the input.
pub fn default_output_path(input: &Path, target: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "document".into(), |s| s.to_string_lossy());
    let file_name = match input.extension() {
        Some(ext) => format!("{stem}_translated_to_{target}.{}", ext.to_string_lossy()),
        None => format!("{stem}_translated_to_{target}"),
    };
    input.with_file_name(file_name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_dir_default() {
        // Clear XDG_CONFIG_HOME to test default behavior
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::remove_var("XDG_CONFIG_HOME") };

        let dir = config_dir().unwrap();
        assert!(dir.ends_with(".config/sla-translate"));

        // Restore
        if let Some(val) = original {
            unsafe { std::env::set_var("XDG_CONFIG_HOME", val) };
        }
    }

    #[test]
    #[serial]
    fn test_config_dir_xdg_override() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", "/custom/config") };

        let dir = config_dir().unwrap();
        assert_eq!(dir, PathBuf::from("/custom/config/sla-translate"));

        // Restore
        if let Some(val) = original {
            unsafe { std::env::set_var("XDG_CONFIG_HOME", val) };
        } else {
            unsafe { std::env::remove_var("XDG_CONFIG_HOME") };
        }
    }

    #[test]
    fn test_default_output_path_keeps_extension() {
        let path = default_output_path(Path::new("/work/flyer.sla"), "FR");
        assert_eq!(path, PathBuf::from("/work/flyer_translated_to_FR.sla"));
    }

    #[test]
    fn test_default_output_path_without_extension() {
        let path = default_output_path(Path::new("brochure"), "EN-US");
        assert_eq!(path, PathBuf::from("brochure_translated_to_EN-US"));
    }

    #[test]
    fn test_default_output_path_multiple_dots() {
        let path = default_output_path(Path::new("docs/v1.2.sla"), "DE");
        assert_eq!(path, PathBuf::from("docs/v1.2_translated_to_DE.sla"));
    }
}
