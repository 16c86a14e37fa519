//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "watchbox";

/// Resolves the config file path.
///
/// Lookup order: `{dir}/config.toml`, then
/// `$XDG_CONFIG_HOME/watchbox/config.toml`, then
/// `~/.config/watchbox/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is usable and
/// `dir` is `None`.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_path_from(
        dir.map(PathBuf::as_path),
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn config_path_from(
    dir: Option<&Path>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE_NAME));
    }
    // Relative XDG paths are invalid and ignored.
    if let Some(xdg) = xdg_config_home.filter(|p| p.is_absolute()) {
        return Ok(xdg.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    let Some(home) = home.filter(|p| !p.as_os_str().is_empty()) else {
        bail!("cannot locate config: neither XDG_CONFIG_HOME nor HOME is set");
    };
    Ok(home.join(".config").join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        // Arrange
        let dir = PathBuf::from("/tmp/watchbox-test");

        // Act
        let path = config_path_from(
            Some(&dir),
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/watchbox-test/config.toml"));
    }

    #[test]
    fn test_xdg_config_home() {
        // Arrange & Act
        let path = config_path_from(
            None,
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/xdg/watchbox/config.toml"));
    }

    #[test]
    fn test_relative_xdg_falls_back_to_home() {
        // Arrange & Act
        let path = config_path_from(
            None,
            Some(PathBuf::from("relative")),
            Some(PathBuf::from("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/home/u/.config/watchbox/config.toml"));
    }

    #[test]
    fn test_no_home_fails() {
        // Arrange & Act
        let result = config_path_from(None, None, None);

        // Assert
        assert!(result.unwrap_err().to_string().contains("HOME"));
    }
}
