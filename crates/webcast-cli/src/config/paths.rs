//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Environment variable overriding the config directory.
const CONFIG_DIR_ENV: &str = "WEBCAST_CONFIG_DIR";

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path from `--dir` and the process environment.
///
/// Lookup order, first hit wins:
///
/// 1. `--dir`
/// 2. `WEBCAST_CONFIG_DIR`
/// 3. `$XDG_CONFIG_HOME/webcast`
/// 4. `$HOME/.config/webcast`
///
/// # Errors
///
/// Returns an error if none of the above is available.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_path_from(
        dir.map(PathBuf::as_path),
        std::env::var_os(CONFIG_DIR_ENV).as_deref().map(Path::new),
        std::env::var_os("XDG_CONFIG_HOME").as_deref().map(Path::new),
        std::env::var_os("HOME").as_deref().map(Path::new),
    )
}

/// Picks the config file path from explicit sources. Empty values are skipped.
/// A relative `XDG_CONFIG_HOME` is invalid and ignored.
fn config_path_from(
    dir: Option<&Path>,
    config_dir_env: Option<&Path>,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf> {
    let non_empty = |p: &&Path| !p.as_os_str().is_empty();

    if let Some(d) = dir.filter(non_empty).or_else(|| config_dir_env.filter(non_empty)) {
        return Ok(d.join(CONFIG_FILE));
    }
    if let Some(xdg) = xdg_config_home
        .filter(non_empty)
        .filter(|p| p.is_absolute())
    {
        return Ok(xdg.join("webcast").join(CONFIG_FILE));
    }
    if let Some(h) = home.filter(non_empty) {
        return Ok(h.join(".config").join("webcast").join(CONFIG_FILE));
    }
    bail!("cannot locate config directory: set --dir, {CONFIG_DIR_ENV}, XDG_CONFIG_HOME or HOME")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_dir_flag_wins() {
        // Arrange & Act
        let path = config_path_from(
            Some(Path::new("/srv/webcast")),
            Some(Path::new("/etc/webcast")),
            Some(Path::new("/xdg")),
            Some(Path::new("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/srv/webcast/config.toml"));
    }

    #[test]
    fn test_config_dir_env_before_xdg() {
        // Arrange & Act
        let path = config_path_from(
            None,
            Some(Path::new("/etc/webcast")),
            Some(Path::new("/xdg")),
            Some(Path::new("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/etc/webcast/config.toml"));
    }

    #[test]
    fn test_xdg_config_home_before_home() {
        // Arrange & Act
        let path = config_path_from(
            None,
            None,
            Some(Path::new("/xdg")),
            Some(Path::new("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/xdg/webcast/config.toml"));
    }

    #[test]
    fn test_relative_or_empty_xdg_falls_back_to_home() {
        // Arrange & Act
        let relative = config_path_from(
            None,
            Some(Path::new("")),
            Some(Path::new("relative/cfg")),
            Some(Path::new("/home/u")),
        )
        .unwrap();
        let empty =
            config_path_from(None, None, Some(Path::new("")), Some(Path::new("/home/u"))).unwrap();

        // Assert
        assert_eq!(relative, PathBuf::from("/home/u/.config/webcast/config.toml"));
        assert_eq!(empty, relative);
    }

    #[test]
    fn test_no_source_is_an_error() {
        // Arrange & Act
        let result = config_path_from(None, None, None, None);

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("cannot locate config directory")
        );
    }
}
