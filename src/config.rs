//! Server configuration loaded from environment variables

use std::env;
use std::path::PathBuf;

use anyhow::{Result, bail};

/// Checked in order; the first valid port wins.
pub const PORT_ENV_VARS: [&str; 5] = ["PORT", "APP_PORT", "WEB_PORT", "VD_PORT", "SERVER_PORT"];

pub const DEFAULT_PORT: u16 = 8080;

pub const STATIC_DIR_ENV_VAR: &str = "VD_STATIC_DIR";

pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port
    pub port: u16,

    /// Directory served under `/static`
    pub static_dir: PathBuf,
}

impl Config {
    /// Load configuration from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port = port_from(|name| env::var(name).ok());
        let static_dir = static_dir_from(|name| env::var(name).ok())?;

        Ok(Self { port, static_dir })
    }
}

/// Resolve the asset directory through `lookup`.
///
/// An explicitly configured directory must exist; the default is taken as-is.
pub fn static_dir_from<F>(lookup: F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(dir) = lookup(STATIC_DIR_ENV_VAR).filter(|dir| !dir.is_empty()) else {
        return Ok(PathBuf::from(DEFAULT_STATIC_DIR));
    };

    let dir = PathBuf::from(dir);
    if !dir.is_dir() {
        bail!("{} is not a directory: {}", STATIC_DIR_ENV_VAR, dir.display());
    }
    Ok(dir)
}

/// Resolve the listen port through `lookup`, skipping empty or invalid values.
pub fn port_from<F>(lookup: F) -> u16
where
    F: Fn(&str) -> Option<String>,
{
    PORT_ENV_VARS
        .iter()
        .filter_map(|&name| lookup(name))
        .filter_map(|value| value.parse::<u16>().ok())
        .find(|port| *port != 0)
        .unwrap_or(DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_default_port() {
        assert_eq!(port_from(lookup(&[])), 8080);
    }

    #[test]
    fn test_first_valid_port_wins() {
        assert_eq!(port_from(lookup(&[("WEB_PORT", "9000"), ("SERVER_PORT", "9100")])), 9000);
        assert_eq!(port_from(lookup(&[("PORT", "3000"), ("APP_PORT", "4000")])), 3000);
    }

    #[test]
    fn test_invalid_ports_are_skipped() {
        assert_eq!(
            port_from(lookup(&[("PORT", ""), ("APP_PORT", "0"), ("WEB_PORT", "70000"), ("VD_PORT", "abc"), ("SERVER_PORT", "8181")])),
            8181
        );
        assert_eq!(port_from(lookup(&[("PORT", "-1")])), 8080);
    }

    #[test]
    fn test_static_dir_defaults() {
        assert_eq!(static_dir_from(lookup(&[])).unwrap(), PathBuf::from("static"));
        assert_eq!(
            static_dir_from(lookup(&[("VD_STATIC_DIR", "")])).unwrap(),
            PathBuf::from("static")
        );
    }

    #[test]
    fn test_static_dir_must_exist_when_configured() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().to_string_lossy().into_owned();
        assert_eq!(
            static_dir_from(lookup(&[("VD_STATIC_DIR", dir.as_str())])).unwrap(),
            tmp.path()
        );

        let missing = tmp.path().join("missing").to_string_lossy().into_owned();
        let err = static_dir_from(lookup(&[("VD_STATIC_DIR", missing.as_str())])).unwrap_err();
        assert!(err.to_string().starts_with("VD_STATIC_DIR is not a directory"));
    }
}
