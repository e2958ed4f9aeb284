use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;

const APP_NAME: &str = "nird-schema";
const CONFIG_FILE: &str = "config.yaml";

/// Deployment configuration shared by `nird-init` and `nird-models`.
///
/// Relative paths resolve against `root`, which is the deployment root and
/// defaults to the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub root: PathBuf,
    pub database: PathBuf,
    pub models_dir: PathBuf,
    /// Connection target baked into generated models. Defaults to the
    /// absolute database path.
    pub model_database: Option<PathBuf>,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            database: PathBuf::from("serveur").join("database.db"),
            models_dir: PathBuf::from("src").join("models"),
            model_database: None,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Return the application config directory path without creating it.
    pub fn app_config_dir() -> Result<PathBuf, ConfigError> {
        let path = if cfg!(target_os = "macos") {
            dirs_next::home_dir().map(|h| h.join(".config"))
        } else {
            dirs_next::config_dir()
        }
        .ok_or(ConfigError::NoConfigDir)?;

        Ok(path.join(APP_NAME))
    }

    /// Load configuration. An explicit path must exist; otherwise the file in
    /// the app config directory is used when present, and defaults when not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)
            }
            None => {
                let path = match Self::app_config_dir() {
                    Ok(dir) => dir.join(CONFIG_FILE),
                    Err(_) => return Ok(Self::default()),
                };
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_slice(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<PathBuf>) -> Self {
        self.database = database.into();
        self
    }

    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.database)
    }

    pub fn models_path(&self) -> PathBuf {
        self.resolve(&self.models_dir)
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(|p| self.resolve(p))
    }

    /// Database path written into generated models.
    pub fn model_connection_target(&self) -> PathBuf {
        match &self.model_database {
            Some(path) => self.resolve(path),
            None => absolutize(&self.database_path()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        let path = expand_path(path);
        if path.is_absolute() {
            path
        } else {
            expand_path(&self.root).join(path)
        }
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs_next::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(_) => path.to_path_buf(),
    }
}

// Lexical cleanup of `.` and `..` for paths that do not exist yet.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_under_working_directory() {
        let config = Config::default();
        assert_eq!(config.database_path(), Path::new("./serveur/database.db"));
        assert_eq!(config.models_path(), Path::new("./src/models"));
        assert_eq!(config.log_level, "info");
        assert!(config.log_file_path().is_none());
    }

    #[test]
    fn relative_paths_follow_the_root() {
        let config = Config::default().with_root("/srv/nird");
        assert_eq!(config.database_path(), Path::new("/srv/nird/serveur/database.db"));
        assert_eq!(config.models_path(), Path::new("/srv/nird/src/models"));
    }

    #[test]
    fn absolute_paths_ignore_the_root() {
        let config = Config::default()
            .with_root("/srv/nird")
            .with_database("/var/lib/nird/site.db");
        assert_eq!(config.database_path(), Path::new("/var/lib/nird/site.db"));
        assert_eq!(
            config.model_connection_target(),
            Path::new("/var/lib/nird/site.db")
        );
    }

    #[test]
    fn model_target_defaults_to_absolute_database_path() {
        let config = Config::default().with_root("deploy");
        let target = config.model_connection_target();
        assert!(target.is_absolute());
        assert!(target.ends_with("deploy/serveur/database.db"));
    }

    #[test]
    fn explicit_model_target_wins() {
        let mut config = Config::default().with_root("/srv/nird");
        config.model_database = Some(PathBuf::from("/data/live.db"));
        assert_eq!(config.model_connection_target(), Path::new("/data/live.db"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs_next::home_dir() else {
            return;
        };
        let config = Config::default().with_database("~/nird/database.db");
        assert_eq!(config.database_path(), home.join("nird/database.db"));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "root: /opt/site\nlog_level: debug\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.root, PathBuf::from("/opt/site"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.database, PathBuf::from("serveur/database.db"));
        assert_eq!(config.models_dir, PathBuf::from("src/models"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::NotFound(p)) if p == path
        ));
    }

    #[test]
    fn malformed_yaml_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "root: [unclosed\n").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("config.yaml"));
    }

    #[test]
    fn normalize_drops_dot_segments() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    }
}
