//! Settings loader for omni-jobs.
//!
//! Loads and merges:
//! - System defaults: `<PRJ_ROOT>/packages/conf/jobs.yaml`
//! - User overrides:  `<PRJ_CONFIG_HOME>/omni-dev-fusion/jobs.yaml`
//!
//! Merge precedence is user over system.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{JobsError, Result};
use crate::manager::JobManagerConfig;

const DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH: &str = "packages/conf/jobs.yaml";
const DEFAULT_USER_SETTINGS_RELATIVE_PATH: &str = "omni-dev-fusion/jobs.yaml";
const DEFAULT_CONFIG_HOME_RELATIVE_PATH: &str = ".config";
static CONFIG_HOME_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

/// Job manager settings; every field is optional so files can be layered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JobsSettings {
    /// Maximum concurrently running jobs (unset = unbounded).
    pub max_capacity: Option<usize>,
    /// Number of retained job errors.
    pub error_cache_capacity: Option<usize>,
}

impl JobsSettings {
    /// Field-by-field merge; values from `overlay` win.
    #[must_use]
    pub fn merge(self, overlay: Self) -> Self {
        Self {
            max_capacity: overlay.max_capacity.or(self.max_capacity),
            error_cache_capacity: overlay.error_cache_capacity.or(self.error_cache_capacity),
        }
    }

    /// Apply settings on top of the default manager config.
    #[must_use]
    pub fn to_manager_config(&self) -> JobManagerConfig {
        let mut config = JobManagerConfig::default();
        if let Some(max_capacity) = self.max_capacity {
            config = config.with_max_capacity(max_capacity);
        }
        if let Some(error_cache_capacity) = self.error_cache_capacity {
            config = config.with_error_cache_capacity(error_cache_capacity);
        }
        config
    }
}

/// Load system + user settings from their default locations.
pub fn load_jobs_settings() -> JobsSettings {
    let (system_path, user_path) = jobs_settings_paths();
    load_jobs_settings_from_paths(&system_path, &user_path)
}

#[doc(hidden)]
pub fn jobs_settings_paths() -> (PathBuf, PathBuf) {
    let root = project_root();
    let system_path = root.join(DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH);
    let user_path = resolve_config_home(&root).join(DEFAULT_USER_SETTINGS_RELATIVE_PATH);
    (system_path, user_path)
}

/// Merge two settings files; missing or invalid files count as empty.
pub fn load_jobs_settings_from_paths(system: &Path, user: &Path) -> JobsSettings {
    load_one(system).merge(load_one(user))
}

/// Strictly read one settings file.
///
/// # Errors
/// Returns [`JobsError::SettingsIo`] if the file cannot be read and
/// [`JobsError::SettingsParse`] if it is not valid settings YAML.
pub fn read_jobs_settings(path: &Path) -> Result<JobsSettings> {
    let raw = std::fs::read_to_string(path).map_err(|source| JobsError::SettingsIo {
        path: path.to_path_buf(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Ok(JobsSettings::default());
    }
    serde_yaml::from_str::<JobsSettings>(&raw).map_err(|source| JobsError::SettingsParse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_one(path: &Path) -> JobsSettings {
    if !path.exists() {
        return JobsSettings::default();
    }
    match read_jobs_settings(path) {
        Ok(settings) => settings,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to load jobs settings; ignoring file"
            );
            JobsSettings::default()
        }
    }
}

fn project_root() -> PathBuf {
    std::env::var("PRJ_ROOT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Set config-home override (used by CLI `--conf`).
///
/// The path can be absolute, or relative to `PRJ_ROOT`/cwd.
pub fn set_config_home_override(path: impl Into<PathBuf>) {
    let path = path.into();
    if path.as_os_str().is_empty() {
        return;
    }
    if CONFIG_HOME_OVERRIDE.set(path.clone()).is_err()
        && let Some(current) = CONFIG_HOME_OVERRIDE.get()
        && current != &path
    {
        tracing::warn!(
            current = %current.display(),
            ignored = %path.display(),
            "config home override already set; ignoring subsequent value"
        );
    }
}

fn resolve_config_home(project_root: &Path) -> PathBuf {
    if let Some(path) = CONFIG_HOME_OVERRIDE.get() {
        return absolutize(project_root, path.clone());
    }

    let configured = std::env::var("PRJ_CONFIG_HOME")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_HOME_RELATIVE_PATH.to_string());
    absolutize(project_root, PathBuf::from(configured))
}

fn absolutize(project_root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_wins_per_field() {
        let system = JobsSettings {
            max_capacity: Some(4),
            error_cache_capacity: Some(50),
        };
        let user = JobsSettings {
            max_capacity: Some(8),
            error_cache_capacity: None,
        };
        let merged = system.merge(user);
        assert_eq!(merged.max_capacity, Some(8));
        assert_eq!(merged.error_cache_capacity, Some(50));
    }

    #[test]
    fn empty_settings_keep_manager_defaults() {
        assert_eq!(
            JobsSettings::default().to_manager_config(),
            JobManagerConfig::default()
        );
    }

    #[test]
    fn absolutize_keeps_absolute_paths() {
        let root = Path::new("/prj");
        assert_eq!(
            absolutize(root, PathBuf::from("/etc/conf")),
            PathBuf::from("/etc/conf")
        );
        assert_eq!(
            absolutize(root, PathBuf::from(".config")),
            PathBuf::from("/prj/.config")
        );
    }
}
