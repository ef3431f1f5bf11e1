//! Config namespace: YAML settings for the job manager.

mod settings;

pub use settings::{
    JobsSettings, jobs_settings_paths, load_jobs_settings, load_jobs_settings_from_paths,
    read_jobs_settings, set_config_home_override,
};
