use std::path::PathBuf;

use log::debug;

use crate::xtream_grab_error::{create_xtream_grab_error_result, XtreamGrabError, XtreamGrabErrorKind};

fn default_storage_file() -> String {
    String::from("servers.json")
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub working_dir: String,
    #[serde(default = "default_storage_file")]
    pub storage_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            working_dir: String::new(),
            storage_file: default_storage_file(),
        }
    }
}

impl Config {
    pub fn prepare(&mut self) {
        if self.working_dir.is_empty() {
            self.working_dir = std::env::current_dir()
                .map_or_else(|_| String::from("."), |p| p.to_string_lossy().to_string());
        }
        debug!("working dir: {}", self.working_dir);
    }

    pub fn storage_path(&self) -> PathBuf {
        let file = PathBuf::from(&self.storage_file);
        if file.is_absolute() {
            file
        } else {
            PathBuf::from(&self.working_dir).join(file)
        }
    }
}

/// Reads the yaml config, falling back to defaults when no file exists at
/// the given path.
pub fn read_config(config_file: &str) -> Result<Config, XtreamGrabError> {
    let path = PathBuf::from(config_file);
    let mut cfg = if path.exists() {
        let file = std::fs::File::open(&path).map_err(|err| {
            crate::xtream_grab_error::create_xtream_grab_error!(
                XtreamGrabErrorKind::Io,
                "cant open config file {config_file}: {err}"
            )
        })?;
        match serde_yaml::from_reader::<_, Config>(file) {
            Ok(cfg) => cfg,
            Err(err) => {
                return create_xtream_grab_error_result!(
                    XtreamGrabErrorKind::Validation,
                    "cant read config file {config_file}: {err}"
                )
            }
        }
    } else {
        Config::default()
    };
    cfg.prepare();
    Ok(cfg)
}
