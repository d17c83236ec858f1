use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod validator;
pub mod watcher;

use crate::cli::Cli;
use crate::domain::{parameters_from_configs, FormValues, Parameter, ParameterConfig};
use crate::error::FormResult;
use crate::form::TOUCH_DEBOUNCE_MS;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub form: FormSettings,
    /// Descriptors declared inline; files from `form.parameters_dir` are appended.
    /// Keys inside inline `default_value`/`constant` objects come back
    /// lowercased; descriptor files keep them as written.
    #[serde(default)]
    pub parameters: Vec<ParameterConfig>,
    /// Initial values declared inline; `form.values_file` overrides them
    #[serde(default)]
    pub initial_values: FormValues,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FormSettings {
    /// Prefix for bound field names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,
    /// Idle window for "field touched" notifications
    #[serde(default = "default_touch_debounce_ms")]
    pub touch_debounce_ms: u64,
    /// Directory of descriptor files, relative to the config file
    #[serde(default = "default_parameters_dir")]
    pub parameters_dir: String,
    /// Initial values file, relative to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values_file: Option<String>,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            name_prefix: None,
            touch_debounce_ms: default_touch_debounce_ms(),
            parameters_dir: default_parameters_dir(),
            values_file: None,
        }
    }
}

fn default_touch_debounce_ms() -> u64 {
    TOUCH_DEBOUNCE_MS
}

fn default_parameters_dir() -> String {
    "config/parameters".to_string()
}

/// Shapes accepted in a descriptor file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptorFile {
    List(Vec<ParameterConfig>),
    Table { parameters: Vec<ParameterConfig> },
    One(ParameterConfig),
}

impl DescriptorFile {
    fn into_vec(self) -> Vec<ParameterConfig> {
        match self {
            DescriptorFile::List(list) | DescriptorFile::Table { parameters: list } => list,
            DescriptorFile::One(one) => vec![one],
        }
    }
}

impl Settings {
    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let config_path = &cli.config;
        let root = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let s = Config::builder()
            .add_source(File::from(config_path.clone()).required(false))
            .set_default("form.touch_debounce_ms", TOUCH_DEBOUNCE_MS as i64)?
            .set_default("form.parameters_dir", default_parameters_dir())?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        // Apply CLI overrides (CLI > env vars > config file)
        settings.apply_cli_overrides(cli)?;

        settings.load_external_configs(&root)?;
        settings.validate()?;

        Ok(settings)
    }

    /// Apply CLI argument overrides to settings. Paths given on the command
    /// line are relative to the working directory, not to the config file.
    fn apply_cli_overrides(&mut self, cli: &Cli) -> Result<(), anyhow::Error> {
        if let Some(params) = &cli.params {
            self.form.parameters_dir = path_string(&std::path::absolute(params)?);
        }
        if let Some(values) = &cli.values {
            self.form.values_file = Some(path_string(&std::path::absolute(values)?));
        }
        if let Some(prefix) = &cli.prefix {
            self.form.name_prefix = Some(prefix.clone());
        }
        Ok(())
    }

    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let root = root.as_ref();
        let config_path = root.join("configurator");
        let s = Config::builder()
            .add_source(File::from(config_path).required(false))
            .set_default("form.touch_debounce_ms", TOUCH_DEBOUNCE_MS as i64)?
            .set_default("form.parameters_dir", default_parameters_dir())?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        settings.load_external_configs(root)?;
        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!("Configuration validation failed:\n{}", error_messages.join("\n"))
        })
    }

    fn load_external_configs(&mut self, root: &Path) -> Result<(), anyhow::Error> {
        let params_dir = resolve(root, &self.form.parameters_dir);
        self.load_parameters_from_dir(&params_dir)?;

        if let Some(values_file) = self.form.values_file.clone() {
            let values = load_values_file(&resolve(root, &values_file))?;
            self.initial_values.merge(values);
        }
        Ok(())
    }

    /// Paths worth watching for changes: the parameters directory and the
    /// values file
    pub fn watched_paths(&self, root: &Path) -> Vec<String> {
        let mut paths = vec![path_string(&resolve(root, &self.form.parameters_dir))];
        if let Some(values_file) = &self.form.values_file {
            paths.push(path_string(&resolve(root, values_file)));
        }
        paths
    }

    /// Descriptors converted to engine parameters, in declaration order
    pub fn parameters(&self) -> FormResult<Vec<Parameter>> {
        parameters_from_configs(self.parameters.clone())
    }

    fn load_parameters_from_dir(&mut self, path: &Path) -> Result<(), anyhow::Error> {
        let pattern = format!("{}/*", path_string(path));
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) => {
                    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                        if watcher::WATCHED_EXTENSIONS.contains(&ext) {
                            let content = std::fs::read_to_string(&path)?;
                            let file: DescriptorFile = match ext {
                                "json" => serde_json::from_str(&content)?,
                                "toml" => toml::from_str(&content)?,
                                _ => serde_yaml::from_str(&content)?,
                            };
                            let descriptors = file.into_vec();
                            tracing::debug!("Loaded {} parameters from {}", descriptors.len(), path.display());
                            self.parameters.extend(descriptors);
                        }
                    }
                }
                Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
            }
        }
        Ok(())
    }
}

/// Read initial values from a JSON, YAML or TOML file
pub fn load_values_file(path: &Path) -> Result<FormValues, anyhow::Error> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read values file {}: {}", path.display(), e))?;
    let values = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(values)
}

fn resolve(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
