use clap::Parser;
use std::path::PathBuf;

/// Configurator - evaluate schema-driven configurable fields forms
#[derive(Parser, Debug, Clone)]
#[command(name = "configurator", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "CONFIGURATOR_CONFIG", default_value = "configurator.toml")]
    pub config: PathBuf,

    /// Directory holding parameter descriptor files (JSON, YAML or TOML)
    #[arg(long, env = "CONFIGURATOR_PARAMS")]
    pub params: Option<PathBuf>,

    /// File holding the initial values (JSON, YAML or TOML)
    #[arg(long, env = "CONFIGURATOR_VALUES")]
    pub values: Option<PathBuf>,

    /// Change event to apply, as `id=value` (repeatable)
    #[arg(long = "set", value_name = "ID=VALUE")]
    pub assignments: Vec<String>,

    /// Prefix for bound field names
    #[arg(long, env = "CONFIGURATOR_PREFIX")]
    pub prefix: Option<String>,

    /// Re-evaluate whenever the descriptors or values change
    #[arg(long)]
    pub watch: bool,
}

impl Cli {
    /// Split each `--set` into its field id and raw value
    pub fn parsed_assignments(&self) -> Result<Vec<(String, String)>, String> {
        self.assignments
            .iter()
            .map(|raw| match raw.split_once('=') {
                Some((id, value)) if !id.trim().is_empty() => Ok((id.trim().to_string(), value.to_string())),
                _ => Err(format!("Invalid assignment '{}', expected ID=VALUE", raw)),
            })
            .collect()
    }
}
