//! Configuration initialization and hierarchy management
//!
//! Precedence: CLI > Env > File > Defaults.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::adapters::toml_config::{FileConfig, TomlConfigAdapter};
use crate::error::{ProbeError, ProbeResult};
use crate::probe::index::SequencePolicy;

pub const ENV_PROGRAM: &str = "MEDIAPROBE_BIN";
pub const ENV_TIMEOUT_SECS: &str = "MEDIAPROBE_TIMEOUT_SECS";
pub const ENV_SEQUENCE_POLICY: &str = "MEDIAPROBE_SEQUENCE_POLICY";

/// How to invoke MediaInfo and how to read its report
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    /// Executable to spawn
    pub program: PathBuf,
    /// Arguments placed before the output flag
    pub leading_args: Vec<String>,
    /// Flag selecting JSON output
    pub output_flag: String,
    /// Longest wait for one probe
    pub timeout: Duration,
    pub sequence_policy: SequencePolicy,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("mediainfo"),
            leading_args: Vec::new(),
            output_flag: "--Output=JSON".to_string(),
            timeout: Duration::from_secs(30),
            sequence_policy: SequencePolicy::default(),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub program: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub sequence_policy: Option<SequencePolicy>,
}

/// Resolve the probe configuration from every source
pub fn initialize_configuration(overrides: &ConfigOverrides) -> ProbeResult<ProbeConfig> {
    resolve_configuration(overrides, |key| std::env::var(key).ok())
}

/// Resolve with an explicit environment lookup
pub fn resolve_configuration(
    overrides: &ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ProbeResult<ProbeConfig> {
    // Step 1: defaults
    let mut config = ProbeConfig::default();

    // Step 2: file
    if let Some(file) = load_config_file(overrides)? {
        apply_file(&mut config, file);
    }

    // Step 3: environment
    apply_environment(&mut config, env)?;

    // Step 4: CLI
    apply_cli_overrides(&mut config, overrides);

    if config.timeout.is_zero() {
        return Err(ProbeError::Config {
            message: "timeout must be at least 1 second".to_string(),
        });
    }

    debug!(?config, "Configuration resolved");
    Ok(config)
}

/// An explicit `--config` must exist; the default file is optional
fn load_config_file(overrides: &ConfigOverrides) -> ProbeResult<Option<FileConfig>> {
    if let Some(path) = &overrides.config_file {
        info!("Loading configuration from: {}", path.display());
        return TomlConfigAdapter::load(path).map(Some);
    }

    let default_path = TomlConfigAdapter::default_config_path();
    if default_path.is_file() {
        info!("Loading configuration from: {}", default_path.display());
        return TomlConfigAdapter::load(&default_path).map(Some);
    }

    debug!("No configuration file found");
    Ok(None)
}

fn apply_file(config: &mut ProbeConfig, file: FileConfig) {
    if let Some(program) = file.program {
        config.program = program;
    }
    if let Some(leading_args) = file.leading_args {
        config.leading_args = leading_args;
    }
    if let Some(output_flag) = file.output_flag {
        config.output_flag = output_flag;
    }
    if let Some(secs) = file.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(policy) = file.sequence_policy {
        config.sequence_policy = policy;
    }
}

fn apply_environment(
    config: &mut ProbeConfig,
    env: impl Fn(&str) -> Option<String>,
) -> ProbeResult<()> {
    if let Some(program) = env(ENV_PROGRAM) {
        info!("Found environment override: {} = {}", ENV_PROGRAM, program);
        config.program = PathBuf::from(program);
    }

    if let Some(value) = env(ENV_TIMEOUT_SECS) {
        let secs = value.trim().parse::<u64>().map_err(|_| ProbeError::Config {
            message: format!("{} must be a whole number of seconds, got '{}'", ENV_TIMEOUT_SECS, value),
        })?;
        info!("Found environment override: {} = {}", ENV_TIMEOUT_SECS, secs);
        config.timeout = Duration::from_secs(secs);
    }

    if let Some(value) = env(ENV_SEQUENCE_POLICY) {
        config.sequence_policy = value.parse().map_err(|e: ProbeError| ProbeError::Config {
            message: format!("{}: {}", ENV_SEQUENCE_POLICY, e),
        })?;
        info!("Found environment override: {} = {}", ENV_SEQUENCE_POLICY, value);
    }

    Ok(())
}

fn apply_cli_overrides(config: &mut ProbeConfig, overrides: &ConfigOverrides) {
    if let Some(program) = &overrides.program {
        config.program = program.clone();
    }
    if let Some(secs) = overrides.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(policy) = overrides.sequence_policy {
        config.sequence_policy = policy;
    }
}
