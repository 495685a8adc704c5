// TOML config adapter - Probe settings from a TOML file

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ProbeError, ProbeResult};
use crate::probe::index::SequencePolicy;

/// Table holding this tool's settings
const SECTION: &str = "mediaprobe";

/// Settings as written in the file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub program: Option<PathBuf>,
    pub leading_args: Option<Vec<String>>,
    pub output_flag: Option<String>,
    pub timeout_secs: Option<u64>,
    pub sequence_policy: Option<SequencePolicy>,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Config file looked up in the working directory when none is given
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("mediaprobe.toml")
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> ProbeResult<FileConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| ProbeError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        Self::parse(&content).map_err(|e| match e {
            ProbeError::Config { message } => ProbeError::Config {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Parse config text; a file without a `[mediaprobe]` table yields defaults
    pub fn parse(content: &str) -> ProbeResult<FileConfig> {
        let parsed: toml::Value = toml::from_str(content).map_err(|e| ProbeError::Config {
            message: format!("Failed to parse TOML config: {}", e),
        })?;

        match parsed.get(SECTION) {
            Some(section) => section.clone().try_into().map_err(|e| ProbeError::Config {
                message: format!("Invalid [{}] section: {}", SECTION, e),
            }),
            None => Ok(FileConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_section() {
        let config = TomlConfigAdapter::parse(
            r#"
            [mediaprobe]
            program = "/opt/mediainfo/bin/mediainfo"
            leading_args = ["--Full"]
            output_flag = "--Output=JSON"
            timeout_secs = 12
            sequence_policy = "all-tracks"
            "#,
        )
        .unwrap();

        assert_eq!(config.program, Some(PathBuf::from("/opt/mediainfo/bin/mediainfo")));
        assert_eq!(config.leading_args, Some(vec!["--Full".to_string()]));
        assert_eq!(config.timeout_secs, Some(12));
        assert_eq!(config.sequence_policy, Some(SequencePolicy::AllTracks));
    }

    #[test]
    fn test_missing_section_is_default() {
        let config = TomlConfigAdapter::parse("[other]\nkey = 1\n").unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_rejects_bad_content() {
        assert!(matches!(
            TomlConfigAdapter::parse("not = [valid"),
            Err(ProbeError::Config { .. })
        ));
        assert!(matches!(
            TomlConfigAdapter::parse("[mediaprobe]\ntimeout_secs = \"soon\"\n"),
            Err(ProbeError::Config { .. })
        ));
        assert!(matches!(
            TomlConfigAdapter::parse("[mediaprobe]\nbinary = \"mediainfo\"\n"),
            Err(ProbeError::Config { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[mediaprobe]\ntimeout_secs = 3").unwrap();

        let config = TomlConfigAdapter::load(file.path()).unwrap();
        assert_eq!(config.timeout_secs, Some(3));

        let err = TomlConfigAdapter::load(Path::new("/nonexistent/mediaprobe.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mediaprobe.toml"));
    }
}
