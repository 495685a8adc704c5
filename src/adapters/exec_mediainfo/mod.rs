//! MediaInfo execution adapter
//!
//! Spawns the MediaInfo CLI once per file and captures its JSON report.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config_initialization::ProbeConfig;
use crate::error::{ProbeError, ProbeResult};
use crate::ports::ProbeRunner;

/// Subprocess-backed probe runner
pub struct MediaInfoRunner {
    config: ProbeConfig,
}

impl MediaInfoRunner {
    /// Create new MediaInfo runner
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    fn build_command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.leading_args)
            .arg(&self.config.output_flag)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

/// Quote an argument for display if it contains whitespace
fn quote_for_display(arg: &str) -> String {
    if arg.chars().any(char::is_whitespace) {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}

#[async_trait]
impl ProbeRunner for MediaInfoRunner {
    async fn run(&self, path: &Path) -> ProbeResult<Vec<u8>> {
        let program = self.config.program.display().to_string();
        let child = self
            .build_command(path)
            .spawn()
            .map_err(|source| ProbeError::ToolLaunch {
                program: program.clone(),
                source,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(self.config.timeout, child.wait_with_output()).await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    program = %program,
                    path = %path.display(),
                    "MediaInfo timed out, killing process"
                );
                return Err(ProbeError::Timeout {
                    path: path.display().to_string(),
                    seconds: self.config.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            warn!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "MediaInfo exited unsuccessfully"
            );
        } else if !output.stderr.is_empty() {
            debug!(stderr = %String::from_utf8_lossy(&output.stderr).trim(), "MediaInfo stderr");
        }

        Ok(output.stdout)
    }

    fn describe(&self, path: &Path) -> String {
        let mut parts = vec![quote_for_display(&self.config.program.to_string_lossy())];
        parts.extend(self.config.leading_args.iter().map(|a| quote_for_display(a)));
        parts.push(quote_for_display(&self.config.output_flag));
        parts.push(quote_for_display(&path.to_string_lossy()));
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config(program: &str, leading_args: &[&str], timeout: Duration) -> ProbeConfig {
        ProbeConfig {
            program: PathBuf::from(program),
            leading_args: leading_args.iter().map(|a| a.to_string()).collect(),
            timeout,
            ..ProbeConfig::default()
        }
    }

    #[test]
    fn test_describe_quotes_paths_with_spaces() {
        let runner = MediaInfoRunner::new(ProbeConfig::default());
        assert_eq!(
            runner.describe(Path::new("/media/poster frame.tif")),
            "mediainfo --Output=JSON \"/media/poster frame.tif\""
        );
        assert_eq!(
            runner.describe(Path::new("/media/clip.mov")),
            "mediainfo --Output=JSON /media/clip.mov"
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_launch_error() {
        let runner = MediaInfoRunner::new(config(
            "/nonexistent/bin/mediainfo-missing",
            &[],
            Duration::from_secs(5),
        ));
        let err = runner.run(Path::new("/tmp")).await.unwrap_err();
        assert!(matches!(err, ProbeError::ToolLaunch { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_stdout_and_passes_path_as_one_argument() {
        // sh -c '<script>' <$0> <$1> <$2>: echo back the argument count and last argument
        let runner = MediaInfoRunner::new(config(
            "/bin/sh",
            &["-c", "printf '%s|%s' \"$#\" \"$2\"", "mediainfo"],
            Duration::from_secs(5),
        ));
        let out = runner.run(Path::new("/media/poster frame.tif")).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2|/media/poster frame.tif");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_still_returns_stdout() {
        let runner = MediaInfoRunner::new(config(
            "/bin/sh",
            &["-c", "printf partial; echo oops >&2; exit 3", "mediainfo"],
            Duration::from_secs(5),
        ));
        let out = runner.run(Path::new("/media/clip.mov")).await.unwrap();
        assert_eq!(out, b"partial".to_vec());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hung_tool_times_out() {
        let runner = MediaInfoRunner::new(config(
            "/bin/sh",
            &["-c", "sleep 30", "mediainfo"],
            Duration::from_millis(200),
        ));
        let started = std::time::Instant::now();
        let err = runner.run(Path::new("/media/clip.mov")).await.unwrap_err();
        assert!(matches!(err, ProbeError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
