//! yt-dlp subprocess backend for audio fetch and transcode.

use std::path::Path;
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{FetchError, FetchResult};
use crate::{AUDIO_CODEC, AudioFetcher, FetchOptions};

/// Production [`AudioFetcher`] that shells out to yt-dlp.
///
/// yt-dlp performs the network retrieval and drives ffmpeg for the MP3
/// transcode; this backend only assembles the invocation and maps its exit
/// status. No retries and no timeout are imposed here: the fetch occupies the
/// calling task for the full duration of the download and transcode.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    program: String,
    options: FetchOptions,
}

impl YtDlpFetcher {
    /// Build a fetcher around the configured binary and fixed options.
    #[must_use]
    pub const fn new(program: String, options: FetchOptions) -> Self {
        Self { program, options }
    }

    fn build_args(options: &FetchOptions, url: &str, destination: &Path) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            options.format_selector.clone(),
            "-x".to_string(),
            "--audio-format".to_string(),
            AUDIO_CODEC.to_string(),
            "--audio-quality".to_string(),
            options.audio_quality.clone(),
            "--no-playlist".to_string(),
            "-o".to_string(),
            destination.display().to_string(),
        ];
        if options.quiet {
            args.push("--quiet".to_string());
            args.push("--no-warnings".to_string());
        }
        args.push(url.to_string());
        args
    }

    fn map_failure(program: &str, output: &Output) -> FetchError {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = stderr.trim();
        if message.is_empty() {
            FetchError::collaborator(format!("{program} exited with {}", output.status))
        } else {
            FetchError::collaborator(message)
        }
    }
}

#[async_trait]
impl AudioFetcher for YtDlpFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> FetchResult<()> {
        let args = Self::build_args(&self.options, url, destination);
        debug!(program = %self.program, url, destination = %destination.display(), "spawning fetch collaborator");

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| FetchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Self::map_failure(&self.program, &output))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn options() -> FetchOptions {
        FetchOptions {
            format_selector: "bestaudio/best".to_string(),
            audio_quality: "192K".to_string(),
            quiet: true,
        }
    }

    #[test]
    fn args_cover_selection_transcode_and_output() {
        let destination = PathBuf::from("/scratch/abc.mp3");
        let args = YtDlpFetcher::build_args(&options(), "https://example.com/v", &destination);

        let joined = args.join(" ");
        assert!(joined.contains("-f bestaudio/best"));
        assert!(joined.contains("-x --audio-format mp3 --audio-quality 192K"));
        assert!(joined.contains("-o /scratch/abc.mp3"));
        assert!(joined.contains("--quiet --no-warnings"));
        assert_eq!(args.last().map(String::as_str), Some("https://example.com/v"));
    }

    #[test]
    fn verbose_options_skip_quiet_flags() {
        let mut opts = options();
        opts.quiet = false;
        let args = YtDlpFetcher::build_args(&opts, "https://example.com/v", Path::new("/s/x.mp3"));
        assert!(!args.contains(&"--quiet".to_string()));
        assert!(!args.contains(&"--no-warnings".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn failure_mapping_prefers_stderr_text() {
        let output = Output {
            status: exit_status(1),
            stdout: Vec::new(),
            stderr: b"ERROR: unsupported URL\n".to_vec(),
        };
        let err = YtDlpFetcher::map_failure("yt-dlp", &output);
        assert_eq!(err.to_string(), "ERROR: unsupported URL");
    }

    #[cfg(unix)]
    #[test]
    fn failure_mapping_falls_back_to_exit_status() {
        let output = Output {
            status: exit_status(2),
            stdout: Vec::new(),
            stderr: Vec::new(),
        };
        let err = YtDlpFetcher::map_failure("yt-dlp", &output);
        assert!(err.to_string().starts_with("yt-dlp exited with"));
    }

    #[cfg(unix)]
    fn exit_status(code: i32) -> std::process::ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code << 8)
    }
}
