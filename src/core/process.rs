//! Process execution helpers for the external tools (yt-dlp, ffmpeg)
//!
//! No timeout is applied: the backends own their network timeouts.

use std::io;
use std::process::Output;
use tokio::process::Command;

/// Runs `cmd` to completion and captures stdout/stderr.
///
/// A missing executable is reported with the program name so the user can
/// fix `YTDL_BIN`/`FFMPEG_BIN` instead of reading a bare "No such file".
pub async fn run_captured(cmd: &mut Command, program: &str) -> io::Result<Output> {
    cmd.kill_on_drop(true).output().await.map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            io::Error::new(io::ErrorKind::NotFound, format!("{} executable not found in PATH", program))
        } else {
            e
        }
    })
}

/// Picks the most useful line out of a failing tool's stderr.
///
/// yt-dlp prefixes fatal messages with `ERROR:`; the last such line wins.
/// Otherwise the last non-empty line is used.
pub fn summarize_stderr(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.trim_start_matches("ERROR:").trim().to_string())
        .unwrap_or_else(|| "no error output".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_stderr_prefers_error_line() {
        let stderr = b"WARNING: something odd\nERROR: [youtube] abc: Video unavailable\n[debug] trailing\n";
        assert_eq!(summarize_stderr(stderr), "[youtube] abc: Video unavailable");
    }

    #[test]
    fn test_summarize_stderr_falls_back_to_last_line() {
        assert_eq!(summarize_stderr(b"first\nsecond\n\n"), "second");
        assert_eq!(summarize_stderr(b""), "no error output");
    }

    #[tokio::test]
    async fn test_run_captured_missing_program() {
        let mut cmd = Command::new("definitely-not-a-real-binary-4242");
        let err = run_captured(&mut cmd, "definitely-not-a-real-binary-4242")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("not found"));
    }
}
