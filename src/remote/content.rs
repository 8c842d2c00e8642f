//! File content fetching
//!
//! Reads the whole remote file with `cat`. Paths with the archive suffix are
//! gunzipped locally. No size cap here; display truncation belongs to the
//! caller (see `browse::display::tail_for_display`).

use std::io::Read;

use flate2::read::GzDecoder;
use tracing::{debug, warn};

use super::command::RemoteCommand;
use crate::ssh::{CommandRunner, SshError};

/// Suffix of single-stream gzip archives
pub const ARCHIVE_SUFFIX: &str = ".gz";

/// The read command for `path`
pub fn read_command(path: &str) -> RemoteCommand {
    RemoteCommand::new("cat").arg("--").quoted(path)
}

pub fn is_archive(path: &str) -> bool {
    path.ends_with(ARCHIVE_SUFFIX)
}

/// Fetch the full content of `path`
///
/// Plain files come back byte-for-byte. Archives are decompressed in full;
/// a corrupt or truncated stream is a `Decompress` error, never partial data.
pub async fn read_file<R>(runner: &R, path: &str) -> Result<Vec<u8>, SshError>
where
    R: CommandRunner + ?Sized,
{
    let command = read_command(path);
    let output = runner.run(&command).await?;

    if !output.success() {
        let err = output.into_error(&command);
        warn!("Failed to read file {}: {}", path, err);
        return Err(err);
    }

    debug!("Read {} bytes from {}", output.stdout.len(), path);

    if is_archive(path) {
        let data = decompress_gzip(&output.stdout)?;
        debug!("Decompressed {} to {} bytes", path, data.len());
        return Ok(data);
    }

    Ok(output.stdout)
}

/// Decompress one gzip member completely
pub fn decompress_gzip(compressed: &[u8]) -> Result<Vec<u8>, SshError> {
    let mut decoder = GzDecoder::new(compressed);
    let mut data = Vec::new();
    decoder
        .read_to_end(&mut data)
        .map_err(|e| SshError::Decompress(format!("failed to decompress gzip data: {}", e)))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fake::ScriptedRunner;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_is_archive() {
        assert!(is_archive("/var/log/app/old.log.gz"));
        assert!(!is_archive("/var/log/app/current.log"));
        assert!(!is_archive("/var/log/app/gz"));
    }

    #[test]
    fn test_decompress_roundtrip() {
        assert_eq!(decompress_gzip(&gzip(b"hello\n")).unwrap(), b"hello\n");
    }

    #[test]
    fn test_truncated_archive_is_decompress_error() {
        let compressed = gzip(&b"line of log output\n".repeat(200));
        let truncated = &compressed[..compressed.len() / 2];
        assert!(decompress_gzip(truncated).unwrap_err().is_decompress());
    }

    #[test]
    fn test_garbage_archive_is_decompress_error() {
        let err = decompress_gzip(b"definitely not gzip").unwrap_err();
        assert!(err.is_decompress());
    }

    #[tokio::test]
    async fn test_plain_file_returned_verbatim() {
        let raw = b"2024-01-01 ERROR boom\n\xff\xfe binary tail".to_vec();
        let runner = ScriptedRunner::new().reply(0, raw.clone(), "");
        let data = read_file(&runner, "/var/log/app/a.log").await.unwrap();
        assert_eq!(data, raw);
        assert_eq!(runner.last_command(), "cat -- '/var/log/app/a.log'");
    }

    #[tokio::test]
    async fn test_archive_is_decompressed() {
        let runner = ScriptedRunner::new().reply(0, gzip(b"hello\n"), "");
        let data = read_file(&runner, "/var/log/app/old.log.gz").await.unwrap();
        assert_eq!(data, b"hello\n");
    }

    #[tokio::test]
    async fn test_corrupt_archive_is_not_a_command_error() {
        let runner = ScriptedRunner::new().reply(0, b"\x1f\x8b\x08\x00trunc".to_vec(), "");
        let err = read_file(&runner, "/var/log/app/old.log.gz").await.unwrap_err();
        assert!(err.is_decompress());
    }

    #[tokio::test]
    async fn test_remote_failure_is_command_error() {
        let runner = ScriptedRunner::new().reply(
            1,
            "",
            "cat: /var/log/app/secret.log: Permission denied\n",
        );
        let err = read_file(&runner, "/var/log/app/secret.log").await.unwrap_err();
        assert!(err.is_command());
        assert!(err.to_string().contains("Permission denied"));
    }
}
