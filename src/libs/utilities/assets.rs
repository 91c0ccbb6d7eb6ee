// Streams remote release files to disk.

use colored::Colorize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::libs::errors::{GodevError, Result};
use crate::log_debug;

const CHUNK_SIZE: usize = 64 * 1024;

/// Downloads `url` into `dest`, copying the body chunk by chunk so the archive is never
/// held in memory.
///
/// # Arguments
/// * `agent`: The shared HTTP agent.
/// * `url`: Full URL of the file.
/// * `dest`: File path to create (truncated if it exists).
///
/// # Returns
/// * `Ok(u64)` with the number of bytes written.
/// * `Err(GodevError::Network)` when the request or a body read fails.
/// * `Err(GodevError::Io)` when `dest` cannot be created or written.
pub fn download_file(agent: &ureq::Agent, url: &str, dest: &Path) -> Result<u64> {
    log_debug!("[Download] GET {}", url.blue());

    let response = agent.get(url).call().map_err(|e| GodevError::network(url, e))?;
    let mut reader = response.into_reader();
    let mut file = File::create(dest).map_err(|e| GodevError::io(dest, e))?;

    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut written: u64 = 0;
    loop {
        let read = reader.read(&mut buffer).map_err(|e| GodevError::network(url, e))?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read])
            .map_err(|e| GodevError::io(dest, e))?;
        written += read as u64;
    }
    file.flush().map_err(|e| GodevError::io(dest, e))?;

    log_debug!(
        "[Download] {} byte(s) saved to {}",
        written,
        dest.to_string_lossy().green()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::catalog::http_agent;
    use crate::test_support::{Route, serve};

    #[test]
    fn body_lands_on_disk() {
        let base = serve(vec![Route::ok("/go/blob.bin", b"0123456789".to_vec())]);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("blob.bin");

        let written = download_file(&http_agent(), &format!("{base}/go/blob.bin"), &dest).unwrap();

        assert_eq!(written, 10);
        assert_eq!(std::fs::read(&dest).unwrap(), b"0123456789");
    }

    #[test]
    fn http_error_status_is_a_network_error() {
        let base = serve(vec![]);
        let dir = tempfile::tempdir().unwrap();
        let err = download_file(&http_agent(), &format!("{base}/missing"), &dir.path().join("x")).unwrap_err();
        assert!(matches!(err, GodevError::Network { .. }), "{err:?}");
    }
}
