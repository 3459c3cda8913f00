// src/formula/source.rs

//! Source archive fetching and verification

use crate::client::Transport;
use crate::error::{Error, Result};
use crate::formula::format::Formula;
use crate::formula::parser::validate_formula;
use crate::hash::{hash_file, hash_reader, verify_file_sha256, Hash, HashAlgorithm, Hasher};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Chunk size for hashing while downloading
const STREAM_BUFFER_SIZE: usize = 8192;

/// Fetch a formula's source archive into `dest_dir` and check its digest
///
/// The formula is validated first, so a malformed digest fails before any
/// request is made. An archive already present with the right digest is
/// reused. A download that does not match is removed before returning
/// [`Error::ChecksumMismatch`].
pub fn verify_source(formula: &Formula, transport: &dyn Transport, dest_dir: &Path) -> Result<PathBuf> {
    for warning in validate_formula(formula)? {
        debug!("{}: {}", formula.name, warning);
    }

    fs::create_dir_all(dest_dir).map_err(|e| {
        Error::IoError(format!("Failed to create directory {}: {}", dest_dir.display(), e))
    })?;
    let dest_path = dest_dir.join(format!("{}-{}", formula.name, formula.archive_filename()));

    if dest_path.exists() {
        match verify_file_sha256(&dest_path, &formula.sha256) {
            Ok(()) => {
                info!("Reusing verified archive {}", dest_path.display());
                return Ok(dest_path);
            }
            Err(e) => warn!("Cached archive {} is stale ({}), downloading again", dest_path.display(), e),
        }
    }

    info!("Fetching {} from {}", formula.name, formula.url);
    let body = transport.open(&formula.url)?;
    let mut temp = NamedTempFile::new_in(dest_dir)
        .map_err(|e| Error::IoError(format!("Failed to create temporary file: {}", e)))?;
    let actual = copy_and_hash(body.reader, temp.as_file_mut())?;

    if !actual.value.eq_ignore_ascii_case(&formula.sha256) {
        // dropping the temp file deletes it
        return Err(Error::ChecksumMismatch {
            expected: formula.sha256.clone(),
            actual: actual.value,
        });
    }

    temp.persist(&dest_path).map_err(|e| {
        Error::IoError(format!("Failed to move archive to {}: {}", dest_path.display(), e.error))
    })?;
    debug!("Checksum verified: {}", formula.sha256);
    Ok(dest_path)
}

/// SHA-256 of a local file or of a remote archive
pub fn compute_digest(source: &str, transport: &dyn Transport) -> Result<Hash> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let mut body = transport.open(source)?;
        hash_reader(HashAlgorithm::Sha256, &mut body.reader)
            .map_err(|e| Error::DownloadError(format!("Failed to read {}: {}", source, e)))
    } else {
        hash_file(HashAlgorithm::Sha256, Path::new(source))
            .map_err(|e| Error::IoError(format!("Failed to read {}: {}", source, e)))
    }
}

fn copy_and_hash(mut reader: Box<dyn Read + Send>, file: &mut fs::File) -> Result<Hash> {
    let mut hasher = Hasher::new(HashAlgorithm::Sha256);
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];
    loop {
        let n = reader
            .read(&mut buffer)
            .map_err(|e| Error::DownloadError(format!("Failed to read response: {}", e)))?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        file.write_all(&buffer[..n])
            .map_err(|e| Error::IoError(format!("Failed to write data: {}", e)))?;
    }
    file.flush()
        .map_err(|e| Error::IoError(format!("Failed to flush archive: {}", e)))?;
    Ok(hasher.finalize())
}
