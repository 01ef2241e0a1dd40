use std::fmt::{self, Write as _};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};

use crate::catalog::{Catalog, split_rel_path};

const READ_BUFFER_SIZE: usize = 8192;

/// Hash algorithms available for file signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    #[default]
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
}

impl HashAlgorithm {
    pub const ALL: [Self; 6] = [
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512_224,
        Self::Sha512_256,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512_224 => "sha512_224",
            Self::Sha512_256 => "sha512_256",
        }
    }

    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|a| a.name()).collect()
    }

    /// Hex digest of an in-memory buffer.
    #[must_use]
    pub fn digest_bytes(self, content: &[u8]) -> String {
        match self {
            Self::Sha224 => to_hex(&Sha224::digest(content)),
            Self::Sha256 => to_hex(&Sha256::digest(content)),
            Self::Sha384 => to_hex(&Sha384::digest(content)),
            Self::Sha512 => to_hex(&Sha512::digest(content)),
            Self::Sha512_224 => to_hex(&Sha512_224::digest(content)),
            Self::Sha512_256 => to_hex(&Sha512_256::digest(content)),
        }
    }

    /// Hex digest of everything the reader yields, hashed through a fixed buffer.
    ///
    /// # Errors
    /// Returns any error raised by the reader.
    pub fn digest_reader<R: Read>(self, reader: R) -> std::io::Result<String> {
        match self {
            Self::Sha224 => stream_digest::<Sha224, R>(reader),
            Self::Sha256 => stream_digest::<Sha256, R>(reader),
            Self::Sha384 => stream_digest::<Sha384, R>(reader),
            Self::Sha512 => stream_digest::<Sha512, R>(reader),
            Self::Sha512_224 => stream_digest::<Sha512_224, R>(reader),
            Self::Sha512_256 => stream_digest::<Sha512_256, R>(reader),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown hash algorithm: {s} (expected one of {})",
                    Self::names().join(" | ")
                )
            })
    }
}

fn stream_digest<D: Digest, R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; READ_BUFFER_SIZE];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(to_hex(&hasher.finalize()))
}

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Computes live signatures for files under the root, or fetches the recorded
/// signature from a loaded catalog.
#[derive(Debug, Clone)]
pub struct SignatureProvider {
    root: PathBuf,
    algorithm: HashAlgorithm,
}

impl SignatureProvider {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, algorithm: HashAlgorithm) -> Self {
        Self {
            root: root.into(),
            algorithm,
        }
    }

    #[must_use]
    pub fn abs_path(&self, rel_path: &str) -> PathBuf {
        self.root.join(rel_path)
    }

    /// Signature of `rel_path`, either as recorded in `catalog` or computed from
    /// the file on disk.
    #[must_use]
    pub fn signature_of(
        &self,
        catalog: &Catalog,
        rel_path: &str,
        from_catalog: bool,
    ) -> Option<String> {
        if from_catalog {
            let (directory, file_name) = split_rel_path(rel_path);
            catalog
                .signature_of(&directory, &file_name)
                .map(ToString::to_string)
        } else {
            self.live_signature(rel_path)
        }
    }

    /// Hash the file content. An unreadable file is reported on the log and
    /// yields `None` so that the run carries on.
    #[must_use]
    pub fn live_signature(&self, rel_path: &str) -> Option<String> {
        let abs_path = self.abs_path(rel_path);
        match compute_file_signature(&abs_path, self.algorithm) {
            Ok(signature) => Some(signature),
            Err(e) => {
                tracing::warn!(
                    path = %abs_path.display(),
                    error = %e,
                    "error creating signature"
                );
                None
            }
        }
    }
}

/// Hash a file's content with the given algorithm.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub fn compute_file_signature(path: &Path, algorithm: HashAlgorithm) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let signature = algorithm.digest_reader(BufReader::new(file))?;
    Ok(signature.trim().to_ascii_lowercase())
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
