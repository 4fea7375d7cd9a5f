//! Keypair files: the 32-byte private seed, hex encoded, on one line.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tipy_crypto::keypair_from_private;
use tipy_types::{KeyPair, PrivateKey};
use zeroize::Zeroizing;

#[derive(Debug, Error)]
pub enum KeyfileError {
    #[error("cannot access keypair file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("keypair file {0} already exists")]
    Exists(PathBuf),

    #[error("keypair file {0} does not hold a 32-byte hex seed")]
    Malformed(PathBuf),
}

pub fn read_keypair(path: &Path) -> Result<KeyPair, KeyfileError> {
    let text = Zeroizing::new(fs::read_to_string(path).map_err(|source| KeyfileError::Io {
        path: path.to_path_buf(),
        source,
    })?);
    let mut seed = [0u8; 32];
    hex::decode_to_slice(text.trim(), &mut seed).map_err(|_| KeyfileError::Malformed(path.to_path_buf()))?;
    Ok(keypair_from_private(PrivateKey(seed)))
}

/// Write `keypair`'s seed to a new file. Refuses to replace an existing one
/// unless `overwrite` is set.
pub fn write_keypair(path: &Path, keypair: &KeyPair, overwrite: bool) -> Result<(), KeyfileError> {
    let io = |source: std::io::Error| KeyfileError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut options = fs::OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let mut file = options.open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            KeyfileError::Exists(path.to_path_buf())
        } else {
            io(e)
        }
    })?;
    let encoded = Zeroizing::new(hex::encode(keypair.private.0));
    writeln!(file, "{}", encoded.as_str()).map_err(io)?;
    Ok(())
}
