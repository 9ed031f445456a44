//! BLAKE3 hashing for produced artifacts

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::error::{self, Result};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path)
        .map_err(|e| error::fs::read_failed(path.display().to_string(), e.to_string()))?;

    let mut hasher = Hasher::new();
    update_from_reader(&mut hasher, BufReader::new(file), path)?;
    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

fn update_from_reader(hasher: &mut Hasher, mut reader: impl Read, path: &Path) -> Result<()> {
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| error::fs::read_failed(path.display().to_string(), e.to_string()))?;
        if bytes_read == 0 {
            return Ok(());
        }
        hasher.update(&buffer[..bytes_read]);
    }
}
