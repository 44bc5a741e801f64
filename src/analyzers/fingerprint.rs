// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Content fingerprints for duplicate detection

use std::fs::File;
use std::path::Path;

use crate::Result;

/// BLAKE3 hex digest of the file content
///
/// The file is streamed through the hasher; the digest equals hashing the
/// whole content at once. Names and timestamps play no part.
pub fn fingerprint(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize().to_hex().to_string())
}
