// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! File analyzers: MIME guessing, image probing, fingerprints and capture dates

pub mod fingerprint;
pub mod image;

use std::path::Path;

pub use self::fingerprint::fingerprint;
pub use self::image::{convert_to_png, extract_year, is_openable_image};

/// MIME category prefix shared by every image type
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Guess a MIME type from the file extension alone
///
/// Content is not sniffed here; a `.txt` holding JPEG bytes is still not an
/// image by this measure.
pub fn guess_mime(path: &Path) -> Option<&'static str> {
    ::image::ImageFormat::from_path(path)
        .ok()
        .map(|format| format.to_mime_type())
}

/// Check whether the extension's MIME type matches `mime_type` exactly
pub fn is_mime_type(mime_type: &str, path: &Path) -> bool {
    guess_mime(path) == Some(mime_type)
}

/// A file counts as an image when its extension says so AND the decoder can
/// open it. Misleading content behind an image extension is fine as long as
/// the decoder recognises it.
pub fn is_image(path: &Path) -> bool {
    match guess_mime(path) {
        Some(mime) if mime.starts_with(IMAGE_MIME_PREFIX) => is_openable_image(path),
        _ => false,
    }
}
