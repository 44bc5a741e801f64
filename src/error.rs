// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for photosift

use thiserror::Error;

/// Result type alias for photosift operations
pub type Result<T> = std::result::Result<T, PhotosiftError>;

/// photosift error types
#[derive(Error, Debug)]
pub enum PhotosiftError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid category: {0:?}")]
    InvalidCategory(String),

    #[error("Not a pending file under the input directory: {0:?}")]
    NotPending(std::path::PathBuf),

    #[error("Move lock poisoned")]
    LockPoisoned,
}
