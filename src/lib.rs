// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! photosift: photo triage
//!
//! Deduplicates a directory tree of files, sorts images into folders by
//! capture year, sets non-images aside, and serves a one-file-at-a-time
//! review page for whatever is left.

pub mod analyzers;
pub mod config;
pub mod error;
pub mod organizer;
pub mod review;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::AppConfig;
pub use error::{PhotosiftError, Result};
pub use organizer::Organizer;
