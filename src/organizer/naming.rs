// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Destination filenames for moved files

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Length of the random prefix
pub const PREFIX_LEN: usize = 3;
/// Number of trailing sanitized path characters kept
pub const SUFFIX_LEN: usize = 61;

/// Source of the random characters that keep moved filenames apart
pub trait UniquenessSource: Send + Sync {
    /// `len` lowercase ASCII alphanumeric characters
    fn random_chars(&self, len: usize) -> String;
}

/// Thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPrefix;

impl UniquenessSource for RandomPrefix {
    fn random_chars(&self, len: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect()
    }
}

/// Deterministic prefixes (`000`, `001`, ...) for tests and reproducible runs
#[derive(Debug, Default)]
pub struct SequentialPrefix {
    next: AtomicUsize,
}

impl UniquenessSource for SequentialPrefix {
    fn random_chars(&self, len: usize) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let digits = format!("{:0width$}", n, width = len);
        digits[digits.len() - len..].to_string()
    }
}

/// Replace every run of characters outside `[A-Za-z0-9.]` with one hyphen
pub fn sanitize(subject: &str) -> String {
    let mut out = String::with_capacity(subject.len());
    let mut in_run = false;

    for c in subject.chars() {
        if c.is_ascii_alphanumeric() || c == '.' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    out
}

/// Flatten a source path into a destination filename: random prefix plus the
/// last 61 characters of the sanitized full path
pub fn simple_filename(path: &Path, source: &dyn UniquenessSource) -> String {
    let sanitized = sanitize(&path.to_string_lossy());
    // Sanitized output is pure ASCII, so byte offsets are char offsets.
    let tail = &sanitized[sanitized.len().saturating_sub(SUFFIX_LEN)..];
    format!("{}{}", source.random_chars(PREFIX_LEN), tail)
}
