// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Image probing, capture-date extraction and format conversion

use exif::{In, Reader, Tag, Value};
use image::{ImageFormat, ImageReader};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::Result;

/// Year written by some cameras with an unset clock
pub const BAD_YEAR: &str = "0000";

/// Date-like metadata fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    /// When the photo was actually taken
    DateTimeOriginal,
    /// Same as above, with sub-second precision appended
    SubsecDateTimeOriginal,
    /// When the image was digitized (scanned film, for instance)
    DateTimeDigitized,
    /// Last modification of the file, not necessarily creation
    DateTime,
    /// XMP create date
    CreateDate,
    /// XMP modify date
    ModifyDate,
    /// Date from GPS metadata (UTC)
    GpsDateStamp,
}

impl DateField {
    /// Most authoritative first
    pub const PRIORITY: [DateField; 7] = [
        DateField::DateTimeOriginal,
        DateField::SubsecDateTimeOriginal,
        DateField::DateTimeDigitized,
        DateField::DateTime,
        DateField::CreateDate,
        DateField::ModifyDate,
        DateField::GpsDateStamp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DateField::DateTimeOriginal => "DateTimeOriginal",
            DateField::SubsecDateTimeOriginal => "SubsecDateTimeOriginal",
            DateField::DateTimeDigitized => "DateTimeDigitized",
            DateField::DateTime => "DateTime",
            DateField::CreateDate => "CreateDate",
            DateField::ModifyDate => "ModifyDate",
            DateField::GpsDateStamp => "GPSDateStamp",
        }
    }
}

/// Raw date values found in a file's embedded metadata
#[derive(Debug, Clone, Default)]
pub struct DateTags {
    values: HashMap<DateField, String>,
}

impl DateTags {
    pub fn insert(&mut self, field: DateField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: DateField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First field present in priority order, regardless of which date is
    /// the most recent
    pub fn first_by_priority(&self) -> Option<(DateField, &str)> {
        DateField::PRIORITY
            .iter()
            .find_map(|&field| self.get(field).map(|value| (field, value)))
    }
}

/// Check whether the decoder recognises the file and can read its header
pub fn is_openable_image(path: &Path) -> bool {
    let reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(e) => {
            debug!("Cannot open {:?}: {}", path, e);
            return false;
        }
    };

    match reader.into_dimensions() {
        Ok(_) => true,
        Err(e) => {
            debug!("Cannot decode {:?}: {}", path, e);
            false
        }
    }
}

/// Capture year of an image, if its metadata carries one
///
/// Files the decoder cannot open, files without date tags and files whose
/// most authoritative date has year `0000` all yield `None`.
pub fn extract_year(path: &Path) -> Option<String> {
    if !is_openable_image(path) {
        return None;
    }

    let tags = read_date_tags(path);
    if tags.is_empty() {
        return None;
    }

    let (field, raw) = tags.first_by_priority()?;
    debug!("{:?}: {} = {:?}", path, field.name(), raw);
    year_from_date(raw)
}

/// Year component of a raw metadata date
///
/// EXIF dates look like `2021:05:03 10:00:00`, XMP dates like
/// `2021-05-03T10:00:00`; the year is whatever precedes the first separator.
pub fn year_from_date(raw: &str) -> Option<String> {
    let year = raw
        .trim()
        .split(|c: char| matches!(c, ':' | '-' | 'T' | ' '))
        .next()
        .unwrap_or_default();

    if year == BAD_YEAR {
        info!("Bad year {:?}", raw);
        return None;
    }
    if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
        debug!("Unusable date {:?}", raw);
        return None;
    }
    Some(year.to_string())
}

/// Collect every date field present in the file's EXIF and XMP metadata
pub fn read_date_tags(path: &Path) -> DateTags {
    let mut tags = DateTags::default();

    match read_exif(path) {
        Ok(exif) => {
            let original = ascii_field(&exif, Tag::DateTimeOriginal);
            let subsec = ascii_field(&exif, Tag::SubSecTimeOriginal);

            if let (Some(original), Some(subsec)) = (&original, &subsec) {
                tags.insert(
                    DateField::SubsecDateTimeOriginal,
                    format!("{}.{}", original, subsec),
                );
            }
            if let Some(original) = original {
                tags.insert(DateField::DateTimeOriginal, original);
            }
            if let Some(value) = ascii_field(&exif, Tag::DateTimeDigitized) {
                tags.insert(DateField::DateTimeDigitized, value);
            }
            if let Some(value) = ascii_field(&exif, Tag::DateTime) {
                tags.insert(DateField::DateTime, value);
            }
            if let Some(value) = ascii_field(&exif, Tag::GPSDateStamp) {
                tags.insert(DateField::GpsDateStamp, value);
            }
        }
        Err(e) => debug!("No EXIF in {:?}: {}", path, e),
    }

    match std::fs::read(path) {
        Ok(data) => {
            if let Some(value) = xmp_property(&data, "CreateDate") {
                tags.insert(DateField::CreateDate, value);
            }
            if let Some(value) = xmp_property(&data, "ModifyDate") {
                tags.insert(DateField::ModifyDate, value);
            }
        }
        Err(e) => debug!("Cannot read {:?} for XMP: {}", path, e),
    }

    tags
}

fn read_exif(path: &Path) -> std::result::Result<exif::Exif, exif::Error> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    Reader::new().read_from_container(&mut reader)
}

/// ASCII value of a primary-image tag (sub-IFDs included); an empty value
/// still counts as present
fn ascii_field(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(parts) => Some(
            parts
                .first()
                .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
                .unwrap_or_default(),
        ),
        _ => None,
    }
}

/// Value of an `xmp:<name>` property, in attribute or element form
fn xmp_property(data: &[u8], name: &str) -> Option<String> {
    let needle = format!("xmp:{}", name);
    let needle = needle.as_bytes();
    let pos = data.windows(needle.len()).position(|w| w == needle)?;
    let rest = &data[pos + needle.len()..];

    let value = match rest.first()? {
        b'=' => {
            let quote = *rest.get(1)?;
            if quote != b'"' && quote != b'\'' {
                return None;
            }
            let body = &rest[2..];
            &body[..body.iter().position(|&b| b == quote)?]
        }
        b'>' => {
            let body = &rest[1..];
            &body[..body.iter().position(|&b| b == b'<')?]
        }
        _ => return None,
    };

    let value = std::str::from_utf8(value).ok()?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Re-encode an image as PNG next to the original, as `<path>.png`
pub fn convert_to_png(path: &Path) -> Result<PathBuf> {
    let img = image::open(path)?;

    let mut target = path.as_os_str().to_owned();
    target.push(".png");
    let target = PathBuf::from(target);

    img.save_with_format(&target, ImageFormat::Png)?;
    Ok(target)
}
