// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Fixture builders for unit tests

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub const TAG_DATE_TIME: u16 = 0x0132;
pub const TAG_EXIF_IFD_POINTER: u16 = 0x8769;
pub const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
pub const TAG_DATE_TIME_DIGITIZED: u16 = 0x9004;
pub const TAG_SUBSEC_TIME_ORIGINAL: u16 = 0x9291;

const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;

fn encode(format: ImageFormat, color: [u8; 3]) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb(color)));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

pub fn plain_jpeg() -> Vec<u8> {
    encode(ImageFormat::Jpeg, [200, 120, 40])
}

pub fn plain_png() -> Vec<u8> {
    encode(ImageFormat::Png, [10, 90, 250])
}

pub fn plain_bmp() -> Vec<u8> {
    encode(ImageFormat::Bmp, [0, 255, 0])
}

/// Little-endian TIFF block with ASCII tags in IFD0 and, when `exif_tags` is
/// non-empty, in an Exif sub-IFD linked from IFD0
pub fn exif_block(ifd0_tags: &[(u16, &str)], exif_tags: &[(u16, &str)]) -> Vec<u8> {
    let has_exif = !exif_tags.is_empty();
    let ifd_len = |entries: usize| 2 + 12 * entries + 4;

    let ifd0_offset = 8;
    let ifd0_len = ifd_len(ifd0_tags.len() + usize::from(has_exif));
    let exif_offset = ifd0_offset + ifd0_len;
    let exif_len = if has_exif { ifd_len(exif_tags.len()) } else { 0 };
    let data_base = exif_offset + exif_len;

    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&(ifd0_offset as u32).to_le_bytes());

    let mut data = Vec::new();
    let pointer = has_exif.then_some(exif_offset as u32);
    write_ifd(&mut out, &mut data, data_base, ifd0_tags, pointer);
    if has_exif {
        write_ifd(&mut out, &mut data, data_base, exif_tags, None);
    }
    assert_eq!(out.len(), data_base);

    out.extend_from_slice(&data);
    out
}

fn write_ifd(
    out: &mut Vec<u8>,
    data: &mut Vec<u8>,
    data_base: usize,
    tags: &[(u16, &str)],
    exif_pointer: Option<u32>,
) {
    let mut entries: Vec<(u16, u16, u32, [u8; 4])> = Vec::new();

    for &(tag, text) in tags {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        let count = bytes.len() as u32;

        let mut field = [0u8; 4];
        if bytes.len() <= 4 {
            field[..bytes.len()].copy_from_slice(&bytes);
        } else {
            field = ((data_base + data.len()) as u32).to_le_bytes();
            data.extend_from_slice(&bytes);
            if data.len() % 2 == 1 {
                data.push(0);
            }
        }
        entries.push((tag, TYPE_ASCII, count, field));
    }
    if let Some(offset) = exif_pointer {
        entries.push((TAG_EXIF_IFD_POINTER, TYPE_LONG, 1, offset.to_le_bytes()));
    }
    entries.sort_by_key(|entry| entry.0);

    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (tag, kind, count, field) in entries {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&field);
    }
    out.extend_from_slice(&0u32.to_le_bytes());
}

/// Small JPEG carrying `tiff` as its APP1 Exif segment
pub fn jpeg_with_exif(tiff: &[u8]) -> Vec<u8> {
    let encoded = plain_jpeg();
    assert_eq!(&encoded[..2], &[0xFF, 0xD8]);

    let segment_len = (2 + 6 + tiff.len()) as u16;
    let mut out = Vec::with_capacity(encoded.len() + tiff.len() + 10);
    out.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&encoded[2..]);
    out
}

/// Small JPEG carrying `packet` as its APP1 XMP segment
pub fn jpeg_with_xmp(packet: &str) -> Vec<u8> {
    const XMP_NAMESPACE: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";

    let encoded = plain_jpeg();
    let segment_len = (2 + XMP_NAMESPACE.len() + packet.len()) as u16;
    let mut out = Vec::with_capacity(encoded.len() + packet.len() + 40);
    out.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(XMP_NAMESPACE);
    out.extend_from_slice(packet.as_bytes());
    out.extend_from_slice(&encoded[2..]);
    out
}
