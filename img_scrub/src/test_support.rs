//! Fixtures for tests: JPEGs that carry EXIF, XMP and a comment.

use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb};
use shared_utils::{metadata_segments, SegmentKind};
use std::fs;
use std::path::Path;

fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let len = payload.len() + 2;
    let mut out = vec![0xFF, marker, (len >> 8) as u8, (len & 0xFF) as u8];
    out.extend_from_slice(payload);
    out
}

/// Little-endian TIFF block with IFD0 holding at most an Orientation entry.
fn exif_payload(orientation: Option<u16>) -> Vec<u8> {
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(b"II*\0");
    payload.extend_from_slice(&8u32.to_le_bytes());
    match orientation {
        Some(value) => {
            payload.extend_from_slice(&1u16.to_le_bytes());
            payload.extend_from_slice(&0x0112u16.to_le_bytes());
            payload.extend_from_slice(&3u16.to_le_bytes()); // SHORT
            payload.extend_from_slice(&1u32.to_le_bytes());
            payload.extend_from_slice(&value.to_le_bytes());
            payload.extend_from_slice(&[0, 0]);
        }
        None => payload.extend_from_slice(&0u16.to_le_bytes()),
    }
    payload.extend_from_slice(&0u32.to_le_bytes());
    payload
}

/// Encode a textured test image and splice metadata segments after SOI.
pub fn jpeg_with_metadata(width: u32, height: u32, orientation: Option<u16>) -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 7) ^ (y * 13)) as u8,
            ((x * y) % 251) as u8,
            ((x + y) * 3) as u8,
        ])
    });

    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, 95)
        .encode_image(&img)
        .expect("fixture encode");

    let mut out = encoded[..2].to_vec();
    out.extend(segment(0xE1, &exif_payload(orientation)));
    out.extend(segment(
        0xE1,
        b"http://ns.adobe.com/xap/1.0/\0<x:xmpmeta xmlns:x=\"adobe:ns:meta/\"/>",
    ));
    out.extend(segment(0xFE, b"GPS 59.3293N 18.0686E"));
    out.extend_from_slice(&encoded[2..]);
    out
}

pub fn write_jpeg_with_metadata(path: &Path, width: u32, height: u32, orientation: Option<u16>) {
    fs::write(path, jpeg_with_metadata(width, height, orientation)).expect("fixture write");
}

pub fn read_metadata_kinds(path: &Path) -> Vec<SegmentKind> {
    let data = fs::read(path).expect("fixture read");
    metadata_segments(&data)
        .expect("valid JPEG header")
        .into_iter()
        .map(|s| s.kind)
        .collect()
}

/// `(Tc << 4 | Th, BITS)` for every Huffman table defined in the header.
pub fn huffman_tables(data: &[u8]) -> Vec<(u8, [u8; 16])> {
    let segments = shared_utils::scan_segments(data).expect("valid JPEG header");
    let mut tables = Vec::new();
    for seg in segments.iter().filter(|s| s.marker == 0xC4) {
        let payload = &data[seg.offset + 4..seg.offset + 2 + seg.length];
        let mut pos = 0;
        while pos + 17 <= payload.len() {
            let mut bits = [0u8; 16];
            bits.copy_from_slice(&payload[pos + 1..pos + 17]);
            tables.push((payload[pos], bits));
            pos += 17 + bits.iter().map(|&b| b as usize).sum::<usize>();
        }
    }
    tables
}
