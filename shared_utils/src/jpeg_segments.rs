//! JPEG Marker Segment Scanner
//!
//! Walks the marker segments of a JPEG header (everything before the first
//! SOS) and classifies the ones that carry metadata. Entropy-coded data is
//! never read.

use serde::Serialize;
use std::fmt;

const MARKER_SOI: u8 = 0xD8;
const MARKER_EOI: u8 = 0xD9;
const MARKER_SOS: u8 = 0xDA;
const MARKER_TEM: u8 = 0x01;
const MARKER_APP0: u8 = 0xE0;
const MARKER_APP1: u8 = 0xE1;
const MARKER_APP2: u8 = 0xE2;
const MARKER_APP13: u8 = 0xED;
const MARKER_APP14: u8 = 0xEE;
const MARKER_APP15: u8 = 0xEF;
const MARKER_COM: u8 = 0xFE;

const EXIF_SIGNATURE: &[u8] = b"Exif\0";
const XMP_SIGNATURE: &[u8] = b"http://ns.adobe.com/xap/1.0/";
const XMP_EXT_SIGNATURE: &[u8] = b"http://ns.adobe.com/xmp/extension/";
const ICC_SIGNATURE: &[u8] = b"ICC_PROFILE\0";
const PHOTOSHOP_SIGNATURE: &[u8] = b"Photoshop 3.0\0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// APP0 JFIF/JFXX header (structural)
    Jfif,
    /// APP14 Adobe color transform (structural)
    Adobe,
    Exif,
    Xmp,
    Icc,
    Iptc,
    Comment,
    /// Any other APPn payload
    App(u8),
    /// Non-APP marker segment (DQT, SOFn, DHT, ...)
    Structural(u8),
}

impl SegmentKind {
    /// True for segments that carry metadata rather than decoding data.
    pub fn is_metadata(&self) -> bool {
        !matches!(
            self,
            SegmentKind::Jfif | SegmentKind::Adobe | SegmentKind::Structural(_)
        )
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKind::Jfif => write!(f, "JFIF"),
            SegmentKind::Adobe => write!(f, "Adobe"),
            SegmentKind::Exif => write!(f, "EXIF"),
            SegmentKind::Xmp => write!(f, "XMP"),
            SegmentKind::Icc => write!(f, "ICC"),
            SegmentKind::Iptc => write!(f, "IPTC"),
            SegmentKind::Comment => write!(f, "COM"),
            SegmentKind::App(n) => write!(f, "APP{}", n),
            SegmentKind::Structural(marker) => write!(f, "0xFF{:02X}", marker),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JpegSegment {
    pub marker: u8,
    /// Byte offset of the 0xFF that starts the marker
    pub offset: usize,
    /// Segment length as stored (includes the two length bytes)
    pub length: usize,
    pub kind: SegmentKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentError {
    NotJpeg,
    Truncated { offset: usize },
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentError::NotJpeg => write!(f, "not a JPEG file (missing SOI marker)"),
            SegmentError::Truncated { offset } => {
                write!(f, "JPEG header truncated at byte {}", offset)
            }
        }
    }
}

impl std::error::Error for SegmentError {}

fn classify(marker: u8, payload: &[u8]) -> SegmentKind {
    match marker {
        MARKER_APP0 if payload.starts_with(b"JFIF\0") || payload.starts_with(b"JFXX\0") => {
            SegmentKind::Jfif
        }
        MARKER_APP1 if payload.starts_with(EXIF_SIGNATURE) => SegmentKind::Exif,
        MARKER_APP1
            if payload.starts_with(XMP_SIGNATURE) || payload.starts_with(XMP_EXT_SIGNATURE) =>
        {
            SegmentKind::Xmp
        }
        MARKER_APP2 if payload.starts_with(ICC_SIGNATURE) => SegmentKind::Icc,
        MARKER_APP13 if payload.starts_with(PHOTOSHOP_SIGNATURE) => SegmentKind::Iptc,
        MARKER_APP14 if payload.starts_with(b"Adobe") => SegmentKind::Adobe,
        MARKER_COM => SegmentKind::Comment,
        MARKER_APP0..=MARKER_APP15 => SegmentKind::App(marker - MARKER_APP0),
        _ => SegmentKind::Structural(marker),
    }
}

/// List every marker segment from SOI up to and including the first SOS.
pub fn scan_segments(data: &[u8]) -> Result<Vec<JpegSegment>, SegmentError> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != MARKER_SOI {
        return Err(SegmentError::NotJpeg);
    }

    let mut segments = Vec::new();
    let mut pos = 2;

    while pos < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let offset = pos;

        // fill bytes
        while pos < data.len() && data[pos] == 0xFF {
            pos += 1;
        }
        if pos >= data.len() {
            break;
        }

        let marker = data[pos];
        pos += 1;

        if marker == MARKER_SOI || marker == MARKER_TEM || (0xD0..=0xD7).contains(&marker) {
            continue;
        }
        if marker == MARKER_EOI {
            break;
        }

        if pos + 2 > data.len() {
            return Err(SegmentError::Truncated { offset });
        }
        let length = ((data[pos] as usize) << 8) | (data[pos + 1] as usize);
        if length < 2 || pos + length > data.len() {
            return Err(SegmentError::Truncated { offset });
        }

        let payload = &data[pos + 2..pos + length];
        segments.push(JpegSegment {
            marker,
            offset,
            length,
            kind: classify(marker, payload),
        });

        pos += length;

        if marker == MARKER_SOS {
            break;
        }
    }

    Ok(segments)
}

/// Only the segments that carry metadata.
pub fn metadata_segments(data: &[u8]) -> Result<Vec<JpegSegment>, SegmentError> {
    Ok(scan_segments(data)?
        .into_iter()
        .filter(|s| s.kind.is_metadata())
        .collect())
}
