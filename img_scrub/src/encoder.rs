//! Metadata-free JPEG re-encoding
//!
//! The source is decoded to pixels and encoded again with nothing but the
//! JFIF header attached, which is what removes EXIF, XMP, ICC and IPTC data.
//! Huffman tables are computed per image rather than taken from Annex K.
//! The output is staged in a temporary file next to the destination and
//! renamed over it only after the encoder finished.

use crate::config::Quality;
use crate::error::FileError;
use image::{ColorType, DynamicImage, ImageDecoder, ImageReader};
use jpeg_encoder::{ColorType as JpegColor, Encoder};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

const TEMP_PREFIX: &str = ".img-scrub-";
const TEMP_SUFFIX: &str = ".part";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub quality: Quality,
    pub auto_orient: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

/// Decode `src`, optionally applying its EXIF orientation.
pub fn decode(src: &Path, auto_orient: bool) -> Result<DynamicImage, FileError> {
    let reader = ImageReader::open(src)
        .map_err(FileError::Open)?
        .with_guessed_format()
        .map_err(FileError::Open)?;

    if !auto_orient {
        return reader.decode().map_err(FileError::Decode);
    }

    let mut decoder = reader.into_decoder().map_err(FileError::Decode)?;
    let orientation = decoder.orientation().map_err(FileError::Decode)?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(FileError::Decode)?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// JPEG carries 8-bit gray or 8-bit RGB; everything else is converted.
fn to_jpeg_compatible(img: DynamicImage) -> DynamicImage {
    match img.color() {
        ColorType::L8 | ColorType::Rgb8 => img,
        ColorType::La8 | ColorType::L16 | ColorType::La16 => DynamicImage::ImageLuma8(img.to_luma8()),
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}

/// Encode `img` as JPEG into `writer` with optimised Huffman tables and no
/// metadata segments.
pub fn encode_jpeg<W: Write>(img: &DynamicImage, quality: Quality, writer: W) -> Result<(), FileError> {
    let too_large = || FileError::TooLarge {
        width: img.width(),
        height: img.height(),
    };
    let width = u16::try_from(img.width()).map_err(|_| too_large())?;
    let height = u16::try_from(img.height()).map_err(|_| too_large())?;

    let mut encoder = Encoder::new(writer, quality.value());
    encoder.set_optimized_huffman_tables(true);

    match img {
        DynamicImage::ImageLuma8(buf) => encoder.encode(buf.as_raw(), width, height, JpegColor::Luma),
        DynamicImage::ImageRgb8(buf) => encoder.encode(buf.as_raw(), width, height, JpegColor::Rgb),
        other => encoder.encode(other.to_rgb8().as_raw(), width, height, JpegColor::Rgb),
    }
    .map_err(FileError::Encode)
}

fn temp_file_in(dir: &Path) -> std::io::Result<tempfile::NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_PREFIX).suffix(TEMP_SUFFIX);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }
    builder.tempfile_in(dir)
}

/// Re-encode `src` into `dst`. An existing `dst` is replaced; on failure it
/// is left untouched and no partial file remains.
pub fn reencode_file(src: &Path, dst: &Path, options: &EncodeOptions) -> Result<EncodeStats, FileError> {
    let input_bytes = fs::metadata(src).map_err(FileError::Open)?.len();

    let img = to_jpeg_compatible(decode(src, options.auto_orient)?);
    debug!(
        file = %src.display(),
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "Decoded"
    );

    let dir = dst.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut tmp = temp_file_in(dir).map_err(FileError::Write)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        encode_jpeg(&img, options.quality, &mut writer)?;
        writer.flush().map_err(FileError::Write)?;
    }
    tmp.as_file().sync_all().map_err(FileError::Write)?;
    let output_bytes = tmp.as_file().metadata().map_err(FileError::Write)?.len();

    tmp.persist(dst).map_err(|e| FileError::Persist(e.error))?;

    Ok(EncodeStats {
        input_bytes,
        output_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        huffman_tables, jpeg_with_metadata, read_metadata_kinds, write_jpeg_with_metadata,
    };
    use image::{GenericImageView, ImageBuffer, Rgb, RgbImage, Rgba};

    // ITU-T T.81 Annex K.3 table K.3, luminance DC code lengths
    const ANNEX_K_LUMA_DC_BITS: [u8; 16] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
    // table K.5, luminance AC code lengths
    const ANNEX_K_LUMA_AC_BITS: [u8; 16] = [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 0x7D];

    fn smooth_source(width: u32, height: u32) -> RgbImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, ((x + y) * 2) as u8])
        })
    }

    fn mean_abs_error(a: &RgbImage, b: &RgbImage) -> f64 {
        assert_eq!(a.dimensions(), b.dimensions());
        let total: u64 = a
            .as_raw()
            .iter()
            .zip(b.as_raw())
            .map(|(&x, &y)| (x as i16 - y as i16).unsigned_abs() as u64)
            .sum();
        total as f64 / a.as_raw().len() as f64
    }

    fn options(quality: u8) -> EncodeOptions {
        EncodeOptions {
            quality: Quality::new(quality as i64).unwrap(),
            auto_orient: false,
        }
    }

    #[test]
    fn test_output_has_no_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.jpg");
        let dst = dir.path().join("dst.jpg");
        write_jpeg_with_metadata(&src, 48, 32, None);
        assert!(!read_metadata_kinds(&src).is_empty(), "fixture must carry metadata");

        let stats = reencode_file(&src, &dst, &options(85)).unwrap();

        assert!(read_metadata_kinds(&dst).is_empty());
        assert_eq!(stats.output_bytes, fs::metadata(&dst).unwrap().len());
        assert_eq!(stats.input_bytes, fs::metadata(&src).unwrap().len());
        assert_eq!(image::open(&dst).unwrap().dimensions(), (48, 32));
    }

    #[test]
    fn test_huffman_tables_are_optimised() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.jpg");
        let dst = dir.path().join("dst.jpg");
        write_jpeg_with_metadata(&src, 64, 64, None);

        reencode_file(&src, &dst, &options(85)).unwrap();

        let tables = huffman_tables(&fs::read(&dst).unwrap());
        let luma_dc = tables.iter().find(|(id, _)| *id == 0x00).expect("luma DC table");
        let luma_ac = tables.iter().find(|(id, _)| *id == 0x10).expect("luma AC table");
        assert_ne!(luma_dc.1, ANNEX_K_LUMA_DC_BITS, "luma DC table is the Annex K default");
        assert_ne!(luma_ac.1, ANNEX_K_LUMA_AC_BITS, "luma AC table is the Annex K default");
    }

    #[test]
    fn test_output_pixels_close_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("gradient.png");
        let source = smooth_source(64, 48);
        source.save_with_format(&src, image::ImageFormat::Png).unwrap();

        let mut errors = Vec::new();
        for q in [10u8, 85] {
            let dst = dir.path().join(format!("q{}.jpg", q));
            reencode_file(&src, &dst, &options(q)).unwrap();
            let decoded = image::open(&dst).unwrap().to_rgb8();
            errors.push(mean_abs_error(&source, &decoded));
        }

        assert!(errors[1] < 4.0, "q85 mean abs error too high: {:.2}", errors[1]);
        assert!(errors[0] > errors[1], "q10 should lose more detail: {:?}", errors);
    }

    #[test]
    fn test_quality_monotonic_size() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.jpg");
        fs::write(&src, jpeg_with_metadata(96, 96, None)).unwrap();

        let mut sizes = Vec::new();
        for q in [10u8, 50, 85, 100] {
            let dst = dir.path().join(format!("q{}.jpg", q));
            sizes.push(reencode_file(&src, &dst, &options(q)).unwrap().output_bytes);
        }
        assert!(
            sizes.windows(2).all(|w| w[0] <= w[1]),
            "sizes should not shrink as quality rises: {:?}",
            sizes
        );
    }

    #[test]
    fn test_reencode_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.jpg");
        write_jpeg_with_metadata(&src, 40, 40, None);
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");

        reencode_file(&src, &a, &options(70)).unwrap();
        reencode_file(&src, &b, &options(70)).unwrap();
        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }

    #[test]
    fn test_failed_decode_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("broken.jpg");
        fs::write(&src, b"definitely not a jpeg").unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        let dst = out.join("broken.jpg");

        let err = reencode_file(&src, &dst, &options(85)).unwrap_err();
        assert!(matches!(err, FileError::Decode(_)), "got {:?}", err);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_existing_output_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.jpg");
        write_jpeg_with_metadata(&src, 16, 16, None);
        let dst = dir.path().join("dst.jpg");
        fs::write(&dst, b"stale").unwrap();

        reencode_file(&src, &dst, &options(85)).unwrap();
        assert_ne!(fs::read(&dst).unwrap(), b"stale");
        assert!(image::open(&dst).is_ok());
    }

    #[test]
    fn test_alpha_source_is_flattened_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        // A PNG under a .jpg name: content sniffing picks the PNG decoder.
        let src = dir.path().join("really_png.jpg");
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_fn(8, 8, |x, y| Rgba([x as u8 * 30, y as u8 * 30, 90, 128]));
        img.save_with_format(&src, image::ImageFormat::Png).unwrap();
        let dst = dir.path().join("out.jpg");

        reencode_file(&src, &dst, &options(85)).unwrap();
        let decoded = image::open(&dst).unwrap();
        assert_eq!(decoded.color(), ColorType::Rgb8);
        assert_eq!(&fs::read(&dst).unwrap()[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_auto_orient_rotates_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("rotated.jpg");
        // orientation 6: stored landscape, displayed rotated 90° clockwise
        write_jpeg_with_metadata(&src, 32, 16, Some(6));
        let plain = dir.path().join("plain.jpg");
        let oriented = dir.path().join("oriented.jpg");

        reencode_file(&src, &plain, &options(85)).unwrap();
        let auto = EncodeOptions {
            auto_orient: true,
            ..options(85)
        };
        reencode_file(&src, &oriented, &auto).unwrap();

        assert_eq!(image::open(&plain).unwrap().dimensions(), (32, 16));
        assert_eq!(image::open(&oriented).unwrap().dimensions(), (16, 32));
        assert!(read_metadata_kinds(&oriented).is_empty());
    }
}
