//! Strip-by-re-encode.
//!
//! The image is fully decoded to pixels and a fresh container of the same
//! format is serialized from them. The fresh container carries no ancillary
//! metadata — nothing is removed field by field. Verification re-decodes
//! the new bytes and counts what the EXIF reader still finds.

use anyhow::{Context, Result};
use image::ImageFormat;
use std::io::Cursor;

use crate::pipeline::ImageKind;

use super::reader;

/// Fixed JPEG re-encode quality (the canvas quality of 0.92).
pub const JPEG_QUALITY: u8 = 92;

/// The re-encode seam. The codec behind it is swappable without touching
/// the field-interpretation logic.
pub trait Reencode {
    /// Decode `bytes` to a pixel buffer and serialize a fresh image of the
    /// same kind and dimensions.
    fn reencode(&self, bytes: &[u8], kind: ImageKind) -> Result<Vec<u8>>;
}

/// Re-encoder backed by the `image` crate codecs.
#[derive(Debug, Clone, Copy)]
pub struct PixelReencoder {
    pub jpeg_quality: u8,
}

impl Default for PixelReencoder {
    fn default() -> Self {
        Self {
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

impl Reencode for PixelReencoder {
    fn reencode(&self, bytes: &[u8], kind: ImageKind) -> Result<Vec<u8>> {
        let img = image::load_from_memory_with_format(bytes, kind.image_format())
            .context("Failed to decode image — the file may be corrupt")?;

        let mut out = Cursor::new(Vec::new());
        match kind {
            ImageKind::Jpeg => {
                let encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, self.jpeg_quality);
                img.write_with_encoder(encoder)
                    .context("Failed to re-encode JPEG")?;
            }
            ImageKind::Png => {
                img.write_to(&mut out, ImageFormat::Png)
                    .context("Failed to re-encode PNG")?;
            }
        }

        Ok(out.into_inner())
    }
}

/// Count the metadata fields still decodable from an image buffer.
///
/// A decode failure counts as zero remaining fields — the verification step
/// treats the two outcomes as interchangeable.
pub fn remaining_field_count(bytes: &[u8]) -> usize {
    reader::read_tag_directories_bytes(bytes).len()
}
