// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster handling for captured pages: load and write the JPEG
// intermediate that sits on disk between capture and conversion.

use std::path::Path;

use image::DynamicImage;
use scanmail_core::error::ScanmailError;
use tracing::{debug, info, instrument};

/// JPEG quality used for the raster intermediate.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// A single captured page held in memory.
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScanmailError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            ScanmailError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, ScanmailError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder).map_err(|err| {
            ScanmailError::ImageError(format!("JPEG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }

    /// Write the page to `path` as JPEG.
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn save_jpeg(&self, path: impl AsRef<Path>, quality: u8) -> Result<(), ScanmailError> {
        let bytes = self.to_jpeg_bytes(quality)?;
        std::fs::write(path.as_ref(), &bytes)?;
        debug!(bytes = bytes.len(), "Raster written");
        Ok(())
    }
}
