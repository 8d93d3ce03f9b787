// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster-to-document conversion.
//
// A capture is written to disk as a JPEG, converted into a one-page PDF next
// to it, and the JPEG is removed once the PDF is safely written. When the
// conversion fails the raster stays on disk.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use scanmail_core::ScanSize;
use scanmail_core::error::{Result, ScanmailError};
use tracing::{debug, info, instrument, warn};

use crate::image::processor::{DEFAULT_JPEG_QUALITY, ImageProcessor};
use crate::pdf::writer::PdfWriter;

/// Outcome of converting one raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub document_path: PathBuf,
    pub document_bytes: u64,
}

/// Turns captured pages into PDF documents.
pub struct DocumentConverter {
    size: ScanSize,
    jpeg_quality: u8,
}

impl DocumentConverter {
    /// A converter producing pages of the given scan size.
    pub fn new(size: ScanSize) -> Self {
        Self {
            size,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Write a captured page to `raster_path` as JPEG.
    pub fn save_raster(&self, image: DynamicImage, raster_path: &Path) -> Result<()> {
        ImageProcessor::from_dynamic(image).save_jpeg(raster_path, self.jpeg_quality)
    }

    /// Convert the raster at `raster_path` into a PDF at `document_path`,
    /// then delete the raster.
    #[instrument(skip(self), fields(raster = %raster_path.display()))]
    pub fn raster_to_pdf(&self, raster_path: &Path, document_path: &Path) -> Result<Conversion> {
        let page = ImageProcessor::open(raster_path)?;

        let mut writer = PdfWriter::for_scan(self.size);
        if let Some(stem) = document_path.file_stem() {
            writer.set_title(stem.to_string_lossy());
        }
        writer.write_image_to_file(page.as_dynamic(), document_path)?;

        let document_bytes = std::fs::metadata(document_path)?.len();
        if document_bytes == 0 {
            warn!(document = %document_path.display(), "converter wrote an empty document");
            return Err(ScanmailError::PdfError(format!(
                "{} is empty after conversion",
                document_path.display()
            )));
        }

        std::fs::remove_file(raster_path)?;
        debug!("raster intermediate removed");

        info!(
            document = %document_path.display(),
            document_bytes,
            "raster converted"
        );
        Ok(Conversion {
            document_path: document_path.to_path_buf(),
            document_bytes,
        })
    }
}
