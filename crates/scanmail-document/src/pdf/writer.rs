// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — wrap a scanned page in a single-page PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use image::DynamicImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use scanmail_core::ScanSize;
use scanmail_core::error::ScanmailError;
use tracing::{debug, info, instrument};

/// printpdf treats one pixel as one point at this DPI.
const POINT_DPI: f32 = 72.0;

/// Creates single-page PDF documents from scanned rasters.
pub struct PdfWriter {
    /// Page width and height in millimetres.
    page_mm: (u32, u32),
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    /// A writer whose page matches the scan area, edge to edge.
    pub fn for_scan(size: ScanSize) -> Self {
        Self {
            page_mm: size.dimensions_mm(),
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Paper dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.page_mm;
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    /// Create a single-page PDF containing the given image.
    ///
    /// The image is scaled as large as the page allows while preserving its
    /// aspect ratio, and centred on the page.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn create_from_image(&self, image: &DynamicImage) -> Result<Vec<u8>, ScanmailError> {
        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Scanned Document");

        if image.width() == 0 || image.height() == 0 {
            return Err(ScanmailError::PdfError("image has no pixels".into()));
        }

        info!(page_mm = ?self.page_mm, title, "Creating image PDF");

        let img_width = image.width() as usize;
        let img_height = image.height() as usize;

        // Convert to RGB8 for printpdf.
        let rgb_image = image.to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb_image.into_raw()),
            width: img_width,
            height: img_height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(title);
        let xobject_id = doc.add_image(&raw);

        let page_w_pt = page_w.into_pt().0;
        let page_h_pt = page_h.into_pt().0;

        // At 72 DPI one pixel is one point; scale from there to fit.
        let img_w_pt = img_width as f32;
        let img_h_pt = img_height as f32;
        let scale = (page_w_pt / img_w_pt).min(page_h_pt / img_h_pt);

        let rendered_w_pt = img_w_pt * scale;
        let rendered_h_pt = img_h_pt * scale;

        let x_offset = (page_w_pt - rendered_w_pt) / 2.0;
        let y_offset = (page_h_pt - rendered_h_pt) / 2.0;

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x_offset)),
                translate_y: Some(Pt(y_offset)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(POINT_DPI),
                rotate: None,
            },
        }];

        let page = PdfPage::new(page_w, page_h, ops);
        doc.with_pages(vec![page]);

        debug!(rendered_w_pt, rendered_h_pt, scale, "Image placed on page");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "printpdf reported warnings");
        }

        Ok(output)
    }

    /// Create an image PDF and write it directly to a file.
    pub fn write_image_to_file(
        &self,
        image: &DynamicImage,
        path: impl AsRef<Path>,
    ) -> Result<(), ScanmailError> {
        let bytes = self.create_from_image(image)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote image PDF to {}", path.as_ref().display());
        Ok(())
    }
}
