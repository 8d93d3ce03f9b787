// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanmail-document — Document processing for Scanmail.
//
// Stores captured pages as JPEG intermediates and converts each one into a
// single-page PDF sized to the scan area.

pub mod convert;
pub mod image;
pub mod pdf;

// Re-export the primary structs so callers can use `scanmail_document::PdfWriter` etc.
pub use convert::{Conversion, DocumentConverter};
pub use image::processor::ImageProcessor;
pub use pdf::writer::PdfWriter;
