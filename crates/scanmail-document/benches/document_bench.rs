// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for document processing in the scanmail-document crate.
// Measures wrapping an A4 capture at 100 DPI into a single-page PDF.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use scanmail_core::ScanSize;
use scanmail_document::PdfWriter;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark PDF creation from a synthetic 827x1169 page (A4 at 100 DPI).
///
/// The page is white with a dark frame, close to what a flatbed returns for
/// an empty scan, so the cost is dominated by pixel copying and stream
/// compression rather than image content.
fn bench_image_to_pdf(c: &mut Criterion) {
    let (width, height) = (827u32, 1169u32);
    let page = RgbImage::from_fn(width, height, |x, y| {
        if x < 20 || y < 20 || x >= width - 20 || y >= height - 20 {
            Rgb([30, 30, 30])
        } else {
            Rgb([245, 245, 245])
        }
    });
    let dynamic = DynamicImage::ImageRgb8(page);
    let writer = PdfWriter::for_scan(ScanSize::A4);

    c.bench_function("image_to_pdf (A4 @ 100 DPI)", |b| {
        b.iter(|| {
            let bytes = writer.create_from_image(black_box(&dynamic)).unwrap();
            black_box(bytes);
        });
    });
}

criterion_group!(benches, bench_image_to_pdf);
criterion_main!(benches);
