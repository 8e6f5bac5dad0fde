//! Benchmarks for detection and conversion.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fileshift_image::{ConvertOptions, convert_bytes, detect_file_type};
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use std::io::Cursor;

fn sample_png() -> Vec<u8> {
    let img = RgbImage::from_fn(256, 256, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageOutputFormat::Png)
        .expect("encode sample");
    out.into_inner()
}

fn bench_detection(c: &mut Criterion) {
    let jpeg_data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
    let png_data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];

    c.bench_function("detect_jpeg", |b| {
        b.iter(|| detect_file_type(black_box(&jpeg_data), black_box("")))
    });

    c.bench_function("detect_png_named", |b| {
        b.iter(|| detect_file_type(black_box(&png_data), black_box("uploads/Photo.PNG")))
    });
}

fn bench_conversion(c: &mut Criterion) {
    let png = sample_png();
    let options = ConvertOptions::default();

    c.bench_function("png_to_jpeg_256", |b| {
        b.iter(|| convert_bytes(black_box(&png), "jpg", &options))
    });

    c.bench_function("png_to_png_256", |b| {
        b.iter(|| convert_bytes(black_box(&png), "png", &options))
    });
}

criterion_group!(benches, bench_detection, bench_conversion);
criterion_main!(benches);
