use chaostego_core::chaos::{self, ChaoticParameters, ImageCipher};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};

pub fn keystream(c: &mut Criterion) {
    let params = ChaoticParameters::default();

    c.bench_function("Keystream for a 1024x768 RGB image", |b| {
        b.iter(|| chaos::generate(black_box(1024 * 768 * 3), &params))
    });
}

pub fn image_transform(c: &mut Criterion) {
    let params = ChaoticParameters::default();
    let image = RgbImage::from_fn(640, 480, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]));

    c.bench_function("Transform a 640x480 RGB image", |b| {
        b.iter(|| ImageCipher::transform(black_box(&image), &params))
    });
}

criterion_group!(benches, keystream, image_transform);
criterion_main!(benches);
