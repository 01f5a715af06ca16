use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cutgif::quantize;
use pix::rgb::SRgba8;
use pix::Raster;

fn noise(width: u32, height: u32) -> Raster<SRgba8> {
    let mut raster = Raster::with_clear(width, height);
    let mut seed = 0x1234_5678u32;
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let [r, g, b, _] = seed.to_le_bytes();
            *raster.pixel_mut(x, y) = SRgba8::new(r, g, b, 255);
        }
    }
    raster
}

fn quantize_noise(crit: &mut Criterion) {
    let raster = noise(256, 256);
    crit.bench_function("quantize_256", |b| {
        b.iter(|| black_box(quantize(black_box(&raster), 256).unwrap()))
    });
    crit.bench_function("quantize_16", |b| {
        b.iter(|| black_box(quantize(black_box(&raster), 16).unwrap()))
    });
}

criterion_group!(benches, quantize_noise);
criterion_main!(benches);
