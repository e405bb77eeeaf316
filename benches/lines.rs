use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rgba_line::{bresenham_line, line, Color, Composite, PixelBuffer, PointD};

const COLOR: Color = Color::from_ints(51, 153, 255, 191);

/// A fan of lines from the center to points on a circle.
fn fan(width: u32, height: u32) -> Vec<(PointD, PointD)> {
    let c = PointD::new(width as f64 / 2.0, height as f64 / 2.0);
    let r = c.y - 1.0;
    (0..360)
        .step_by(3)
        .map(|deg| {
            let a = (deg as f64).to_radians();
            (c, PointD::new(c.x + r * a.cos(), c.y + r * a.sin()))
        })
        .collect()
}

fn bench_lines(c: &mut Criterion) {
    let segments = fan(512, 512);
    let mut buf = PixelBuffer::new(512, 512);

    let mut group = c.benchmark_group("line_fan_512");
    for (name, composite) in [
        ("no_composite", Composite::None),
        ("src_over", Composite::default()),
    ] {
        group.bench_function(format!("wu/{}", name), |b| {
            b.iter(|| {
                for &(p0, p1) in &segments {
                    line(black_box(&mut buf), p0, p1, COLOR, composite);
                }
            })
        });
        group.bench_function(format!("bresenham/{}", name), |b| {
            b.iter(|| {
                for &(p0, p1) in &segments {
                    bresenham_line(black_box(&mut buf), p0, p1, COLOR, composite);
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lines);
criterion_main!(benches);
