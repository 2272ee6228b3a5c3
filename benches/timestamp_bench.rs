use criterion::{black_box, criterion_group, criterion_main, Criterion};

use videoclipper::process::LineBuffer;
use videoclipper::TimeOffset;

fn bench_parse(c: &mut Criterion) {
    let inputs = ["0", "0.050", "1:30", "01:02:03.456", "99:70:1.12345"];
    c.bench_function("timestamp_parse", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(TimeOffset::parse(black_box(input)).ok());
            }
        })
    });
}

fn bench_line_buffer(c: &mut Criterion) {
    let progress: Vec<u8> = (0..500)
        .flat_map(|i| format!("frame={:5} fps= 25 size= {}kB time=00:00:{:02}.00\r", i, i * 4, i % 60).into_bytes())
        .collect();

    c.bench_function("line_buffer_progress", |b| {
        b.iter(|| {
            let mut buffer = LineBuffer::default();
            let lines = progress.iter().filter_map(|&byte| buffer.push(byte)).count();
            black_box(lines)
        })
    });
}

criterion_group!(benches, bench_parse, bench_line_buffer);
criterion_main!(benches);
