//! Throughput Benchmark for resp-client
//!
//! This benchmark measures command encoding and reply decoding without a
//! network in between.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use resp_client::decode;
use resp_client::protocol::{concat, Frame, ReplyDecoder};
use std::io::Cursor;

/// Benchmark building request frames
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(1));

    group.bench_function("inline", |b| {
        b.iter(|| black_box(Frame::inline("GET user:101")));
    });

    group.bench_function("args_small", |b| {
        b.iter(|| black_box(Frame::command("SET", &["user:101", "Ariz"])));
    });

    group.bench_function("args_large", |b| {
        let value = vec![b'x'; 64 * 1024]; // 64KB value
        b.iter(|| black_box(Frame::command("SET", &[&b"key"[..], &value[..]])));
    });

    group.bench_function("pipeline_100", |b| {
        let frames: Vec<Frame> = (0..100)
            .map(|i| Frame::command("GET", &[format!("key:{}", i)]))
            .collect();
        b.iter(|| black_box(concat(&frames)));
    });

    group.finish();
}

/// Benchmark decoding replies from memory
fn bench_decode(c: &mut Criterion) {
    let decoder = ReplyDecoder::default();

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(1));

    group.bench_function("simple_string", |b| {
        b.iter(|| {
            let mut input = Cursor::new(&b"+OK\r\n"[..]);
            black_box(decoder.decode(&mut input, decode::raw).unwrap());
        });
    });

    group.bench_function("bulk_1kb", |b| {
        let mut wire = b"$1024\r\n".to_vec();
        wire.extend_from_slice(&[b'x'; 1024]);
        wire.extend_from_slice(b"\r\n");
        b.iter(|| {
            let mut input = Cursor::new(&wire[..]);
            black_box(decoder.decode(&mut input, decode::raw).unwrap());
        });
    });

    group.bench_function("array_100_utf8", |b| {
        let mut wire = b"*100\r\n".to_vec();
        for i in 0..100 {
            let value = format!("value:{}", i);
            wire.extend_from_slice(format!("${}\r\n{}\r\n", value.len(), value).as_bytes());
        }
        b.iter(|| {
            let mut input = Cursor::new(&wire[..]);
            black_box(decoder.decode(&mut input, decode::utf8_lossy).unwrap());
        });
    });

    group.bench_function("nested_depth_32", |b| {
        let mut wire = b"*1\r\n".repeat(32);
        wire.extend_from_slice(b":1\r\n");
        b.iter(|| {
            let mut input = Cursor::new(&wire[..]);
            black_box(decoder.decode(&mut input, decode::raw).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);

criterion_main!(benches);
