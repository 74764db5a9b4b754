use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration, Throughput,
};
use std::io::Cursor;
use wavestream::{int24, SampleType, WaveReader, WaveWriter, WriterOptions};

const FRAME_RATE: u32 = 44100;
const SECONDS: usize = 10;
const BLOCK: usize = 4096;

fn test_signal(n_samples: usize) -> Vec<f32> {
    (0..n_samples)
        .map(|i| (i as f32 / FRAME_RATE as f32 * 440.0 * 2.0 * std::f32::consts::PI).sin())
        .collect()
}

fn write_i16(samples: &[i16], channels: u16) -> Vec<u8> {
    let mut w = WaveWriter::new(
        Cursor::new(Vec::with_capacity(samples.len() * 2 + 44)),
        SampleType::Int16,
        FRAME_RATE,
        WriterOptions::new().channels(channels),
    )
    .unwrap();
    for block in samples.chunks(BLOCK) {
        w.write_i16(block).unwrap();
    }
    w.finalize().unwrap().into_inner()
}

fn write_f32(samples: &[f32], channels: u16) -> Vec<u8> {
    let mut w = WaveWriter::new(
        Cursor::new(Vec::with_capacity(samples.len() * 4 + 80)),
        SampleType::Float32,
        FRAME_RATE,
        WriterOptions::new().channels(channels),
    )
    .unwrap();
    for block in samples.chunks(BLOCK) {
        w.write_f32(block).unwrap();
    }
    w.finalize().unwrap().into_inner()
}

pub fn bench_read_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("Read/Write Operations");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for channels in [1u16, 2, 6] {
        let signal = test_signal(FRAME_RATE as usize * SECONDS * usize::from(channels));
        let i16_samples: Vec<i16> = signal.iter().map(|&x| (x * 32767.0) as i16).collect();
        let name = format!("{}ch", channels);

        group.throughput(Throughput::Bytes((signal.len() * 4) as u64));
        group.bench_function(BenchmarkId::new("write_f32", &name), |b| {
            b.iter(|| black_box(write_f32(black_box(&signal), channels)))
        });
        group.throughput(Throughput::Bytes((i16_samples.len() * 2) as u64));
        group.bench_function(BenchmarkId::new("write_i16", &name), |b| {
            b.iter(|| black_box(write_i16(black_box(&i16_samples), channels)))
        });

        let f32_file = write_f32(&signal, channels);
        group.throughput(Throughput::Bytes(f32_file.len() as u64));
        group.bench_function(BenchmarkId::new("read_f32", &name), |b| {
            b.iter(|| {
                let mut r = WaveReader::new(Cursor::new(black_box(&f32_file[..])));
                let mut block = vec![0f32; BLOCK];
                while let Ok(n) = r.read_f32(&mut block) {
                    black_box(&block[..n]);
                }
            })
        });

        let i16_file = write_i16(&i16_samples, channels);
        group.throughput(Throughput::Bytes(i16_file.len() as u64));
        group.bench_function(BenchmarkId::new("read_i16", &name), |b| {
            b.iter(|| {
                let mut r = WaveReader::new(Cursor::new(black_box(&i16_file[..])));
                let mut block = vec![0i16; BLOCK];
                while let Ok(n) = r.read_i16(&mut block) {
                    black_box(&block[..n]);
                }
            })
        });
    }
    group.finish();
}

pub fn bench_int24(c: &mut Criterion) {
    let mut group = c.benchmark_group("Int24 Packing");
    let values: Vec<i32> = test_signal(FRAME_RATE as usize * SECONDS)
        .iter()
        .map(|&x| (x * 8388607.0) as i32)
        .collect();
    let packed = int24::pack(&values);

    group.throughput(Throughput::Elements(values.len() as u64));
    group.bench_function("pack", |b| {
        b.iter(|| black_box(int24::pack(black_box(&values))))
    });
    group.bench_function("unpack", |b| {
        b.iter(|| black_box(int24::unpack(black_box(&packed)).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_read_write, bench_int24);
criterion_main!(benches);
