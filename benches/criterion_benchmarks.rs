use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use oxipatch::bps::{self, varint};

fn gen_data(size: usize, seed: u64) -> Vec<u8> {
    let mut s = seed;
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        out.push((s >> 33) as u8);
    }
    out
}

/// Patch copying the whole source in lockstep (target == source).
fn identity_patch(source: &[u8]) -> Vec<u8> {
    let mut patch = b"BPS1".to_vec();
    varint::write_usize(&mut patch, source.len()).unwrap();
    varint::write_usize(&mut patch, source.len()).unwrap();
    varint::write_u64(&mut patch, 0).unwrap();
    varint::write_u64(&mut patch, (source.len() as u64 - 1) << 2).unwrap();
    let crc = crc32fast::hash(source);
    patch.extend_from_slice(&crc.to_le_bytes());
    patch.extend_from_slice(&crc.to_le_bytes());
    let self_crc = crc32fast::hash(&patch);
    patch.extend_from_slice(&self_crc.to_le_bytes());
    patch
}

/// Patch producing `size` copies of one byte through a single
/// overlapping self-copy (the byte-at-a-time path).
fn fill_patch(size: usize) -> Vec<u8> {
    let target = vec![0x5Au8; size];
    let mut patch = b"BPS1".to_vec();
    varint::write_u64(&mut patch, 0).unwrap();
    varint::write_usize(&mut patch, size).unwrap();
    varint::write_u64(&mut patch, 0).unwrap();
    varint::write_u64(&mut patch, 1).unwrap(); // TargetRead length 1
    patch.push(0x5A);
    varint::write_u64(&mut patch, ((size as u64 - 2) << 2) | 3).unwrap();
    varint::write_u64(&mut patch, 0).unwrap(); // offset 0
    patch.extend_from_slice(&crc32fast::hash(b"").to_le_bytes());
    patch.extend_from_slice(&crc32fast::hash(&target).to_le_bytes());
    let self_crc = crc32fast::hash(&patch);
    patch.extend_from_slice(&self_crc.to_le_bytes());
    patch
}

fn bench_validate(c: &mut Criterion) {
    let source = gen_data(1 << 20, 42);
    let patch = identity_patch(&source);

    let mut g = c.benchmark_group("validate");
    g.throughput(Throughput::Bytes(patch.len() as u64));
    g.bench_function("identity_1mib", |b| {
        b.iter(|| bps::validate_patch(black_box(&patch)).unwrap())
    });
    g.finish();
}

fn bench_apply(c: &mut Criterion) {
    let source = gen_data(1 << 20, 42);
    let identity = identity_patch(&source);
    let fill = fill_patch(1 << 20);

    let mut g = c.benchmark_group("apply_mb_s");
    g.throughput(Throughput::Bytes(1 << 20));
    g.bench_function("source_read_1mib", |b| {
        b.iter(|| bps::apply_patch(black_box(&source), black_box(&identity)).unwrap())
    });
    g.bench_function("overlap_fill_1mib", |b| {
        b.iter(|| bps::apply_patch(b"", black_box(&fill)).unwrap())
    });
    g.finish();
}

criterion_group!(benches, bench_validate, bench_apply);
criterion_main!(benches);
