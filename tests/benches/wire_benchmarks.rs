//! # Quantum-Chain Wire Protocol Benchmarks
//!
//! | Path | Concern |
//! |------|---------|
//! | Body decode/encode | Largest responses on the wire |
//! | Pre-encoded bodies | Serving from storage without a decode |
//! | Header query decode | Origin selector size branch |
//! | Announcement unpack | Per-announcement fan-out cost |

use criterion::{criterion_group, criterion_main};
use qc_tests::benchmarks::qc_wire_codec::{
    bench_announcement_unpack, bench_body_codec, bench_header_query,
};

criterion_group!(
    benches,
    bench_body_codec,
    bench_header_query,
    bench_announcement_unpack,
);

criterion_main!(benches);
