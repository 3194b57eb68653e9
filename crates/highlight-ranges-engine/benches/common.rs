// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use highlight_ranges_engine::{Range, Tag};

/// Deterministic pseudo-random ranges over `[0, domain)`.
#[allow(dead_code)]
pub fn generate_ranges(count: usize, domain: usize, max_len: usize) -> Vec<Range> {
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = |bound: usize| {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        (seed % bound as u64) as usize
    };

    (0..count)
        .map(|id| {
            let start = next(domain);
            let length = next(max_len + 1);
            let tag = Tag::from([("class".to_string(), format!("hl-{}", id % 8))]);
            Range::with_length(start, length, tag).unwrap()
        })
        .collect()
}

/// Ranges nested like the layers of an onion, each one inside the previous.
#[allow(dead_code)]
pub fn generate_nested_ranges(depth: usize) -> Vec<Range> {
    (0..depth)
        .map(|level| Range::new(level, depth * 2 - level, Tag::new()).unwrap())
        .collect()
}
