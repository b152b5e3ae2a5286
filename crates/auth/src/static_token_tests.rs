// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Instant;

#[test]
fn matches_configured_token() {
    let store = StaticTokenStore::new(vec!["alpha-token".into(), "beta-token".into()]);
    assert!(store.contains("beta-token"));
    assert!(!store.contains("gamma-token"));
}

#[test]
fn from_env_value_splits_and_trims() {
    let store = StaticTokenStore::from_env_value(" a , b ,, c ");
    assert!(store.contains("a"));
    assert!(store.contains("b"));
    assert!(store.contains("c"));
    assert!(!store.contains(""));
}

#[test]
fn empty_store_matches_nothing() {
    let store = StaticTokenStore::default();
    assert!(store.is_empty());
    assert!(!store.contains("anything"));
}

#[test]
fn equal_length_comparisons_take_indistinguishable_time() {
    // Not a precise timing oracle test (CI jitter makes hard bounds flaky),
    // but guards against an accidental short-circuiting `==` creeping back
    // in: compare a near match against a far match of the same length and
    // assert neither case is wildly slower than a fixed multiple of the
    // other, averaged over many iterations.
    let target = "x".repeat(4096);
    let store = StaticTokenStore::new(vec![target.clone()]);

    let near_miss = {
        let mut s = target.clone();
        s.replace_range(4095..4096, "y");
        s
    };
    let far_miss = "y".repeat(4096);

    let iterations = 2000;
    let time_variant = |candidate: &str| {
        let start = Instant::now();
        for _ in 0..iterations {
            std::hint::black_box(store.contains(std::hint::black_box(candidate)));
        }
        start.elapsed()
    };

    let near = time_variant(&near_miss);
    let far = time_variant(&far_miss);
    let (slower, faster) = if near >= far { (near, far) } else { (far, near) };
    // A non-constant-time `==` on a 4096-byte mismatch at the last byte
    // vs. a mismatch at the first byte differs by orders of magnitude;
    // constant-time compare keeps the ratio close to 1.
    assert!(
        faster.as_nanos() == 0 || slower.as_nanos() / faster.as_nanos().max(1) < 5,
        "near={near:?} far={far:?}"
    );
}
