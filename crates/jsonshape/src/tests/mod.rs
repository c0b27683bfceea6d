mod arbitrary;

mod parse_good;
mod property_idempotent;

/// Number of quickcheck cases, larger on CI.
fn quickcheck_tests() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}
