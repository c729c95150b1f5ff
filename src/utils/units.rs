/// Bytes in one gibibyte. Quotas are authored in GiB and stored in bytes.
pub const BYTES_PER_GIB: i64 = 1 << 30;

/// Converts an operator-supplied gibibyte amount to stored bytes.
///
/// Fractional amounts are accepted and truncated toward zero after scaling,
/// so `0.5` GiB becomes 536870912 bytes.
pub fn gib_to_bytes(gib: f64) -> i64 {
    (gib * BYTES_PER_GIB as f64) as i64
}

/// Whole-GiB variant used where the source is already integral (plan quotas).
pub fn whole_gib_to_bytes(gib: i64) -> i64 {
    gib.saturating_mul(BYTES_PER_GIB)
}
