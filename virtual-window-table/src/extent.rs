/// Total content size of a table: the measured sizes of all header, body, and footer rows,
/// rounded up to a whole pixel.
///
/// Negative and NaN sizes count as zero.
pub fn table_content_size(header: &[f64], body: &[f64], footer: &[f64]) -> u64 {
    let sum: f64 = header
        .iter()
        .chain(body)
        .chain(footer)
        .filter(|s| **s > 0.0)
        .sum();
    ceil_to_u64(sum)
}

// `f64::ceil` needs `std`.
fn ceil_to_u64(value: f64) -> u64 {
    let truncated = value as u64;
    if (truncated as f64) < value {
        truncated.saturating_add(1)
    } else {
        truncated
    }
}
