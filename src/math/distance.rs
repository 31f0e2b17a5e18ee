/// Euclidean distance between two RGB triples
///
/// Plain RGB space, not a perceptual color difference.
pub fn rgb_distance(a: [u8; 3], b: [u8; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Euclidean length of a grid offset
pub fn offset_length(dr: i64, dc: i64) -> f64 {
    ((dr * dr + dc * dc) as f64).sqrt()
}

/// Population variance of a sample, zero for an empty sample
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Round a non-negative mean to the nearest byte value
pub fn round_to_byte(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
