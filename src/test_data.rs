//! Synthetic chromatograms for tests

/// A single gaussian peak evaluated at `x`
pub fn gaussian(x: f64, center: f64, height: f64, sigma: f64) -> f64 {
    height * (-(x - center).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// The apex positions of the peaks in [`gaussian_chromatogram`]
pub const PEAK_CENTERS: [usize; 3] = [60, 150, 230];

/// Three well separated gaussian peaks on a flat zero baseline, 300 points long
pub fn gaussian_chromatogram() -> Vec<f32> {
    let shapes = [(60.0, 1000.0, 4.0), (150.0, 2500.0, 6.0), (230.0, 600.0, 3.0)];
    (0..300)
        .map(|i| {
            shapes
                .iter()
                .map(|(c, h, s)| gaussian(i as f64, *c, *h, *s))
                .sum::<f64>() as f32
        })
        .collect()
}

/// Two overlapping gaussian peaks whose slope never returns to baseline between them
pub fn doublet_chromatogram() -> Vec<f32> {
    (0..120)
        .map(|i| (gaussian(i as f64, 50.0, 800.0, 5.0) + gaussian(i as f64, 66.0, 600.0, 5.0)) as f32)
        .collect()
}

pub fn spike(n: usize, at: usize, height: f32) -> Vec<f32> {
    let mut y = vec![0.0; n];
    y[at] = height;
    y
}

pub fn ramp(n: usize, slope: f32) -> Vec<f32> {
    (0..n).map(|i| i as f32 * slope).collect()
}

pub fn flat(n: usize, value: f32) -> Vec<f32> {
    vec![value; n]
}
