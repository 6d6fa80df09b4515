//! Run the full detection, boundary and integration pipeline over a chromatogram.
//!
//! ```
//! use chromint::{integrate_peaks, IntegrationConfig, Interval, QuadratureMethod, Signal};
//!
//! let mut intensity = vec![0.0f32; 40];
//! for (i, y) in [2.0, 6.0, 10.0, 6.0, 2.0].into_iter().enumerate() {
//!     intensity[18 + i] = y;
//! }
//! let signal = Signal::try_from(&intensity[..]).unwrap();
//! let config = IntegrationConfig::default()
//!     .min_height(5.0)
//!     .edge_margin(1)
//!     .method(QuadratureMethod::Trapezoid);
//! let result = integrate_peaks(&signal, &[Interval::new(10, 30).unwrap()], &config).unwrap();
//!
//! let peak = result.integrated_peaks().next().unwrap();
//! assert_eq!(peak.index(), 20);
//! assert_eq!(peak.boundary.span(), Some(17..=24));
//! assert_eq!(peak.area, Some(26.0));
//! ```
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::boundary::{BoundaryResolver, DEFAULT_EDGE_MARGIN};
use crate::derivative::Derivatives;
use crate::integrate::{PeakIntegrator, QuadratureMethod};
use crate::interval::{assign_peaks, Interval, IntervalMap};
use crate::peak::{IntegratedPeak, Peak};
use crate::peak_picker::PeakDetector;
use crate::signal::{ChromatogramError, Signal};

/// Every tunable parameter of the pipeline
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntegrationConfig {
    /// The minimum height of a detected peak
    pub min_height: f32,
    /// The minimum vertical distance between a peak and both its neighbors
    pub threshold: f32,
    /// The minimum number of samples between two detected peaks
    pub min_separation: usize,
    /// The absolute slope below which a peak's edge is considered reached
    pub min_slope: f32,
    /// The number of samples skipped on each side of the apex when searching for edges
    pub edge_margin: usize,
    /// The quadrature rule used to compute areas
    pub method: QuadratureMethod,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            threshold: 0.0,
            min_separation: 1,
            min_slope: 1.0,
            edge_margin: DEFAULT_EDGE_MARGIN,
            method: QuadratureMethod::Simpson,
        }
    }
}

impl IntegrationConfig {
    /// The minimum height of a detected peak
    pub fn min_height(mut self, min_height: f32) -> Self {
        self.min_height = min_height;
        self
    }

    /// The minimum vertical distance between a peak and both its neighbors
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn min_separation(mut self, min_separation: usize) -> Self {
        self.min_separation = min_separation;
        self
    }

    /// The absolute slope below which a peak's edge is considered reached
    pub fn min_slope(mut self, min_slope: f32) -> Self {
        self.min_slope = min_slope;
        self
    }

    pub fn edge_margin(mut self, edge_margin: usize) -> Self {
        self.edge_margin = edge_margin;
        self
    }

    pub fn method(mut self, method: QuadratureMethod) -> Self {
        self.method = method;
        self
    }

    pub fn detector(&self) -> PeakDetector {
        PeakDetector::new(self.min_height, self.threshold, self.min_separation)
    }

    pub fn resolver(&self) -> BoundaryResolver {
        BoundaryResolver::new(self.min_slope, self.edge_margin)
    }

    pub fn integrator(&self) -> PeakIntegrator {
        PeakIntegrator::new(self.method)
    }
}

/// The output of [`integrate_peaks`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakIntegrationResult {
    /// The first and second derivatives of the signal
    pub derivatives: Derivatives,
    /// Every peak detected in the signal, before filtering by interval
    pub detected: Vec<Peak>,
    /// The integrated peaks of each interval
    pub peaks: IntervalMap<IntegratedPeak>,
}

impl PeakIntegrationResult {
    pub fn get(&self, interval: &Interval) -> Option<&[IntegratedPeak]> {
        self.peaks.get(interval)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Interval, &Vec<IntegratedPeak>)> {
        self.peaks.iter()
    }

    /// Iterate over every integrated peak across all intervals
    pub fn integrated_peaks(&self) -> impl Iterator<Item = &IntegratedPeak> {
        self.peaks.iter_peaks().map(|(_, p)| p)
    }

    /// The peaks which could not be integrated because a boundary was unresolved
    pub fn excluded_peaks(&self) -> impl Iterator<Item = (&Interval, &IntegratedPeak)> {
        self.peaks.iter_peaks().filter(|(_, p)| !p.is_integrated())
    }

    /// The total area of all integrated peaks in `interval`
    pub fn total_area(&self, interval: &Interval) -> Option<f64> {
        self.get(interval)
            .map(|peaks| peaks.iter().filter_map(|p| p.area).sum())
    }
}

/// Detect, bound and integrate the peaks of `signal` that fall inside `intervals`.
///
/// The signal and every interval are validated before any work is done.
pub fn integrate_peaks(
    signal: &Signal<'_>,
    intervals: &[Interval],
    config: &IntegrationConfig,
) -> Result<PeakIntegrationResult, ChromatogramError> {
    signal.validate()?;
    for iv in intervals {
        iv.validate()?;
    }

    let derivatives = signal.derivatives()?;

    let detected = config.detector().detect(signal);
    debug!("Detected {} peaks in {} points", detected.len(), signal.len());

    let assigned = assign_peaks(&detected, intervals);
    debug!(
        "Assigned {} peaks to {} intervals",
        assigned.peak_count(),
        assigned.len()
    );

    let bounded = config.resolver().resolve(signal, &derivatives, &assigned);
    let peaks = config.integrator().integrate(signal, &bounded);
    debug!(
        "Integrated {} of {} peaks",
        peaks.iter_peaks().filter(|(_, p)| p.is_integrated()).count(),
        peaks.peak_count()
    );

    Ok(PeakIntegrationResult {
        derivatives,
        detected,
        peaks,
    })
}
