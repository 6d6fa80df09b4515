//! Locate the left and right edges of each peak by walking away from the apex
//! along the first derivative until the slope drops below a noise threshold.
//!
//! The walk does not start at the apex itself. The top of a peak is nearly flat,
//! so the first [`BoundaryResolver::edge_margin`] samples on either side are skipped
//! to avoid mistaking the apex for the return to baseline.
//!
//! Neighboring peaks are resolved independently of one another. If two peaks in
//! the same interval are so close that the slope never settles between them, their
//! spans will overlap. This is reported with a warning but not corrected.
use log::{trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::derivative::Derivatives;
use crate::interval::{Interval, IntervalMap};
use crate::peak::{Boundary, BoundaryPoint, BoundedPeak, Peak, PeakBoundary};
use crate::signal::Signal;

/// The number of samples skipped on each side of the apex by default
pub const DEFAULT_EDGE_MARGIN: usize = 5;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundaryResolver {
    /// The absolute slope below which the signal is considered back at baseline
    pub min_slope: f32,
    /// The number of samples next to the apex that are never considered a boundary
    pub edge_margin: usize,
}

impl Default for BoundaryResolver {
    fn default() -> Self {
        Self {
            min_slope: 1.0,
            edge_margin: DEFAULT_EDGE_MARGIN,
        }
    }
}

impl BoundaryResolver {
    pub fn new(min_slope: f32, edge_margin: usize) -> Self {
        Self {
            min_slope,
            edge_margin,
        }
    }

    /// Scan forward from the apex for the right edge.
    ///
    /// The scan always begins at least one sample past the apex.
    pub fn find_right(&self, signal: &Signal<'_>, derivatives: &Derivatives, index: usize) -> Boundary {
        let n = signal.len().min(derivatives.len());
        let start = index.saturating_add(self.edge_margin.max(1));
        (start..n)
            .find(|j| derivatives.slope_at(*j) < self.min_slope)
            .map(|j| BoundaryPoint::new(j, signal[j]))
            .into()
    }

    /// Scan backward from just before `index - edge_margin` for the left edge.
    ///
    /// A peak within `edge_margin` samples of the start of the signal has nowhere
    /// to scan and stays unresolved.
    pub fn find_left(&self, signal: &Signal<'_>, derivatives: &Derivatives, index: usize) -> Boundary {
        let stop = match index.checked_sub(self.edge_margin) {
            Some(stop) => stop.min(signal.len()).min(derivatives.len()),
            None => return Boundary::Unresolved,
        };
        (0..stop)
            .rev()
            .find(|j| derivatives.slope_at(*j) < self.min_slope)
            .map(|j| BoundaryPoint::new(j, signal[j]))
            .into()
    }

    /// Resolve both edges of a single peak
    pub fn resolve_peak(&self, signal: &Signal<'_>, derivatives: &Derivatives, peak: &Peak) -> BoundedPeak {
        let left = self.find_left(signal, derivatives, peak.index);
        let right = self.find_right(signal, derivatives, peak.index);
        trace!("Peak at {} bounded by {left} and {right}", peak.index);
        BoundedPeak::new(*peak, PeakBoundary::new(left, right))
    }

    /// Resolve the edges of every peak in `peaks`, preserving the interval keys
    /// and the order of peaks within each interval.
    pub fn resolve(
        &self,
        signal: &Signal<'_>,
        derivatives: &Derivatives,
        peaks: &IntervalMap<Peak>,
    ) -> IntervalMap<BoundedPeak> {
        peaks.map_intervals(|iv, peaks| {
            let bounded: Vec<BoundedPeak> = peaks
                .iter()
                .map(|p| self.resolve_peak(signal, derivatives, p))
                .collect();
            report_overlaps(iv, &bounded);
            bounded
        })
    }
}

fn report_overlaps(interval: &Interval, bounded: &[BoundedPeak]) {
    for pair in bounded.windows(2) {
        if pair[0].boundary.overlaps(&pair[1].boundary) {
            warn!(
                "Peaks at {} and {} in {interval} have overlapping boundaries",
                pair[0].peak.index, pair[1].peak.index
            );
        }
    }
}
