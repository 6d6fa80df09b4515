//! Algorithm for finding local maxima in a chromatogram that stand out from the noise.
//!
//! A point is reported as a peak when it is a strict local maximum, it is at least
//! [`PeakDetector::min_height`] tall, it rises at least [`PeakDetector::threshold`]
//! above *both* of its immediate neighbors, and no taller peak was accepted within
//! [`PeakDetector::min_separation`] samples of it.
use std::cmp::Ordering;

use log::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::peak::Peak;
use crate::signal::Signal;

/// A peak detector for chromatograms
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakDetector {
    /// The minimum intensity a local maximum must reach
    pub min_height: f32,
    /// The minimum vertical distance between a peak and each of its neighbors
    pub threshold: f32,
    /// Peaks closer together than this many samples are thinned, keeping the tallest
    pub min_separation: usize,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            threshold: 0.0,
            min_separation: 1,
        }
    }
}

/// A builder for configuring [`PeakDetector`]
#[derive(Debug, Clone, Default)]
pub struct PeakDetectorBuilder {
    inner: PeakDetector,
}

impl PeakDetectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_height(&mut self, min_height: f32) -> &mut Self {
        self.inner.min_height = min_height;
        self
    }

    pub fn threshold(&mut self, threshold: f32) -> &mut Self {
        self.inner.threshold = threshold;
        self
    }

    pub fn min_separation(&mut self, min_separation: usize) -> &mut Self {
        self.inner.min_separation = min_separation;
        self
    }

    pub fn build(&self) -> PeakDetector {
        self.inner.clone()
    }
}

impl From<PeakDetectorBuilder> for PeakDetector {
    fn from(value: PeakDetectorBuilder) -> Self {
        value.build()
    }
}

impl PeakDetector {
    /// Create a new peak detector
    pub fn new(min_height: f32, threshold: f32, min_separation: usize) -> Self {
        Self {
            min_height,
            threshold,
            min_separation,
        }
    }

    pub fn builder() -> PeakDetectorBuilder {
        PeakDetectorBuilder::new()
    }

    fn is_prominent(&self, prev: f32, cur: f32, next: f32) -> bool {
        (prev < cur)
            && (cur > next)
            && (cur >= self.min_height)
            && (cur - prev).min(cur - next) >= self.threshold
    }

    /// Find all the peaks in `signal`, ordered by increasing index.
    pub fn detect(&self, signal: &Signal<'_>) -> Vec<Peak> {
        let mut acc = Vec::new();
        self.discover_peaks(signal.as_slice(), &mut acc);
        acc
    }

    /// Find peaks in `intensity_array`, pushing them into `peak_accumulator`
    /// in increasing index order.
    ///
    /// Returns the number of peaks found. Arrays with fewer than three points
    /// cannot contain a peak.
    pub fn discover_peaks(&self, intensity_array: &[f32], peak_accumulator: &mut Vec<Peak>) -> usize {
        let n = intensity_array.len();
        if n < 3 {
            return 0;
        }

        let candidates: Vec<Peak> = intensity_array
            .windows(3)
            .enumerate()
            .filter(|(_, w)| self.is_prominent(w[0], w[1], w[2]))
            .map(|(i, w)| Peak::new(i + 1, w[1]))
            .collect();

        debug!(
            "Found {} local maxima passing height {} and threshold {}",
            candidates.len(),
            self.min_height,
            self.threshold
        );

        let accepted = if self.min_separation > 1 {
            self.thin_by_separation(candidates)
        } else {
            candidates
        };

        let count = accepted.len();
        peak_accumulator.extend(accepted);
        count
    }

    /// Visit peaks from tallest to shortest and drop any that lie closer
    /// than `min_separation` to a peak that was already kept.
    ///
    /// `candidates` must be in increasing index order, so only the neighbors
    /// within `min_separation` on either side of a kept peak are visited.
    /// Among equally tall peaks the one at the later index is kept.
    fn thin_by_separation(&self, candidates: Vec<Peak>) -> Vec<Peak> {
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|a, b| {
            let (a, b) = (&candidates[*a], &candidates[*b]);
            b.height
                .partial_cmp(&a.height)
                .unwrap_or(Ordering::Equal)
                .then(b.index.cmp(&a.index))
        });

        let mut keep = vec![true; candidates.len()];
        for i in order {
            if !keep[i] {
                continue;
            }
            let index = candidates[i].index;
            let too_close = |j: &usize| candidates[*j].index.abs_diff(index) < self.min_separation;
            let left = (0..i).rev().take_while(too_close);
            let right = (i + 1..candidates.len()).take_while(too_close);
            for j in left.chain(right) {
                if keep[j] {
                    trace!(
                        "Dropping peak at {} within {} of peak at {}",
                        candidates[j].index,
                        self.min_separation,
                        index
                    );
                    keep[j] = false;
                }
            }
        }

        candidates
            .into_iter()
            .zip(keep)
            .filter_map(|(peak, keep)| keep.then_some(peak))
            .collect()
    }
}

/// A convenience function that uses a default peak detection configuration
/// with a minimum height to find peaks in a chromatogram.
pub fn pick_peaks(signal: &Signal<'_>, min_height: f32) -> Vec<Peak> {
    let detector = PeakDetector {
        min_height,
        ..PeakDetector::default()
    };
    detector.detect(signal)
}
