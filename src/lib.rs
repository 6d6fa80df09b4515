//! `chromint` is a library for quantifying peaks in a one dimensional chromatogram,
//! an intensity trace sampled at a fixed rate over time.
//!
//! The work is split into a strictly linear series of stages, each of which can be
//! used on its own:
//!
//! 1. [`derivative`] computes the first and second finite differences of the signal.
//! 2. [`PeakDetector`] finds local maxima that clear height, threshold and separation
//!    criteria.
//! 3. [`assign_peaks`] keeps the peaks that fall strictly inside caller-supplied
//!    [`Interval`]s.
//! 4. [`BoundaryResolver`] walks outward from each apex along the first derivative
//!    until the slope returns to baseline.
//! 5. [`PeakIntegrator`] integrates the signal between those boundaries.
//!
//! [`integrate_peaks`] runs all of them with a single [`IntegrationConfig`]. A peak
//! whose boundary search runs off the end of the signal is kept in the output with
//! [`Boundary::Unresolved`] and no area, rather than causing an error.
//!
//! # Usage
//! ```
//! use chromint::{integrate_peaks, IntegrationConfig, Interval};
//! use chromint::text::signal_from_file;
//!
//! let signal = signal_from_file("./test/data/chromatogram.csv", "215nm").unwrap();
//! let intervals = [
//!     Interval::new(50, 120).unwrap(),
//!     Interval::new(170, 260).unwrap(),
//!     Interval::new(300, 380).unwrap(),
//! ];
//! let config = IntegrationConfig::default()
//!     .min_height(4000.0)
//!     .threshold(1.0)
//!     .min_separation(2)
//!     .min_slope(5.0);
//! let result = integrate_peaks(&signal, &intervals, &config).unwrap();
//! assert_eq!(result.integrated_peaks().count(), 3);
//! for peak in result.integrated_peaks() {
//!     println!("{}", peak);
//! }
//! ```
pub mod boundary;
pub mod derivative;
pub mod integrate;
pub mod interval;
pub mod peak;
pub mod peak_picker;
pub mod pipeline;
pub mod signal;
pub mod text;

#[cfg(test)]
mod test_data;

pub use crate::boundary::BoundaryResolver;
pub use crate::derivative::{compute_derivatives, Derivatives};
pub use crate::integrate::{PeakIntegrator, QuadratureMethod};
pub use crate::interval::{assign_peaks, Interval, IntervalMap};
pub use crate::peak::{Boundary, BoundaryPoint, BoundedPeak, IntegratedPeak, Peak, PeakBoundary};
pub use crate::peak_picker::{pick_peaks, PeakDetector, PeakDetectorBuilder};
pub use crate::pipeline::{integrate_peaks, IntegrationConfig, PeakIntegrationResult};
pub use crate::signal::{ChromatogramError, Signal};
