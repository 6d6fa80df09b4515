//! Numerical quadrature over evenly spaced samples and the integration stage
//! that turns bounded peaks into peak areas.
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::interval::IntervalMap;
use crate::peak::{BoundedPeak, IntegratedPeak};
use crate::signal::Signal;

/// The composite rule used to integrate a peak
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QuadratureMethod {
    /// Composite Simpson's 1/3 rule. When the number of intervals is odd,
    /// the last one is integrated with the parabola through the final three
    /// samples (Cartwright's correction), and segments with fewer than three
    /// samples use the trapezoidal rule outright.
    #[default]
    Simpson,
    /// Composite trapezoidal rule
    Trapezoid,
}

impl QuadratureMethod {
    /// Integrate `y` sampled every `dx`
    pub fn integrate<F: Float + Sum>(&self, y: &[F], dx: F) -> F {
        match self {
            Self::Simpson => simpson(y, dx),
            Self::Trapezoid => trapezoid(y, dx),
        }
    }
}

impl fmt::Display for QuadratureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simpson => f.write_str("simpson"),
            Self::Trapezoid => f.write_str("trapezoid"),
        }
    }
}

impl FromStr for QuadratureMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simpson" => Ok(Self::Simpson),
            "trapezoid" | "trapz" => Ok(Self::Trapezoid),
            _ => Err(format!("Unknown quadrature method {s}")),
        }
    }
}

/// The trapezoidal rule over samples spaced `dx` apart. Fewer than two
/// samples enclose no area.
pub fn trapezoid<F: Float + Sum>(y: &[F], dx: F) -> F {
    let half = F::from(0.5).unwrap();
    y.windows(2).map(|w| dx * half * (w[0] + w[1])).sum()
}

/// Simpson's 1/3 rule over samples spaced `dx` apart.
///
/// An odd number of intervals leaves one unpaired interval at the end, which
/// contributes `dx * (5 y[n-1] + 8 y[n-2] - y[n-3]) / 12`.
pub fn simpson<F: Float + Sum>(y: &[F], dx: F) -> F {
    let n = y.len();
    if n < 3 {
        return trapezoid(y, dx);
    }
    let third = dx / F::from(3.0).unwrap();
    let four = F::from(4.0).unwrap();
    let intervals = n - 1;
    let paired = intervals - intervals % 2;
    let total: F = (0..paired)
        .step_by(2)
        .map(|i| third * (y[i] + four * y[i + 1] + y[i + 2]))
        .sum();
    if paired < intervals {
        let twelfth = dx / F::from(12.0).unwrap();
        let tail = F::from(5.0).unwrap() * y[n - 1] + F::from(8.0).unwrap() * y[n - 2] - y[n - 3];
        total + twelfth * tail
    } else {
        total
    }
}

/// Integrates the signal between each peak's resolved boundaries
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakIntegrator {
    pub method: QuadratureMethod,
}

impl PeakIntegrator {
    pub fn new(method: QuadratureMethod) -> Self {
        Self { method }
    }

    /// Compute the area under `signal` from the left to the right boundary of `peak`,
    /// inclusive of both boundary samples, with unit sample spacing.
    ///
    /// Returns `None` if either boundary is unresolved.
    pub fn area(&self, signal: &Signal<'_>, peak: &BoundedPeak) -> Option<f64> {
        let span = peak.boundary.span()?;
        let segment: Vec<f64> = signal.as_slice().get(span)?.iter().map(|y| *y as f64).collect();
        Some(self.method.integrate(&segment, 1.0))
    }

    pub fn integrate_peak(&self, signal: &Signal<'_>, peak: &BoundedPeak) -> IntegratedPeak {
        let area = self.area(signal, peak);
        if area.is_none() {
            log::debug!(
                "Excluding peak at {} from integration, boundary unresolved",
                peak.peak.index
            );
        }
        IntegratedPeak::new(peak.peak, peak.boundary, area)
    }

    /// Integrate every peak in `peaks`, keeping their interval and order.
    pub fn integrate(
        &self,
        signal: &Signal<'_>,
        peaks: &IntervalMap<BoundedPeak>,
    ) -> IntervalMap<IntegratedPeak> {
        peaks.map_intervals(|_, peaks| {
            peaks
                .iter()
                .map(|p| self.integrate_peak(signal, p))
                .collect()
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::interval::Interval;
    use crate::peak::{Boundary, BoundaryPoint, Peak, PeakBoundary};
    use rstest::rstest;

    fn bounded(signal: &Signal<'_>, index: usize, left: usize, right: usize) -> BoundedPeak {
        BoundedPeak::new(
            Peak::new(index, signal[index]),
            PeakBoundary::new(
                Boundary::Resolved(BoundaryPoint::new(left, signal[left])),
                Boundary::Resolved(BoundaryPoint::new(right, signal[right])),
            ),
        )
    }

    #[rstest]
    #[case(&[], 0.0)]
    #[case(&[3.0], 0.0)]
    #[case(&[1.0, 3.0], 2.0)]
    #[case(&[0.0, 10.0, 0.0], 10.0)]
    #[case(&[0.0, 1.0, 2.0, 3.0], 4.5)]
    fn test_trapezoid(#[case] y: &[f64], #[case] expected: f64) {
        assert!((trapezoid(y, 1.0) - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case(&[0.0, 10.0, 0.0], 40.0 / 3.0)]
    #[case(&[1.0, 1.0, 1.0, 1.0, 1.0], 4.0)]
    #[case(&[0.0, 1.0, 4.0, 9.0, 16.0], 64.0 / 3.0)]
    #[case(&[1.0, 3.0], 2.0)]
    // Three intervals: Simpson over the first two, then the last one from
    // the parabola through the final three samples
    #[case(&[0.0, 10.0, 0.0, 0.0], 12.5)]
    #[case(&[0.0, 1.0, 4.0, 9.0], 9.0)]
    #[case(&[0.0, 1.0, 8.0, 27.0, 64.0, 125.0], 156.5)]
    fn test_simpson(#[case] y: &[f64], #[case] expected: f64) {
        assert!((simpson(y, 1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_simpson_spacing() {
        let y: Vec<f32> = (0..=10).map(|i| (i as f32 * 0.1).powi(2)).collect();
        let area = simpson(&y, 0.1f32);
        assert!((area - 1.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("Simpson".parse::<QuadratureMethod>(), Ok(QuadratureMethod::Simpson));
        assert_eq!("trapz".parse::<QuadratureMethod>(), Ok(QuadratureMethod::Trapezoid));
        assert!("romberg".parse::<QuadratureMethod>().is_err());
        assert_eq!(QuadratureMethod::Trapezoid.to_string(), "trapezoid");
    }

    #[test]
    fn test_triangle_area() {
        let signal = Signal::try_from(vec![0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0]).unwrap();
        let peak = bounded(&signal, 3, 2, 5);
        let trapz = PeakIntegrator::new(QuadratureMethod::Trapezoid).area(&signal, &peak);
        assert_eq!(trapz, Some(10.0));
        // Four samples from the boundaries, so the last interval is unpaired
        let simps = PeakIntegrator::default().area(&signal, &peak).unwrap();
        assert!((simps - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_unresolved_excluded() {
        let signal = Signal::try_from(vec![0.0, 5.0, 10.0, 5.0, 0.0]).unwrap();
        let peak = BoundedPeak::new(
            Peak::new(2, 10.0),
            PeakBoundary::new(
                Boundary::Unresolved,
                Boundary::Resolved(BoundaryPoint::new(4, 0.0)),
            ),
        );
        let integrated = PeakIntegrator::default().integrate_peak(&signal, &peak);
        assert_eq!(integrated.area, None);
        assert_eq!(integrated.boundary, peak.boundary);
    }

    #[test]
    fn test_integrate_keeps_order() {
        let signal = Signal::try_from(vec![0.0, 2.0, 0.0, 0.0, 4.0, 0.0, 0.0, 6.0, 0.0]).unwrap();
        let iv = Interval::new(0, 8).unwrap();
        let peaks: IntervalMap<BoundedPeak> = [(
            iv,
            vec![bounded(&signal, 1, 0, 2), bounded(&signal, 4, 3, 5), bounded(&signal, 7, 6, 8)],
        )]
        .into_iter()
        .collect();
        let integrated = PeakIntegrator::new(QuadratureMethod::Trapezoid).integrate(&signal, &peaks);
        let areas: Vec<_> = integrated[&iv].iter().map(|p| p.area.unwrap()).collect();
        assert_eq!(areas, vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_non_negative_area() {
        let signal = Signal::try_from(vec![1.0, 0.0, 3.0, 7.0, 2.0, 0.0, 0.5, 0.0]).unwrap();
        for method in [QuadratureMethod::Simpson, QuadratureMethod::Trapezoid] {
            let peak = bounded(&signal, 3, 1, 7);
            let area = PeakIntegrator::new(method).area(&signal, &peak).unwrap();
            assert!(area >= 0.0);
        }
    }
}
