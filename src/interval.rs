//! Caller-supplied retention windows and the mapping from each window to
//! the peaks found inside it.
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::ops::Index;

use cfg_if::cfg_if;

#[cfg(feature = "parallelism")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::peak::Peak;
use crate::signal::ChromatogramError;

/// A closed window `[start, end]` over sample indices.
///
/// Windows are ordered by `start`, then by `end`. Overlapping windows are
/// allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval {
    pub start: usize,
    pub end: usize,
}

impl Interval {
    /// Create a new interval, `start` must be strictly less than `end`
    pub fn new(start: usize, end: usize) -> Result<Self, ChromatogramError> {
        let iv = Self { start, end };
        iv.validate()?;
        Ok(iv)
    }

    pub fn validate(&self) -> Result<(), ChromatogramError> {
        if self.start >= self.end {
            Err(ChromatogramError::EmptyInterval {
                start: self.start,
                end: self.end,
            })
        } else {
            Ok(())
        }
    }

    /// Whether `index` lies strictly inside the interval. Points on either
    /// edge are excluded.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.start < index && index < self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

impl TryFrom<(usize, usize)> for Interval {
    type Error = ChromatogramError;

    fn try_from((start, end): (usize, usize)) -> Result<Self, Self::Error> {
        Self::new(start, end)
    }
}

impl TryFrom<[usize; 2]> for Interval {
    type Error = ChromatogramError;

    fn try_from([start, end]: [usize; 2]) -> Result<Self, Self::Error> {
        Self::new(start, end)
    }
}

/// An ordered mapping from [`Interval`] to the peaks that fell inside it,
/// in increasing index order.
///
/// With the `serde` feature this is written as a sequence of `(interval, peaks)`
/// pairs since most formats only accept string map keys.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(serialize = "P: Serialize", deserialize = "P: Deserialize<'de>"))
)]
pub struct IntervalMap<P> {
    #[cfg_attr(feature = "serde", serde(with = "entry_pairs"))]
    entries: BTreeMap<Interval, Vec<P>>,
}

#[cfg(feature = "serde")]
mod entry_pairs {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Interval;

    pub fn serialize<S: Serializer, P: Serialize>(
        entries: &BTreeMap<Interval, Vec<P>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(entries.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>, P: Deserialize<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Interval, Vec<P>>, D::Error> {
        let pairs: Vec<(Interval, Vec<P>)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

impl<P> Default for IntervalMap<P> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<P> IntervalMap<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the peaks for `interval`, replacing any that were already present
    pub fn insert(&mut self, interval: Interval, peaks: Vec<P>) -> Option<Vec<P>> {
        self.entries.insert(interval, peaks)
    }

    pub fn get(&self, interval: &Interval) -> Option<&[P]> {
        self.entries.get(interval).map(|v| v.as_slice())
    }

    pub fn contains_interval(&self, interval: &Interval) -> bool {
        self.entries.contains_key(interval)
    }

    /// The number of intervals, including those with no peaks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The total number of peak entries across all intervals. A peak that
    /// falls in two intervals is counted twice.
    pub fn peak_count(&self) -> usize {
        self.entries.values().map(|v| v.len()).sum()
    }

    pub fn intervals(&self) -> btree_map::Keys<'_, Interval, Vec<P>> {
        self.entries.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Interval, Vec<P>> {
        self.entries.iter()
    }

    /// Iterate over every peak entry along with the interval it belongs to
    pub fn iter_peaks(&self) -> impl Iterator<Item = (&Interval, &P)> {
        self.entries
            .iter()
            .flat_map(|(iv, peaks)| peaks.iter().map(move |p| (iv, p)))
    }

    /// Build a new map by applying `f` to the peaks of each interval.
    ///
    /// With the `parallelism` feature intervals are processed concurrently,
    /// the peaks of a single interval are always handed to `f` together.
    pub fn map_intervals<Q, F>(&self, f: F) -> IntervalMap<Q>
    where
        P: Sync,
        Q: Send,
        F: Fn(&Interval, &[P]) -> Vec<Q> + Sync + Send,
    {
        let entries: BTreeMap<Interval, Vec<Q>>;
        cfg_if! {
            if #[cfg(feature = "parallelism")] {
                entries = self
                    .entries
                    .par_iter()
                    .map(|(iv, peaks)| (*iv, f(iv, peaks)))
                    .collect();
            } else {
                entries = self
                    .entries
                    .iter()
                    .map(|(iv, peaks)| (*iv, f(iv, peaks)))
                    .collect();
            }
        }
        IntervalMap { entries }
    }
}

impl<P> Index<&Interval> for IntervalMap<P> {
    type Output = [P];

    fn index(&self, index: &Interval) -> &Self::Output {
        &self.entries[index]
    }
}

impl<'a, P> IntoIterator for &'a IntervalMap<P> {
    type Item = (&'a Interval, &'a Vec<P>);

    type IntoIter = btree_map::Iter<'a, Interval, Vec<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<P> IntoIterator for IntervalMap<P> {
    type Item = (Interval, Vec<P>);

    type IntoIter = btree_map::IntoIter<Interval, Vec<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<P> FromIterator<(Interval, Vec<P>)> for IntervalMap<P> {
    fn from_iter<T: IntoIterator<Item = (Interval, Vec<P>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Distribute `peaks` among `intervals`.
///
/// Each interval receives a copy of every peak strictly inside it, so a peak
/// may appear under more than one interval. Peaks outside of every interval
/// are dropped. Every interval gets an entry even when it holds no peaks.
pub fn assign_peaks(peaks: &[Peak], intervals: &[Interval]) -> IntervalMap<Peak> {
    let mut assigned = IntervalMap::new();
    for iv in intervals {
        let members: Vec<Peak> = peaks
            .iter()
            .filter(|p| iv.contains(p.index))
            .copied()
            .collect();
        log::debug!("{} peaks in {iv}", members.len());
        assigned.insert(*iv, members);
    }
    assigned
}
