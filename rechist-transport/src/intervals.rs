// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An ordered set of disjoint packet number ranges.

use std::{
    collections::{vec_deque, VecDeque},
    fmt::{self, Display, Formatter},
    iter::FusedIterator,
};

use rechist_common::qwarn;

use crate::{Error, PacketNumber, Res};

/// A contiguous run of received packet numbers, `low..=high`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PacketRange {
    low: PacketNumber,
    high: PacketNumber,
}

impl PacketRange {
    /// # Panics
    ///
    /// If `low > high`.
    #[must_use]
    pub fn new(low: PacketNumber, high: PacketNumber) -> Self {
        assert!(low <= high, "inverted range {low}..={high}");
        Self { low, high }
    }

    const fn single(pn: PacketNumber) -> Self {
        Self { low: pn, high: pn }
    }

    #[must_use]
    pub const fn low(&self) -> PacketNumber {
        self.low
    }

    #[must_use]
    pub const fn high(&self) -> PacketNumber {
        self.high
    }

    /// The number of packet numbers in the range.  Never zero.
    #[allow(clippy::len_without_is_empty)]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.high - self.low + 1
    }

    #[must_use]
    pub const fn contains(&self, pn: PacketNumber) -> bool {
        self.low <= pn && pn <= self.high
    }
}

impl Display for PacketRange {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}..={}", self.low, self.high)
    }
}

/// What happened when a packet number was added to a [`PacketIntervalSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    Duplicate,
}

/// Received packet numbers, held as ranges ordered from highest to lowest.
///
/// Neighbouring ranges never overlap or touch: for consecutive ranges `a`
/// (higher) and `b` (lower), `a.low > b.high + 1`.
#[derive(Debug, Clone)]
pub struct PacketIntervalSet {
    /// The highest range is at the front.
    ranges: VecDeque<PacketRange>,
    max_ranges: usize,
}

impl Default for PacketIntervalSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketIntervalSet {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_max_ranges(usize::MAX)
    }

    /// A set that refuses to hold more than `max_ranges` ranges.
    #[must_use]
    pub const fn with_max_ranges(max_ranges: usize) -> Self {
        Self {
            ranges: VecDeque::new(),
            max_ranges,
        }
    }

    /// Add a single packet number, extending or merging ranges as needed.
    ///
    /// Arrivals above the current highest range are handled without a search.
    /// Anything else is located with a binary search over the ranges.
    ///
    /// # Errors
    ///
    /// [`Error::StorageExhausted`] if a new range is needed and storage for it
    /// can't be had.  The set is unchanged in that case.
    pub fn add(&mut self, pn: PacketNumber) -> Res<Insertion> {
        let idx = match self.ranges.front() {
            Some(head) if pn <= head.high => self.ranges.partition_point(|r| r.low > pn),
            _ => 0,
        };
        if self.ranges.get(idx).is_some_and(|r| r.contains(pn)) {
            return Ok(Insertion::Duplicate);
        }

        // Everything before `idx` is above `pn`, everything from `idx` is below it.
        let joins_above = idx > 0 && self.ranges[idx - 1].low - 1 == pn;
        let joins_below = self.ranges.get(idx).is_some_and(|r| r.high + 1 == pn);
        match (joins_above, joins_below) {
            (true, true) => {
                let below = self.ranges[idx];
                self.ranges[idx - 1].low = below.low;
                self.ranges.remove(idx);
            }
            (true, false) => self.ranges[idx - 1].low = pn,
            (false, true) => self.ranges[idx].high = pn,
            (false, false) => self.insert_range(idx, PacketRange::single(pn))?,
        }

        if cfg!(debug_assertions) {
            self.sanity_check();
        }
        Ok(Insertion::Inserted)
    }

    fn insert_range(&mut self, idx: usize, range: PacketRange) -> Res<()> {
        if self.ranges.len() >= self.max_ranges {
            qwarn!("Range limit {} reached, refusing {range}", self.max_ranges);
            return Err(Error::StorageExhausted);
        }
        self.ranges.try_reserve(1).map_err(|e| {
            qwarn!("Unable to grow range storage: {e}");
            Error::from(e)
        })?;
        self.ranges.insert(idx, range);
        Ok(())
    }

    /// Whether `pn` is held by the set.
    #[must_use]
    pub fn contains(&self, pn: PacketNumber) -> bool {
        let idx = self.ranges.partition_point(|r| r.low > pn);
        self.ranges.get(idx).is_some_and(|r| r.contains(pn))
    }

    /// Drop every packet number below `cutoff`.  Ranges wholly below are
    /// removed, a range that straddles `cutoff` is trimmed to start there.
    /// Returns how many packet numbers were dropped.
    pub fn truncate_below(&mut self, cutoff: PacketNumber) -> u64 {
        let mut removed = 0;
        while let Some(lowest) = self.ranges.back_mut() {
            if lowest.high < cutoff {
                removed += lowest.len();
                self.ranges.pop_back();
            } else {
                if lowest.low < cutoff {
                    removed += cutoff - lowest.low;
                    lowest.low = cutoff;
                }
                break;
            }
        }

        if cfg!(debug_assertions) {
            self.sanity_check();
        }
        removed
    }

    /// Remove everything and release the storage.
    pub fn clear(&mut self) {
        self.ranges = VecDeque::new();
    }

    /// The highest range.
    #[must_use]
    pub fn first(&self) -> Option<&PacketRange> {
        self.ranges.front()
    }

    /// The lowest range.
    #[must_use]
    pub fn last(&self) -> Option<&PacketRange> {
        self.ranges.back()
    }

    /// Walk the ranges from highest to lowest.
    #[must_use]
    pub fn iter(&self) -> Ranges<'_> {
        Ranges {
            inner: self.ranges.iter(),
        }
    }

    /// The number of ranges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The number of packet numbers held, summed over all ranges.
    #[must_use]
    pub fn packet_count(&self) -> u64 {
        self.ranges.iter().map(PacketRange::len).sum()
    }

    /// Assert that ranges are well-formed, descending, disjoint and not adjacent.
    ///
    /// # Panics
    ///
    /// When any of those properties does not hold.
    pub fn sanity_check(&self) {
        for r in &self.ranges {
            assert!(r.low <= r.high, "inverted range {r}");
        }
        for (above, below) in self.ranges.iter().zip(self.ranges.iter().skip(1)) {
            assert!(
                below.high < above.low && above.low - below.high > 1,
                "ranges {above} and {below} are out of order, overlap or touch"
            );
        }
    }
}

impl<'a> IntoIterator for &'a PacketIntervalSet {
    type Item = &'a PacketRange;
    type IntoIter = Ranges<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A cursor over the ranges of a [`PacketIntervalSet`], highest first.
///
/// It borrows the set, so the set can't change while ranges are being read.
#[derive(Debug, Clone)]
pub struct Ranges<'a> {
    inner: vec_deque::Iter<'a, PacketRange>,
}

impl<'a> Iterator for Ranges<'a> {
    type Item = &'a PacketRange;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Ranges<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Ranges<'_> {}
impl FusedIterator for Ranges<'_> {}
