// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Tunables for a received packet history.

use crate::PacketNumber;

/// The lowest packet number that can ever be received.
pub const FIRST_VALID_PACKET_NUMBER: PacketNumber = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryParameters {
    /// The most ranges that will be held at once.
    max_ranges: usize,
    /// The cutoff used until a stop-wait sets one.
    initial_cutoff: PacketNumber,
}

impl Default for HistoryParameters {
    fn default() -> Self {
        Self {
            max_ranges: usize::MAX,
            initial_cutoff: FIRST_VALID_PACKET_NUMBER,
        }
    }
}

impl HistoryParameters {
    #[must_use]
    pub const fn get_max_ranges(&self) -> usize {
        self.max_ranges
    }

    /// Limit the number of disjoint ranges the history may hold.  A packet
    /// that would need another range once this is reached is refused with
    /// [`crate::Error::StorageExhausted`].
    ///
    /// # Panics
    ///
    /// If `v` is zero.
    #[must_use]
    pub fn max_ranges(mut self, v: usize) -> Self {
        assert!(v > 0, "a history needs room for at least one range");
        self.max_ranges = v;
        self
    }

    #[must_use]
    pub const fn get_initial_cutoff(&self) -> PacketNumber {
        self.initial_cutoff
    }

    /// Packet numbers below this are duplicates until the first stop-wait.
    /// Packet number 0 is never valid, so smaller values are raised to 1.
    #[must_use]
    pub fn initial_cutoff(mut self, v: PacketNumber) -> Self {
        self.initial_cutoff = v.max(FIRST_VALID_PACKET_NUMBER);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{HistoryParameters, FIRST_VALID_PACKET_NUMBER};

    #[test]
    fn defaults() {
        let p = HistoryParameters::default();
        assert_eq!(p.get_max_ranges(), usize::MAX);
        assert_eq!(p.get_initial_cutoff(), FIRST_VALID_PACKET_NUMBER);
    }

    #[test]
    fn initial_cutoff_clamped() {
        let p = HistoryParameters::default().initial_cutoff(0);
        assert_eq!(p.get_initial_cutoff(), 1);
        let p = p.initial_cutoff(100);
        assert_eq!(p.get_initial_cutoff(), 100);
    }

    #[test]
    #[should_panic(expected = "at least one range")]
    fn zero_ranges() {
        _ = HistoryParameters::default().max_ranges(0);
    }
}
