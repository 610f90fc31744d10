// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// History of received packets for one connection.

use std::{
    fmt::{self, Display, Formatter},
    time::{Duration, Instant},
};

use rechist_common::{qdebug, qinfo, qtrace, qwarn};

use crate::{
    intervals::{Insertion, PacketIntervalSet, PacketRange, Ranges},
    params::{HistoryParameters, FIRST_VALID_PACKET_NUMBER},
    stats::Stats,
    tracker::PacketNumberSpace,
    ConnectionId, Error, PacketNumber, Res,
};

/// How a received packet number was classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Received {
    /// First arrival; the packet should be processed.
    New,
    /// Seen before, or below the cutoff.
    Duplicate,
}

/// The packet numbers received on a connection.
///
/// Packet numbers below the cutoff are no longer tracked individually and
/// are reported as duplicates.  The cutoff only moves up, via
/// [`ReceivedHistory::stop_wait`].
#[derive(Debug)]
pub struct ReceivedHistory {
    cid: ConnectionId,
    space: Option<PacketNumberSpace>,
    ranges: PacketIntervalSet,
    /// Used as the cutoff until `cutoff` is set.
    initial_cutoff: PacketNumber,
    /// The cutoff from the latest stop-wait, if there was one.
    cutoff: Option<PacketNumber>,
    /// The number of packet numbers held in `ranges`.
    packet_count: u64,
    /// When the current largest packet number arrived.
    largest_recv_time: Option<Instant>,
    stats: Stats,
}

impl ReceivedHistory {
    #[must_use]
    pub fn new(cid: ConnectionId) -> Self {
        Self::with_parameters(cid, &HistoryParameters::default())
    }

    #[must_use]
    pub fn with_parameters(cid: ConnectionId, params: &HistoryParameters) -> Self {
        let hist = Self {
            cid,
            space: None,
            ranges: PacketIntervalSet::with_max_ranges(params.get_max_ranges()),
            initial_cutoff: params.get_initial_cutoff(),
            cutoff: None,
            packet_count: 0,
            largest_recv_time: None,
            stats: Stats::default(),
        };
        qdebug!("[{hist}] instantiated received packet history");
        hist
    }

    pub(crate) fn for_space(
        cid: ConnectionId,
        space: PacketNumberSpace,
        params: &HistoryParameters,
    ) -> Self {
        let mut hist = Self::with_parameters(cid, params);
        hist.space = Some(space);
        hist
    }

    /// Release all range storage.
    pub fn cleanup(mut self) {
        qdebug!(
            "[{self}] cleanup, {} packets in {} ranges",
            self.packet_count,
            self.ranges.len()
        );
        self.ranges.clear();
    }

    const fn effective_cutoff(&self) -> PacketNumber {
        match self.cutoff {
            Some(c) => c,
            None => self.initial_cutoff,
        }
    }

    /// Record the arrival of `pn` at `now`.
    ///
    /// If `pn` is larger than anything received so far, `now` becomes the
    /// largest receive time, even if storing `pn` then fails.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPacketNumber`] for packet number 0.
    /// [`Error::StorageExhausted`] if `pn` can't be stored.  Nothing is counted then.
    pub fn received(&mut self, pn: PacketNumber, now: Instant) -> Res<Received> {
        qtrace!("[{self}] received {pn}");
        if pn == 0 {
            qdebug!("[{self}] packet number 0 is invalid");
            self.stats.invalid_rx += 1;
            return Err(Error::InvalidPacketNumber);
        }
        let cutoff = self.effective_cutoff();
        if pn < cutoff {
            qdebug!("[{self}] {pn} is below cutoff {cutoff}");
            self.stats.dups_rx += 1;
            return Ok(Received::Duplicate);
        }

        if self.ranges.first().map_or(true, |r| pn > r.high()) {
            self.largest_recv_time = Some(now);
        }

        match self.ranges.add(pn) {
            Ok(Insertion::Inserted) => {
                self.packet_count += 1;
                self.stats.packets_rx += 1;
                Ok(Received::New)
            }
            Ok(Insertion::Duplicate) => {
                qdebug!("[{self}] duplicate {pn}");
                self.stats.dups_rx += 1;
                Ok(Received::Duplicate)
            }
            Err(e) => {
                self.stats.exhausted_rx += 1;
                Err(e)
            }
        }
    }

    /// Forget packet numbers below `cutoff`.
    ///
    /// # Errors
    ///
    /// [`Error::CutoffRegression`] if `cutoff` is below the cutoff in force,
    /// whether that came from an earlier stop-wait or from the parameters.
    /// The history is not changed.
    pub fn stop_wait(&mut self, cutoff: PacketNumber) -> Res<()> {
        qinfo!("[{self}] stop wait: {cutoff}");
        let current = self.effective_cutoff();
        let regresses = match self.cutoff {
            Some(set) => cutoff < set,
            // Packet number 0 is never valid, so a cutoff of 0 or 1 admits nothing new.
            None => cutoff.max(FIRST_VALID_PACKET_NUMBER) < current,
        };
        if regresses {
            qwarn!("[{self}] refusing to move cutoff back from {current} to {cutoff}");
            return Err(Error::CutoffRegression {
                current,
                requested: cutoff,
            });
        }
        if self.cutoff == Some(cutoff) {
            return Ok(());
        }

        self.cutoff = Some(cutoff);
        let removed = self.ranges.truncate_below(cutoff);
        self.packet_count -= removed;
        self.stats.pruned += removed;
        debug_assert_eq!(self.packet_count, self.ranges.packet_count());
        Ok(())
    }

    /// The largest packet number received, or 0 if the history is empty.
    #[must_use]
    pub fn largest_packno(&self) -> PacketNumber {
        self.ranges.first().map_or(0, PacketRange::high)
    }

    /// The cutoff set by the last stop-wait, or 0 if there hasn't been one.
    #[must_use]
    pub fn cutoff(&self) -> PacketNumber {
        self.cutoff.unwrap_or(0)
    }

    /// When the largest packet number was first received.
    #[must_use]
    pub const fn largest_recv_time(&self) -> Option<Instant> {
        self.largest_recv_time
    }

    /// How long ago the largest packet number arrived, for the ACK Delay field.
    #[must_use]
    pub fn ack_delay(&self, now: Instant) -> Duration {
        self.largest_recv_time
            .map_or(Duration::ZERO, |t| now.saturating_duration_since(t))
    }

    /// Whether `pn` would be classified as a duplicate.
    #[must_use]
    pub fn is_duplicate(&self, pn: PacketNumber) -> bool {
        pn != 0 && (pn < self.effective_cutoff() || self.ranges.contains(pn))
    }

    /// The highest range.
    #[must_use]
    pub fn first(&self) -> Option<&PacketRange> {
        self.ranges.first()
    }

    /// The ranges for an ACK frame, highest first.
    #[must_use]
    pub fn iter(&self) -> Ranges<'_> {
        self.ranges.iter()
    }

    #[must_use]
    pub const fn packet_count(&self) -> u64 {
        self.packet_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    #[must_use]
    pub const fn ranges(&self) -> &PacketIntervalSet {
        &self.ranges
    }

    #[must_use]
    pub const fn cid(&self) -> &ConnectionId {
        &self.cid
    }

    #[must_use]
    pub const fn stats(&self) -> &Stats {
        &self.stats
    }
}

impl<'a> IntoIterator for &'a ReceivedHistory {
    type Item = &'a PacketRange;
    type IntoIter = Ranges<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for ReceivedHistory {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "RecvHist {}", self.cid)?;
        if let Some(space) = self.space {
            write!(f, " {space}")?;
        }
        Ok(())
    }
}
