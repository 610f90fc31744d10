// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Bookkeeping for received packet numbers.
//!
//! A [`ReceivedHistory`] records which packet numbers arrived on a
//! connection, coalesced into contiguous [`PacketRange`]s.  It classifies
//! each arrival as new or duplicate, and yields the ranges from highest to
//! lowest for building ACK frames.

use std::fmt::{self, Display, Formatter};

mod cid;
mod intervals;
mod params;
mod rechist;
mod stats;
mod tracker;

pub use self::{
    cid::ConnectionId,
    intervals::{Insertion, PacketIntervalSet, PacketRange, Ranges},
    params::HistoryParameters,
    rechist::{Received, ReceivedHistory},
    stats::Stats,
    tracker::{AckTracker, PacketNumberSpace},
};

pub type PacketNumber = u64;
pub type Res<T> = Result<T, Error>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Packet number 0 is reserved and can never be received.
    InvalidPacketNumber,
    /// Range storage could not be grown.
    StorageExhausted,
    /// A stop-wait tried to move the cutoff below its current value.
    CutoffRegression {
        current: PacketNumber,
        requested: PacketNumber,
    },
    /// The packet number space has already been discarded.
    SpaceDropped,
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Received history error: {self:?}")
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::StorageExhausted
    }
}
