// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Received histories for each packet number space of a connection.

use std::time::Instant;

use enum_map::{Enum, EnumMap};
use rechist_common::qdebug;

use crate::{
    params::HistoryParameters,
    rechist::{Received, ReceivedHistory},
    ConnectionId, Error, PacketNumber, Res,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Enum, strum::Display, strum::EnumIter,
)]
pub enum PacketNumberSpace {
    #[strum(to_string = "in")]
    Initial,
    #[strum(to_string = "hs")]
    Handshake,
    #[strum(to_string = "ap")]
    ApplicationData,
}

/// One [`ReceivedHistory`] per packet number space.  Spaces are dropped
/// once their keys are discarded and can't be used after that.
#[derive(Debug)]
pub struct AckTracker {
    spaces: EnumMap<PacketNumberSpace, Option<ReceivedHistory>>,
}

impl AckTracker {
    #[must_use]
    pub fn new(cid: &ConnectionId, params: &HistoryParameters) -> Self {
        Self {
            spaces: EnumMap::from_fn(|space| {
                Some(ReceivedHistory::for_space(cid.clone(), space, params))
            }),
        }
    }

    #[must_use]
    pub fn get(&self, space: PacketNumberSpace) -> Option<&ReceivedHistory> {
        self.spaces[space].as_ref()
    }

    fn live_mut(&mut self, space: PacketNumberSpace) -> Res<&mut ReceivedHistory> {
        self.spaces[space].as_mut().ok_or(Error::SpaceDropped)
    }

    /// # Errors
    ///
    /// [`Error::SpaceDropped`] if `space` is gone, otherwise as for
    /// [`ReceivedHistory::received`].
    pub fn received(
        &mut self,
        space: PacketNumberSpace,
        pn: PacketNumber,
        now: Instant,
    ) -> Res<Received> {
        self.live_mut(space)?.received(pn, now)
    }

    /// # Errors
    ///
    /// [`Error::SpaceDropped`] if `space` is gone, otherwise as for
    /// [`ReceivedHistory::stop_wait`].
    pub fn stop_wait(&mut self, space: PacketNumberSpace, cutoff: PacketNumber) -> Res<()> {
        self.live_mut(space)?.stop_wait(cutoff)
    }

    /// The largest packet number received in `space`; `None` once it is dropped.
    #[must_use]
    pub fn largest_packno(&self, space: PacketNumberSpace) -> Option<PacketNumber> {
        self.get(space).map(ReceivedHistory::largest_packno)
    }

    /// Discard the history for `space`, releasing its storage.
    pub fn drop_space(&mut self, space: PacketNumberSpace) {
        if let Some(hist) = self.spaces[space].take() {
            qdebug!("[{hist}] drop packet number space");
            hist.cleanup();
        }
    }
}
