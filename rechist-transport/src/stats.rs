// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Tracking of some useful statistics.

use std::fmt::{self, Display, Formatter};

#[derive(Default, Debug, Clone, PartialEq, Eq)]
/// Received history statistics
pub struct Stats {
    /// Packet numbers accepted as new.
    pub packets_rx: u64,
    /// Duplicate packet numbers, including those below the cutoff.
    pub dups_rx: u64,
    /// Packet numbers refused as invalid.
    pub invalid_rx: u64,
    /// Packet numbers refused because range storage ran out.
    pub exhausted_rx: u64,
    /// Packet numbers discarded by stop-wait.
    pub pruned: u64,
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "rx: {} dup {} invalid {} exhausted {} pruned {}",
            self.packets_rx, self.dups_rx, self.invalid_rx, self.exhausted_rx, self.pruned
        )
    }
}
