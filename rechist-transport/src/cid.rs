// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Connection identifiers, as far as the received history cares about them.

use std::{
    fmt::{self, Debug, Display, Formatter},
    ops::Deref,
};

use rechist_common::{hex, hex_with_len};
use smallvec::SmallVec;

pub const MAX_CONNECTION_ID_LEN: usize = 20;

/// An opaque connection ID.  Only used to label log output.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct ConnectionId {
    cid: SmallVec<[u8; MAX_CONNECTION_ID_LEN]>,
}

impl AsRef<[u8]> for ConnectionId {
    fn as_ref(&self) -> &[u8] {
        &self.cid
    }
}

impl Deref for ConnectionId {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.cid
    }
}

impl From<&[u8]> for ConnectionId {
    fn from(buf: &[u8]) -> Self {
        Self {
            cid: SmallVec::from_slice(buf),
        }
    }
}

impl<const N: usize> From<[u8; N]> for ConnectionId {
    fn from(buf: [u8; N]) -> Self {
        Self::from(&buf[..])
    }
}

impl Debug for ConnectionId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "CID {}", hex_with_len(self))
    }
}

impl Display for ConnectionId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", hex(&self.cid))
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionId;

    #[test]
    fn display() {
        let cid = ConnectionId::from([0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(cid.to_string(), "deadbeef");
        assert_eq!(format!("{cid:?}"), "CID [4]: deadbeef");
        assert_eq!(cid.len(), 4);
    }

    #[test]
    fn empty() {
        let cid = ConnectionId::default();
        assert!(cid.is_empty());
        assert_eq!(cid.to_string(), "");
        assert_eq!(format!("{cid:?}"), "CID [0]: ");
    }
}
