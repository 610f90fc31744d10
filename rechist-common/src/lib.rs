// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

pub mod log;

/// Render `buf` as lowercase hex.
#[must_use]
pub fn hex<A: AsRef<[u8]>>(buf: A) -> String {
    ::hex::encode(buf)
}

/// Render `buf` as hex, prefixed with its length in brackets.
#[must_use]
pub fn hex_with_len<A: AsRef<[u8]>>(buf: A) -> String {
    let buf = buf.as_ref();
    format!("[{}]: {}", buf.len(), hex(buf))
}
