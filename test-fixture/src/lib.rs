// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    sync::OnceLock,
    time::{Duration, Instant},
};

/// Initialize the test fixture.  Sets up logging so that `RUST_LOG`
/// controls what tests print.
pub fn fixture_init() {
    rechist_common::log::init(None);
}

fn base_time() -> Instant {
    static BASE_TIME: OnceLock<Instant> = OnceLock::new();
    *BASE_TIME.get_or_init(Instant::now)
}

/// The current time for the test.  This is fixed for the whole test run, so
/// tests that want time to pass use `now() + Duration`.
#[must_use]
pub fn now() -> Instant {
    fixture_init();
    base_time()
}

/// `now()` advanced by `ms` milliseconds.
#[must_use]
pub fn later(ms: u64) -> Instant {
    now() + Duration::from_millis(ms)
}
