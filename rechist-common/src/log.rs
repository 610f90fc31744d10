// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    io::Write as _,
    sync::{Once, OnceLock},
    time::{Duration, Instant},
};

use env_logger::Builder;
use log::LevelFilter;

#[macro_export]
macro_rules! do_log {
    ($lvl:expr, $($arg:tt)+) => ( ::log::log!($lvl, $($arg)+) );
}

#[macro_export]
macro_rules! qerror {
    ($($arg:tt)*) => ( $crate::do_log!(::log::Level::Error, $($arg)*) );
}
#[macro_export]
macro_rules! qwarn {
    ($($arg:tt)*) => ( $crate::do_log!(::log::Level::Warn, $($arg)*) );
}
#[macro_export]
macro_rules! qinfo {
    ($($arg:tt)*) => ( $crate::do_log!(::log::Level::Info, $($arg)*) );
}
#[macro_export]
macro_rules! qdebug {
    ($($arg:tt)*) => ( $crate::do_log!(::log::Level::Debug, $($arg)*) );
}
#[macro_export]
macro_rules! qtrace {
    ($($arg:tt)*) => ( $crate::do_log!(::log::Level::Trace, $($arg)*) );
}

fn since_start() -> Duration {
    static START_TIME: OnceLock<Instant> = OnceLock::new();
    START_TIME.get_or_init(Instant::now).elapsed()
}

/// Install the `env_logger` backend, reading filters from `RUST_LOG`.
/// Only the first call has any effect.  `level_filter` overrides the
/// environment when set.
pub fn init(level_filter: Option<LevelFilter>) {
    static INIT_ONCE: Once = Once::new();

    INIT_ONCE.call_once(|| {
        let mut builder = Builder::from_env("RUST_LOG");
        if let Some(filter) = level_filter {
            builder.filter_level(filter);
        }
        builder.format(|buf, record| {
            let elapsed = since_start();
            writeln!(
                buf,
                "{}.{:03} {} {}",
                elapsed.as_secs(),
                elapsed.subsec_millis(),
                record.level(),
                record.args()
            )
        });
        if let Err(e) = builder.try_init() {
            do_log!(::log::Level::Warn, "Logging initialization error {e:?}");
        } else {
            do_log!(::log::Level::Debug, "Logging initialized");
        }
    });
}
