// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::BTreeSet;

use rechist_transport::{
    AckTracker, ConnectionId, Error, HistoryParameters, PacketNumberSpace, Received,
    ReceivedHistory,
};
use test_fixture::{later, now};

fn history() -> ReceivedHistory {
    ReceivedHistory::new(ConnectionId::from([0xc0, 0xff, 0xee]))
}

/// Turn the ranges into the (largest, first range, [(gap, range)]) fields of
/// a QUIC ACK frame, the way a frame writer would.
fn ack_fields(hist: &ReceivedHistory) -> (u64, u64, Vec<(u64, u64)>) {
    let first = hist.first().expect("history should not be empty");
    let mut smallest = first.low();
    let mut rest = Vec::new();
    for r in hist.into_iter().skip(1) {
        rest.push((smallest - r.high() - 2, r.len() - 1));
        smallest = r.low();
    }
    (first.high(), first.len() - 1, rest)
}

#[test]
fn ack_ranges_with_gaps() {
    let mut hist = history();
    for pn in [1, 2, 3, 7, 8, 20, 9, 15] {
        assert_eq!(hist.received(pn, now()), Ok(Received::New));
    }
    let (largest, first, rest) = ack_fields(&hist);
    assert_eq!(largest, 20);
    assert_eq!(first, 0);
    // 15, then 7..=9, then 1..=3.
    assert_eq!(rest, [(3, 0), (4, 2), (2, 2)]);
}

#[test]
fn reordered_arrivals_and_pruning() {
    let mut hist = history();
    let arrivals = [3, 1, 2, 6, 5, 10, 4, 9, 8, 7, 12];
    for (i, pn) in arrivals.into_iter().enumerate() {
        let t = later(u64::try_from(i).unwrap());
        assert_eq!(hist.received(pn, t), Ok(Received::New));
    }
    assert_eq!(hist.packet_count(), 11);
    assert_eq!(hist.largest_packno(), 12);
    assert_eq!(hist.largest_recv_time(), Some(later(10)));
    assert_eq!(hist.ranges().len(), 2);

    hist.stop_wait(11).unwrap();
    assert_eq!(hist.packet_count(), 1);
    assert_eq!(hist.ranges().len(), 1);
    for pn in 1..11 {
        assert_eq!(hist.received(pn, later(20)), Ok(Received::Duplicate));
    }
    assert_eq!(hist.received(12, later(20)), Ok(Received::Duplicate));
    assert_eq!(hist.received(11, later(21)), Ok(Received::New));
    assert_eq!(hist.packet_count(), 2);
    assert_eq!(hist.largest_recv_time(), Some(later(10)));
    assert_eq!(hist.stats().pruned, 10);
}

/// Drive a history with a scrambled mix of arrivals and stop-waits and
/// check it against a simple model after every step.
#[test]
fn invariants_hold_throughout() {
    let mut hist = history();
    let mut model = BTreeSet::new();
    let mut cutoff = 1;
    let mut x = 0x9e37_79b9_7f4a_7c15_u64;
    for step in 0..5000_u64 {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        if x % 97 == 0 {
            let new_cutoff = cutoff + x % 20;
            hist.stop_wait(new_cutoff).unwrap();
            cutoff = new_cutoff;
            model.retain(|&pn| pn >= cutoff);
        } else {
            let pn = step / 4 + x % 64;
            let expected = if pn == 0 {
                Err(Error::InvalidPacketNumber)
            } else if pn < cutoff || !model.insert(pn) {
                Ok(Received::Duplicate)
            } else {
                Ok(Received::New)
            };
            assert_eq!(hist.received(pn, now()), expected);
        }

        hist.ranges().sanity_check();
        assert_eq!(hist.packet_count(), u64::try_from(model.len()).unwrap());
        assert_eq!(hist.packet_count(), hist.ranges().packet_count());
        assert_eq!(
            hist.largest_packno(),
            model.last().copied().unwrap_or_default()
        );
    }
}

#[test]
fn range_limit_is_not_fatal() {
    let params = HistoryParameters::default().max_ranges(3);
    let mut hist = ReceivedHistory::with_parameters(ConnectionId::default(), &params);
    for pn in [1, 3, 5] {
        hist.received(pn, now()).unwrap();
    }
    assert_eq!(hist.received(7, now()), Err(Error::StorageExhausted));
    assert_eq!(hist.packet_count(), 3);

    // Pruning frees a slot.
    hist.stop_wait(2).unwrap();
    assert_eq!(hist.received(7, now()), Ok(Received::New));
    assert_eq!(hist.packet_count(), 3);
}

#[test]
fn tracker_handshake_flow() {
    let cid = ConnectionId::from([1, 2, 3, 4, 5, 6, 7, 8]);
    let mut tracker = AckTracker::new(&cid, &HistoryParameters::default());
    tracker
        .received(PacketNumberSpace::Initial, 1, now())
        .unwrap();
    tracker
        .received(PacketNumberSpace::Handshake, 1, later(1))
        .unwrap();
    tracker.drop_space(PacketNumberSpace::Initial);
    for pn in 1..=4 {
        tracker
            .received(PacketNumberSpace::ApplicationData, pn, later(2))
            .unwrap();
    }
    let app = tracker.get(PacketNumberSpace::ApplicationData).unwrap();
    assert_eq!(app.ack_delay(later(7)).as_millis(), 5);
    assert_eq!(app.packet_count(), 4);
    assert_eq!(
        tracker.received(PacketNumberSpace::Initial, 2, later(3)),
        Err(Error::SpaceDropped)
    );
}
