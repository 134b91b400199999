// Wall-clock pacing and emission order.
use std::time::{Duration, Instant};

use dmgplay::player::{self, samples_to_duration};
use dmgplay::{Interrupt, Outcome, Session};

use crate::RecordingLink;

#[test]
fn ntsc_frame_wait_takes_at_least_a_frame() {
    let mut session = Session::new(std::io::sink(), Interrupt::new());
    let begin = Instant::now();
    let outcome = player::play(&mut session, &[0x62], 0, 1).unwrap();
    let elapsed = begin.elapsed();

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(session.clock().samples(), 735);
    assert!(
        elapsed >= Duration::from_nanos(735 * 1_000_000_000 / 44_100),
        "returned after {:?}",
        elapsed
    );
}

#[test]
fn pal_frame_and_short_waits_accumulate() {
    let mut session = Session::new(std::io::sink(), Interrupt::new());
    session.start_clock();
    let data = [0x63, 0x75, 0x61, 0x10, 0x00];
    player::play(&mut session, &data, 0, data.len()).unwrap();
    assert_eq!(session.clock().samples(), 882 + 6 + 16);
    let origin = session.clock().origin().unwrap();
    assert!(origin.elapsed() >= samples_to_duration(904));
}

#[test]
fn writes_follow_file_order_and_timing() {
    let (link, log) = RecordingLink::new();
    let mut session = Session::new(link, Interrupt::new());
    session.start_clock();
    let origin = session.clock().origin().unwrap();

    let data = [
        0xB3, 0x12, 0xF0, // NR12
        0x61, 0xB9, 0x01, // wait 441
        0xB3, 0x13, 0x6B, // NR13
        0x62, // wait 735
        0xB3, 0x14, 0x87, // NR14 trigger
        0x66,
    ];
    let outcome = player::play(&mut session, &data, 0, data.len()).unwrap();
    assert_eq!(outcome, Outcome::Completed);
    session.shutdown().unwrap();

    let log = log.lock().unwrap();
    let payloads: Vec<&[u8]> = log.packets.iter().map(|(_, p)| p.as_slice()).collect();
    assert_eq!(
        payloads,
        vec![
            &[0xB3, 0x12, 0xF0][..],
            &[0xB3, 0x13, 0x6B][..],
            &[0xB3, 0x14, 0x87][..],
            &[0xB3, 0x16, 0x00][..],
        ]
    );

    let times: Vec<Instant> = log.packets.iter().map(|(t, _)| *t).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
    assert!(times[1] - origin >= samples_to_duration(441));
    assert!(times[2] - origin >= samples_to_duration(441 + 735));
    assert_eq!(log.flushes, 4);
}
