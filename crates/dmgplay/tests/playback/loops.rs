// Loop controller behaviour through `player::run`.
use dmgplay::player;
use dmgplay::{Capture, Interrupt, LoopConfig, Outcome, Session};

use crate::{CaptureBuilder, RecordingLink, maybe_write_vgm};

const INTRO: [u8; 3] = [0xB3, 0x00, 0x01];
const BODY: [u8; 3] = [0xB3, 0x01, 0x02];

fn looping_capture() -> Capture {
    let bytes = CaptureBuilder::new()
        .write(0x00, 0x01)
        .mark_loop()
        .write(0x01, 0x02)
        .raw(&[0x70])
        .gd3(&[Some("Loop"), None, Some("dmgplay tests")])
        .build();
    maybe_write_vgm("looping.vgm", &bytes);
    Capture::load(bytes).unwrap()
}

fn count(log: &crate::LinkLog, packet: &[u8]) -> usize {
    log.packets.iter().filter(|(_, p)| p.as_slice() == packet).count()
}

#[test]
fn loop_segment_repeats_exactly_n_times() {
    let capture = looping_capture();
    let (link, log) = RecordingLink::new();
    let mut session = Session::new(link, Interrupt::new());

    let outcome = player::run(&mut session, &capture, LoopConfig::new(3)).unwrap();
    assert_eq!(outcome, Outcome::Completed);

    let log = log.lock().unwrap();
    assert_eq!(count(&log, &INTRO), 1);
    // one pass of the body during the initial run, then three repeats
    assert_eq!(count(&log, &BODY), 1 + 3);
    assert_eq!(log.mute_count(), 0);
    // one short wait per pass, continuing across loop boundaries
    assert_eq!(session.clock().samples(), 4);
}

#[test]
fn infinite_loop_runs_until_interrupted() {
    let capture = looping_capture();
    let interrupt = Interrupt::new();
    let (link, log) = RecordingLink::interrupting_after(50, interrupt.clone());
    let mut session = Session::new(link, interrupt);

    let outcome = player::run(&mut session, &capture, LoopConfig::infinite()).unwrap();
    assert_eq!(outcome, Outcome::Interrupted);
    session.shutdown().unwrap();

    let log = log.lock().unwrap();
    assert_eq!(count(&log, &INTRO), 1);
    assert_eq!(count(&log, &BODY), 49);
    assert_eq!(log.mute_count(), 1);
    assert_eq!(log.packets.last().unwrap().1, vec![0xB3, 0x16, 0x00]);
}

#[test]
fn capture_without_loop_plays_once() {
    let bytes = CaptureBuilder::new()
        .write(0x00, 0x01)
        .write(0x01, 0x02)
        .build();
    let capture = Capture::load(bytes).unwrap();
    assert_eq!(capture.offsets().loop_start, None);

    let (link, log) = RecordingLink::new();
    let mut session = Session::new(link, Interrupt::new());
    let outcome = player::run(&mut session, &capture, LoopConfig::infinite()).unwrap();
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(log.lock().unwrap().packets.len(), 2);
}

#[test]
fn loop_stops_at_tag_block() {
    // the Gd3 block would otherwise be walked as commands; 0xB3 inside the
    // UTF-16 text must never reach the link
    let mut bytes = CaptureBuilder::new()
        .mark_loop()
        .raw(&[0x70])
        .gd3(&[Some("\u{B3B3}\u{B3B3}")])
        .build();
    // drop the end-of-data marker so passes run into the tag boundary
    let end_marker = crate::DATA_START + 1;
    bytes[end_marker] = 0x00;
    let capture = Capture::load(bytes).unwrap();

    let (link, log) = RecordingLink::new();
    let mut session = Session::new(link, Interrupt::new());
    let outcome = player::run(&mut session, &capture, LoopConfig::new(2)).unwrap();
    assert_eq!(outcome, Outcome::Completed);
    assert!(log.lock().unwrap().packets.is_empty());
    assert_eq!(session.clock().samples(), 3);
}
