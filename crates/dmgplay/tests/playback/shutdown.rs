// Once-only mute and release of the link.
use dmgplay::player::{self, MUTE};
use dmgplay::{Capture, Error, Interrupt, LoopConfig, Outcome, Session};

use crate::{CaptureBuilder, RecordingLink};

#[test]
fn natural_completion_mutes_and_releases() {
    let capture = Capture::load(CaptureBuilder::new().write(0x12, 0xF0).build()).unwrap();
    let (link, log) = RecordingLink::new();
    let mut session = Session::new(link, Interrupt::new());

    assert_eq!(
        player::run(&mut session, &capture, LoopConfig::default()).unwrap(),
        Outcome::Completed
    );
    session.shutdown().unwrap();
    assert!(session.is_shut_down());

    let log = log.lock().unwrap();
    assert_eq!(log.bytes(), vec![0xB3, 0x12, 0xF0, 0xB3, 0x16, 0x00]);
    assert_eq!(log.closes, 1);
}

#[test]
fn interrupt_then_completion_mutes_once() {
    let capture = Capture::load(
        CaptureBuilder::new()
            .write(0x00, 0x01)
            .wait(44_100)
            .write(0x00, 0x02)
            .build(),
    )
    .unwrap();
    let interrupt = Interrupt::new();
    let (link, log) = RecordingLink::interrupting_after(1, interrupt.clone());
    let mut session = Session::new(link, interrupt.clone());

    // the one-second wait is cut short by the interrupt
    let outcome = player::run(&mut session, &capture, LoopConfig::default()).unwrap();
    assert_eq!(outcome, Outcome::Interrupted);

    // interruption path
    session.shutdown().unwrap();
    assert!(interrupt.is_shutting_down());
    // natural-completion path arriving late
    session.shutdown().unwrap();
    drop(session);

    let log = log.lock().unwrap();
    assert_eq!(log.mute_count(), 1);
    assert_eq!(log.closes, 1);
    assert_eq!(log.bytes(), vec![0xB3, 0x00, 0x01, 0xB3, 0x16, 0x00]);
}

#[test]
fn completion_then_interrupt_mutes_once() {
    let capture = Capture::load(CaptureBuilder::new().write(0x00, 0x01).build()).unwrap();
    let interrupt = Interrupt::new();
    let (link, log) = RecordingLink::new();
    let mut session = Session::new(link, interrupt.clone());

    assert_eq!(
        player::run(&mut session, &capture, LoopConfig::default()).unwrap(),
        Outcome::Completed
    );
    session.shutdown().unwrap();

    // a late Ctrl-C only raises the flag; nothing reaches the link
    interrupt.request();
    session.shutdown().unwrap();
    drop(session);

    let log = log.lock().unwrap();
    assert_eq!(log.mute_count(), 1);
    assert_eq!(log.closes, 1);
}

#[test]
fn dropping_a_session_mutes_the_chip() {
    let (link, log) = RecordingLink::new();
    {
        let _session = Session::new(link, Interrupt::new());
    }
    let log = log.lock().unwrap();
    assert_eq!(log.bytes(), MUTE.to_bytes().to_vec());
    assert_eq!(log.closes, 1);
}

#[test]
fn playing_after_shutdown_is_a_link_error() {
    let (link, _log) = RecordingLink::new();
    let mut session = Session::new(link, Interrupt::new());
    session.shutdown().unwrap();
    let r = player::play(&mut session, &[0xB3, 0x00, 0x00], 0, 3);
    assert!(matches!(r, Err(Error::LinkWrite(_))));
}
