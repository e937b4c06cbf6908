//! Lifecycle tests for the recognition stream as driven through the
//! command-surface facade.

use std::cell::RefCell;
use std::rc::Rc;

use chess_session::ShakmatyOracle;
use voice_control::app::VoiceChess;
use voice_control::language::RecognitionLanguage;
use voice_control::listening::{
    RecognitionError, RecognitionErrorKind, RecognitionStream, StreamEvent,
};

#[derive(Clone, Default)]
struct Probe {
    opens: Rc<RefCell<usize>>,
}

struct CountingStream {
    probe: Probe,
}

impl RecognitionStream for CountingStream {
    fn open(&mut self, _language: RecognitionLanguage) -> Result<(), RecognitionError> {
        *self.probe.opens.borrow_mut() += 1;
        Ok(())
    }
    fn close(&mut self) {}
}

fn app(probe: &Probe) -> VoiceChess<ShakmatyOracle, CountingStream> {
    VoiceChess::new(
        ShakmatyOracle::new(),
        CountingStream {
            probe: probe.clone(),
        },
        RecognitionLanguage::default(),
    )
}

#[test]
fn stream_end_after_stop_listening_never_restarts() {
    let probe = Probe::default();
    let mut a = app(&probe);
    a.start_listening();
    a.stop_listening();
    a.handle_stream_event(StreamEvent::Ended);
    assert!(!a.is_listening());
    assert_eq!(*probe.opens.borrow(), 1);
}

#[test]
fn no_speech_cycles_keep_the_microphone_hot() {
    let probe = Probe::default();
    let mut a = app(&probe);
    a.start_listening();
    for _ in 0..3 {
        a.handle_stream_event(StreamEvent::Error(RecognitionErrorKind::NoSpeech));
        a.handle_stream_event(StreamEvent::Ended);
    }
    assert!(a.is_listening());
    assert_eq!(*probe.opens.borrow(), 4);

    // The mill still grinds: the next utterance plays a move.
    a.handle_stream_event(StreamEvent::Transcript("pawn e4".to_string()));
    assert_eq!(a.session_snapshot().moves, vec!["e4".to_string()]);
}

#[test]
fn permission_denial_blocks_listening_for_the_session() {
    let probe = Probe::default();
    let mut a = app(&probe);
    a.start_listening();
    a.handle_stream_event(StreamEvent::Error(RecognitionErrorKind::PermissionDenied));
    a.handle_stream_event(StreamEvent::Ended);
    assert!(!a.is_listening());

    a.start_listening();
    assert!(!a.is_listening());
    assert_eq!(*probe.opens.borrow(), 1);

    let message = a.listening_snapshot().message.unwrap();
    assert!(message.contains("Microphone access denied"));
}

#[test]
fn game_state_survives_recognition_trouble() {
    let probe = Probe::default();
    let mut a = app(&probe);
    a.start_listening();
    a.handle_stream_event(StreamEvent::Transcript("pawn e4".to_string()));
    a.handle_stream_event(StreamEvent::Error(RecognitionErrorKind::Network));
    a.handle_stream_event(StreamEvent::Ended);

    let snap = a.session_snapshot();
    assert_eq!(snap.moves, vec!["e4".to_string()]);
    assert_eq!(snap.status, "ongoing");
}
