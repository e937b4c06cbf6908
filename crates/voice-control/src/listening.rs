//! Recognition-stream lifecycle.
//!
//! The manager is the sole owner of the stream handle: nothing else may
//! open or close it. "Auto-restart unless explicitly stopped or permanently
//! blocked" lives here as one transition table instead of scattered flags.

use std::fmt;

use serde::Serialize;

use crate::language::RecognitionLanguage;

/// Error classes a recognition stream can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    /// Microphone access denied. Terminal for this session; only a user
    /// action outside this core can clear it.
    PermissionDenied,
    /// No speech before the stream gave up. Expected, silently retried.
    NoSpeech,
    Network,
    Other,
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecognitionErrorKind::PermissionDenied => "permission-denied",
            RecognitionErrorKind::NoSpeech => "no-speech",
            RecognitionErrorKind::Network => "network",
            RecognitionErrorKind::Other => "other",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("recognition stream failed to open: {kind}")]
    OpenFailed { kind: RecognitionErrorKind },
}

/// One recognition stream. The manager never opens a second stream without
/// closing the first.
pub trait RecognitionStream {
    fn open(&mut self, language: RecognitionLanguage) -> Result<(), RecognitionError>;
    fn close(&mut self);
}

/// Events an open stream delivers, one at a time, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// One completed utterance.
    Transcript(String),
    Error(RecognitionErrorKind),
    /// End of this stream instance, with or without a prior error.
    Ended,
}

/// Presentation snapshot of the listening side.
#[derive(Debug, Clone, Serialize)]
pub struct ListeningSnapshot {
    pub listening: bool,
    pub language: String,
    pub last_heard: Option<String>,
    pub message: Option<String>,
}

pub struct ListeningManager<S: RecognitionStream> {
    stream: S,
    language: RecognitionLanguage,
    /// What the user asked for, as opposed to what the stream is doing.
    desired: bool,
    active: bool,
    permanently_blocked: bool,
    last_heard: Option<String>,
    message: Option<String>,
}

impl<S: RecognitionStream> ListeningManager<S> {
    pub fn new(stream: S, language: RecognitionLanguage) -> Self {
        Self {
            stream,
            language,
            desired: false,
            active: false,
            permanently_blocked: false,
            last_heard: None,
            message: None,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.active
    }

    pub fn language(&self) -> RecognitionLanguage {
        self.language
    }

    pub fn last_heard(&self) -> Option<&str> {
        self.last_heard.as_deref()
    }

    pub fn start_listening(&mut self) {
        if self.permanently_blocked {
            tracing::warn!("listening blocked by an earlier permission denial");
            return;
        }
        self.desired = true;
        self.open_stream();
    }

    /// The only path that prevents auto-restart.
    pub fn stop_listening(&mut self) {
        self.desired = false;
        if self.active {
            self.stream.close();
            self.active = false;
            tracing::debug!("recognition stream closed");
        }
    }

    /// Switching language restarts an active stream so the new locale takes
    /// effect immediately.
    pub fn set_language(&mut self, language: RecognitionLanguage) {
        self.language = language;
        if self.active {
            self.stream.close();
            self.active = false;
            self.open_stream();
        }
    }

    /// Feed one stream event through the transition table. Returns the
    /// transcript to forward into the move pipeline, if the event carried
    /// one.
    pub fn handle_event(&mut self, event: StreamEvent) -> Option<String> {
        match event {
            StreamEvent::Transcript(text) => {
                self.last_heard = Some(text.clone());
                self.message = None;
                Some(text)
            }
            StreamEvent::Error(kind) => {
                self.note_error(kind);
                None
            }
            StreamEvent::Ended => {
                self.active = false;
                if self.desired && !self.permanently_blocked {
                    tracing::debug!("restarting recognition stream");
                    self.open_stream();
                }
                None
            }
        }
    }

    pub fn snapshot(&self) -> ListeningSnapshot {
        ListeningSnapshot {
            listening: self.active,
            language: self.language.tag().to_string(),
            last_heard: self.last_heard.clone(),
            message: self.message.clone(),
        }
    }

    fn open_stream(&mut self) {
        if self.active {
            // Single-active-stream invariant.
            return;
        }
        match self.stream.open(self.language) {
            Ok(()) => {
                self.active = true;
                tracing::debug!(language = %self.language, "recognition stream opened");
            }
            Err(RecognitionError::OpenFailed { kind }) => self.note_error(kind),
        }
    }

    fn note_error(&mut self, kind: RecognitionErrorKind) {
        if kind == RecognitionErrorKind::PermissionDenied {
            self.permanently_blocked = true;
            self.message = Some(
                "Microphone access denied. Please allow microphone permission in your browser settings."
                    .to_string(),
            );
            tracing::warn!("microphone permission denied; listening disabled");
        } else {
            self.message = Some(format!("Speech recognition error: {}", kind));
            tracing::debug!(%kind, "recoverable recognition error");
        }
    }
}

impl<S: RecognitionStream> Drop for ListeningManager<S> {
    fn drop(&mut self) {
        // A dangling stream after teardown would be a resource leak.
        if self.active {
            self.stream.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Probe {
        counts: Rc<RefCell<(usize, usize)>>,
    }

    impl Probe {
        fn opens(&self) -> usize {
            self.counts.borrow().0
        }
        fn closes(&self) -> usize {
            self.counts.borrow().1
        }
    }

    struct FakeStream {
        probe: Probe,
        fail_with: Option<RecognitionErrorKind>,
    }

    impl FakeStream {
        fn new(probe: Probe) -> Self {
            Self {
                probe,
                fail_with: None,
            }
        }
    }

    impl RecognitionStream for FakeStream {
        fn open(&mut self, _language: RecognitionLanguage) -> Result<(), RecognitionError> {
            self.probe.counts.borrow_mut().0 += 1;
            match self.fail_with {
                Some(kind) => Err(RecognitionError::OpenFailed { kind }),
                None => Ok(()),
            }
        }

        fn close(&mut self) {
            self.probe.counts.borrow_mut().1 += 1;
        }
    }

    fn manager(probe: &Probe) -> ListeningManager<FakeStream> {
        ListeningManager::new(
            FakeStream::new(probe.clone()),
            RecognitionLanguage::default(),
        )
    }

    #[test]
    fn stream_end_while_desired_auto_restarts() {
        let probe = Probe::default();
        let mut m = manager(&probe);
        m.start_listening();
        assert!(m.is_listening());
        m.handle_event(StreamEvent::Ended);
        assert!(m.is_listening());
        assert_eq!(probe.opens(), 2);
    }

    #[test]
    fn stream_end_after_stop_does_not_restart() {
        let probe = Probe::default();
        let mut m = manager(&probe);
        m.start_listening();
        m.stop_listening();
        m.handle_event(StreamEvent::Ended);
        assert!(!m.is_listening());
        assert_eq!(probe.opens(), 1);
        assert_eq!(probe.closes(), 1);
    }

    #[test]
    fn permission_denial_blocks_restart_and_later_starts() {
        let probe = Probe::default();
        let mut m = manager(&probe);
        m.start_listening();
        m.handle_event(StreamEvent::Error(RecognitionErrorKind::PermissionDenied));
        m.handle_event(StreamEvent::Ended);
        assert!(!m.is_listening());
        assert_eq!(probe.opens(), 1);

        m.start_listening();
        assert!(!m.is_listening());
        assert_eq!(probe.opens(), 1);
        assert!(m.snapshot().message.unwrap().contains("Microphone access denied"));
    }

    #[test]
    fn recoverable_errors_do_not_block_restart() {
        let probe = Probe::default();
        let mut m = manager(&probe);
        m.start_listening();
        m.handle_event(StreamEvent::Error(RecognitionErrorKind::NoSpeech));
        m.handle_event(StreamEvent::Ended);
        assert!(m.is_listening());
        assert_eq!(probe.opens(), 2);
    }

    #[test]
    fn transcripts_are_forwarded_and_remembered() {
        let probe = Probe::default();
        let mut m = manager(&probe);
        m.start_listening();
        m.handle_event(StreamEvent::Error(RecognitionErrorKind::Network));
        assert!(m.snapshot().message.is_some());

        let forwarded = m.handle_event(StreamEvent::Transcript("knight f3".to_string()));
        assert_eq!(forwarded.as_deref(), Some("knight f3"));
        assert_eq!(m.last_heard(), Some("knight f3"));
        // A successful event clears the transient message.
        assert!(m.snapshot().message.is_none());
    }

    #[test]
    fn start_while_active_does_not_open_a_second_stream() {
        let probe = Probe::default();
        let mut m = manager(&probe);
        m.start_listening();
        m.start_listening();
        assert_eq!(probe.opens(), 1);
    }

    #[test]
    fn language_change_restarts_an_active_stream() {
        let probe = Probe::default();
        let mut m = manager(&probe);
        m.start_listening();
        m.set_language(RecognitionLanguage::DeDe);
        assert_eq!(probe.opens(), 2);
        assert_eq!(probe.closes(), 1);
        assert_eq!(m.snapshot().language, "de-DE");
        assert!(m.is_listening());
    }

    #[test]
    fn open_failure_with_permission_denied_blocks_immediately() {
        let probe = Probe::default();
        let mut m = ListeningManager::new(
            FakeStream {
                probe: probe.clone(),
                fail_with: Some(RecognitionErrorKind::PermissionDenied),
            },
            RecognitionLanguage::default(),
        );
        m.start_listening();
        assert!(!m.is_listening());
        // Blocked: a second attempt never touches the stream.
        m.start_listening();
        assert_eq!(probe.opens(), 1);
    }

    #[test]
    fn drop_closes_an_active_stream() {
        let probe = Probe::default();
        {
            let mut m = manager(&probe);
            m.start_listening();
        }
        assert_eq!(probe.closes(), 1);

        let idle_probe = Probe::default();
        {
            let _m = manager(&idle_probe);
        }
        assert_eq!(idle_probe.closes(), 0);
    }
}
