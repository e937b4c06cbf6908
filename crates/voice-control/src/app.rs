//! Command surface: everything the presentation layer can ask of the core,
//! wiring the voice pipeline and the click pipeline to one session.

use chess_session::{GameSession, RulesOracle, SessionSnapshot};
use shakmaty::Square;

use crate::language::RecognitionLanguage;
use crate::listening::{ListeningManager, ListeningSnapshot, RecognitionStream, StreamEvent};
use crate::normalizer::Normalizer;

pub struct VoiceChess<O: RulesOracle, S: RecognitionStream> {
    session: GameSession<O>,
    listening: ListeningManager<S>,
    normalizer: Normalizer,
}

impl<O: RulesOracle, S: RecognitionStream> VoiceChess<O, S> {
    pub fn new(oracle: O, stream: S, language: RecognitionLanguage) -> Self {
        Self {
            session: GameSession::new(oracle),
            listening: ListeningManager::new(stream, language),
            normalizer: Normalizer::new(),
        }
    }

    // ---- Board commands ----

    pub fn click_square(&mut self, square: Square) {
        self.session.click_square(square);
    }

    /// Voice pipeline: one utterance in, at most one submission out.
    /// Normalization failures surface as session errors; they never mutate
    /// game state.
    pub fn submit_utterance(&mut self, transcript: &str) {
        match self.normalizer.normalize(transcript) {
            Ok(candidate) => self.session.submit_voice_token(candidate.as_str()),
            Err(err) => {
                tracing::debug!(%err, "utterance not normalized");
                self.session.report_error(err.to_string());
            }
        }
    }

    pub fn undo_one(&mut self) {
        self.session.undo_one();
    }

    pub fn undo_all(&mut self) {
        self.session.undo_all();
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    // ---- Listening commands ----

    pub fn start_listening(&mut self) {
        self.listening.start_listening();
    }

    pub fn stop_listening(&mut self) {
        self.listening.stop_listening();
    }

    pub fn set_language(&mut self, language: RecognitionLanguage) {
        self.listening.set_language(language);
    }

    pub fn is_listening(&self) -> bool {
        self.listening.is_listening()
    }

    /// Entry point for the recognition stream's event callbacks. Transcript
    /// events flow on into the normalize → submit pipeline.
    pub fn handle_stream_event(&mut self, event: StreamEvent) {
        if let Some(transcript) = self.listening.handle_event(event) {
            self.submit_utterance(&transcript);
        }
    }

    // ---- Read-only state ----

    pub fn session_snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn listening_snapshot(&self) -> ListeningSnapshot {
        self.listening.snapshot()
    }
}
