//! Voice command layer: multilingual vocabulary, transcript normalization,
//! the recognition-stream lifecycle, and the command-surface facade the
//! presentation layer talks to.

pub mod app;
pub mod config;
pub mod language;
pub mod listening;
pub mod normalizer;
pub mod vocab;

pub use app::VoiceChess;
pub use language::RecognitionLanguage;
pub use listening::{
    ListeningManager, ListeningSnapshot, RecognitionError, RecognitionErrorKind,
    RecognitionStream, StreamEvent,
};
pub use normalizer::{CandidateMove, NormalizeError, Normalizer};
