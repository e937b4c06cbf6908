use std::env;

use crate::language::RecognitionLanguage;

#[derive(Clone, Debug)]
pub struct Config {
    pub language: RecognitionLanguage,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            language: env::var("VOICE_CHESS_LANG")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }
}
