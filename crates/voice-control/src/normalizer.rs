//! Transcript → candidate SAN token normalization.
//!
//! A fixed rule pipeline, order-sensitive: the direct-notation guard runs
//! first, whole-phrase castling overrides run after word-level replacement,
//! and case canonicalization runs last. Deterministic and side-effect free
//! so it is testable without any speech input.

use std::fmt;

use regex::{Captures, Regex, RegexBuilder};

use crate::vocab;

/// A lexically SAN-shaped move token. Not validated for legality — that is
/// the rules oracle's call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMove(String);

impl CandidateMove {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CandidateMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The recognizer echoed displayed notation back instead of a spoken
    /// phrase. Accepting it would bypass the synonym grammar.
    #[error("Direct SAN moves like \"{token}\" are not allowed. Please say the move like \"knight f3\".")]
    DirectNotation { token: String },

    /// Nothing recognizable was left after normalization.
    #[error("Could not parse command: \"{transcript}\"")]
    Unparseable { transcript: String },
}

pub struct Normalizer {
    direct_san: Regex,
    leading_move: Regex,
    piece_words: Regex,
    capture_words: Regex,
    kingside: Regex,
    queenside: Regex,
    piece_square_gap: Regex,
    capture_gap: Regex,
    piece_letter: Regex,
    square: Regex,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            direct_san: Regex::new(r"(?i)^[NBRQK][a-h][1-8]$").unwrap(),
            leading_move: Regex::new(r"(?i)^move\s+").unwrap(),
            piece_words: word_alternation(&vocab::PIECE_WORDS.iter().map(|(w, _)| *w).collect::<Vec<_>>()),
            capture_words: word_alternation(vocab::CAPTURE_WORDS),
            kingside: Regex::new(r"(?i)king castle kingside").unwrap(),
            queenside: Regex::new(r"(?i)king castle queenside").unwrap(),
            piece_square_gap: Regex::new(r"(?i)([BNRQK])\s+([a-h][1-8])").unwrap(),
            capture_gap: Regex::new(r"(?i)\b([BNRQK])?\s*x\s*([a-h][1-8])").unwrap(),
            piece_letter: Regex::new(r"[bnrqkBNRQK]").unwrap(),
            square: Regex::new(r"([a-hA-H])([1-8])").unwrap(),
        }
    }

    /// Normalize one raw transcript into a candidate move token.
    pub fn normalize(&self, transcript: &str) -> Result<CandidateMove, NormalizeError> {
        let raw = transcript.trim();
        if self.direct_san.is_match(raw) {
            return Err(NormalizeError::DirectNotation {
                token: raw.to_string(),
            });
        }

        let mut s = self.leading_move.replace(raw, "").into_owned();

        s = self
            .piece_words
            .replace_all(&s, |caps: &Captures| {
                vocab::resolve_word(&caps[1]).unwrap_or("").to_string()
            })
            .into_owned();
        s = self.capture_words.replace_all(&s, "x").into_owned();

        // Whole-phrase overrides win over any word-level replacements, so
        // they are checked against the raw transcript.
        if self.kingside.is_match(raw) {
            s = "O-O".to_string();
        } else if self.queenside.is_match(raw) {
            s = "O-O-O".to_string();
        }

        s = self.piece_square_gap.replace_all(&s, "$1$2").into_owned();
        s = self.capture_gap.replace_all(&s, "${1}x$2").into_owned();

        s = self
            .piece_letter
            .replace_all(&s, |caps: &Captures| caps[0].to_uppercase())
            .into_owned();
        s = self
            .square
            .replace_all(&s, |caps: &Captures| {
                format!("{}{}", caps[1].to_lowercase(), &caps[2])
            })
            .into_owned();

        let s = s.trim();
        if s.is_empty() {
            return Err(NormalizeError::Unparseable {
                transcript: transcript.to_string(),
            });
        }
        Ok(CandidateMove(s.to_string()))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// `\b(longest|..|shortest)\b`, case-insensitive. Longer words first so the
/// alternation cannot stop at a prefix of a longer vocabulary word.
fn word_alternation(words: &[&str]) -> Regex {
    let mut words: Vec<&str> = words.to_vec();
    words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
    let pattern = format!(r"\b({})\b", words.join("|"));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .unwrap()
}
