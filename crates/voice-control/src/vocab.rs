//! Spoken-word vocabulary: word tokens → SAN fragments.
//!
//! One flat table covers every supported language at once; the grammar is
//! language-agnostic at the word level, so no pre-selection happens before
//! lookup. Several words fan in to the same fragment; no word maps to two.

/// Piece names across English, Portuguese, Spanish, French, and German.
/// SAN writes pawn moves with no piece letter, so pawns map to "".
pub const PIECE_WORDS: &[(&str, &str)] = &[
    // Knight
    ("knight", "N"),
    ("night", "N"), // common misrecognition of "knight"
    ("cavalo", "N"),
    ("caballo", "N"),
    ("cheval", "N"),
    ("pferd", "N"),
    // Bishop
    ("bishop", "B"),
    ("bispo", "B"),
    ("alfil", "B"),
    ("fou", "B"),
    ("läufer", "B"),
    // Rook
    ("rook", "R"),
    ("torre", "R"),
    ("tour", "R"),
    ("turm", "R"),
    // Queen
    ("queen", "Q"),
    ("dama", "Q"),
    ("reine", "Q"),
    ("königin", "Q"),
    // King
    ("king", "K"),
    ("rei", "K"),
    ("rey", "K"),
    ("roi", "K"),
    ("könig", "K"),
    // Pawn
    ("pawn", ""),
    ("peão", ""),
    ("peon", ""),
    ("pion", ""),
];

/// Capture verbs, all normalizing to the SAN capture marker `x`.
pub const CAPTURE_WORDS: &[&str] = &[
    "takes", "take", "captures", "capture", "captura", "prende", "nimmt",
];

/// Case-insensitive lookup of a single word. Capture verbs resolve to "x";
/// unknown words resolve to `None`.
pub fn resolve_word(token: &str) -> Option<&'static str> {
    let lower = token.to_lowercase();
    if CAPTURE_WORDS.iter().any(|w| *w == lower) {
        return Some("x");
    }
    PIECE_WORDS
        .iter()
        .find(|(word, _)| *word == lower)
        .map(|(_, fragment)| *fragment)
}
