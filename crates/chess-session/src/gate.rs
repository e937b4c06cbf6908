//! Move submission gate: the single entry point both input pipelines use to
//! get a move judged and applied.

use shakmaty::{Role, Square};

use crate::oracle::{AppliedMove, RulesOracle};

/// One submission: a SAN-shaped candidate token from the voice pipeline, or
/// an explicit square pair from the click pipeline.
#[derive(Debug, Clone, Copy)]
pub enum Submission<'a> {
    San(&'a str),
    Squares { from: Square, to: Square },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The oracle found no legal move matching the submission. Carries the
    /// rejected token or square pair; no repair or suggestion is attempted.
    #[error("{0}")]
    Illegal(String),
}

/// Submit a candidate move. Promotions default to queen when the input does
/// not name a piece.
pub fn submit(
    oracle: &mut dyn RulesOracle,
    submission: Submission<'_>,
) -> Result<AppliedMove, SubmitError> {
    match submission {
        Submission::San(token) => {
            if let Some(applied) = oracle.apply_san(token) {
                return Ok(applied);
            }
            // A bare last-rank pawn move is retried once with the default
            // promotion piece before giving up.
            if let Some(retry) = queen_promotion_retry(token) {
                if let Some(applied) = oracle.apply_san(&retry) {
                    return Ok(applied);
                }
            }
            Err(SubmitError::Illegal(token.to_string()))
        }
        Submission::Squares { from, to } => oracle
            .apply_squares(from, to, Some(Role::Queen))
            .ok_or_else(|| SubmitError::Illegal(format!("{} to {}", from, to))),
    }
}

/// `"e8"`/`"gxh8"`-shaped tokens without an explicit `=` get `=Q` appended.
fn queen_promotion_retry(token: &str) -> Option<String> {
    if token.contains('=') {
        return None;
    }
    let stripped = token.trim_end_matches(['+', '#']);
    if !(stripped.ends_with('8') || stripped.ends_with('1')) {
        return None;
    }
    // Pawn moves carry no leading piece letter.
    let first = stripped.chars().next()?;
    if first.is_ascii_lowercase() && first != 'x' {
        Some(format!("{}=Q", stripped))
    } else {
        None
    }
}
