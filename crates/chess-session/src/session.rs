//! Game session state machine.
//!
//! Owns the move history, the click selection, last-move markers, and the
//! terminal flag. Every submission from either input path funnels through
//! the gate; the oracle is the only component that knows chess.

use serde::Serialize;
use shakmaty::{Color, Square};

use crate::gate::{self, Submission, SubmitError};
use crate::oracle::RulesOracle;

/// One applied move as kept in the session history. Append/pop only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub san: String,
}

/// Terminal classification. Monotonic: once non-ongoing it stays that way
/// until an undo or restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    DrawInsufficientMaterial,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    fn label(&self) -> &'static str {
        match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Checkmate { .. } => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::DrawInsufficientMaterial => "draw",
        }
    }

    fn message(&self) -> Option<String> {
        match self {
            GameStatus::Ongoing => None,
            GameStatus::Checkmate { winner } => {
                let winner = match winner {
                    Color::White => "White",
                    Color::Black => "Black",
                };
                Some(format!("Checkmate! {} wins.", winner))
            }
            GameStatus::Stalemate => Some("Stalemate! It's a draw.".to_string()),
            GameStatus::DrawInsufficientMaterial => Some("Draw!".to_string()),
        }
    }
}

/// Read-only state snapshot handed to the presentation layer after every
/// transition.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub fen: String,
    pub turn: String,
    pub moves: Vec<String>,
    pub selected: Option<String>,
    pub legal_destinations: Vec<String>,
    pub last_move: Option<LastMove>,
    pub status: String,
    pub game_over_message: Option<String>,
    pub error: Option<String>,
    pub can_undo: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LastMove {
    pub from: String,
    pub to: String,
}

pub struct GameSession<O: RulesOracle> {
    oracle: O,
    history: Vec<MoveRecord>,
    selected: Option<Square>,
    legal_cache: Vec<Square>,
    last_move: Option<(Square, Square)>,
    status: GameStatus,
    last_error: Option<String>,
}

impl<O: RulesOracle> GameSession<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            history: Vec::new(),
            selected: None,
            legal_cache: Vec::new(),
            last_move: None,
            status: GameStatus::Ongoing,
            last_error: None,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Click pipeline entry. Selecting an own piece caches its legal
    /// destinations for highlighting; clicking a highlighted destination
    /// submits the move; any other click drops the selection.
    pub fn click_square(&mut self, square: Square) {
        if self.status.is_over() {
            return;
        }
        match self.selected.take() {
            Some(from) => {
                let targets = std::mem::take(&mut self.legal_cache);
                if targets.contains(&square) {
                    self.submit(Submission::Squares { from, to: square });
                }
            }
            None => {
                let own_piece = self
                    .oracle
                    .piece_at(square)
                    .is_some_and(|(color, _)| color == self.oracle.side_to_move());
                if own_piece {
                    self.legal_cache = self.oracle.legal_destinations(square);
                    self.selected = Some(square);
                }
            }
        }
    }

    /// Voice pipeline entry. Tokens encode both piece and destination, so
    /// they are submitted regardless of any current selection.
    pub fn submit_voice_token(&mut self, token: &str) {
        if self.status.is_over() {
            self.last_error = Some("The game is over. Undo or restart to keep playing.".to_string());
            return;
        }
        self.clear_selection();
        self.submit(Submission::San(token));
    }

    /// Record an input-layer failure (e.g. an unparseable voice command) as
    /// the session's transient error.
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    fn submit(&mut self, submission: Submission<'_>) {
        match gate::submit(&mut self.oracle, submission) {
            Ok(applied) => {
                tracing::info!(san = %applied.san, "move applied");
                self.last_move = Some((applied.from, applied.to));
                self.history.push(MoveRecord {
                    from: applied.from,
                    to: applied.to,
                    san: applied.san,
                });
                self.last_error = None;
                self.clear_selection();
                self.refresh_status();
            }
            Err(SubmitError::Illegal(what)) => {
                tracing::warn!(%what, "move rejected");
                self.last_error = Some(format!("Illegal move: {}", what));
                self.clear_selection();
            }
        }
    }

    /// Runs once per successful submission. First true predicate wins:
    /// checkmate before stalemate before the insufficient-material draw.
    fn refresh_status(&mut self) {
        if self.oracle.is_checkmate() {
            // The side to move is the side that got mated.
            self.status = GameStatus::Checkmate {
                winner: !self.oracle.side_to_move(),
            };
        } else if self.oracle.is_stalemate() {
            self.status = GameStatus::Stalemate;
        } else if self.oracle.is_insufficient_material() {
            self.status = GameStatus::DrawInsufficientMaterial;
        }
    }

    /// Pop the most recent move and revert one ply. Undo always makes the
    /// game resumable.
    pub fn undo_one(&mut self) {
        if self.history.is_empty() {
            return;
        }
        if !self.oracle.undo_ply() {
            // History and oracle disagree; refuse to guess at a fix.
            tracing::error!("oracle refused undo with non-empty history");
            self.last_error = Some("Internal error: could not undo move".to_string());
            return;
        }
        self.history.pop();
        self.clear_selection();
        self.last_move = None;
        self.status = GameStatus::Ongoing;
        self.last_error = None;
    }

    pub fn undo_all(&mut self) {
        while self.can_undo() {
            let before = self.history.len();
            self.undo_one();
            if self.history.len() == before {
                break;
            }
        }
    }

    pub fn restart(&mut self) {
        self.oracle.reset_to_initial();
        self.history.clear();
        self.clear_selection();
        self.last_move = None;
        self.status = GameStatus::Ongoing;
        self.last_error = None;
        tracing::info!("session restarted");
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.legal_cache.clear();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            fen: self.oracle.position_fen(),
            turn: match self.oracle.side_to_move() {
                Color::White => "white".to_string(),
                Color::Black => "black".to_string(),
            },
            moves: self.history.iter().map(|m| m.san.clone()).collect(),
            selected: self.selected.map(|s| s.to_string()),
            legal_destinations: self.legal_cache.iter().map(|s| s.to_string()).collect(),
            last_move: self.last_move.map(|(from, to)| LastMove {
                from: from.to_string(),
                to: to.to_string(),
            }),
            status: self.status.label().to_string(),
            game_over_message: self.status.message(),
            error: self.last_error.clone(),
            can_undo: self.can_undo(),
        }
    }
}
