//! The rules/position authority boundary.
//!
//! The session controller treats chess rules as a black box behind this
//! trait. Injecting the oracle keeps sessions independent of each other and
//! lets tests script its behavior.

use shakmaty::{Color, Role, Square};

/// A move the oracle accepted and applied, in its canonical SAN spelling
/// (which may differ cosmetically from whatever was submitted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub from: Square,
    pub to: Square,
    pub san: String,
}

/// Everything the session needs from a rules engine. All mutating calls are
/// synchronous and immediately reflected in subsequent queries.
pub trait RulesOracle {
    /// FEN of the current position, for rendering snapshots.
    fn position_fen(&self) -> String;

    fn side_to_move(&self) -> Color;

    /// Color and role of the piece on `square`, if any.
    fn piece_at(&self, square: Square) -> Option<(Color, Role)>;

    /// Destination squares of every legal move starting on `square`.
    /// Castling is reported as the king's destination square.
    fn legal_destinations(&self, square: Square) -> Vec<Square>;

    /// Apply a SAN token. `None` if it does not name a legal move.
    fn apply_san(&mut self, san: &str) -> Option<AppliedMove>;

    /// Apply a move given as origin/destination squares. `promotion` is
    /// consulted only when the move actually promotes.
    fn apply_squares(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Option<AppliedMove>;

    /// Revert one ply. `false` if there is nothing to revert.
    fn undo_ply(&mut self) -> bool;

    fn reset_to_initial(&mut self);

    fn is_checkmate(&self) -> bool;
    fn is_stalemate(&self) -> bool;
    fn is_insufficient_material(&self) -> bool;
}
