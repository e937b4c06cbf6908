//! Rules oracle backed by shakmaty.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, File, Move, Position, Role, Square};

use crate::oracle::{AppliedMove, RulesOracle};

#[derive(Debug, thiserror::Error)]
pub enum FenSetupError {
    #[error("invalid or unplayable FEN: {0}")]
    Invalid(String),
}

/// Stateful position wrapper. Undo is a stack of previous positions;
/// `Chess` values are cheap to clone.
pub struct ShakmatyOracle {
    position: Chess,
    undo_stack: Vec<Chess>,
}

impl ShakmatyOracle {
    pub fn new() -> Self {
        Self {
            position: Chess::default(),
            undo_stack: Vec::new(),
        }
    }

    /// Start from an arbitrary FEN. Used by tests and analysis setups.
    pub fn from_fen(fen: &str) -> Result<Self, FenSetupError> {
        let parsed: Fen = fen
            .parse()
            .map_err(|_| FenSetupError::Invalid(fen.to_string()))?;
        let position = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|_| FenSetupError::Invalid(fen.to_string()))?;
        Ok(Self {
            position,
            undo_stack: Vec::new(),
        })
    }

    /// King destination of a castling move (g- or c-file), which is what the
    /// user sees highlighted and clicks on.
    fn castle_destination(king: Square, rook: Square) -> Square {
        let file = if rook.file() > king.file() {
            File::new(6)
        } else {
            File::new(2)
        };
        Square::from_coords(file, king.rank())
    }

    fn destination(m: &Move) -> Square {
        match m {
            Move::Castle { king, rook } => Self::castle_destination(*king, *rook),
            _ => m.to(),
        }
    }

    fn play(&mut self, m: &Move) -> AppliedMove {
        let san = San::from_move(&self.position, *m).to_string();
        let from = m.from().unwrap_or_else(|| m.to());
        let to = Self::destination(m);
        self.undo_stack.push(self.position.clone());
        self.position.play_unchecked(*m);
        AppliedMove { from, to, san }
    }
}

impl Default for ShakmatyOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesOracle for ShakmatyOracle {
    fn position_fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    fn side_to_move(&self) -> Color {
        self.position.turn()
    }

    fn piece_at(&self, square: Square) -> Option<(Color, Role)> {
        self.position
            .board()
            .piece_at(square)
            .map(|p| (p.color, p.role))
    }

    fn legal_destinations(&self, square: Square) -> Vec<Square> {
        let mut dests = Vec::new();
        for m in &self.position.legal_moves() {
            let matches = match m {
                Move::Castle { king, .. } => *king == square,
                _ => m.from() == Some(square),
            };
            if !matches {
                continue;
            }
            let to = Self::destination(m);
            // Promotion variants all share one destination.
            if !dests.contains(&to) {
                dests.push(to);
            }
        }
        dests
    }

    fn apply_san(&mut self, san: &str) -> Option<AppliedMove> {
        let parsed: San = san.parse().ok()?;
        let m = parsed.to_move(&self.position).ok()?;
        Some(self.play(&m))
    }

    fn apply_squares(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Option<AppliedMove> {
        let wanted = promotion.unwrap_or(Role::Queen);
        let legals = self.position.legal_moves();
        let m = legals
            .iter()
            .find(|m| match m {
                Move::Castle { king, rook } => {
                    *king == from && Self::castle_destination(*king, *rook) == to
                }
                Move::EnPassant { from: f, to: t } => *f == from && *t == to,
                Move::Normal {
                    from: f,
                    to: t,
                    promotion: p,
                    ..
                } => *f == from && *t == to && p.map_or(true, |r| r == wanted),
                _ => false,
            })?
            .clone();
        Some(self.play(&m))
    }

    fn undo_ply(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.position = previous;
                true
            }
            None => false,
        }
    }

    fn reset_to_initial(&mut self) {
        self.position = Chess::default();
        self.undo_stack.clear();
    }

    fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_destinations_from_initial() {
        let oracle = ShakmatyOracle::new();
        let mut dests = oracle.legal_destinations(Square::G1);
        dests.sort();
        assert_eq!(dests, vec![Square::F3, Square::H3]);
    }

    #[test]
    fn apply_san_reports_origin_and_destination() {
        let mut oracle = ShakmatyOracle::new();
        let applied = oracle.apply_san("Nf3").unwrap();
        assert_eq!(applied.from, Square::G1);
        assert_eq!(applied.to, Square::F3);
        assert_eq!(applied.san, "Nf3");
        assert_eq!(oracle.side_to_move(), Color::Black);
    }

    #[test]
    fn undo_restores_previous_position() {
        let mut oracle = ShakmatyOracle::new();
        let initial = oracle.position_fen();
        oracle.apply_san("e4").unwrap();
        assert!(oracle.undo_ply());
        assert_eq!(oracle.position_fen(), initial);
        assert!(!oracle.undo_ply());
    }

    #[test]
    fn castling_is_reported_as_king_destination() {
        let oracle = ShakmatyOracle::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let dests = oracle.legal_destinations(Square::E1);
        assert!(dests.contains(&Square::G1));
        assert!(dests.contains(&Square::C1));
    }

    #[test]
    fn castling_by_squares_produces_castle_san() {
        let mut oracle = ShakmatyOracle::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let applied = oracle.apply_squares(Square::E1, Square::G1, None).unwrap();
        assert_eq!(applied.san, "O-O");
        assert_eq!(applied.to, Square::G1);
    }

    #[test]
    fn promotion_by_squares_defaults_to_queen() {
        let mut oracle = ShakmatyOracle::from_fen("8/6P1/8/8/8/2k5/8/6K1 w - - 0 1").unwrap();
        let applied = oracle
            .apply_squares(Square::G7, Square::G8, Some(Role::Queen))
            .unwrap();
        assert_eq!(applied.san, "g8=Q");
    }

    #[test]
    fn illegal_san_is_refused() {
        let mut oracle = ShakmatyOracle::new();
        assert!(oracle.apply_san("Nf6").is_none());
        assert!(oracle.apply_san("garbage").is_none());
    }
}
