//! Game session core: the rules-oracle boundary, the move submission gate,
//! and the session state machine both input pipelines drive.

pub mod gate;
pub mod oracle;
pub mod session;
pub mod shakmaty_oracle;

pub use gate::{submit, Submission, SubmitError};
pub use oracle::{AppliedMove, RulesOracle};
pub use session::{GameSession, GameStatus, MoveRecord, SessionSnapshot};
pub use shakmaty_oracle::{FenSetupError, ShakmatyOracle};
