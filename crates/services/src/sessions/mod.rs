mod game;
mod registry;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{GameError, SessionError};
pub use game::{AnswerOutcome, GameSession};
pub use view::{PublicState, Supports};
pub use workflow::{GameService, SupportOutcome};
