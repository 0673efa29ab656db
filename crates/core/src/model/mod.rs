mod ids;
mod lifeline;
mod question;

pub use ids::{ParseIdError, SessionId};
pub use lifeline::{Lifeline, UnknownLifeline};
pub use question::{
    DEFAULT_MAX_LEVEL, Level, OPTION_COUNT, OptionPosition, QuestionError, QuestionRecord,
};
