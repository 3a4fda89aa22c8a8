#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod notebook;
pub mod session;
pub mod time;

pub use error::Error;
pub use notebook::Notebook;
pub use session::{Advance, AnswerOutcome, QuizSession, SessionError, SessionPhase, SessionResult};
pub use time::Clock;
