#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod feedback;
pub mod flow;
pub mod notebook_service;
pub mod quiz_service;
pub mod ranking_service;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use quiz_core::Clock;

pub use app_services::build_sqlite_flow;
pub use error::{AppServicesError, QuizError};
pub use feedback::{AnswerFeedback, SilentFeedback};
pub use flow::{FlowEvent, QuizFlow, Screen};
pub use notebook_service::{NOTEBOOK_KEY, NotebookService};
pub use quiz_service::{QuizService, SessionFinished};
pub use ranking_service::{RANKING_KEY, RankingService};
pub use settings::QuizSettings;
