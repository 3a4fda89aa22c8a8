mod question;
mod ranking;
mod summary;
mod topic;

pub use question::{
    AnsweredQuestion, DEFAULT_OPTION, DEFAULT_QUESTION, DEFAULT_TOPIC, Question, QuestionError,
};
pub use ranking::{RankingRecord, rank, ranking_order};
pub use summary::{ScoreSummary, ScoreSummaryError, score_percent};
pub use topic::{Topic, TopicCatalog, TopicKey, TopicKeyError};
