use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{AnsweredQuestion, RankingRecord, ScoreSummary, TopicCatalog, TopicKey};
use quiz_core::session::{Advance, AnswerOutcome, QuizSession, SessionResult};
use storage::QuestionStore;
use storage::repository::Storage;

use crate::Clock;
use crate::error::QuizError;
use crate::feedback::{AnswerFeedback, SilentFeedback};
use crate::notebook_service::NotebookService;
use crate::ranking_service::RankingService;
use crate::settings::QuizSettings;

/// What a completed session produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFinished {
    pub summary: ScoreSummary,
    pub wrong_list: Vec<AnsweredQuestion>,
    /// `false` when the ranking entry could not be written; the summary is still valid.
    pub ranking_recorded: bool,
}

/// Orchestrates session start, answering, and the record keeping on completion.
pub struct QuizService {
    clock: Clock,
    catalog: TopicCatalog,
    settings: QuizSettings,
    questions: QuestionStore,
    notebook: NotebookService,
    rankings: RankingService,
    feedback: Arc<dyn AnswerFeedback>,
}

impl QuizService {
    /// Build the service over `storage`, loading the persisted notebook.
    pub async fn new(
        clock: Clock,
        catalog: TopicCatalog,
        settings: QuizSettings,
        storage: &Storage,
    ) -> Self {
        Self {
            clock,
            catalog,
            settings,
            questions: QuestionStore::new(Arc::clone(&storage.questions)),
            notebook: NotebookService::load(Arc::clone(&storage.values)).await,
            rankings: RankingService::new(Arc::clone(&storage.values)),
            feedback: Arc::new(SilentFeedback),
        }
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: Arc<dyn AnswerFeedback>) -> Self {
        self.feedback = feedback;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &TopicCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn notebook(&self) -> &NotebookService {
        &self.notebook
    }

    #[must_use]
    pub fn rankings(&self) -> &RankingService {
        &self.rankings
    }

    /// Load a topic's questions and start a session on them.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::UnknownTopic` if the key is not in the catalog,
    /// `QuizError::Questions` if loading fails, or `QuizError::Session` if the
    /// topic has no questions.
    pub async fn start_quiz(&self, key: &TopicKey) -> Result<QuizSession, QuizError> {
        let topic = self
            .catalog
            .get(key)
            .ok_or_else(|| QuizError::UnknownTopic(key.clone()))?;

        let mut questions = self.questions.load(key).await?;
        if self.settings.shuffle_questions {
            questions.shuffle(&mut rng());
        }

        let session = QuizSession::start(topic.label(), questions)?;
        log::debug!("started {:?}", session);
        Ok(session)
    }

    /// Submit an answer and notify the feedback hook.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` if the session rejects the answer.
    pub fn answer(
        &self,
        session: &mut QuizSession,
        chosen: usize,
    ) -> Result<AnswerOutcome, QuizError> {
        let outcome = session.submit_answer(chosen)?;
        if outcome.is_correct {
            self.feedback.on_correct();
        } else {
            self.feedback.on_incorrect();
        }
        Ok(outcome)
    }

    /// Move past the reveal step. Call once the caller's reveal pause has elapsed.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` if no answer is being revealed.
    pub fn advance(&self, session: &mut QuizSession) -> Result<Advance, QuizError> {
        Ok(session.advance()?)
    }

    /// Consume a finished session: merge its wrong answers into the notebook and
    /// append a ranking record.
    ///
    /// Storage failures are logged, never returned.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` if the session has not finished.
    pub async fn complete(&mut self, session: QuizSession) -> Result<SessionFinished, QuizError> {
        let SessionResult {
            summary,
            wrong_list,
        } = session.finish()?;

        let added = self.notebook.merge_session(&wrong_list).await;
        log::debug!("notebook gained {added} entries");

        let ranking_recorded = match self
            .rankings
            .record(
                &summary,
                self.settings.nickname.as_deref(),
                self.clock.now_millis(),
            )
            .await
        {
            Ok(recorded) => recorded,
            Err(err) => {
                log::warn!("ranking record could not be saved: {err}");
                false
            }
        };

        Ok(SessionFinished {
            summary,
            wrong_list,
            ranking_recorded,
        })
    }

    /// Returns `true` if the entry was in the notebook.
    pub async fn delete_notebook_entry(&mut self, entry: &AnsweredQuestion) -> bool {
        self.notebook.remove(entry).await
    }

    /// Notebook entries in the configured display order.
    #[must_use]
    pub fn notebook_entries(&self) -> Vec<&AnsweredQuestion> {
        self.notebook.entries(self.settings.notebook_newest_first)
    }

    pub async fn leaderboard(&self) -> Vec<RankingRecord> {
        self.rankings.ranked().await
    }

    /// Returns `false` if the ranking list could not be cleared.
    pub async fn clear_rankings(&mut self) -> bool {
        match self.rankings.clear().await {
            Ok(()) => true,
            Err(err) => {
                log::warn!("ranking list could not be cleared: {err}");
                false
            }
        }
    }
}
