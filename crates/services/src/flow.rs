//! Screen-level state machine driven by UI commands.

use quiz_core::model::{AnsweredQuestion, RankingRecord, ScoreSummary, TopicKey};
use quiz_core::session::{Advance, AnswerOutcome, QuizSession};

use crate::error::QuizError;
use crate::quiz_service::{QuizService, SessionFinished};

/// The screen currently shown, with the state it owns.
#[derive(Debug)]
pub enum Screen {
    Home,
    Quiz { session: QuizSession },
    Result {
        summary: ScoreSummary,
        wrong_list: Vec<AnsweredQuestion>,
    },
    Notebook,
    Ranking,
}

impl Screen {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Quiz { .. } => "quiz",
            Screen::Result { .. } => "result",
            Screen::Notebook => "notebook",
            Screen::Ranking => "ranking",
        }
    }
}

/// What a command changed, for the presentation layer to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    QuestionShown { index: usize, total: usize },
    AnswerRevealed(AnswerOutcome),
    SessionFinished(SessionFinished),
    ScreenChanged { screen: &'static str },
    NotebookChanged { removed: bool },
    RankingsCleared { cleared: bool },
}

/// Owns the quiz service and the current screen; the single writer for both.
pub struct QuizFlow {
    service: QuizService,
    screen: Screen,
}

impl QuizFlow {
    #[must_use]
    pub fn new(service: QuizService) -> Self {
        Self {
            service,
            screen: Screen::Home,
        }
    }

    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    #[must_use]
    pub fn service(&self) -> &QuizService {
        &self.service
    }

    /// The active session, if a quiz is on screen.
    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        match &self.screen {
            Screen::Quiz { session } => Some(session),
            _ => None,
        }
    }

    /// Start a quiz from the home screen. On failure the flow stays on home.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidCommand` off the home screen, or the error from
    /// starting the quiz.
    pub async fn select_topic(&mut self, key: &TopicKey) -> Result<FlowEvent, QuizError> {
        if !matches!(self.screen, Screen::Home) {
            return Err(self.invalid("select_topic"));
        }

        let session = self.service.start_quiz(key).await?;
        let total = session.questions().len();
        self.screen = Screen::Quiz { session };
        Ok(FlowEvent::QuestionShown { index: 0, total })
    }

    /// Answer the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidCommand` off the quiz screen, or the session's error.
    pub fn select_option(&mut self, index: usize) -> Result<FlowEvent, QuizError> {
        let Screen::Quiz { session } = &mut self.screen else {
            return Err(self.invalid("select_option"));
        };
        let outcome = self.service.answer(session, index)?;
        Ok(FlowEvent::AnswerRevealed(outcome))
    }

    /// End the reveal pause: show the next question or finish the session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidCommand` off the quiz screen, or the session's error.
    pub async fn confirm_advance(&mut self) -> Result<FlowEvent, QuizError> {
        let (advance, total) = match &mut self.screen {
            Screen::Quiz { session } => {
                let advance = self.service.advance(session)?;
                (advance, session.questions().len())
            }
            other => {
                return Err(QuizError::InvalidCommand {
                    command: "confirm_advance",
                    screen: other.name(),
                });
            }
        };

        if let Advance::Next { index } = advance {
            return Ok(FlowEvent::QuestionShown { index, total });
        }

        let Screen::Quiz { session } = std::mem::replace(&mut self.screen, Screen::Home) else {
            return Err(self.invalid("confirm_advance"));
        };
        let finished = self.service.complete(session).await?;
        self.screen = Screen::Result {
            summary: finished.summary.clone(),
            wrong_list: finished.wrong_list.clone(),
        };
        Ok(FlowEvent::SessionFinished(finished))
    }

    /// Return home from any screen. An unfinished session is discarded.
    pub fn go_home(&mut self) -> FlowEvent {
        if let Screen::Quiz { session } = &self.screen {
            log::debug!("discarding unfinished {session:?}");
        }
        self.navigate(Screen::Home)
    }

    /// # Errors
    ///
    /// Returns `QuizError::InvalidCommand` while a quiz is running.
    pub fn open_notebook(&mut self) -> Result<FlowEvent, QuizError> {
        if matches!(self.screen, Screen::Quiz { .. }) {
            return Err(self.invalid("open_notebook"));
        }
        Ok(self.navigate(Screen::Notebook))
    }

    /// # Errors
    ///
    /// Returns `QuizError::InvalidCommand` while a quiz is running.
    pub fn open_ranking(&mut self) -> Result<FlowEvent, QuizError> {
        if matches!(self.screen, Screen::Quiz { .. }) {
            return Err(self.invalid("open_ranking"));
        }
        Ok(self.navigate(Screen::Ranking))
    }

    /// Notebook entries in display order.
    #[must_use]
    pub fn notebook_entries(&self) -> Vec<&AnsweredQuestion> {
        self.service.notebook_entries()
    }

    pub async fn leaderboard(&self) -> Vec<RankingRecord> {
        self.service.leaderboard().await
    }

    /// # Errors
    ///
    /// Returns `QuizError::InvalidCommand` off the notebook screen.
    pub async fn delete_notebook_entry(
        &mut self,
        entry: &AnsweredQuestion,
    ) -> Result<FlowEvent, QuizError> {
        if !matches!(self.screen, Screen::Notebook) {
            return Err(self.invalid("delete_notebook_entry"));
        }
        let removed = self.service.delete_notebook_entry(entry).await;
        Ok(FlowEvent::NotebookChanged { removed })
    }

    /// # Errors
    ///
    /// Returns `QuizError::InvalidCommand` off the ranking screen.
    pub async fn clear_rankings(&mut self) -> Result<FlowEvent, QuizError> {
        if !matches!(self.screen, Screen::Ranking) {
            return Err(self.invalid("clear_rankings"));
        }
        let cleared = self.service.clear_rankings().await;
        Ok(FlowEvent::RankingsCleared { cleared })
    }

    fn navigate(&mut self, screen: Screen) -> FlowEvent {
        self.screen = screen;
        FlowEvent::ScreenChanged {
            screen: self.screen.name(),
        }
    }

    fn invalid(&self, command: &'static str) -> QuizError {
        QuizError::InvalidCommand {
            command,
            screen: self.screen.name(),
        }
    }
}
