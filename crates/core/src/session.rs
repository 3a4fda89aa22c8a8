use std::fmt;

use thiserror::Error;

use crate::model::{AnsweredQuestion, Question, ScoreSummary, ScoreSummaryError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("a session needs at least one question")]
    InvalidInput,

    #[error("option {index} is out of range for a question with {len} options")]
    OutOfRange { index: usize, len: usize },

    #[error("{operation} is not allowed while the session is {phase}")]
    InvalidState {
        operation: &'static str,
        phase: &'static str,
    },

    #[error(transparent)]
    Summary(#[from] ScoreSummaryError),
}

//
// ─── PHASES AND OUTCOMES ───────────────────────────────────────────────────────
//

/// Where a session is in its question loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for an answer to question `current`.
    InProgress { current: usize },
    /// `chosen` was recorded for `current`; the caller is showing feedback.
    Revealing { current: usize, chosen: usize },
    /// Every question has been answered.
    Finished { summary: ScoreSummary },
}

impl SessionPhase {
    fn name(&self) -> &'static str {
        match self {
            SessionPhase::InProgress { .. } => "in progress",
            SessionPhase::Revealing { .. } => "revealing",
            SessionPhase::Finished { .. } => "finished",
        }
    }
}

/// Feedback for a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question_index: usize,
    pub chosen: usize,
    pub correct_index: usize,
    pub is_correct: bool,
}

/// What `advance` moved the session to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next { index: usize },
    Finished(ScoreSummary),
}

/// Everything a finished session hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    pub summary: ScoreSummary,
    pub wrong_list: Vec<AnsweredQuestion>,
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at a topic's question list.
///
/// Steps through the questions in order: `submit_answer` records the choice and
/// moves to `Revealing`, `advance` moves on to the next question or finishes.
/// Each answer slot is written exactly once.
pub struct QuizSession {
    topic: String,
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    wrong_list: Vec<AnsweredQuestion>,
    phase: SessionPhase,
}

impl QuizSession {
    /// Start a session at the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidInput` if `questions` is empty.
    pub fn start(topic: impl Into<String>, questions: Vec<Question>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::InvalidInput);
        }

        Ok(Self {
            topic: topic.into(),
            answers: vec![None; questions.len()],
            questions,
            wrong_list: Vec::new(),
            phase: SessionPhase::InProgress { current: 0 },
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    /// Wrong answers recorded so far, in answer order.
    #[must_use]
    pub fn wrong_list(&self) -> &[AnsweredQuestion] {
        &self.wrong_list
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            SessionPhase::InProgress { current } | SessionPhase::Revealing { current, .. } => {
                Some(current)
            }
            SessionPhase::Finished { .. } => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().and_then(|i| self.questions.get(i))
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, SessionPhase::Finished { .. })
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let answered = self.answers.iter().filter(|slot| slot.is_some()).count();
        SessionProgress {
            total,
            answered,
            remaining: total - answered,
            is_complete: self.is_finished(),
        }
    }

    /// Record an answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is in progress.
    /// Returns `SessionError::OutOfRange` if `chosen` is not one of the question's options;
    /// the session is left unchanged.
    pub fn submit_answer(&mut self, chosen: usize) -> Result<AnswerOutcome, SessionError> {
        let SessionPhase::InProgress { current } = self.phase else {
            return Err(self.invalid_state("submit_answer"));
        };
        let Some(question) = self.questions.get(current) else {
            return Err(self.invalid_state("submit_answer"));
        };

        let len = question.option_count();
        if chosen >= len {
            return Err(SessionError::OutOfRange { index: chosen, len });
        }

        let is_correct = question.is_correct(chosen);
        if !is_correct {
            self.wrong_list.push(question.answered(Some(chosen), &self.topic));
        }
        let correct_index = question.answer_index();
        self.answers[current] = Some(chosen);
        self.phase = SessionPhase::Revealing { current, chosen };

        Ok(AnswerOutcome {
            question_index: current,
            chosen,
            correct_index,
            is_correct,
        })
    }

    /// Leave the reveal step.
    ///
    /// Moves to the next question, or finishes the session after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless an answer is being revealed.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        let SessionPhase::Revealing { current, .. } = self.phase else {
            return Err(self.invalid_state("advance"));
        };

        let next = current + 1;
        if next < self.questions.len() {
            self.phase = SessionPhase::InProgress { current: next };
            return Ok(Advance::Next { index: next });
        }

        let summary = self.build_summary()?;
        self.phase = SessionPhase::Finished {
            summary: summary.clone(),
        };
        Ok(Advance::Finished(summary))
    }

    /// Consume a finished session, handing back its summary and wrong answers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session has not finished.
    pub fn finish(self) -> Result<SessionResult, SessionError> {
        match self.phase {
            SessionPhase::Finished { summary } => Ok(SessionResult {
                summary,
                wrong_list: self.wrong_list,
            }),
            other => Err(SessionError::InvalidState {
                operation: "finish",
                phase: other.name(),
            }),
        }
    }

    /// Answers are compared by question position.
    fn correct_count(&self) -> usize {
        self.questions
            .iter()
            .zip(&self.answers)
            .filter(|(question, slot)| **slot == Some(question.answer_index()))
            .count()
    }

    fn build_summary(&self) -> Result<ScoreSummary, SessionError> {
        Ok(ScoreSummary::from_counts(
            self.topic.clone(),
            self.questions.len(),
            self.correct_count(),
        )?)
    }

    fn invalid_state(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidState {
            operation,
            phase: self.phase.name(),
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("topic", &self.topic)
            .field("questions_len", &self.questions.len())
            .field("phase", &self.phase)
            .field("wrong_len", &self.wrong_list.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, answer: usize) -> Question {
        let options = ["A", "B", "C", "D"].iter().map(|s| (*s).to_owned()).collect();
        Question::new(text, options, answer).unwrap()
    }

    fn capitals() -> Vec<Question> {
        vec![question("Q1", 0), question("Q2", 1), question("Q3", 2)]
    }

    fn play(session: &mut QuizSession, choices: &[usize]) -> ScoreSummary {
        let mut last = None;
        for &choice in choices {
            session.submit_answer(choice).unwrap();
            last = Some(session.advance().unwrap());
        }
        match last {
            Some(Advance::Finished(summary)) => summary,
            other => panic!("session did not finish: {other:?}"),
        }
    }

    #[test]
    fn start_rejects_empty_question_list() {
        let err = QuizSession::start("capitals", Vec::new()).unwrap_err();
        assert_eq!(err, SessionError::InvalidInput);
    }

    #[test]
    fn start_is_in_progress_at_first_question() {
        let session = QuizSession::start("capitals", capitals()).unwrap();
        assert_eq!(session.phase(), &SessionPhase::InProgress { current: 0 });
        assert_eq!(session.answers(), &[None, None, None]);
        assert!(session.wrong_list().is_empty());
        assert_eq!(session.current_question().unwrap().text(), "Q1");
    }

    #[test]
    fn out_of_range_choice_leaves_session_untouched() {
        let mut session = QuizSession::start("capitals", capitals()).unwrap();
        let err = session.submit_answer(5).unwrap_err();
        assert_eq!(err, SessionError::OutOfRange { index: 5, len: 4 });
        assert_eq!(session.phase(), &SessionPhase::InProgress { current: 0 });
        assert_eq!(session.answers()[0], None);
    }

    #[test]
    fn scenario_correct_wrong_correct() {
        let mut session = QuizSession::start("capitals", capitals()).unwrap();
        let summary = play(&mut session, &[0, 3, 2]);

        assert_eq!(summary.correct_count(), 2);
        assert_eq!(summary.wrong_count(), 1);
        assert_eq!(summary.score(), 67);

        let result = session.finish().unwrap();
        assert_eq!(result.wrong_list.len(), 1);
        let wrong = &result.wrong_list[0];
        assert_eq!(wrong.question().text(), "Q2");
        assert_eq!(wrong.selected_index(), Some(3));
        assert_eq!(wrong.topic(), "capitals");
    }

    #[test]
    fn submit_moves_to_revealing_and_reports_outcome() {
        let mut session = QuizSession::start("capitals", capitals()).unwrap();
        let outcome = session.submit_answer(2).unwrap();
        assert_eq!(
            outcome,
            AnswerOutcome {
                question_index: 0,
                chosen: 2,
                correct_index: 0,
                is_correct: false,
            }
        );
        assert_eq!(
            session.phase(),
            &SessionPhase::Revealing {
                current: 0,
                chosen: 2
            }
        );
    }

    #[test]
    fn cannot_answer_twice_or_advance_early() {
        let mut session = QuizSession::start("capitals", capitals()).unwrap();
        assert!(matches!(
            session.advance(),
            Err(SessionError::InvalidState { operation: "advance", .. })
        ));

        session.submit_answer(0).unwrap();
        assert!(matches!(
            session.submit_answer(1),
            Err(SessionError::InvalidState {
                operation: "submit_answer",
                phase: "revealing"
            })
        ));
        assert_eq!(session.answers()[0], Some(0));
    }

    #[test]
    fn correct_answers_never_enter_wrong_list() {
        let mut session = QuizSession::start("capitals", capitals()).unwrap();
        session.submit_answer(0).unwrap();
        assert!(session.wrong_list().is_empty());
        session.advance().unwrap();
        session.submit_answer(1).unwrap();
        assert!(session.wrong_list().is_empty());
    }

    #[test]
    fn counts_always_add_up() {
        let choices: [[usize; 3]; 4] = [[0, 1, 2], [3, 3, 3], [0, 0, 0], [1, 1, 1]];
        for picks in choices {
            let mut session = QuizSession::start("capitals", capitals()).unwrap();
            let summary = play(&mut session, &picks);
            assert_eq!(
                summary.correct_count() + summary.wrong_count(),
                summary.total_questions()
            );
            let wrong_len = session.wrong_list().len();
            assert_eq!(u32::try_from(wrong_len).unwrap(), summary.wrong_count());
        }
    }

    #[test]
    fn score_compares_answers_by_position() {
        // Each answer equals another question's answer index, never its own.
        let mut session = QuizSession::start("capitals", capitals()).unwrap();
        let summary = play(&mut session, &[1, 2, 0]);
        assert_eq!(summary.correct_count(), 0);
        assert_eq!(summary.score(), 0);
    }

    #[test]
    fn finish_requires_finished_phase() {
        let session = QuizSession::start("capitals", capitals()).unwrap();
        assert!(matches!(
            session.finish(),
            Err(SessionError::InvalidState { operation: "finish", phase: "in progress" })
        ));
    }

    #[test]
    fn finished_session_rejects_further_commands() {
        let mut session = QuizSession::start("t", vec![question("only", 0)]).unwrap();
        session.submit_answer(0).unwrap();
        assert!(matches!(session.advance().unwrap(), Advance::Finished(_)));
        assert!(session.is_finished());
        assert!(session.current_question().is_none());
        assert!(session.submit_answer(0).is_err());
        assert!(session.advance().is_err());

        let progress = session.progress();
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 0);
        assert!(progress.is_complete);
    }

    #[test]
    fn blank_topic_is_defaulted_on_wrong_entries() {
        let mut session = QuizSession::start("", vec![question("only", 0)]).unwrap();
        session.submit_answer(1).unwrap();
        assert_eq!(
            session.wrong_list()[0].topic(),
            crate::model::DEFAULT_TOPIC
        );
    }
}
