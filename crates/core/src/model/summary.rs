use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreSummaryError {
    #[error("correct count ({correct}) exceeds total questions ({total})")]
    CountMismatch { correct: u32, total: u32 },

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: usize },
}

/// Percentage of correct answers, rounded half up.
///
/// A zero total uses a denominator of one, so the result is zero.
#[must_use]
pub fn score_percent(correct: u32, total: u32) -> u32 {
    let denominator = u64::from(total.max(1));
    let scaled = (u64::from(correct) * 200 + denominator) / (denominator * 2);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Result of a finished quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSummary {
    topic: String,
    total_questions: u32,
    correct_count: u32,
    wrong_count: u32,
    score: u32,
}

impl ScoreSummary {
    /// Derive a summary from raw counts.
    ///
    /// # Errors
    ///
    /// Returns `ScoreSummaryError::TooManyQuestions` if a count does not fit in `u32`.
    /// Returns `ScoreSummaryError::CountMismatch` if `correct` exceeds `total`.
    pub fn from_counts(
        topic: impl Into<String>,
        total: usize,
        correct: usize,
    ) -> Result<Self, ScoreSummaryError> {
        let total_questions = u32::try_from(total)
            .map_err(|_| ScoreSummaryError::TooManyQuestions { len: total })?;
        let correct_count = u32::try_from(correct)
            .map_err(|_| ScoreSummaryError::TooManyQuestions { len: correct })?;
        if correct_count > total_questions {
            return Err(ScoreSummaryError::CountMismatch {
                correct: correct_count,
                total: total_questions,
            });
        }

        Ok(Self {
            topic: topic.into(),
            total_questions,
            correct_count,
            wrong_count: total_questions - correct_count,
            score: score_percent(correct_count, total_questions),
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }
}
