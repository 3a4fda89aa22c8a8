use thiserror::Error;

/// Placeholder text for a record without a `question` field.
pub const DEFAULT_QUESTION: &str = "no question";

/// Single placeholder option for a record without an `options` field.
pub const DEFAULT_OPTION: &str = "no options";

/// Topic label used when an answered question carries no topic.
pub const DEFAULT_TOPIC: &str = "default topic";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question has no options")]
    NoOptions,

    #[error("answer index {index} is out of range for {len} options")]
    AnswerOutOfRange { index: usize, len: usize },
}

/// A multiple-choice question as loaded for a topic.
///
/// Immutable once built: `answer_index` always points into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    text: String,
    options: Vec<String>,
    answer_index: usize,
}

impl Question {
    /// Build a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::NoOptions` if `options` is empty.
    /// Returns `QuestionError::AnswerOutOfRange` if `answer_index` does not index into `options`.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        answer_index: usize,
    ) -> Result<Self, QuestionError> {
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if answer_index >= options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                index: answer_index,
                len: options.len(),
            });
        }

        Ok(Self {
            text: text.into(),
            options,
            answer_index,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn answer_index(&self) -> usize {
        self.answer_index
    }

    #[must_use]
    pub fn is_correct(&self, chosen: usize) -> bool {
        chosen == self.answer_index
    }

    /// Copy this question into an answered entry for the given topic.
    #[must_use]
    pub fn answered(&self, selected_index: Option<usize>, topic: &str) -> AnsweredQuestion {
        AnsweredQuestion::new(self.clone(), selected_index, topic)
    }
}

/// A question together with the option the user picked and the topic it came from.
///
/// Equality and hashing are structural over all fields; the notebook relies on
/// this to drop duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnsweredQuestion {
    question: Question,
    selected_index: Option<usize>,
    topic: String,
}

impl AnsweredQuestion {
    /// A blank `topic` is replaced with [`DEFAULT_TOPIC`].
    #[must_use]
    pub fn new(question: Question, selected_index: Option<usize>, topic: &str) -> Self {
        let topic = topic.trim();
        let topic = if topic.is_empty() { DEFAULT_TOPIC } else { topic };
        Self {
            question,
            selected_index,
            topic: topic.to_owned(),
        }
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<&str> {
        self.selected_index.and_then(|i| self.question.option(i))
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.selected_index.is_some_and(|i| self.question.is_correct(i))
    }
}
