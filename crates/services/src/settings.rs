/// User-facing knobs for a quiz run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSettings {
    /// Name stored on ranking records. Blank means anonymous.
    pub nickname: Option<String>,
    /// Shuffle a topic's questions at session start instead of keeping file order.
    pub shuffle_questions: bool,
    /// List the notebook newest entry first.
    pub notebook_newest_first: bool,
}

impl QuizSettings {
    #[must_use]
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    #[must_use]
    pub fn with_shuffle_questions(mut self, shuffle: bool) -> Self {
        self.shuffle_questions = shuffle;
        self
    }

    #[must_use]
    pub fn with_notebook_newest_first(mut self, newest_first: bool) -> Self {
        self.notebook_newest_first = newest_first;
        self
    }
}
