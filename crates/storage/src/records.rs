//! Persisted JSON shapes for questions and answered questions.

use quiz_core::model::{
    AnsweredQuestion, DEFAULT_OPTION, DEFAULT_QUESTION, DEFAULT_TOPIC, Question, QuestionError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::StorageError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("missing required field `answer`")]
    MissingAnswer,

    #[error("`{field}` must not be negative, got {value}")]
    NegativeIndex { field: &'static str, value: i64 },

    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// One question object as found in a topic file or the persisted notebook.
///
/// `question`, `options` and `topic` are optional and replaced by placeholders;
/// `answer` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub answer: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub selected_answer: Option<i64>,
}

fn index(field: &'static str, value: i64) -> Result<usize, RecordError> {
    usize::try_from(value).map_err(|_| RecordError::NegativeIndex { field, value })
}

impl QuestionRecord {
    #[must_use]
    pub fn from_answered(entry: &AnsweredQuestion) -> Self {
        let question = entry.question();
        Self {
            question: Some(question.text().to_owned()),
            options: Some(question.options().to_vec()),
            answer: i64::try_from(question.answer_index()).ok(),
            topic: Some(entry.topic().to_owned()),
            selected_answer: entry
                .selected_index()
                .and_then(|i| i64::try_from(i).ok()),
        }
    }

    /// Number of options after placeholders are applied.
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.as_ref().map_or(1, Vec::len)
    }

    /// Convert into a domain `Question`, filling placeholders for missing fields.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::MissingAnswer` without an `answer`, or a validation
    /// error if the answer does not index into the options.
    pub fn into_question(self) -> Result<Question, RecordError> {
        let answer = index("answer", self.answer.ok_or(RecordError::MissingAnswer)?)?;
        let text = self.question.unwrap_or_else(|| DEFAULT_QUESTION.to_owned());
        let options = self
            .options
            .unwrap_or_else(|| vec![DEFAULT_OPTION.to_owned()]);
        Ok(Question::new(text, options, answer)?)
    }

    /// Convert into a notebook entry.
    ///
    /// # Errors
    ///
    /// Same as [`QuestionRecord::into_question`], plus a negative `selectedAnswer`.
    pub fn into_answered(mut self) -> Result<AnsweredQuestion, RecordError> {
        let selected = self
            .selected_answer
            .map(|v| index("selectedAnswer", v))
            .transpose()?;
        let topic = self
            .topic
            .take()
            .unwrap_or_else(|| DEFAULT_TOPIC.to_owned());
        let question = self.into_question()?;
        Ok(AnsweredQuestion::new(question, selected, &topic))
    }
}

/// Encode notebook entries as a JSON array of records.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_answered(entries: &[AnsweredQuestion]) -> Result<String, StorageError> {
    let records: Vec<QuestionRecord> = entries.iter().map(QuestionRecord::from_answered).collect();
    serde_json::to_string(&records).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decode notebook entries previously written by [`encode_answered`].
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the text is not a valid record array.
pub fn decode_answered(text: &str) -> Result<Vec<AnsweredQuestion>, StorageError> {
    let records: Vec<QuestionRecord> =
        serde_json::from_str(text).map_err(|e| StorageError::Serialization(e.to_string()))?;
    records
        .into_iter()
        .map(|r| {
            r.into_answered()
                .map_err(|e| StorageError::Serialization(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> QuestionRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_optional_fields_get_placeholders() {
        let question = parse(r#"{"answer": 0}"#).into_question().unwrap();
        assert_eq!(question.text(), DEFAULT_QUESTION);
        assert_eq!(question.options(), &[DEFAULT_OPTION.to_owned()]);

        let answered = parse(r#"{"question": "Q", "options": ["a", "b"], "answer": 1}"#)
            .into_answered()
            .unwrap();
        assert_eq!(answered.topic(), DEFAULT_TOPIC);
        assert_eq!(answered.selected_index(), None);
    }

    #[test]
    fn missing_answer_is_rejected() {
        let err = parse(r#"{"question": "Q", "options": ["a", "b"]}"#)
            .into_question()
            .unwrap_err();
        assert_eq!(err, RecordError::MissingAnswer);
    }

    #[test]
    fn negative_and_out_of_range_answers_are_rejected() {
        let err = parse(r#"{"options": ["a", "b"], "answer": -1}"#)
            .into_question()
            .unwrap_err();
        assert!(matches!(err, RecordError::NegativeIndex { field: "answer", .. }));

        let err = parse(r#"{"options": ["a", "b"], "answer": 2}"#)
            .into_question()
            .unwrap_err();
        assert!(matches!(err, RecordError::Question(_)));
    }

    #[test]
    fn notebook_entries_survive_encoding() {
        let q = Question::new("Capital of Peru?", vec!["Lima".into(), "Quito".into()], 0).unwrap();
        let entries = vec![q.answered(Some(1), "Capitals")];
        let text = encode_answered(&entries).unwrap();
        assert!(text.contains("\"selectedAnswer\":1"));
        assert_eq!(decode_answered(&text).unwrap(), entries);
    }

    #[test]
    fn corrupt_notebook_text_is_a_serialization_error() {
        assert!(matches!(
            decode_answered("{not json"),
            Err(StorageError::Serialization(_))
        ));
    }
}
