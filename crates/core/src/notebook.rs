//! Cross-session collection of wrongly answered questions.

use std::collections::HashSet;

use crate::model::AnsweredQuestion;

/// Concatenate `existing` and `incoming`, keeping the first occurrence of each
/// structurally distinct entry.
#[must_use]
pub fn merge(existing: &[AnsweredQuestion], incoming: &[AnsweredQuestion]) -> Vec<AnsweredQuestion> {
    let mut seen = HashSet::with_capacity(existing.len() + incoming.len());
    existing
        .iter()
        .chain(incoming)
        .filter(|entry| seen.insert(*entry))
        .cloned()
        .collect()
}

/// Drop every entry structurally equal to `target`.
#[must_use]
pub fn remove(notebook: &[AnsweredQuestion], target: &AnsweredQuestion) -> Vec<AnsweredQuestion> {
    notebook
        .iter()
        .filter(|entry| *entry != target)
        .cloned()
        .collect()
}

/// View of the notebook, optionally newest first. Storage order is untouched.
#[must_use]
pub fn display_order(notebook: &[AnsweredQuestion], newest_first: bool) -> Vec<&AnsweredQuestion> {
    if newest_first {
        notebook.iter().rev().collect()
    } else {
        notebook.iter().collect()
    }
}

/// Owned, duplicate-free notebook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notebook {
    entries: Vec<AnsweredQuestion>,
}

impl Notebook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from possibly repeated entries; duplicates after the first are dropped.
    #[must_use]
    pub fn from_entries(entries: &[AnsweredQuestion]) -> Self {
        Self {
            entries: merge(&[], entries),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[AnsweredQuestion] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, entry: &AnsweredQuestion) -> bool {
        self.entries.contains(entry)
    }

    /// Merge a session's wrong answers. Returns the number of entries added.
    pub fn merge(&mut self, incoming: &[AnsweredQuestion]) -> usize {
        let before = self.entries.len();
        self.entries = merge(&self.entries, incoming);
        self.entries.len() - before
    }

    /// Returns `true` if anything was removed.
    pub fn remove(&mut self, target: &AnsweredQuestion) -> bool {
        let before = self.entries.len();
        self.entries = remove(&self.entries, target);
        self.entries.len() != before
    }

    #[must_use]
    pub fn display_order(&self, newest_first: bool) -> Vec<&AnsweredQuestion> {
        display_order(&self.entries, newest_first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    fn wrong(text: &str, selected: usize, topic: &str) -> AnsweredQuestion {
        let options = vec!["A".to_owned(), "B".to_owned(), "C".to_owned()];
        Question::new(text, options, 0)
            .unwrap()
            .answered(Some(selected), topic)
    }

    #[test]
    fn merging_with_itself_does_not_grow() {
        let n = vec![wrong("Q1", 1, "t"), wrong("Q2", 2, "t")];
        assert_eq!(merge(&n, &n), n);
    }

    #[test]
    fn merge_keeps_first_occurrence_order() {
        let existing = vec![wrong("Q1", 1, "t"), wrong("Q2", 1, "t")];
        let incoming = vec![wrong("Q3", 1, "t"), wrong("Q1", 1, "t"), wrong("Q3", 1, "t")];
        let merged = merge(&existing, &incoming);
        let texts: Vec<_> = merged.iter().map(|e| e.question().text()).collect();
        assert_eq!(texts, vec!["Q1", "Q2", "Q3"]);
    }

    #[test]
    fn different_selection_is_a_distinct_entry() {
        let merged = merge(&[wrong("Q1", 1, "t")], &[wrong("Q1", 2, "t")]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn remove_then_merge_restores_entry() {
        let incoming = vec![wrong("Q1", 1, "t"), wrong("Q2", 2, "t")];
        let notebook = merge(&[], &incoming);
        let pruned = remove(&notebook, &incoming[0]);
        assert_eq!(pruned, vec![incoming[1].clone()]);

        let restored = merge(&pruned, &incoming);
        assert_eq!(restored.len(), 2);
        assert!(restored.contains(&incoming[0]));
    }

    #[test]
    fn display_order_reverses_view_only() {
        let notebook = Notebook::from_entries(&[wrong("Q1", 1, "t"), wrong("Q2", 1, "t")]);
        let newest: Vec<_> = notebook
            .display_order(true)
            .iter()
            .map(|e| e.question().text())
            .collect();
        assert_eq!(newest, vec!["Q2", "Q1"]);
        assert_eq!(notebook.entries()[0].question().text(), "Q1");
    }

    #[test]
    fn overlapping_sessions_store_each_entry_once() {
        let mut notebook = Notebook::new();
        assert_eq!(notebook.merge(&[wrong("Q1", 1, "capitals"), wrong("Q2", 2, "capitals")]), 2);
        assert_eq!(notebook.merge(&[wrong("Q2", 2, "capitals"), wrong("Q3", 1, "capitals")]), 1);
        assert_eq!(notebook.len(), 3);

        assert!(notebook.remove(&wrong("Q2", 2, "capitals")));
        assert!(!notebook.remove(&wrong("Q2", 2, "capitals")));
        assert_eq!(notebook.len(), 2);
    }
}
