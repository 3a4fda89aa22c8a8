use std::sync::Arc;

use quiz_core::Notebook;
use quiz_core::model::AnsweredQuestion;
use storage::records::{decode_answered, encode_answered};
use storage::repository::KeyValueStore;

/// Key holding the JSON-encoded wrong-answer notebook.
pub const NOTEBOOK_KEY: &str = "wrong_notebook";

/// Wrong-answer notebook kept in memory and mirrored to [`NOTEBOOK_KEY`].
///
/// Persistence is best effort: failures are logged and the in-memory notebook
/// stays authoritative for the rest of the run. Nothing is written until the
/// stored notebook has been read, so a failed read never clobbers it.
pub struct NotebookService {
    values: Arc<dyn KeyValueStore>,
    notebook: Notebook,
    synced: bool,
}

impl NotebookService {
    /// Start with an empty notebook, ignoring anything persisted.
    #[must_use]
    pub fn new(values: Arc<dyn KeyValueStore>) -> Self {
        Self {
            values,
            notebook: Notebook::new(),
            synced: true,
        }
    }

    /// Load the persisted notebook. Missing or corrupt data yields an empty notebook.
    ///
    /// If the read fails the notebook starts empty and the read is retried
    /// before the next write.
    pub async fn load(values: Arc<dyn KeyValueStore>) -> Self {
        let mut svc = Self {
            values,
            notebook: Notebook::new(),
            synced: false,
        };
        svc.sync().await;
        svc
    }

    #[must_use]
    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    #[must_use]
    pub fn entries(&self, newest_first: bool) -> Vec<&AnsweredQuestion> {
        self.notebook.display_order(newest_first)
    }

    /// Merge a session's wrong answers. Returns how many new entries were added.
    pub async fn merge_session(&mut self, wrong_list: &[AnsweredQuestion]) -> usize {
        let pending = self.sync().await;
        let added = self.notebook.merge(wrong_list);
        if added > 0 || pending {
            self.persist().await;
        }
        added
    }

    /// Remove an entry and every structural duplicate of it.
    pub async fn remove(&mut self, entry: &AnsweredQuestion) -> bool {
        let pending = self.sync().await;
        let removed = self.notebook.remove(entry);
        if removed || pending {
            self.persist().await;
        }
        removed
    }

    /// Read the stored notebook if it has not been read yet, keeping any
    /// entries gathered in the meantime after the stored ones.
    ///
    /// Returns `true` if such entries still need to be written.
    async fn sync(&mut self) -> bool {
        if self.synced {
            return false;
        }
        let stored = match self.values.get(NOTEBOOK_KEY).await {
            Ok(Some(text)) => decode_answered(&text).unwrap_or_else(|err| {
                log::warn!("notebook is corrupt, starting empty: {err}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                log::warn!("notebook could not be read: {err}");
                return false;
            }
        };

        let mut notebook = Notebook::from_entries(&stored);
        let pending = notebook.merge(self.notebook.entries()) > 0;
        self.notebook = notebook;
        self.synced = true;
        pending
    }

    async fn persist(&self) {
        if !self.synced {
            log::warn!("notebook not saved: stored copy is still unread");
            return;
        }
        let text = match encode_answered(self.notebook.entries()) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("notebook could not be encoded: {err}");
                return;
            }
        };
        if let Err(err) = self.values.set(NOTEBOOK_KEY, &text).await {
            log::warn!("notebook could not be saved: {err}");
        }
    }
}
