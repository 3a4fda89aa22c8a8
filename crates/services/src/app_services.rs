use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::TopicCatalog;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::feedback::AnswerFeedback;
use crate::flow::QuizFlow;
use crate::quiz_service::QuizService;
use crate::settings::QuizSettings;

/// Assemble a quiz flow backed by `SQLite` values and a directory of topic files.
///
/// # Errors
///
/// Returns `AppServicesError` if storage initialization fails.
pub async fn build_sqlite_flow(
    db_url: &str,
    questions_dir: impl Into<PathBuf>,
    clock: Clock,
    settings: QuizSettings,
    feedback: Arc<dyn AnswerFeedback>,
) -> Result<QuizFlow, AppServicesError> {
    let catalog = TopicCatalog::builtin();
    let storage = Storage::sqlite(db_url, questions_dir, catalog.clone()).await?;
    let service = QuizService::new(clock, catalog, settings, &storage)
        .await
        .with_feedback(feedback);
    Ok(QuizFlow::new(service))
}
