/// Notified after each answer, e.g. to play a sound or vibrate.
///
/// Calls are fire-and-forget: implementations must return promptly and the
/// quiz never waits on any work they start.
pub trait AnswerFeedback: Send + Sync {
    fn on_correct(&self);
    fn on_incorrect(&self);
}

/// Feedback that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl AnswerFeedback for SilentFeedback {
    fn on_correct(&self) {}

    fn on_incorrect(&self) {}
}
