/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    /// Zero-based position of the question on screen.
    pub current: usize,
    pub is_complete: bool,
}
