/// Blocking user interaction surfaced by the cart view.
pub trait UserPrompt: Send + Sync {
    /// Ask a yes/no question. `false` aborts the pending action.
    fn confirm(&self, question: &str) -> bool;
    /// Report a failed action.
    fn alert(&self, message: &str);
    /// Report a successful action worth telling the user about.
    fn notify(&self, message: &str);
}

