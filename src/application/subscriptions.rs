//! Subscription handle set

use crate::application::ports::Disposer;

/// Disposers of every subscription one session opened.
///
/// Released all together, exactly once. Dropping the set releases it too.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    disposers: Vec<Disposer>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of one more subscription
    pub fn push(&mut self, disposer: Disposer) {
        self.disposers.push(disposer);
    }

    pub fn len(&self) -> usize {
        self.disposers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disposers.is_empty()
    }

    /// Dispose every held subscription.
    ///
    /// # Returns
    /// How many subscriptions were released (0 on repeat calls)
    pub fn dispose_all(&mut self) -> usize {
        let count = self.disposers.len();
        for disposer in self.disposers.drain(..) {
            disposer.dispose();
        }
        count
    }
}

impl Drop for SubscriptionSet {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
