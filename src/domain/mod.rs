//! Domain types shared by the reconciliation and watch-progress pipeline.

pub mod events;
pub mod resource;

pub use resource::Resource;

use serde::{Deserialize, Serialize};

/// How the playback queue treats repeated merges within one season session.
///
/// Per C-CUSTOM-TYPE: an enum instead of a bool flag.
///
/// # Examples
///
/// ```rust
/// use zplex::domain::QueuePolicy;
///
/// assert_eq!(QueuePolicy::default(), QueuePolicy::Accumulate);
/// assert!(!QueuePolicy::Replace.is_accumulate());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueuePolicy {
    /// Every merge appends its playable episodes, duplicates included.
    #[default]
    Accumulate,
    /// Every merge replaces the queue with its playable episodes.
    Replace,
}

impl QueuePolicy {
    #[must_use]
    pub const fn is_accumulate(&self) -> bool {
        matches!(self, Self::Accumulate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_policy_defaults_to_accumulate() {
        assert!(QueuePolicy::default().is_accumulate());
        let policy: QueuePolicy = serde_json::from_str("\"replace\"").unwrap();
        assert_eq!(policy, QueuePolicy::Replace);
    }
}
