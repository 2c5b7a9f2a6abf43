//! Three-state result wrapper published to season-view subscribers.

use serde::Serialize;

/// Loading/success/error state of a value produced by an async chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum Resource<T> {
    #[default]
    Loading,
    Success(T),
    Error(String),
}

impl<T> Resource<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_follow_state() {
        let ok: Resource<i32> = Resource::Success(2);
        assert!(ok.is_success());
        assert_eq!(ok.data(), Some(&2));
        assert_eq!(ok.error(), None);

        let err: Resource<i32> = Resource::Error("No internet connection".to_string());
        assert!(!err.is_success());
        assert!(err.data().is_none());
        assert_eq!(err.error(), Some("No internet connection"));

        assert_eq!(Resource::<i32>::default(), Resource::Loading);
    }

    #[test]
    fn serializes_with_state_tag() {
        let ok: Resource<i32> = Resource::Success(3);
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["state"], "success");
        assert_eq!(json["data"], 3);
    }
}
