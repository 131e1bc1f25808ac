use std::fmt;

/// Episode state of a [`Loader`](crate::Loader).
///
/// ```text
/// Empty --load()--> Loading --EOF / cancel()--> Loaded
///   ^                  |                           |
///   +----- reset() ----+---------- reset() --------+
/// ```
///
/// `load()` from `Loaded` starts a fresh episode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadStatus {
    /// No buffer, no open backend.
    #[default]
    Empty,
    /// The backend is open and reads are accepted.
    Loading,
    /// The backend is closed; buffer and counters are a frozen snapshot.
    Loaded,
}
impl LoadStatus {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}
impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert_eq!(LoadStatus::default(), LoadStatus::Empty);
        assert!(LoadStatus::default().is_empty());
    }

    #[test]
    fn test_predicates() {
        assert!(LoadStatus::Loading.is_loading());
        assert!(!LoadStatus::Loading.is_loaded());
        assert!(LoadStatus::Loaded.is_loaded());
        assert!(!LoadStatus::Loaded.is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(LoadStatus::Empty.to_string(), "empty");
        assert_eq!(LoadStatus::Loading.to_string(), "loading");
        assert_eq!(LoadStatus::Loaded.to_string(), "loaded");
    }
}
