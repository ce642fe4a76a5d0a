use std::fmt::{Display, Formatter, Result as FmtResult};

/// Object storage backend types
///
/// Defined in core because it's reported by storage implementations and shown by the
/// health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStorageBackend {
    Local,
}

impl Display for ObjectStorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ObjectStorageBackend::Local => write!(f, "local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde_name() {
        let backend = ObjectStorageBackend::Local;
        assert_eq!(backend.to_string(), "local");
        assert_eq!(serde_json::to_value(backend).unwrap(), serde_json::json!("local"));
    }
}
