use serde::{Deserialize, Serialize};

/// Declarative metadata identifying a loadable unit as a plugin candidate.
///
/// `name` is the human-readable plugin identifier, unique within its archive
/// among non-empty names. `uuid` is an opaque identity token compared by
/// exact equality only — it guards a caller against accidentally binding to
/// a different plugin that reuses a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub uuid: String,
}

impl Marker {
    pub fn new(name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_equality_is_exact() {
        let marker = Marker::new("Echo", "u1");
        assert_eq!(marker.uuid, "u1");
        // No normalization: case and whitespace are significant.
        assert_ne!(marker.uuid, "U1");
        assert_ne!(marker.uuid, "u1 ");
        assert_ne!(marker.uuid, " u1");
    }

    #[test]
    fn test_serde_roundtrip() {
        let marker = Marker::new("Echo", "u1");
        let json = serde_json::to_string(&marker).unwrap();
        let parsed: Marker = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, marker);

        let declared: Marker = serde_json::from_str(r#"{"name":"Upper","uuid":"u2"}"#).unwrap();
        assert_eq!(declared.name, "Upper");
        assert_eq!(declared.uuid, "u2");
    }

    #[test]
    fn test_empty_name_allowed() {
        let marker = Marker::new("", "hidden-token");
        assert!(marker.name.is_empty());
        assert_eq!(marker.uuid, "hidden-token");
    }
}
