use serde::{Deserialize, Serialize};

/// One user's in-flight report submission.
///
/// Plain structured data only: tags are bare ids and coordinates stay as the
/// raw strings the client sent, so the whole draft serializes cleanly into
/// the session store. Coercion to numbers happens once, at commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDraft {
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
}

impl ReportDraft {
    pub fn clear_coordinates(&mut self) {
        self.latitude = None;
        self.longitude = None;
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() || self.longitude.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_serializes_tags_as_bare_ids() {
        let draft = ReportDraft {
            comment: Some("pothole on main street".to_string()),
            tag_ids: vec![3, 7],
            ..Default::default()
        };

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["tag_ids"], serde_json::json!([3, 7]));
        // never embedded objects
        assert!(value["tag_ids"][0].is_i64());
    }

    #[test]
    fn test_partial_json_deserializes_with_defaults() {
        let draft: ReportDraft = serde_json::from_str(r#"{"comment":"x"}"#).unwrap();
        assert_eq!(draft.comment.as_deref(), Some("x"));
        assert!(draft.tag_ids.is_empty());
        assert!(!draft.has_coordinates());
    }

    #[test]
    fn test_clear_coordinates() {
        let mut draft = ReportDraft {
            latitude: Some("35.6".to_string()),
            longitude: Some("139.7".to_string()),
            ..Default::default()
        };
        assert!(draft.has_coordinates());
        draft.clear_coordinates();
        assert!(!draft.has_coordinates());
    }
}
