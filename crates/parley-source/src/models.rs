use serde::{Deserialize, Serialize};

/// One message as served by the remote API.
///
/// Ids and author names are expected to be consistent but the source does not
/// guarantee it; nothing here enforces uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberMessage {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub timestamp: String,
    pub message: String,
}

/// One `skip`/`limit` window of the collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagePage {
    #[serde(default)]
    pub items: Vec<MemberMessage>,
    #[serde(default)]
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_missing_fields() {
        let page: MessagePage = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_item_missing_field_is_rejected() {
        let json = r#"{"items": [{"id": "1", "user_id": "u1"}], "total": 1}"#;
        assert!(serde_json::from_str::<MessagePage>(json).is_err());
    }
}
