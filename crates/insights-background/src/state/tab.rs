use serde::{Deserialize, Serialize};

/// The browser tab a tab context hub is bound to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabStoreData {
    pub id: Option<i64>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub is_closed: bool,
    /// The tab navigated away from the page that was scanned
    pub is_changed: bool,
    pub is_page_hidden: bool,
}
