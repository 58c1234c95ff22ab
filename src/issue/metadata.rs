use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// YAML frontmatter of an issue file.
///
/// Only the keys compaction reads or writes are typed; everything else is
/// kept in `extra` so rewriting a file never drops fields owned by other tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueFrontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub compacted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compacted_at: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}
