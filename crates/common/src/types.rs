use serde::Deserialize;

/// One tracked work item as reported by the status service.
///
/// Only lives for the duration of a single poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkItemRecord {
    #[serde(rename = "homework_name")]
    pub name: String,
    #[serde(rename = "status")]
    pub status_code: String,
}
