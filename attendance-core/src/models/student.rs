use serde::{Deserialize, Serialize};

/// Roster entry as reported by the backend. Section is kept as the wire
/// label since the roster view only displays it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub section: String,
}

/// Students grouped by section, as returned by `GET /sections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionGroup {
    pub section: String,
    pub students: Vec<Student>,
}
