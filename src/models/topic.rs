//! Topic and exercise models matching the frontend interfaces.

use serde::{Deserialize, Serialize};

use super::Level;

/// One content row read from a level tab, before persistence.
///
/// Cell order is fixed by the spreadsheet layout: topic, grammar resource,
/// vocabulary, theme, implicit objective, classroom link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub topic: String,
    pub grammar_resource: String,
    pub vocabulary: String,
    pub theme: String,
    pub implicit_objective: String,
    pub classroom_link: String,
}

/// A curriculum topic as persisted and served to the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub level: Level,
    /// Position in the course sequence, assigned at import time.
    pub order_index: i64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grammar_resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit_objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classroom_link: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Insert payload for a topic row.
#[derive(Debug, Clone)]
pub struct NewTopic {
    pub name: String,
    pub level: Level,
    pub order_index: i64,
    pub description: String,
    pub grammar_resource: Option<String>,
    pub vocabulary: Option<String>,
    pub theme: Option<String>,
    pub implicit_objective: Option<String>,
    pub classroom_link: Option<String>,
}

impl NewTopic {
    /// Builds the insert payload for a mapped sheet row.
    ///
    /// Empty cells become `None`; the description is synthesized from the
    /// level and topic name.
    pub fn from_sheet_row(level: Level, row: &SheetRow, order_index: i64) -> Self {
        let name = row.topic.trim().to_string();
        let description = format!("{} level Spanish topic: {}", level.as_str(), name);
        Self {
            name,
            level,
            order_index,
            description,
            grammar_resource: optional_cell(&row.grammar_resource),
            vocabulary: optional_cell(&row.vocabulary),
            theme: optional_cell(&row.theme),
            implicit_objective: optional_cell(&row.implicit_objective),
            classroom_link: optional_cell(&row.classroom_link),
        }
    }
}

fn optional_cell(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
