//! Positional mapping from raw spreadsheet rows to structured records.

use crate::models::SheetRow;

/// Column count of the data range: topic, grammar resource, vocabulary,
/// theme, implicit objective, classroom link.
pub const EXPECTED_COLUMNS: usize = 6;

/// What became of one raw row at the mapping boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Row carries a topic name and fits the expected shape.
    Mapped(SheetRow),
    /// First cell is blank; the row is dropped without being an error.
    BlankTopic,
    /// More cells than the data range has columns. Flagged rather than
    /// silently truncated.
    UnexpectedShape { cells: usize },
}

/// Map one raw row.
///
/// The values API omits trailing empty cells, so short rows are padded with
/// empty strings; rows wider than the range mean the sheet layout has
/// drifted and are flagged instead.
pub fn map_row(cells: &[String]) -> RowOutcome {
    if cells.len() > EXPECTED_COLUMNS {
        return RowOutcome::UnexpectedShape { cells: cells.len() };
    }

    let cell = |index: usize| cells.get(index).cloned().unwrap_or_default();

    let topic = cell(0);
    if topic.trim().is_empty() {
        return RowOutcome::BlankTopic;
    }

    RowOutcome::Mapped(SheetRow {
        topic,
        grammar_resource: cell(1),
        vocabulary: cell(2),
        theme: cell(3),
        implicit_objective: cell(4),
        classroom_link: cell(5),
    })
}
