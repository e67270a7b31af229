/// Presentation class of a display row, used to pick its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Deaths,
    Recovered,
    Unresolved,
    Default,
}

impl RowKind {
    /// Classify a row by the first matching label; earlier labels win.
    pub fn classify(row: &str) -> Self {
        if row.contains("Deaths") {
            RowKind::Deaths
        } else if row.contains("Recovered") {
            RowKind::Recovered
        } else if row.contains("Unresolved") {
            RowKind::Unresolved
        } else {
            RowKind::Default
        }
    }
}
