use super::fields::text_or_blank;
use super::row::{Cell, Row};

/// Date and time last seen in the table. The page prints them once per
/// group of rows and leaves the cells blank for the rest of the group.
///
/// Both start as `None`; a row without its own value inherits whatever is
/// here, including `None` if no group header has been seen yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarryForward {
    pub date: Option<String>,
    pub time: Option<String>,
}

impl CarryForward {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one row's own date/time cells into the state.
    pub fn observe<R: Row>(&mut self, row: &R) {
        let date = text_or_blank(row, Cell::Date);
        if !date.is_empty() {
            self.date = Some(split_date(&date));
        }

        let time = text_or_blank(row, Cell::Time);
        if !time.is_empty() {
            self.time = Some(time);
        }
    }
}

/// "Jan1" -> "Jan 1", "MonJan 6" -> "Mon Jan 6".
///
/// Inserts a space after the third character. Values of three characters or
/// fewer are returned as-is.
pub fn split_date(raw: &str) -> String {
    match raw.char_indices().nth(3) {
        Some((idx, _)) => format!("{} {}", &raw[..idx], &raw[idx..]),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::row::fake::FakeRow;

    #[test]
    fn split_date_inserts_space() {
        assert_eq!(split_date("Jan1"), "Jan 1");
        assert_eq!(split_date("Dec25"), "Dec 25");
        assert_eq!(split_date("MonJan 6"), "Mon Jan 6");
    }

    #[test]
    fn split_date_short_values_unchanged() {
        assert_eq!(split_date("Mon"), "Mon");
        assert_eq!(split_date("Ja"), "Ja");
        assert_eq!(split_date(""), "");
    }

    #[test]
    fn split_date_respects_char_boundaries() {
        assert_eq!(split_date("Méi5"), "Méi 5");
    }

    #[test]
    fn starts_uninitialised() {
        let mut state = CarryForward::new();
        state.observe(&FakeRow::new().cell(Cell::Currency, "USD"));
        assert_eq!(state, CarryForward { date: None, time: None });
    }

    #[test]
    fn blank_cells_keep_previous_values() {
        let mut state = CarryForward::new();
        state.observe(&FakeRow::new().cell(Cell::Date, "Jan1").cell(Cell::Time, "8:30am"));
        state.observe(&FakeRow::new().cell(Cell::Date, "   ").cell(Cell::Time, ""));
        assert_eq!(state.date.as_deref(), Some("Jan 1"));
        assert_eq!(state.time.as_deref(), Some("8:30am"));
    }

    #[test]
    fn new_values_supersede() {
        let mut state = CarryForward::new();
        state.observe(&FakeRow::new().cell(Cell::Date, "Jan1").cell(Cell::Time, "8:30am"));
        state.observe(&FakeRow::new().cell(Cell::Time, "All Day"));
        assert_eq!(state.date.as_deref(), Some("Jan 1"));
        assert_eq!(state.time.as_deref(), Some("All Day"));
        state.observe(&FakeRow::new().cell(Cell::Date, "Jan2"));
        assert_eq!(state.date.as_deref(), Some("Jan 2"));
        assert_eq!(state.time.as_deref(), Some("All Day"));
    }
}
