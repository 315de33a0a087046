use super::row::{Cell, Node, Row};

/// Text of the first element matching `cell`, or an empty string when the
/// row has no such element.
pub fn text_or_blank<R: Row>(row: &R, cell: Cell) -> String {
    row.find_first(cell)
        .map(|node| node.stripped_text())
        .unwrap_or_default()
}
