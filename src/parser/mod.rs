pub mod carry;
pub mod event;
pub mod fields;
pub mod impact;
pub mod row;

use scraper::Html;
use tracing::debug;

use crate::error::CalendarError;
pub use event::Event;

/// HTML page → event rows → events, in document order.
pub fn parse_calendar(html: &str) -> Result<Vec<Event>, CalendarError> {
    let doc = Html::parse_document(html);
    let rows: Vec<_> = doc.select(row::row_selector()).collect();
    debug!(rows = rows.len(), "selected calendar rows");
    event::assemble(rows)
}
