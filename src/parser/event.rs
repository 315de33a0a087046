use serde::Serialize;
use tracing::debug;

use super::carry::CarryForward;
use super::fields::text_or_blank;
use super::impact::{classify, ImpactLevel};
use super::row::{Cell, Row};
use crate::error::CalendarError;

/// One calendar listing. `date`/`time` are `None` only for rows that come
/// before the first populated date/time cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub date: Option<String>,
    pub time: Option<String>,
    pub currency: String,
    pub event: String,
    pub impact: ImpactLevel,
    pub actual: String,
    pub forecast: String,
    pub previous: String,
}

/// Build the event for `row`, updating `state` with the row's own date/time first.
pub fn build<R: Row>(row: &R, state: &mut CarryForward) -> Event {
    state.observe(row);

    Event {
        date: state.date.clone(),
        time: state.time.clone(),
        currency: text_or_blank(row, Cell::Currency),
        event: text_or_blank(row, Cell::Title),
        impact: classify(row),
        actual: text_or_blank(row, Cell::Actual),
        forecast: text_or_blank(row, Cell::Forecast),
        previous: text_or_blank(row, Cell::Previous),
    }
}

/// One event per row, in row order. Zero rows is an error, not an empty calendar.
pub fn assemble<R, I>(rows: I) -> Result<Vec<Event>, CalendarError>
where
    R: Row,
    I: IntoIterator<Item = R>,
{
    let mut state = CarryForward::new();
    let events: Vec<Event> = rows
        .into_iter()
        .map(|row| build(&row, &mut state))
        .collect();

    if events.is_empty() {
        return Err(CalendarError::NoRowsFound);
    }
    debug!(events = events.len(), "assembled calendar");
    Ok(events)
}
