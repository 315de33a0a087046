use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CalendarError {
    /// Row selector matched nothing. Either the markup drifted or the
    /// response was a block page; both look the same from here.
    #[error("No event rows found: page structure may have changed or the request was blocked")]
    NoRowsFound,
}
