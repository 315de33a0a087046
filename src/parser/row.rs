use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| sel("tr.calendar__row[data-event-id]"));
static DATE_SEL: LazyLock<Selector> = LazyLock::new(|| sel("td.calendar__date"));
static TIME_SEL: LazyLock<Selector> = LazyLock::new(|| sel("td.calendar__time"));
static CURRENCY_SEL: LazyLock<Selector> = LazyLock::new(|| sel("td.calendar__currency"));
static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| sel("span.calendar__event-title"));
static IMPACT_SEL: LazyLock<Selector> = LazyLock::new(|| sel("td.calendar__impact span.icon"));
static ACTUAL_SEL: LazyLock<Selector> = LazyLock::new(|| sel("td.calendar__actual"));
static FORECAST_SEL: LazyLock<Selector> = LazyLock::new(|| sel("td.calendar__forecast"));
static PREVIOUS_SEL: LazyLock<Selector> = LazyLock::new(|| sel("td.calendar__previous"));

fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// Selector for one event row of the calendar table.
pub fn row_selector() -> &'static Selector {
    &ROW_SEL
}

/// The fixed set of sub-elements looked up inside a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Date,
    Time,
    Currency,
    Title,
    /// The `span.icon` inside the impact cell, not the cell itself.
    ImpactIcon,
    Actual,
    Forecast,
    Previous,
}

impl Cell {
    pub fn selector(self) -> &'static Selector {
        match self {
            Cell::Date => &DATE_SEL,
            Cell::Time => &TIME_SEL,
            Cell::Currency => &CURRENCY_SEL,
            Cell::Title => &TITLE_SEL,
            Cell::ImpactIcon => &IMPACT_SEL,
            Cell::Actual => &ACTUAL_SEL,
            Cell::Forecast => &FORECAST_SEL,
            Cell::Previous => &PREVIOUS_SEL,
        }
    }
}

/// A matched element inside a row.
pub trait Node {
    /// Text content: each fragment trimmed, empty ones dropped, the rest joined.
    fn stripped_text(&self) -> String;
    fn attribute(&self, name: &str) -> Option<&str>;
}

/// One table row. Only needs to find the first element for a cell.
pub trait Row {
    type Node<'a>: Node
    where
        Self: 'a;

    fn find_first(&self, cell: Cell) -> Option<Self::Node<'_>>;
}

impl<'h> Node for ElementRef<'h> {
    fn stripped_text(&self) -> String {
        self.text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }
}

impl<'h> Row for ElementRef<'h> {
    type Node<'a> = ElementRef<'h> where Self: 'a;

    fn find_first(&self, cell: Cell) -> Option<ElementRef<'h>> {
        self.select(cell.selector()).next()
    }
}


#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    fn first_row(doc: &Html) -> ElementRef<'_> {
        doc.select(row_selector()).next().unwrap()
    }

    #[test]
    fn row_selector_requires_event_id() {
        let doc = Html::parse_document(
            r#"<table>
                <tr class="calendar__row calendar__row--day-breaker"><td>Mon</td></tr>
                <tr class="calendar__row" data-event-id="1"><td class="calendar__currency">USD</td></tr>
            </table>"#,
        );
        assert_eq!(doc.select(row_selector()).count(), 1);
    }

    #[test]
    fn stripped_text_joins_trimmed_fragments() {
        let doc = Html::parse_document(
            r#"<table><tr class="calendar__row" data-event-id="1">
                <td class="calendar__date"> <span>Mon</span>
                    <span>Jan 1</span> </td>
            </tr></table>"#,
        );
        let row = first_row(&doc);
        let date = row.find_first(Cell::Date).unwrap();
        assert_eq!(date.stripped_text(), "MonJan 1");
    }

    #[test]
    fn impact_icon_found_inside_impact_cell_only() {
        let doc = Html::parse_document(
            r#"<table><tr class="calendar__row" data-event-id="1">
                <td class="calendar__time"><span class="icon icon--red"></span></td>
                <td class="calendar__impact"><span class="icon icon--ff-impact-ora" title="Medium Impact Expected"></span></td>
            </tr></table>"#,
        );
        let row = first_row(&doc);
        let icon = row.find_first(Cell::ImpactIcon).unwrap();
        assert_eq!(icon.attribute("title"), Some("Medium Impact Expected"));
        assert_eq!(icon.attribute("class"), Some("icon icon--ff-impact-ora"));
    }

    #[test]
    fn missing_cell_is_none() {
        let doc = Html::parse_document(
            r#"<table><tr class="calendar__row" data-event-id="1"><td class="calendar__currency">EUR</td></tr></table>"#,
        );
        let row = first_row(&doc);
        assert!(row.find_first(Cell::Forecast).is_none());
        assert!(row.find_first(Cell::ImpactIcon).is_none());
    }
}
