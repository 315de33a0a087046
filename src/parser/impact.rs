use std::str::FromStr;

use serde::Serialize;

use super::row::{Cell, Node, Row};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ImpactLevel {
    High,
    Medium,
    #[default]
    Low,
    Holiday,
}

impl ImpactLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ImpactLevel::High => "High",
            ImpactLevel::Medium => "Medium",
            ImpactLevel::Low => "Low",
            ImpactLevel::Holiday => "Holiday",
        }
    }
}

impl FromStr for ImpactLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(ImpactLevel::High),
            "Medium" => Ok(ImpactLevel::Medium),
            "Low" => Ok(ImpactLevel::Low),
            "Holiday" => Ok(ImpactLevel::Holiday),
            other => Err(format!("unknown impact level: {other}")),
        }
    }
}

/// Substrings of the icon's `title`, checked in order.
const LABEL_RULES: &[(&str, ImpactLevel)] = &[
    ("High Impact", ImpactLevel::High),
    ("Medium Impact", ImpactLevel::Medium),
    ("Low Impact", ImpactLevel::Low),
    ("Holiday", ImpactLevel::Holiday),
];

/// Substrings of any class token (icon colour), checked in order.
/// Only consulted when no label rule matched.
const CLASS_RULES: &[(&str, ImpactLevel)] = &[
    ("red", ImpactLevel::High),
    ("ora", ImpactLevel::Medium),
    ("yel", ImpactLevel::Low),
    ("gra", ImpactLevel::Holiday),
];

/// Impact of one row, read from the icon in its impact cell. Rows without
/// an icon are `Low`.
pub fn classify<R: Row>(row: &R) -> ImpactLevel {
    match row.find_first(Cell::ImpactIcon) {
        Some(icon) => resolve(
            icon.attribute("title").unwrap_or(""),
            icon.attribute("class").unwrap_or(""),
        ),
        None => ImpactLevel::default(),
    }
}

pub fn resolve(title: &str, class_attr: &str) -> ImpactLevel {
    by_label(title)
        .or_else(|| by_class(class_attr))
        .unwrap_or_default()
}

fn by_label(title: &str) -> Option<ImpactLevel> {
    LABEL_RULES
        .iter()
        .find(|(needle, _)| title.contains(needle))
        .map(|&(_, level)| level)
}

fn by_class(class_attr: &str) -> Option<ImpactLevel> {
    CLASS_RULES
        .iter()
        .find(|(needle, _)| class_attr.split_whitespace().any(|tok| tok.contains(needle)))
        .map(|&(_, level)| level)
}
