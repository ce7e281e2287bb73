//! Framework-free description of the dashboard page.
//!
//! Rendering produces a flat list of [`DisplayElement`]s in page order; the web and terminal
//! front ends only translate that list into their own widgets.

use serde::Serialize;

use crate::projection::{PROJECTION_COLUMNS, ProjectionRow};

pub const PAGE_TITLE: &str = "NFL Elo Probabilities";
pub const HEADING: &str = "NFL Elo-Based Probabilities";
pub const TABLE_SUBHEADING: &str = "Elo-Based Probabilities";
pub const CHART_SUBHEADING: &str = "Visual Comparison";
pub const CHART_TITLE: &str = "Elo-Based Win Probabilities";
pub const HOME_SERIES: &str = "Home Win Prob";
pub const AWAY_SERIES: &str = "Away Win Prob";
pub const NO_DATA_WARNING: &str = "No live data available right now.";

const BAR_WIDTH: f64 = 0.35;
const X_LABEL_ROTATION_DEG: i32 = 90;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayElement {
    Title { text: String },
    Heading { text: String },
    Subheading { text: String },
    Table(TableElement),
    Chart(ChartElement),
    Message { level: MessageLevel, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableElement {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartElement {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Categorical x axis, in first-seen order.
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
    /// Fraction of one category slot.
    pub bar_width: f64,
    pub x_label_rotation: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub bars: Vec<ChartBar>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartBar {
    /// Index into [`ChartElement::categories`].
    pub category: usize,
    pub bottom: f64,
    pub height: f64,
}

impl ChartBar {
    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }
}

impl ChartElement {
    /// Smallest and largest y reached by any bar edge. Always spans zero.
    pub fn value_range(&self) -> (f64, f64) {
        let mut lo = 0.0_f64;
        let mut hi = 0.0_f64;
        for bar in self.series.iter().flat_map(|s| s.bars.iter()) {
            for y in [bar.bottom, bar.top()] {
                if y.is_finite() {
                    lo = lo.min(y);
                    hi = hi.max(y);
                }
            }
        }
        if hi - lo <= f64::EPSILON {
            hi = lo + 1.0;
        }
        (lo, hi)
    }
}

pub fn render_table(rows: &[ProjectionRow]) -> TableElement {
    TableElement {
        columns: PROJECTION_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: rows.iter().map(|row| row.cells().to_vec()).collect(),
    }
}

/// Home bars sit on the home team's category; away bars sit on the away team's category,
/// starting at the home value. The two bars of one game are therefore usually on different
/// x positions.
pub fn render_chart(rows: &[ProjectionRow]) -> ChartElement {
    let mut categories: Vec<String> = Vec::new();
    let mut category_of = |name: &str| -> usize {
        if let Some(idx) = categories.iter().position(|c| c == name) {
            return idx;
        }
        categories.push(name.to_string());
        categories.len() - 1
    };

    let home_bars: Vec<ChartBar> = rows
        .iter()
        .map(|row| ChartBar {
            category: category_of(&row.home),
            bottom: 0.0,
            height: row.model_prob_home,
        })
        .collect();
    let away_bars: Vec<ChartBar> = rows
        .iter()
        .map(|row| ChartBar {
            category: category_of(&row.away),
            bottom: row.model_prob_home,
            height: row.model_prob_away,
        })
        .collect();

    ChartElement {
        title: CHART_TITLE.to_string(),
        x_label: "Teams".to_string(),
        y_label: "Probability".to_string(),
        categories,
        series: vec![
            ChartSeries {
                label: HOME_SERIES.to_string(),
                bars: home_bars,
            },
            ChartSeries {
                label: AWAY_SERIES.to_string(),
                bars: away_bars,
            },
        ],
        bar_width: BAR_WIDTH,
        x_label_rotation: X_LABEL_ROTATION_DEG,
    }
}

/// Full page for a non-empty projection table. An empty table renders as unavailable.
pub fn render_page(rows: &[ProjectionRow]) -> Vec<DisplayElement> {
    if rows.is_empty() {
        return render_unavailable(None);
    }
    let mut out = page_header();
    out.push(DisplayElement::Subheading {
        text: TABLE_SUBHEADING.to_string(),
    });
    out.push(DisplayElement::Table(render_table(rows)));
    out.push(DisplayElement::Subheading {
        text: CHART_SUBHEADING.to_string(),
    });
    out.push(DisplayElement::Chart(render_chart(rows)));
    out
}

pub fn render_unavailable(error: Option<&str>) -> Vec<DisplayElement> {
    let mut out = page_header();
    if let Some(error) = error {
        out.push(DisplayElement::Message {
            level: MessageLevel::Error,
            text: error.to_string(),
        });
    }
    out.push(DisplayElement::Message {
        level: MessageLevel::Warning,
        text: NO_DATA_WARNING.to_string(),
    });
    out
}

pub fn page_title(elements: &[DisplayElement]) -> Option<&str> {
    elements.iter().find_map(|el| match el {
        DisplayElement::Title { text } => Some(text.as_str()),
        _ => None,
    })
}

fn page_header() -> Vec<DisplayElement> {
    vec![
        DisplayElement::Title {
            text: PAGE_TITLE.to_string(),
        },
        DisplayElement::Heading {
            text: HEADING.to_string(),
        },
    ]
}
