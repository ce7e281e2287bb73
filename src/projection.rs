use std::collections::HashMap;

use serde::Serialize;

use crate::feed::RawRatingRow;

pub const PROJECTION_COLUMNS: [&str; 4] = ["home", "away", "model_prob_home", "model_prob_away"];

/// One matchup per home team. `model_prob_away` is always `1 - model_prob_home`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionRow {
    pub home: String,
    pub away: String,
    pub model_prob_home: f64,
    pub model_prob_away: f64,
}

impl ProjectionRow {
    pub fn cells(&self) -> [String; 4] {
        [
            self.home.clone(),
            self.away.clone(),
            format_value(self.model_prob_home),
            format_value(self.model_prob_away),
        ]
    }
}

/// Keeps the last row per `team1`, in the order those last rows appear in the feed, and
/// relabels it as a home/away projection.
///
/// The rating columns are carried over as-is; the away value is then overwritten with
/// `1 - home`. Elo ratings are not probabilities, so the result is only normalized in the
/// sense that the pair sums to one.
pub fn transform(raw: &[RawRatingRow]) -> Vec<ProjectionRow> {
    let mut last_by_team: HashMap<&str, usize> = HashMap::new();
    for (idx, row) in raw.iter().enumerate() {
        // No group key, no row.
        if row.team1.is_empty() {
            continue;
        }
        last_by_team.insert(row.team1.as_str(), idx);
    }

    let mut keep: Vec<usize> = last_by_team.into_values().collect();
    keep.sort_unstable();

    keep.into_iter()
        .map(|idx| {
            let row = &raw[idx];
            let model_prob_home = row.elo1_pre;
            ProjectionRow {
                home: row.team1.clone(),
                away: row.team2.clone(),
                model_prob_home,
                model_prob_away: 1.0 - model_prob_home,
            }
        })
        .collect()
}

pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{value:.1}");
    }
    let mut out = format!("{value:.6}");
    while out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.push('0');
    }
    out
}
