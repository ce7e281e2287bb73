//! Browser front end: turns the element list into one self-contained HTML document with the
//! chart drawn as inline SVG.

use std::fmt::Write as _;

use crate::display::{ChartElement, DisplayElement, MessageLevel, TableElement, page_title};

const SERIES_COLORS: [&str; 2] = ["#1f77b4", "#ff7f0e"];

const SVG_HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 48.0;
const MARGIN_BOTTOM: f64 = 120.0;
const MIN_PLOT_WIDTH: f64 = 640.0;
const SLOT_WIDTH: f64 = 36.0;
const TICK_TARGET: f64 = 6.0;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#262730}\
table{border-collapse:collapse;font-size:14px}\
th,td{border:1px solid #ddd;padding:4px 10px;text-align:left}\
th{background:#f0f2f6}\
td.num{text-align:right;font-variant-numeric:tabular-nums}\
.msg{padding:12px 16px;border-radius:6px;margin:12px 0}\
.msg.error{background:#ffebee;color:#b71c1c}\
.msg.warning{background:#fff8e1;color:#8d6e00}\
svg text{font-size:12px;fill:#262730}";

/// `refresh_action`, when set, adds a button that POSTs to that path.
pub fn to_html(elements: &[DisplayElement], refresh_action: Option<&str>) -> String {
    let title = page_title(elements).unwrap_or("Dashboard");
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape(title));
    let _ = writeln!(out, "<style>{STYLE}</style>");
    out.push_str("</head>\n<body>\n");

    for element in elements {
        match element {
            DisplayElement::Title { .. } => {}
            DisplayElement::Heading { text } => {
                let _ = writeln!(out, "<h1>{}</h1>", escape(text));
            }
            DisplayElement::Subheading { text } => {
                let _ = writeln!(out, "<h2>{}</h2>", escape(text));
            }
            DisplayElement::Table(table) => push_table(&mut out, table),
            DisplayElement::Chart(chart) => push_chart(&mut out, chart),
            DisplayElement::Message { level, text } => {
                let class = match level {
                    MessageLevel::Error => "error",
                    MessageLevel::Warning => "warning",
                };
                let _ = writeln!(
                    out,
                    "<div class=\"msg {class}\" role=\"alert\">{}</div>",
                    escape(text)
                );
            }
        }
    }

    if let Some(action) = refresh_action {
        let _ = writeln!(
            out,
            "<form method=\"post\" action=\"{}\"><button type=\"submit\">Refresh data</button></form>",
            escape(action)
        );
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn push_table(out: &mut String, table: &TableElement) {
    out.push_str("<table>\n<thead><tr>");
    for column in &table.columns {
        let _ = write!(out, "<th>{}</th>", escape(column));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            let class = if cell.parse::<f64>().is_ok() { " class=\"num\"" } else { "" };
            let _ = write!(out, "<td{class}>{}</td>", escape(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn push_chart(out: &mut String, chart: &ChartElement) {
    let slots = chart.categories.len().max(1) as f64;
    let plot_w = (slots * SLOT_WIDTH).max(MIN_PLOT_WIDTH);
    let plot_h = SVG_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let width = MARGIN_LEFT + plot_w + MARGIN_RIGHT;
    let slot_w = plot_w / slots;

    let (lo, hi) = chart.value_range();
    let ticks = nice_ticks(lo, hi);
    let axis_lo = ticks.first().copied().unwrap_or(lo).min(lo);
    let axis_hi = ticks.last().copied().unwrap_or(hi).max(hi);
    let y_of = |v: f64| MARGIN_TOP + plot_h * (axis_hi - v) / (axis_hi - axis_lo);

    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{SVG_HEIGHT:.0}\" \
         viewBox=\"0 0 {width:.0} {SVG_HEIGHT:.0}\" role=\"img\" aria-label=\"{}\">",
        escape(&chart.title)
    );
    let _ = writeln!(
        out,
        "<text x=\"{:.1}\" y=\"24\" text-anchor=\"middle\" style=\"font-size:15px\">{}</text>",
        MARGIN_LEFT + plot_w / 2.0,
        escape(&chart.title)
    );

    // y grid + ticks
    for tick in &ticks {
        let y = y_of(*tick);
        let _ = writeln!(
            out,
            "<line x1=\"{MARGIN_LEFT:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#e6e6e6\"/>",
            MARGIN_LEFT + plot_w
        );
        let _ = writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{}</text>",
            MARGIN_LEFT - 6.0,
            y + 4.0,
            format_tick(*tick)
        );
    }

    for (series_idx, series) in chart.series.iter().enumerate() {
        let color = SERIES_COLORS[series_idx % SERIES_COLORS.len()];
        for bar in &series.bars {
            if !bar.bottom.is_finite() || !bar.height.is_finite() {
                continue;
            }
            let bar_w = slot_w * chart.bar_width;
            let x = MARGIN_LEFT + slot_w * (bar.category as f64 + 0.5) - bar_w / 2.0;
            let y_top = y_of(bar.bottom.max(bar.top()));
            let y_bottom = y_of(bar.bottom.min(bar.top()));
            let _ = writeln!(
                out,
                "<rect x=\"{x:.1}\" y=\"{y_top:.1}\" width=\"{bar_w:.1}\" height=\"{:.1}\" fill=\"{color}\">\
                 <title>{}: {}</title></rect>",
                (y_bottom - y_top).max(0.0),
                escape(&chart.categories[bar.category]),
                format_tick(bar.height)
            );
        }
    }

    // axes
    let x_axis_y = y_of(0.0);
    let _ = writeln!(
        out,
        "<line x1=\"{MARGIN_LEFT:.1}\" y1=\"{x_axis_y:.1}\" x2=\"{:.1}\" y2=\"{x_axis_y:.1}\" stroke=\"#333\"/>",
        MARGIN_LEFT + plot_w
    );
    let _ = writeln!(
        out,
        "<line x1=\"{MARGIN_LEFT:.1}\" y1=\"{MARGIN_TOP:.1}\" x2=\"{MARGIN_LEFT:.1}\" y2=\"{:.1}\" stroke=\"#333\"/>",
        MARGIN_TOP + plot_h
    );

    let label_y = MARGIN_TOP + plot_h + 8.0;
    for (idx, name) in chart.categories.iter().enumerate() {
        let x = MARGIN_LEFT + slot_w * (idx as f64 + 0.5);
        let _ = writeln!(
            out,
            "<text x=\"{x:.1}\" y=\"{label_y:.1}\" text-anchor=\"end\" dominant-baseline=\"middle\" \
             transform=\"rotate(-{} {x:.1} {label_y:.1})\">{}</text>",
            chart.x_label_rotation,
            escape(name)
        );
    }

    let _ = writeln!(
        out,
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>",
        MARGIN_LEFT + plot_w / 2.0,
        SVG_HEIGHT - 10.0,
        escape(&chart.x_label)
    );
    let _ = writeln!(
        out,
        "<text x=\"18\" y=\"{y:.1}\" text-anchor=\"middle\" transform=\"rotate(-90 18 {y:.1})\">{}</text>",
        escape(&chart.y_label),
        y = MARGIN_TOP + plot_h / 2.0
    );

    // legend
    let legend_x = MARGIN_LEFT + plot_w - 150.0;
    for (idx, series) in chart.series.iter().enumerate() {
        let y = MARGIN_TOP + 8.0 + idx as f64 * 20.0;
        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
        let _ = writeln!(
            out,
            "<rect x=\"{legend_x:.1}\" y=\"{y:.1}\" width=\"14\" height=\"14\" fill=\"{color}\"/>\
             <text x=\"{:.1}\" y=\"{:.1}\">{}</text>",
            legend_x + 20.0,
            y + 11.0,
            escape(&series.label)
        );
    }

    out.push_str("</svg>\n");
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn nice_ticks(lo: f64, hi: f64) -> Vec<f64> {
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 {
        return vec![lo];
    }
    let raw_step = span / TICK_TARGET;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let start = (lo / step).floor() as i64;
    let end = (hi / step).ceil() as i64;
    (start..=end).map(|i| i as f64 * step).collect()
}

fn format_tick(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract().abs() < 1e-9 {
        return format!("{value:.0}");
    }
    let out = format!("{value:.3}");
    out.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn ticks_cover_probability_range() {
        let ticks = nice_ticks(0.0, 1.0);
        assert_eq!(ticks.first().copied(), Some(0.0));
        assert!(ticks.last().copied().unwrap_or_default() >= 1.0);
        assert!(ticks.len() >= 5);
    }

    #[test]
    fn ticks_span_negative_values() {
        let ticks = nice_ticks(-619.0, 1620.0);
        assert!(ticks[0] <= -619.0);
        assert!(*ticks.last().unwrap() >= 1620.0);
    }

    #[test]
    fn tick_labels_are_compact() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(500.0), "500");
        assert_eq!(format_tick(0.25), "0.25");
        assert_eq!(format_tick(-0.5), "-0.5");
    }
}
