use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::display::{ChartElement, DisplayElement, MessageLevel, TableElement};
use crate::projection::format_value;

const HOME_COLOR: Color = Color::Blue;
const AWAY_COLOR: Color = Color::Rgb(255, 127, 14);
const CHART_SCALE: f64 = 1000.0;

pub fn draw(frame: &mut Frame, elements: &[DisplayElement], status: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let heading = elements
        .iter()
        .find_map(|el| match el {
            DisplayElement::Heading { text } => Some(text.as_str()),
            _ => None,
        })
        .unwrap_or_default();
    let header = Paragraph::new(heading)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_body(frame, chunks[1], elements);

    let footer = Paragraph::new(format!("r Refresh | q Quit | {status}"))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);
}

fn render_body(frame: &mut Frame, area: Rect, elements: &[DisplayElement]) {
    let body: Vec<&DisplayElement> = elements
        .iter()
        .filter(|el| {
            !matches!(
                el,
                DisplayElement::Title { .. } | DisplayElement::Heading { .. }
            )
        })
        .collect();
    if body.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = body.iter().map(|el| section_height(el)).collect();
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (el, section) in body.into_iter().zip(sections.iter()) {
        match el {
            DisplayElement::Subheading { text } => {
                let p = Paragraph::new(text.as_str())
                    .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
                frame.render_widget(p, *section);
            }
            DisplayElement::Table(table) => frame.render_widget(projection_table(table), *section),
            DisplayElement::Chart(chart) => frame.render_widget(projection_chart(chart), *section),
            DisplayElement::Message { level, text } => {
                let (label, color) = match level {
                    MessageLevel::Error => ("ERROR", Color::Red),
                    MessageLevel::Warning => ("WARN", Color::Yellow),
                };
                let p = Paragraph::new(format!("[{label}] {text}"))
                    .style(Style::default().fg(color))
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(p, *section);
            }
            DisplayElement::Title { .. } | DisplayElement::Heading { .. } => {}
        }
    }
}

fn section_height(el: &DisplayElement) -> Constraint {
    match el {
        DisplayElement::Subheading { .. } => Constraint::Length(1),
        // header row + borders
        DisplayElement::Table(table) => {
            Constraint::Length(table.rows.len().saturating_add(3).min(u16::MAX as usize) as u16)
        }
        DisplayElement::Chart(_) => Constraint::Min(10),
        DisplayElement::Message { .. } => Constraint::Length(3),
        DisplayElement::Title { .. } | DisplayElement::Heading { .. } => Constraint::Length(0),
    }
}

fn projection_table(table: &TableElement) -> Table<'static> {
    let header = Row::new(table.columns.iter().cloned().map(Cell::from))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = table
        .rows
        .iter()
        .map(|row| Row::new(row.iter().cloned().map(Cell::from)));
    let widths = table
        .columns
        .iter()
        .map(|c| Constraint::Length(c.len().max(8) as u16 + 2))
        .collect::<Vec<_>>();
    Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL))
}

/// Terminal bars cannot be stacked or go below zero, so each bar is drawn to the top of its
/// stack (clamped at zero) and labelled with its own height.
fn projection_chart(chart: &ChartElement) -> BarChart<'static> {
    let mut widget = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ({} vs {})", chart.title, chart.y_label, chart.x_label)),
        )
        .bar_width(3)
        .bar_gap(1)
        .group_gap(3);

    let colors = [HOME_COLOR, AWAY_COLOR];
    for (idx, series) in chart.series.iter().enumerate() {
        let color = colors[idx % colors.len()];
        let bars: Vec<Bar<'static>> = series
            .bars
            .iter()
            .map(|bar| {
                let label = chart
                    .categories
                    .get(bar.category)
                    .cloned()
                    .unwrap_or_default();
                Bar::default()
                    .value(bar_value(bar.top()))
                    .text_value(format_value(bar.height))
                    .label(Line::from(label))
                    .style(Style::default().fg(color))
            })
            .collect();
        widget = widget.data(
            BarGroup::default()
                .label(Line::from(series.label.clone()))
                .bars(&bars),
        );
    }
    widget
}

fn bar_value(top: f64) -> u64 {
    if !top.is_finite() || top <= 0.0 {
        return 0;
    }
    (top * CHART_SCALE).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_value_clamps_negative_and_nan() {
        assert_eq!(bar_value(-619.0), 0);
        assert_eq!(bar_value(f64::NAN), 0);
        assert_eq!(bar_value(0.25), 250);
        assert_eq!(bar_value(1.0), 1000);
    }
}
