use nfl_elo_dashboard::display::{
    AWAY_SERIES, CHART_SUBHEADING, DisplayElement, HEADING, HOME_SERIES, MessageLevel,
    NO_DATA_WARNING, PAGE_TITLE, TABLE_SUBHEADING, render_chart, render_page, render_table,
    render_unavailable,
};
use nfl_elo_dashboard::html::to_html;
use nfl_elo_dashboard::projection::{PROJECTION_COLUMNS, ProjectionRow};
use nfl_elo_dashboard::tui::draw;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

fn row(home: &str, away: &str, p_home: f64) -> ProjectionRow {
    ProjectionRow {
        home: home.to_string(),
        away: away.to_string(),
        model_prob_home: p_home,
        model_prob_away: 1.0 - p_home,
    }
}

fn sample() -> Vec<ProjectionRow> {
    vec![row("NE", "MIA", 0.6), row("MIA", "BUF", 0.45), row("DAL", "PHI", 0.5)]
}

#[test]
fn page_layout_is_heading_table_then_chart() {
    let elements = render_page(&sample());
    let kinds: Vec<&str> = elements
        .iter()
        .map(|el| match el {
            DisplayElement::Title { .. } => "title",
            DisplayElement::Heading { .. } => "heading",
            DisplayElement::Subheading { .. } => "subheading",
            DisplayElement::Table(_) => "table",
            DisplayElement::Chart(_) => "chart",
            DisplayElement::Message { .. } => "message",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["title", "heading", "subheading", "table", "subheading", "chart"]
    );
    assert_eq!(
        elements[0],
        DisplayElement::Title {
            text: PAGE_TITLE.to_string()
        }
    );
    assert_eq!(
        elements[2],
        DisplayElement::Subheading {
            text: TABLE_SUBHEADING.to_string()
        }
    );
    assert_eq!(
        elements[4],
        DisplayElement::Subheading {
            text: CHART_SUBHEADING.to_string()
        }
    );
}

#[test]
fn empty_rows_render_as_unavailable() {
    let elements = render_page(&[]);
    assert_eq!(elements, render_unavailable(None));
    assert!(matches!(
        elements.last(),
        Some(DisplayElement::Message { level: MessageLevel::Warning, text }) if text == NO_DATA_WARNING
    ));
}

#[test]
fn table_shows_all_rows_and_columns_unchanged() {
    let table = render_table(&sample());
    assert_eq!(table.columns, PROJECTION_COLUMNS.to_vec());
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[1], vec!["MIA", "BUF", "0.45", "0.55"]);
}

#[test]
fn chart_places_home_and_away_bars_on_their_own_categories() {
    let chart = render_chart(&sample());

    // Home names first in row order, then away names not seen yet.
    assert_eq!(chart.categories, vec!["NE", "MIA", "DAL", "BUF", "PHI"]);
    assert_eq!(chart.series.len(), 2);
    assert_eq!(chart.series[0].label, HOME_SERIES);
    assert_eq!(chart.series[1].label, AWAY_SERIES);

    let home = &chart.series[0].bars;
    assert_eq!(home.iter().map(|b| b.category).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert!(home.iter().all(|b| b.bottom == 0.0));
    assert_eq!(home[0].height, 0.6);

    let away = &chart.series[1].bars;
    // NE vs MIA: away bar sits on MIA, stacked from NE's home value.
    assert_eq!(away[0].category, 1);
    assert_eq!(away[0].bottom, 0.6);
    assert!((away[0].height - 0.4).abs() < 1e-12);
    assert_eq!(away[1].category, 3);
    assert_eq!(away[2].category, 4);
    for bar in away {
        assert!((bar.top() - 1.0).abs() < 1e-12);
    }

    assert_eq!(chart.x_label, "Teams");
    assert_eq!(chart.y_label, "Probability");
    assert_eq!(chart.x_label_rotation, 90);
}

#[test]
fn chart_range_is_not_clamped() {
    let chart = render_chart(&[row("NE", "MIA", 1620.0)]);
    let (lo, hi) = chart.value_range();
    assert_eq!(lo, 0.0);
    assert_eq!(hi, 1620.0);
    assert_eq!(chart.series[1].bars[0].height, -1619.0);
}

#[test]
fn html_page_contains_table_chart_and_legend() {
    let page = to_html(&render_page(&sample()), Some("/refresh"));
    assert!(page.contains(&format!("<title>{PAGE_TITLE}</title>")));
    assert!(page.contains(&format!("<h1>{HEADING}</h1>")));

    let table_at = page.find("<table>").expect("table present");
    let svg_at = page.find("<svg").expect("chart present");
    assert!(table_at < svg_at);

    assert!(page.contains("<th>model_prob_home</th>"));
    assert!(page.contains("<td>DAL</td>"));
    assert!(page.contains(HOME_SERIES));
    assert!(page.contains(AWAY_SERIES));
    assert!(page.contains("rotate(-90"));
    assert_eq!(page.matches("<rect").count(), 6 + 2);
    assert!(page.contains("action=\"/refresh\""));
}

#[test]
fn html_unavailable_page_has_banner_only() {
    let page = to_html(&render_unavailable(Some("Error fetching live data: <boom>")), None);
    assert!(!page.contains("<table>"));
    assert!(!page.contains("<svg"));
    assert!(page.contains("class=\"msg warning\""));
    assert!(page.contains("&lt;boom&gt;"));
    assert!(!page.contains("<form"));
}

#[test]
fn terminal_view_draws_table_and_chart() {
    let backend = TestBackend::new(120, 40);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    let elements = render_page(&sample());
    terminal
        .draw(|f| draw(f, &elements, "3 games"))
        .expect("draw succeeds");

    let text = buffer_text(&terminal);
    assert!(text.contains(HEADING));
    assert!(text.contains("model_prob_home"));
    assert!(text.contains("DAL"));
    assert!(text.contains("Visual Comparison"));
}

#[test]
fn terminal_view_shows_warning_when_unavailable() {
    let backend = TestBackend::new(100, 20);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    let elements = render_unavailable(None);
    terminal
        .draw(|f| draw(f, &elements, "no data"))
        .expect("draw succeeds");

    let text = buffer_text(&terminal);
    assert!(text.contains(NO_DATA_WARNING));
    assert!(!text.contains("model_prob_home"));
}

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    let mut out = String::new();
    for (idx, cell) in buffer.content.iter().enumerate() {
        out.push_str(cell.symbol());
        if (idx + 1) % width == 0 {
            out.push('\n');
        }
    }
    out
}
