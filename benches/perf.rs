use std::fmt::Write as _;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use nfl_elo_dashboard::display::render_page;
use nfl_elo_dashboard::feed::parse_elo_csv;
use nfl_elo_dashboard::html::to_html;
use nfl_elo_dashboard::projection::transform;

const TEAMS: [&str; 32] = [
    "ARI", "ATL", "BAL", "BUF", "CAR", "CHI", "CIN", "CLE", "DAL", "DEN", "DET", "GB", "HOU",
    "IND", "JAX", "KC", "LAC", "LAR", "LV", "MIA", "MIN", "NE", "NO", "NYG", "NYJ", "PHI", "PIT",
    "SEA", "SF", "TB", "TEN", "WSH",
];

/// Roughly the shape of the full historical feed: many seasons, every team as team1 often.
fn synthetic_feed(games: usize) -> String {
    let mut out = String::from("date,season,neutral,playoff,team1,team2,elo1_pre,elo2_pre,elo_prob1\n");
    for i in 0..games {
        let home = TEAMS[i % TEAMS.len()];
        let away = TEAMS[(i * 7 + 3) % TEAMS.len()];
        let elo1 = 1300.0 + (i % 400) as f64;
        let elo2 = 1700.0 - (i % 400) as f64;
        let _ = writeln!(
            out,
            "2000-01-01,{},0,,{home},{away},{elo1:.3},{elo2:.3},0.5",
            1920 + i / 256
        );
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let raw = synthetic_feed(17_000);
    c.bench_function("elo_csv_parse", |b| {
        b.iter(|| {
            let rows = parse_elo_csv(black_box(&raw)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_transform(c: &mut Criterion) {
    let rows = parse_elo_csv(&synthetic_feed(17_000)).unwrap();
    c.bench_function("projection_transform", |b| {
        b.iter(|| {
            let out = transform(black_box(&rows));
            black_box(out.len());
        })
    });
}

fn bench_render_html(c: &mut Criterion) {
    let projections = transform(&parse_elo_csv(&synthetic_feed(17_000)).unwrap());
    c.bench_function("render_html", |b| {
        b.iter(|| {
            let page = to_html(&render_page(black_box(&projections)), Some("/refresh"));
            black_box(page.len());
        })
    });
}

criterion_group!(benches, bench_parse, bench_transform, bench_render_html);
criterion_main!(benches);
