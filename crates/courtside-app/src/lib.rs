// Report assembly for the `courtside` binary: for each selected player,
// their detected trades with before/after analysis, a factor-driven impact
// projection, an optional slider what-if, and destination recommendations.
// Also drives the interactive debounced search mode.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use courtside_core::config::{Config, ReportFilters, SearchConfig, SimulationConfig, SliderSettings};
use courtside_nba::players::{
    self, CatalogError, Conference, GamesPlayedFilter, Player, PlayerFilters, Position,
};
use courtside_nba::search::{SearchDebouncer, SearchResults};
use courtside_nba::simulation::{
    self, Factor, ImpactResult, Recommendation, SliderAdjustments, SliderOutcome, TradeFactors,
};
use courtside_nba::stats::{format_change, format_stat, ChangeTrend};
use courtside_nba::trades::{self, TradeAnalysis, TradeEvent};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeReport {
    pub event: TradeEvent,
    pub analysis: TradeAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerReport {
    pub player: Player,
    pub trades: Vec<TradeReport>,
    pub impact: ImpactResult,
    /// Present when any slider is away from zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sliders: Option<SliderOutcome>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub factors: TradeFactors,
    pub sliders: SliderAdjustments,
    pub players: Vec<PlayerReport>,
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Resolve configured factor keys; unknown keys become neutral.
pub fn factors_from_config(sim: &SimulationConfig) -> TradeFactors {
    TradeFactors {
        system_fit: Factor::from_key(&sim.system_fit),
        role_change: Factor::from_key(&sim.role_change),
        minutes_change: Factor::from_key(&sim.minutes_change),
        team_quality: Factor::from_key(&sim.team_quality),
        coaching: Factor::from_key(&sim.coaching),
        usage_rate: Factor::from_key(&sim.usage_rate),
    }
}

/// Resolve configured filter labels. `"all"` and unknown labels leave that
/// attribute unconstrained; unknown labels are logged.
pub fn filters_from_config(filters: &ReportFilters) -> PlayerFilters {
    PlayerFilters {
        conference: parse_filter("conference", &filters.conference, Conference::from_label),
        position: parse_filter("position", &filters.position, Position::from_label),
        games_played: parse_filter("games_played", &filters.games_played, GamesPlayedFilter::from_key)
            .unwrap_or_default(),
    }
}

fn parse_filter<T>(field: &str, value: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return None;
    }
    let parsed = parse(value);
    if parsed.is_none() {
        warn!("Unknown report.filters.{} {:?}, not filtering on it", field, value);
    }
    parsed
}

pub fn sliders_from_config(sliders: &SliderSettings) -> SliderAdjustments {
    SliderAdjustments {
        scoring: sliders.scoring,
        rebounding: sliders.rebounding,
        assists: sliders.assists,
    }
}

/// The configured catalog file, or the bundled sample players.
pub fn load_catalog(config: &Config) -> Result<Vec<Player>, CatalogError> {
    match config.data.players_catalog.as_deref() {
        Some(path) => players::load_players(Path::new(path)),
        None => players::sample_players(),
    }
}

/// Players to report on, in the order given. An empty id list selects the
/// whole catalog; unknown ids are logged and skipped.
pub fn select_players<'a>(catalog: &'a [Player], ids: &[u64]) -> Vec<&'a Player> {
    if ids.is_empty() {
        return catalog.iter().collect();
    }
    ids.iter()
        .filter_map(|&id| {
            let found = players::find(catalog, id);
            if found.is_none() {
                warn!("Player id {} not in catalog, skipping", id);
            }
            found
        })
        .collect()
}

pub fn build_player_report(
    player: &Player,
    trade_events: &[TradeEvent],
    factors: &TradeFactors,
    sliders: &SliderAdjustments,
) -> PlayerReport {
    let trades = trades::lookup(player.id, trade_events)
        .into_iter()
        .map(|event| TradeReport {
            event: event.clone(),
            analysis: trades::analyze_trade(event),
        })
        .collect();

    let snapshot = player.snapshot();

    PlayerReport {
        player: player.clone(),
        trades,
        impact: simulation::evaluate(&snapshot, factors),
        sliders: (*sliders != SliderAdjustments::default())
            .then(|| simulation::simulate_adjustments(&snapshot, sliders)),
        recommendations: simulation::recommend(&snapshot),
    }
}

pub fn build_report(
    selected: &[&Player],
    trade_events: &[TradeEvent],
    factors: TradeFactors,
    sliders: SliderAdjustments,
    generated_at: DateTime<Utc>,
) -> Report {
    Report {
        generated_at,
        factors,
        sliders,
        players: selected
            .iter()
            .map(|p| build_player_report(p, trade_events, &factors, &sliders))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Interactive search
// ---------------------------------------------------------------------------

/// Treat each input line as the search box's latest contents. Every line
/// restarts the debounce window; `on_results` sees only results from the
/// latest query. Once input ends, waits for the pending search and returns
/// the final results (`None` when there was no input).
pub async fn run_search<R, F>(
    input: R,
    catalog: Arc<Vec<Player>>,
    settings: &SearchConfig,
    mut on_results: F,
) -> std::io::Result<Option<SearchResults>>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&SearchResults),
{
    let (mut debouncer, mut rx) = SearchDebouncer::new(
        catalog,
        Duration::from_millis(settings.debounce_ms),
        settings.min_query_len,
    );
    let mut lines = input.lines();
    let mut latest: Option<SearchResults> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(query) => {
                    debouncer.schedule(query);
                }
                None => break,
            },
            Some(results) = rx.recv() => {
                if debouncer.is_current(&results) {
                    on_results(&results);
                    latest = Some(results);
                } else {
                    debug!("Dropping stale search results (gen: {})", results.generation);
                }
            }
        }
    }

    if debouncer.generation() == 0 {
        return Ok(None);
    }
    if latest
        .as_ref()
        .is_some_and(|r| debouncer.is_current(r))
    {
        return Ok(latest);
    }

    while let Some(results) = rx.recv().await {
        if debouncer.is_current(&results) {
            on_results(&results);
            return Ok(Some(results));
        }
    }
    Ok(latest)
}

pub fn render_search(results: &SearchResults) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:?}: {} player(s)",
        results.query,
        results.players.len()
    );
    for p in &results.players {
        let _ = writeln!(
            out,
            "  {:>10}  {} ({}, {})",
            p.id,
            p.name,
            p.team,
            p.position.label()
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let f = &report.factors;

    let _ = writeln!(
        out,
        "Courtside report, generated {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(
        out,
        "Factors: system fit {}, role {}, minutes {}, team {}, coaching {}, usage {}",
        f.system_fit.key(),
        f.role_change.key(),
        f.minutes_change.key(),
        f.team_quality.key(),
        f.coaching.key(),
        f.usage_rate.key()
    );

    for player_report in &report.players {
        out.push('\n');
        render_player(&mut out, player_report);
    }

    out
}

fn render_player(out: &mut String, report: &PlayerReport) {
    let p = &report.player;
    let s = &p.stats;

    let _ = writeln!(
        out,
        "== {} ({}, {}, {}) ==",
        p.name,
        p.team,
        p.position.label(),
        p.conference.label()
    );
    let _ = writeln!(
        out,
        "Career: {} ppg, {} rpg, {} apg, {} FG, {} mpg, {} games",
        format_stat(s.ppg, false),
        format_stat(s.rpg, false),
        format_stat(s.apg, false),
        format_stat(s.fg_pct, true),
        format_stat(s.minutes_per_game, false),
        s.games_played
    );

    let _ = writeln!(out, "Trades:");
    if report.trades.is_empty() {
        let _ = writeln!(out, "  none detected");
    }
    for trade in &report.trades {
        let e = &trade.event;
        let c = &trade.analysis.changes;
        let _ = writeln!(
            out,
            "  {} {} -> {} {}",
            e.from_season, e.from_team, e.to_season, e.to_team
        );
        let _ = writeln!(out, "    {}", trade.analysis.summary);
        let _ = writeln!(
            out,
            "    PPG {}  RPG {}  APG {}  FG% {}  MPG {}",
            trend(c.ppg),
            trend(c.rpg),
            trend(c.apg),
            trend(c.fg_pct),
            trend(c.mpg)
        );
    }

    let impact = &report.impact;
    let base = p.snapshot();
    let adj = &impact.adjusted;
    let ch = &impact.changes;
    let _ = writeln!(
        out,
        "Projection (overall x{:.3}):",
        impact.multipliers.overall
    );
    let rows = [
        ("PPG", base.ppg, adj.ppg, ch.ppg, false),
        ("RPG", base.rpg, adj.rpg, ch.rpg, false),
        ("APG", base.apg, adj.apg, ch.apg, false),
        ("FG%", base.fg_pct, adj.fg_pct, ch.fg_pct, true),
        ("MPG", base.minutes_per_game, adj.minutes_per_game, ch.minutes_per_game, false),
    ];
    for (label, before, after, change, percent) in rows {
        let _ = writeln!(
            out,
            "  {label:<4}{:>7} -> {:>7}  {}",
            format_stat(before, percent),
            format_stat(after, percent),
            trend(change)
        );
    }
    let _ = writeln!(out, "  Overall {}", trend(ch.overall));
    if let Some(what_if) = &report.sliders {
        let _ = writeln!(
            out,
            "  Sliders: {} ppg ({}), {} rpg ({}), {} apg ({}), overall {}",
            format_stat(what_if.stats.ppg, false),
            format_change(what_if.changes.ppg),
            format_stat(what_if.stats.rpg, false),
            format_change(what_if.changes.rpg),
            format_stat(what_if.stats.apg, false),
            format_change(what_if.changes.apg),
            trend(what_if.changes.overall)
        );
    }
    let _ = writeln!(out, "  {}", impact.development.verdict.text());
    if impact.development.needs_support {
        let _ = writeln!(out, "  Development support recommended");
    }
    for need in &impact.development.needs {
        let _ = writeln!(
            out,
            "  - {} ({:?}): {}",
            need.area.label(),
            need.severity,
            need.recommendation
        );
    }

    let _ = writeln!(out, "Recommended destinations:");
    for rec in &report.recommendations {
        let _ = writeln!(
            out,
            "  {} ({:?} fit, {}): {}",
            rec.team, rec.fit, rec.projected_change, rec.reason
        );
    }
}

fn trend(change: f64) -> String {
    format!("{} {}", format_change(change), ChangeTrend::classify(change).arrow())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use courtside_nba::simulation::{Coaching, RoleChange, SystemFit, UsageRate, Verdict};
    use courtside_nba::stats::StatSnapshot;

    fn catalog() -> Vec<Player> {
        players::sample_players().unwrap()
    }

    fn no_sliders() -> SliderAdjustments {
        SliderAdjustments::default()
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn lebron_trade() -> TradeEvent {
        TradeEvent {
            id: "2544-2017-18-2018-19".into(),
            player_id: 2544,
            player_name: "LeBron James".into(),
            from_season: "2017-18".into(),
            to_season: "2018-19".into(),
            from_team: "CLE".into(),
            to_team: "LAL".into(),
            stats_before: StatSnapshot {
                ppg: 27.5,
                rpg: 8.6,
                apg: 9.1,
                fg_pct: 0.542,
                minutes_per_game: 36.9,
                games_played: 82,
            },
            stats_after: StatSnapshot {
                ppg: 27.4,
                rpg: 8.5,
                apg: 8.3,
                fg_pct: 0.510,
                minutes_per_game: 35.2,
                games_played: 55,
            },
        }
    }

    #[test]
    fn factors_resolve_from_config() {
        let sim = SimulationConfig {
            system_fit: "GOOD".into(),
            role_change: "BOGUS".into(),
            coaching: "ELITE_COACH".into(),
            usage_rate: "STAR_USAGE".into(),
            ..SimulationConfig::default()
        };
        let factors = factors_from_config(&sim);
        assert_eq!(factors.system_fit, SystemFit::Good);
        assert_eq!(factors.role_change, RoleChange::SameRole);
        assert_eq!(factors.coaching, Coaching::EliteCoach);
        assert_eq!(factors.usage_rate, UsageRate::StarUsage);
    }

    #[test]
    fn default_config_factors_are_neutral() {
        let factors = factors_from_config(&SimulationConfig::default());
        assert_eq!(factors, TradeFactors::default());
    }

    #[test]
    fn select_players_in_requested_order() {
        let catalog = catalog();
        let selected = select_players(&catalog, &[2544, 999_999_999, 201942]);
        let names: Vec<&str> = selected.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["LeBron James", "DeMar DeRozan"]);

        assert_eq!(select_players(&catalog, &[]).len(), catalog.len());
    }

    #[test]
    fn player_report_attaches_trades() {
        let catalog = catalog();
        let lebron = players::find(&catalog, 2544).unwrap();
        let events = vec![lebron_trade()];

        let report = build_player_report(lebron, &events, &TradeFactors::default(), &no_sliders());
        assert_eq!(report.trades.len(), 1);
        assert!(report.trades[0]
            .analysis
            .summary
            .starts_with("LeBron James's move from CLE to LAL"));
        assert_eq!(report.impact.development.verdict, Verdict::NeedsAdjustment);
        assert_eq!(report.recommendations[0].team, "New York Knicks");

        let derozan = players::find(&catalog, 201942).unwrap();
        let other = build_player_report(derozan, &events, &TradeFactors::default(), &no_sliders());
        assert!(other.trades.is_empty());
    }

    #[test]
    fn text_report_mentions_everything() {
        let catalog = catalog();
        let selected = select_players(&catalog, &[2544]);
        let report = build_report(
            &selected,
            &[lebron_trade()],
            TradeFactors::default(),
            no_sliders(),
            fixed_time(),
        );

        let text = render_text(&report);
        assert!(text.starts_with("Courtside report, generated 2024-03-01 12:00:00 UTC"));
        assert!(text.contains("system fit NEUTRAL"));
        assert!(text.contains("== LeBron James (Los Angeles Lakers"));
        assert!(text.contains("2017-18 CLE -> 2018-19 LAL"));
        assert!(text.contains("Player may need time to adjust to new role"));
        assert!(text.contains("New York Knicks"));
    }

    #[test]
    fn text_report_without_trades() {
        let catalog = catalog();
        let selected = select_players(&catalog, &[201942]);
        let report = build_report(&selected, &[], TradeFactors::default(), no_sliders(), fixed_time());
        assert!(render_text(&report).contains("none detected"));
    }

    #[test]
    fn json_report_shape() {
        let catalog = catalog();
        let selected = select_players(&catalog, &[2544]);
        let factors = TradeFactors {
            role_change: RoleChange::BenchRole,
            ..TradeFactors::default()
        };
        let report = build_report(&selected, &[lebron_trade()], factors, no_sliders(), fixed_time());

        let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert_eq!(json["generated_at"], "2024-03-01T12:00:00Z");
        assert_eq!(json["factors"]["role_change"], "BENCH_ROLE");
        assert_eq!(json["players"][0]["player"]["name"], "LeBron James");
        assert_eq!(json["players"][0]["trades"][0]["event"]["to_team"], "LAL");
        assert_eq!(json["players"][0]["trades"][0]["analysis"]["impact"], "negative");
        assert!(json["players"][0]["impact"]["changes"]["overall"].as_f64().unwrap() < 0.0);
        assert!(json["players"][0].get("sliders").is_none());
    }

    #[test]
    fn filters_resolve_from_config() {
        let configured = ReportFilters {
            conference: "west".into(),
            position: "all".into(),
            games_played: "50to70".into(),
        };
        let filters = filters_from_config(&configured);
        assert_eq!(filters.conference, Some(Conference::West));
        assert_eq!(filters.position, None);
        assert_eq!(filters.games_played, GamesPlayedFilter::From50To70);

        assert_eq!(filters_from_config(&ReportFilters::default()), PlayerFilters::default());
    }

    #[test]
    fn unknown_filter_labels_do_not_constrain() {
        let configured = ReportFilters {
            conference: "Central".into(),
            position: "wing".into(),
            games_played: "lots".into(),
        };
        assert_eq!(filters_from_config(&configured), PlayerFilters::default());
    }

    #[test]
    fn configured_filters_narrow_selection() {
        let catalog = catalog();
        let configured = ReportFilters {
            position: "PG".into(),
            ..ReportFilters::default()
        };
        let filters = filters_from_config(&configured);
        let selected = filters.apply(select_players(&catalog, &[]));
        assert!(!selected.is_empty());
        assert!(selected.len() < catalog.len());
        assert!(selected.iter().all(|p| p.position == Position::PG));
    }

    #[test]
    fn sliders_add_what_if_projection() {
        let catalog = catalog();
        let selected = select_players(&catalog, &[2544]);
        let sliders = sliders_from_config(&SliderSettings {
            scoring: 4,
            rebounding: 0,
            assists: 0,
        });
        let report = build_report(&selected, &[], TradeFactors::default(), sliders, fixed_time());

        let lebron = &report.players[0];
        let what_if = lebron.sliders.expect("non-zero sliders project");
        assert!((what_if.stats.ppg - (lebron.player.stats.ppg + 2.0)).abs() < 0.051);
        assert!(what_if.changes.ppg > 0.0);

        assert!(render_text(&report).contains("Sliders: "));
        let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert_eq!(json["sliders"]["scoring"], 4);
        assert!(json["players"][0]["sliders"]["changes"]["ppg"].as_f64().unwrap() > 0.0);
    }

    fn search_settings() -> SearchConfig {
        SearchConfig {
            debounce_ms: 5,
            min_query_len: 2,
        }
    }

    #[tokio::test]
    async fn search_reports_only_final_query() {
        let catalog = Arc::new(catalog());
        let input: &[u8] = b"le\nleb\nlebron\n";

        let mut seen = Vec::new();
        let results = run_search(input, catalog, &search_settings(), |r| seen.push(r.query.clone()))
            .await
            .unwrap()
            .expect("final results");

        assert_eq!(seen, vec!["lebron".to_string()]);
        assert_eq!(results.query, "lebron");
        assert_eq!(results.players.len(), 1);
        assert_eq!(results.players[0].name, "LeBron James");
        assert!(render_search(&results).contains("LeBron James"));
    }

    #[tokio::test]
    async fn search_reports_each_settled_query() {
        use tokio::io::AsyncWriteExt;

        let catalog = Arc::new(catalog());
        let (mut writer, reader) = tokio::io::duplex(64);

        let typing = async move {
            writer.write_all(b"curry\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            writer.write_all(b"durant\n").await.unwrap();
        };
        let mut seen = Vec::new();
        let settings = search_settings();
        let searching = run_search(
            tokio::io::BufReader::new(reader),
            catalog,
            &settings,
            |r| seen.push(r.query.clone()),
        );

        let ((), results) = tokio::join!(typing, searching);
        let results = results.unwrap().expect("final results");
        assert_eq!(seen, vec!["curry".to_string(), "durant".to_string()]);
        assert_eq!(results.players[0].name, "Kevin Durant");
    }

    #[tokio::test]
    async fn search_without_input_returns_none() {
        let input: &[u8] = b"";
        let mut calls = 0;
        let results = run_search(input, Arc::new(catalog()), &search_settings(), |_| calls += 1)
            .await
            .unwrap();
        assert!(results.is_none());
        assert_eq!(calls, 0);
    }
}
