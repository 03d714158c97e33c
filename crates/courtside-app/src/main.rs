// Courtside report entry point.
//
// Startup sequence:
// 1. Load config (seeding config/ from defaults/ on first run)
// 2. Initialize tracing (stderr, so the report on stdout stays clean)
// 3. Load the player catalog
// 4. `courtside search`: debounced search over queries read from stdin, then exit
// 5. Load trade data from the configured source (failures yield no trades)
// 6. Select players: configured ids, configured filters, optional query argument
// 7. Build and print the report

use std::sync::Arc;

use courtside_app as report;
use courtside_core::config::{self, ReportFormat};
use courtside_core::logging;
use courtside_nba::players;
use courtside_nba::source;

use anyhow::Context;
use tokio::io::BufReader;
use tracing::info;

const SEARCH_COMMAND: &str = "search";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    logging::init_tracing(&config.logging.filter).context("failed to set tracing subscriber")?;
    info!("Courtside starting up");

    // 3. Load the player catalog
    let catalog = report::load_catalog(&config).context("failed to load player catalog")?;
    info!("Loaded {} players", catalog.len());

    let query = std::env::args().nth(1);

    // 4. Interactive search mode
    if query.as_deref() == Some(SEARCH_COMMAND) {
        let input = BufReader::new(tokio::io::stdin());
        let last = report::run_search(input, Arc::new(catalog), &config.search, |results| {
            print!("{}", report::render_search(results));
        })
        .await
        .context("failed to read search input")?;
        info!("Search finished (last query: {:?})", last.map(|r| r.query));
        return Ok(());
    }

    // 5. Load trade data
    let table = source::source_from_location(&config.data.trade_source);
    let trade_events = source::load_trade_data(table.as_ref()).await;

    // 6. Select players
    let filters = report::filters_from_config(&config.report.filters);
    let mut selected = filters.apply(report::select_players(&catalog, &config.report.players));
    if let Some(query) = query {
        let matches: Vec<u64> = players::search(&catalog, &query, config.search.min_query_len)
            .iter()
            .map(|p| p.id)
            .collect();
        selected.retain(|p| matches.contains(&p.id));
        info!("Query {:?} matched {} players", query, selected.len());
    }

    // 7. Build and print the report
    let factors = report::factors_from_config(&config.simulation);
    let sliders = report::sliders_from_config(&config.report.sliders);
    let built = report::build_report(&selected, &trade_events, factors, sliders, chrono::Utc::now());

    let output = match config.report.format {
        ReportFormat::Text => report::render_text(&built),
        ReportFormat::Json => report::render_json(&built).context("failed to serialize report")?,
    };
    println!("{output}");

    info!("Report complete ({} players)", built.players.len());
    Ok(())
}
