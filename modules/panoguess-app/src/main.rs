mod stats;
mod viewer;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mapillary_client::MapillaryClient;
use panoguess_common::{Config, GeoPoint, LifetimeStats, Region};
use panoguess_engine::{
    build_pool, EngineConfig, GameEngine, GuessRejected, RoundStart, StatsStore,
};

use stats::FileStatsStore;
use viewer::PanoProbe;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("panoguess=info".parse()?))
        .init();

    // Missing credentials halt here, before any network activity.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            eprintln!("Set MAPILLARY_TOKEN and try again.");
            std::process::exit(1);
        }
    };

    let regions = load_regions(&config)?;
    info!(regions = regions.len(), "Region file loaded");

    let store = FileStatsStore::new(config.stats_path.clone());
    let mut lifetime = store.read().await.unwrap_or_default();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_start_screen(&lifetime);
        print!("Press Enter to start a game (or type q to quit): ");
        io::stdout().flush()?;
        match lines.next() {
            Some(Ok(line)) if line.trim().eq_ignore_ascii_case("q") => break,
            Some(Ok(_)) => {}
            _ => break,
        }

        match play_session(&config, &regions, &mut lines).await {
            Ok(summary) if summary.should_persist => {
                summary.apply_to(&mut lifetime);
                store.write(&lifetime).await?;
                info!(
                    games_played = lifetime.games_played,
                    total_score = lifetime.total_score,
                    "Lifetime stats saved"
                );
            }
            Ok(_) => {
                println!("\nNo points this time; lifetime stats unchanged.");
            }
            Err(e) => {
                eprintln!("\nCould not start a game: {e}");
            }
        }
    }

    Ok(())
}

fn load_regions(config: &Config) -> Result<Vec<Region>> {
    let raw = std::fs::read_to_string(&config.regions_path).with_context(|| {
        format!("reading region file {}", config.regions_path.display())
    })?;
    let regions: Vec<Region> = serde_json::from_str(&raw).context("parsing region file")?;
    anyhow::ensure!(!regions.is_empty(), "region file is empty");
    Ok(regions)
}

fn print_start_screen(lifetime: &LifetimeStats) {
    println!("\n==============================");
    println!("          panoguess");
    println!("==============================");
    println!("Games played:  {}", lifetime.games_played);
    println!("Total score:   {}", lifetime.total_score);
    println!("Average score: {}", lifetime.average_score());
    println!();
}

async fn play_session(
    config: &Config,
    regions: &[Region],
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<panoguess_engine::SessionSummary> {
    let client = MapillaryClient::new(config.mapillary_token.clone());
    let viewer = Arc::new(PanoProbe::new(MapillaryClient::new(
        config.mapillary_token.clone(),
    )));

    println!("Fetching locations...");
    let mut rng = StdRng::from_os_rng();
    let pool = build_pool(&client, regions, config.fetch_limit, config.min_pool_size, &mut rng)
        .await
        .context("not enough playable locations")?;

    let engine_config = EngineConfig {
        min_pool_size: config.min_pool_size,
        asset_timeout: Duration::from_secs(config.asset_timeout_secs),
        min_round_distance_km: config.min_round_distance_km,
    };
    let mut engine = GameEngine::new(pool, viewer.clone(), engine_config)?;

    loop {
        println!("\nLoading round...");
        match engine.start_round().await? {
            RoundStart::Started { index, .. } => {
                println!("--- Round {index} | total score {} ---", engine.session_total());
                if let Some(url) = viewer.current_url() {
                    println!("Panorama: {url}");
                }
            }
            RoundStart::PoolExhausted { final_score } => {
                println!("No locations left to play. Final score: {final_score}");
                break;
            }
        }

        // One guess per round; empty input re-prompts, mirroring the
        // "place a marker first" alert.
        let result = loop {
            print!("Your guess as lat, lng: ");
            io::stdout().flush()?;
            let line = match lines.next() {
                Some(line) => line?,
                None => return Ok(engine.end_session()),
            };
            let Some(guess) = parse_guess(&line) else {
                println!("Please mark a location first (example: 48.85, 2.35).");
                continue;
            };
            match engine.submit_guess(guess) {
                Ok(result) => break result,
                Err(GuessRejected::AlreadyGuessed) => {
                    println!("This round is already scored.");
                    break engine.current_round().and_then(|r| r.result).expect("scored round");
                }
                Err(GuessRejected::NotAcceptingGuesses) => {
                    println!("No round is accepting guesses right now.");
                    return Ok(engine.end_session());
                }
            }
        };

        let target = engine.current_round().expect("scored round").target.clone();
        println!(
            "+{} points ({:.1} km away) — it was {} ({:.4}, {:.4})",
            result.score, result.distance_km, target.region_name, target.point.lat, target.point.lng
        );
        println!("Session total: {}", result.session_total);

        print!("Next round? (Enter = yes, e = end game): ");
        io::stdout().flush()?;
        match lines.next() {
            Some(Ok(line)) if line.trim().eq_ignore_ascii_case("e") => break,
            Some(Ok(_)) => {}
            _ => break,
        }
    }

    let summary = engine.end_session();
    println!(
        "\nGame over: {} rounds, {} points.",
        summary.rounds_played, summary.cumulative_score
    );
    Ok(summary)
}

fn parse_guess(line: &str) -> Option<GeoPoint> {
    let mut parts = line.trim().split(',').map(str::trim);
    let lat: f64 = parts.next()?.parse().ok()?;
    let lng: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng)
    {
        return None;
    }
    Some(GeoPoint { lat, lng })
}
