//! # Fishing Tide Log Entry Point
//!
//! Builds the tide chart for one day at a fishing spot, groups the day's catches
//! into chart markers, and prints both, either as an ASCII chart with a timing
//! note per catch or as JSON for another front end.


use anyhow::Context;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use clap::Parser;
use fishing_tide_lib::{
    analysis::analyze_catch,
    config::{Config, CONFIG_FILE},
    curve::TideCurveBuilder,
    log_data::{self, FishingLog},
    markers::{group_by_proximity, parse_time_to_minutes, MarkerGroup},
    renderer::{draw_ascii, place_marker_groups},
    Coordinates, TideCurve,
};
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file
    #[arg(short, long, value_name = "PATH", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Latitude of the fishing spot (overrides the config)
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude of the fishing spot (overrides the config)
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Day to chart, YYYY-MM-DD (default: today at the configured offset)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Fishing log JSON with catch records and tide events
    #[arg(short, long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Marker grouping threshold in minutes (overrides the config)
    #[arg(short, long)]
    pub threshold: Option<u32>,

    /// Print the curve and marker groups as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ChartOutput<'a> {
    curve: &'a TideCurve,
    groups: &'a [MarkerGroup],
}

/// Resolve the spot: command-line coordinates win over the config.
fn resolve_coordinates(args: &Args, config: &Config) -> Coordinates {
    match (args.lat, args.lon) {
        (Some(latitude), Some(longitude)) => Coordinates::new(latitude, longitude),
        _ => config.location.coordinates(),
    }
}

/// Midnight of the requested day, or of today, at `offset`.
fn resolve_day(date: Option<NaiveDate>, offset: FixedOffset) -> DateTime<FixedOffset> {
    let date = date.unwrap_or_else(|| Utc::now().with_timezone(&offset).date_naive());
    let midnight = date.and_time(NaiveTime::MIN);
    DateTime::from_naive_utc_and_offset(midnight - offset_duration(offset), offset)
}

fn offset_duration(offset: FixedOffset) -> chrono::Duration {
    chrono::Duration::seconds(i64::from(offset.local_minus_utc()))
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::load_from_path(&args.config);

    let coordinates = resolve_coordinates(&args, &config);
    let day = resolve_day(args.date, config.location.offset());

    let log = match &args.log {
        Some(path) => log_data::load(path)
            .with_context(|| format!("reading fishing log {}", path.display()))?,
        None => {
            info!("No fishing log given, charting tide only");
            FishingLog::default()
        }
    };

    let builder =
        TideCurveBuilder::new().with_interval_minutes(config.chart.sample_interval_minutes);
    let (curve, metrics) =
        builder.build_with_metrics(day, coordinates, &log.events, &log.catch_times(day));
    info!(
        "Tide curve: {} samples, {} event samples in {:?}",
        metrics.samples, metrics.events_snapped, metrics.elapsed
    );
    if metrics.events_outside_window > 0 {
        warn!(
            "{} tide event(s) fall outside {}",
            metrics.events_outside_window,
            day.format("%Y-%m-%d")
        );
    }

    let threshold = args
        .threshold
        .unwrap_or(config.chart.marker_threshold_minutes);
    let groups = place_marker_groups(
        &curve,
        group_by_proximity(&log.records, threshold),
        config.chart.rows,
    );

    if args.json {
        let output = ChartOutput {
            curve: &curve,
            groups: &groups,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} ({:.4}, {:.4})\n",
        config.location.name, coordinates.latitude, coordinates.longitude
    );
    draw_ascii(&curve, &groups, config.chart.rows);

    let now = Utc::now().with_timezone(&day.timezone());
    for record in &log.records {
        let Some(minutes) = parse_time_to_minutes(&record.time) else {
            continue;
        };
        let catch_time = day + chrono::Duration::minutes(i64::from(minutes));
        let relation = analyze_catch(&catch_time, &curve.events, &now);
        let species = record.species.as_deref().unwrap_or("catch");
        println!("{} {:<10} {}", record.time, species, relation.message);
        if let Some(window) = relation.next_optimal {
            println!(
                "      next window {} (before {} tide)",
                window.time.format("%m/%d %H:%M"),
                window.precedes.as_str()
            );
        }
    }

    Ok(())
}
