//! Command-line options and output rendering for the `tsp-exact` binary.

use std::fmt::Write as _;
use std::path::PathBuf;

use log::LevelFilter;
use serde::Serialize;

use crate::error::{TspError, TspResult};
use crate::logging::LogFormat;
use crate::models::City;
use crate::search::{SearchStats, SolveResult, SolveStatus};
use crate::settings::SolverSettings;

/// Where the cities come from.
#[derive(Debug, Clone, PartialEq)]
pub enum CitySource {
    /// The built-in Istanbul landmarks.
    Landmarks,
    /// A JSON file of cities.
    File(PathBuf),
    /// `count` seeded random cities.
    Random { count: usize, seed: u64 },
}

/// Parsed command-line options.
#[derive(Debug, Clone)]
pub struct CliOptions {
    pub source: CitySource,
    pub config: Option<PathBuf>,
    pub threads: Option<usize>,
    pub time_limit_ms: Option<u64>,
    pub node_limit: Option<u64>,
    pub no_heuristic: bool,
    pub json: bool,
    pub log_level: LevelFilter,
    pub log_format: LogFormat,
    pub log_timestamp: bool,
    pub help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            source: CitySource::Landmarks,
            config: None,
            threads: None,
            time_limit_ms: None,
            node_limit: None,
            no_heuristic: false,
            json: false,
            log_level: LevelFilter::Info,
            log_format: LogFormat::Compact,
            log_timestamp: false,
            help: false,
        }
    }
}

impl CliOptions {
    /// Parses options from arguments (program name already skipped).
    pub fn parse(args: impl IntoIterator<Item = String>) -> TspResult<Self> {
        let mut options = Self::default();
        let mut random: Option<usize> = None;
        let mut seed: u64 = 42;
        let mut args = args.into_iter().peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                options.help = true;
                continue;
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(usage_error(format!("Unexpected argument: {arg}")));
            };
            if raw_name.is_empty() {
                return Err(usage_error(format!("Invalid option name: {arg}")));
            }

            let (name, value) = split_arg(raw_name, &mut args);

            match name.as_str() {
                "input" => {
                    options.source = CitySource::File(PathBuf::from(require(&name, value)?));
                }
                "random" => random = Some(parse_value::<usize>(&name, value)?),
                "seed" => seed = parse_value::<u64>(&name, value)?,
                "config" => options.config = Some(PathBuf::from(require(&name, value)?)),
                "threads" => options.threads = Some(parse_value::<usize>(&name, value)?),
                "time-limit-ms" => options.time_limit_ms = Some(parse_value::<u64>(&name, value)?),
                "node-limit" => options.node_limit = Some(parse_value::<u64>(&name, value)?),
                "no-heuristic" => {
                    no_value(&name, value)?;
                    options.no_heuristic = true;
                }
                "json" => {
                    no_value(&name, value)?;
                    options.json = true;
                }
                "log-level" => options.log_level = parse_value::<LevelFilter>(&name, value)?,
                "log-format" => options.log_format = parse_value::<LogFormat>(&name, value)?,
                "log-timestamp" => {
                    no_value(&name, value)?;
                    options.log_timestamp = true;
                }
                _ => return Err(usage_error(format!("Unknown option: --{name}"))),
            }
        }

        if let Some(count) = random {
            if matches!(options.source, CitySource::File(_)) {
                return Err(usage_error("--random and --input are mutually exclusive".into()));
            }
            options.source = CitySource::Random { count, seed };
        }
        Ok(options)
    }

    /// Applies command-line overrides on top of file or default settings.
    pub fn apply(&self, settings: &mut SolverSettings) {
        if let Some(threads) = self.threads {
            settings.threads = threads;
        }
        if let Some(ms) = self.time_limit_ms {
            settings.time_limit_ms = Some(ms);
        }
        if let Some(limit) = self.node_limit {
            settings.node_limit = Some(limit);
        }
        if self.no_heuristic {
            settings.use_heuristic = false;
        }
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-exact [options]\n\n",
            "Solves the built-in Istanbul landmarks unless --input or --random is given.\n\n",
            "Options:\n",
            "  --input <cities.json>\n",
            "  --random <count> [--seed <u64>]\n",
            "  --config <settings.json>\n",
            "  --threads <usize>          (0 = all cores)\n",
            "  --time-limit-ms <u64>\n",
            "  --node-limit <u64>\n",
            "  --no-heuristic\n",
            "  --json\n",
            "  --log-level <off|error|warn|info|debug|trace>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  tsp-exact\n",
            "  tsp-exact --random 25 --seed 7 --threads 4 --time-limit-ms 10000\n",
            "  tsp-exact --input cities.json --json --log-level warn\n",
        )
    }
}

fn usage_error(msg: String) -> TspError {
    TspError::InvalidSettings(format!("{msg}\n\n{}", CliOptions::usage()))
}

fn require(name: &str, value: Option<String>) -> TspResult<String> {
    value.ok_or_else(|| usage_error(format!("Missing value for --{name}")))
}

fn no_value(name: &str, value: Option<String>) -> TspResult<()> {
    match value {
        Some(_) => Err(usage_error(format!("Flag --{name} does not take a value"))),
        None => Ok(()),
    }
}

fn parse_value<T>(name: &str, value: Option<String>) -> TspResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = require(name, value)?;
    raw.parse::<T>()
        .map_err(|e| usage_error(format!("Invalid value for --{name}: {raw} ({e})")))
}

fn split_arg(
    raw_name: &str,
    args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
) -> (String, Option<String>) {
    if let Some((k, v)) = raw_name.split_once('=') {
        return (k.to_string(), Some(v.to_string()));
    }

    let value = match args.peek() {
        Some(next) if !next.starts_with("--") => args.next(),
        _ => None,
    };

    (raw_name.to_string(), value)
}

/// JSON report printed with `--json`.
#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub route: Vec<String>,
    pub order: Vec<usize>,
    pub total_distance_km: f64,
    pub status: SolveStatus,
    pub stats: SearchStats,
}

impl RouteReport {
    pub fn new(result: &SolveResult, cities: &[City]) -> Self {
        Self {
            route: city_names(result, cities),
            order: result.tour.order().to_vec(),
            total_distance_km: result.tour.length(),
            status: result.status,
            stats: result.stats.clone(),
        }
    }
}

fn city_names(result: &SolveResult, cities: &[City]) -> Vec<String> {
    result
        .tour
        .order()
        .iter()
        .map(|&i| {
            cities
                .iter()
                .find(|c| c.index() == i)
                .map_or_else(|| format!("#{i}"), |c| c.name().to_string())
        })
        .collect()
}

/// Human-readable route listing ending with the total distance.
pub fn render_text(result: &SolveResult, cities: &[City]) -> String {
    let names = city_names(result, cities);
    let start = names.first().map_or("city 0", String::as_str);
    let mut out = String::new();
    if result.is_optimal() {
        let _ = writeln!(out, "Optimal TSP Route (Start/End: {start}):");
    } else {
        let _ = writeln!(
            out,
            "Best TSP Route found, search stopped by {:?} (Start/End: {start}):",
            result.status
        );
    }
    for name in &names {
        let _ = writeln!(out, "{name}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Total distance: {:.2} km", result.tour.length());
    out
}
