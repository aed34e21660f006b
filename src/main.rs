use std::fs;
use std::process::ExitCode;
use std::time::Instant;

use log::info;

use tsp_exact::cli::{render_text, CitySource, CliOptions, RouteReport};
use tsp_exact::settings::SolverSettings;
use tsp_exact::{instances, logging, TspResult, TspSolver};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> TspResult<()> {
    let now = Instant::now();
    let options = CliOptions::parse(std::env::args().skip(1))?;
    if options.help {
        println!("{}", CliOptions::usage());
        return Ok(());
    }
    logging::init_logger(options.log_level, options.log_format, options.log_timestamp)?;

    let mut settings = match &options.config {
        Some(path) => serde_json::from_str::<SolverSettings>(&fs::read_to_string(path)?)?,
        None => SolverSettings::default(),
    };
    options.apply(&mut settings);

    let cities = match &options.source {
        CitySource::Landmarks => instances::istanbul_landmarks(),
        CitySource::File(path) => instances::load_cities_json(path)?,
        CitySource::Random { count, seed } => instances::random_cities(*count, *seed),
    };
    info!("input: n={} source={:?}", cities.len(), options.source);

    let result = TspSolver::new(settings).solve(&cities)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&RouteReport::new(&result, &cities))?);
    } else {
        print!("{}", render_text(&result, &cities));
    }

    info!(
        "output: n={} status={:?} time={:.2}s",
        cities.len(),
        result.status,
        now.elapsed().as_secs_f32()
    );
    Ok(())
}
