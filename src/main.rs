use std::path::Path;

use meetgrid::config::Settings;
use meetgrid::display::{print_report, write_report_to_file};
use meetgrid::grid::{find_best, EventConfig, Grid};
use meetgrid::logging::init_logging;
use meetgrid::parser::load_responses;
use meetgrid::store::EventStore;
use tracing::info;

const USAGE: &str = "Usage:
  meetgrid web [port]
  meetgrid report <event.json> <responses.csv> [report.txt]
  meetgrid best <event.json> <responses.csv>";

fn load_event(path: &str) -> Result<(EventConfig, Grid), Box<dyn std::error::Error>> {
    let config: EventConfig = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let grid = Grid::from_config(&config)?;
    Ok((config, grid))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::new()?;
    init_logging(&settings.logging);

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("web") => {
            if let Some(port) = args.get(2).and_then(|p| p.parse::<u16>().ok()) {
                settings.server.port = port;
            }
            let store = match &settings.storage.data_file {
                Some(path) => EventStore::with_file(path)?,
                None => EventStore::in_memory(),
            };
            println!("Access the site at http://localhost:{}", settings.server.port);
            meetgrid::web::start_server(&settings, store).await?;
        }
        Some("report") if args.len() >= 4 => {
            let (config, grid) = load_event(&args[2])?;
            let responses = load_responses(Path::new(&args[3]), &grid)?;
            let best = find_best(&grid, &responses);

            print_report(&config.name, &grid, &responses, &best)?;
            if let Some(out) = args.get(4) {
                write_report_to_file(&config.name, &grid, &responses, &best, out)?;
                info!(path = %out, "Report written");
            }
        }
        Some("best") if args.len() >= 4 => {
            let (_, grid) = load_event(&args[2])?;
            let responses = load_responses(Path::new(&args[3]), &grid)?;
            let best = find_best(&grid, &responses);
            println!("{}", serde_json::to_string_pretty(&best)?);
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}
