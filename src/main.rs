/* 3rd party libraries */
use clap::{Arg, Command};
use crossbeam_channel as cbc;
use log::{info, trace, warn};
use std::io::{self, BufRead};
use std::thread::Builder;

/* Custom libraries */
use input::InputCommand;
use shared::CarEvent;
use system::ElevatorSystem;

/* Modules */
mod config;
mod coordinator;
mod elevator;
mod input;
mod shared;
mod system;

/* Main */
fn main() {
    let matches = Command::new("elevator-dispatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Dispatches floor requests to a bank of elevator cars")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Building configuration")
                .takes_value(true)
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print every car event as a JSON line"),
        )
        .arg(
            Arg::new("travel-time")
                .long("travel-time")
                .value_name("MS")
                .help("Milliseconds the simulated cars need per floor")
                .takes_value(true),
        )
        .get_matches();

    // Load the configuration, the logger needs its level first
    let config_path = matches.value_of("config").unwrap_or("config.toml");
    let loaded = config::load_config(config_path);
    let level = loaded
        .as_ref()
        .map(|config| config.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = unwrap_or_exit!(loaded);
    if matches.is_present("travel-time") {
        config.elevator.travel_time = unwrap_or_exit!(matches.value_of_t::<u64>("travel-time"));
    }
    let json_events = config.logging.json_events || matches.is_present("json");

    // Display collaborator
    let (observer_tx, observer_rx) = cbc::unbounded::<CarEvent>();
    let display_thread = unwrap_or_exit!(Builder::new()
        .name("display".into())
        .spawn(move || display(observer_rx, json_events)));

    // Start the cars and the coordinator
    let system = unwrap_or_exit!(ElevatorSystem::start(&config, Some(observer_tx)));

    // Button input
    info!("Reading requests from stdin (call <floor> <up|down>, cab <car> <floor>, offline <car>, online <car>, quit)");
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<InputCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!("Ignoring `{}`: {}", line.trim(), e);
                continue;
            }
        };

        let result = match command {
            InputCommand::Call { floor, direction } => system
                .call(floor, direction)
                .map(|car_id| info!("Floor {} call taken by car {}", floor, car_id)),
            InputCommand::Cab { car_id, floor } => system.cab(car_id, floor).map(|_| ()),
            InputCommand::Offline(car_id) => system.report_offline(car_id),
            InputCommand::Online(car_id) => system.report_online(car_id),
            InputCommand::Quit => break,
        };
        if let Err(e) = result {
            warn!("Request rejected: {}", e);
        }
    }

    system.shutdown();
    let _ = display_thread.join();
}

fn display(observer_rx: cbc::Receiver<CarEvent>, json_events: bool) {
    for event in observer_rx.iter() {
        if !json_events {
            trace!("{:?}", event);
            continue;
        }
        match serde_json::to_string(&event) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Failed to serialize car event: {}", e),
        }
    }
}
