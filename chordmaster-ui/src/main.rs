mod app;
mod rankings;
mod terminal;

use std::fs::File;
use std::time::{SystemTime, UNIX_EPOCH};

use chordmaster_core::config::Config;
use chordmaster_core::game::{GameSettings, RoundController};
use chordmaster_core::midi::MidiInputManager;

use app::App;
use rankings::RankingsStore;
use terminal::TerminalBackend;

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("chordmaster")
        .join("chordmaster.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path).or_else(|_| File::create("/tmp/chordmaster.log")) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("chordmaster: logging disabled ({})", e);
            return;
        }
    };

    if let Err(e) = WriteLogger::init(log_level, Config::default(), log_file) {
        eprintln!("chordmaster: logging disabled ({})", e);
        return;
    }

    log::info!("chordmaster starting (log level: {:?})", log_level);
}

/// Value following `flag`, parsed.
fn flag_value<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    let value = args
        .iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))?;
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring invalid {} value {:?}", flag, value);
            None
        }
    }
}

fn print_usage() {
    println!("Usage: chordmaster [options]");
    println!("  -v, --verbose     debug logging");
    println!("  --list-ports      list MIDI input ports and exit");
    println!("  --port N          MIDI input port index");
    println!("  --rounds N        rounds per game");
    println!("  --seed N          chord generator seed");
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let mut config = Config::load();
    if let Some(port) = flag_value(&args, "--port") {
        config.set_midi_port(port);
    }
    if let Some(rounds) = flag_value(&args, "--rounds") {
        config.set_rounds_per_game(rounds);
    }

    let mut midi = MidiInputManager::new();
    midi.refresh_ports();

    if args.iter().any(|a| a == "--list-ports") {
        if midi.list_ports().is_empty() {
            println!("No MIDI input ports found.");
        }
        for port in midi.list_ports() {
            println!("{:>2}: {}", port.index, port.name);
        }
        return Ok(());
    }

    if let Err(e) = midi.connect(config.midi_port()) {
        log::warn!("MIDI connect to port {} failed: {}", config.midi_port(), e);
    }

    let store = RankingsStore::new(RankingsStore::default_path());
    let board = store.load(config.leaderboard_capacity());

    let seed = flag_value(&args, "--seed").unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5EED)
    });
    log::debug!("chord generator seed {}", seed);
    let controller = RoundController::new(GameSettings::from_config(&config), seed);

    let mut app = App::new(controller, midi, config.midi_port(), store, board);
    let mut term = TerminalBackend::new();
    term.start()?;
    let result = app.run(&mut term);
    term.stop()?;
    result
}
