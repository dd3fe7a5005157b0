// Standalone replay tool for re-checking logged AI decisions
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all logged moves
//   --plies <p1,p2>        Replay moves made at specific plies (comma-separated)
//   --validate <moves>     Validate logged moves (format: ply:row,col|row,col;...)
//   --verbose              Show detailed output for each move
//   --config <path>        Path to TicTacToe.toml (default: TicTacToe.toml)

use std::env;
use std::process;

use minimax_tictactoe::config::Config;
use minimax_tictactoe::replay::ReplayEngine;
use minimax_tictactoe::types::Action;

fn print_usage() {
    eprintln!("Tic-Tac-Toe Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all moves in the log");
    eprintln!("  --plies <P1,P2,...>     Replay moves at specific plies (comma-separated)");
    eprintln!("  --validate <MOVES>      Validate expected moves (format: ply:row,col|row,col;...)");
    eprintln!("  --verbose               Show detailed output for each move");
    eprintln!("  --config <path>         Path to TicTacToe.toml (default: TicTacToe.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all moves");
    eprintln!("  replay tictactoe_moves.jsonl --all");
    eprintln!();
    eprintln!("  # Replay the AI's opening moves and its replies at ply 2");
    eprintln!("  replay tictactoe_moves.jsonl --plies 0,2");
    eprintln!();
    eprintln!("  # Validate expected moves");
    eprintln!("  replay tictactoe_moves.jsonl --validate '0:0,0;4:0,2|2,2'");
}

fn parse_plies(s: &str) -> Result<Vec<usize>, String> {
    s.split(',')
        .map(|p| {
            p.trim()
                .parse::<usize>()
                .map_err(|e| format!("Invalid ply '{}': {}", p, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(usize, Vec<Action>)>, String> {
    s.split(';')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| {
            let parts: Vec<&str> = pair.trim().split(':').collect();
            if parts.len() != 2 {
                return Err(format!("Invalid format '{}'. Expected 'ply:row,col'", pair));
            }

            let ply = parts[0]
                .parse::<usize>()
                .map_err(|e| format!("Invalid ply '{}': {}", parts[0], e))?;

            // Support multiple acceptable moves separated by '|'
            let moves: Result<Vec<Action>, String> = parts[1]
                .split('|')
                .map(|m| ReplayEngine::parse_action(m.trim()))
                .collect();

            Ok((ply, moves?))
        })
        .collect()
}

/// Value following `flag`, exiting with an error if absent
fn flag_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    }
}

enum Mode {
    All,
    Plies(String),
    Validate(String),
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "TicTacToe.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => {
                mode = Some(Mode::All);
            }
            "--plies" => {
                mode = Some(Mode::Plies(flag_value(&args, i, "--plies")));
                i += 1;
            }
            "--validate" => {
                mode = Some(Mode::Validate(flag_value(&args, i, "--validate")));
                i += 1;
            }
            "--config" => {
                config_path = flag_value(&args, i, "--config");
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mode = match mode {
        Some(mode) => mode,
        None => {
            eprintln!("Error: Must specify --all, --plies, or --validate");
            print_usage();
            process::exit(1);
        }
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => {
            println!("Replaying all {} moves...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Plies(arg) => {
            let plies = match parse_plies(&arg) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error parsing plies: {}", e);
                    process::exit(1);
                }
            };

            println!("Replaying {} specific ply(s)...\n", plies.len());
            match engine.replay_plies(&entries, &plies) {
                Ok(results) => {
                    engine.print_report(&results);
                }
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate(arg) => {
            let expected_moves = match parse_expected_moves(&arg) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error parsing expected moves: {}", e);
                    process::exit(1);
                }
            };

            println!("Validating {} expected move(s)...\n", expected_moves.len());
            match engine.validate_expected_moves(&entries, &expected_moves) {
                Ok(()) => {
                    println!("✓ All expected moves validated successfully!");
                }
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
