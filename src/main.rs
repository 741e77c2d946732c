//! Riddle Log command-line tool
//!
//! Reads and writes the same keys as the web build, kept in a JSON file
//! instead of LocalStorage.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::{Parser, Subcommand};
    use riddle_log::persistence::FileStorage;
    use riddle_log::{
        DateStyle, GameOutcome, GameRecord, RiddleSession, Score, Verdict, platform,
    };

    #[derive(Parser)]
    #[command(name = "riddle-log", about = "Players and game history for the riddle game")]
    struct Cli {
        /// Store file
        #[arg(long, short, default_value = "riddle-log.json", env = "RIDDLE_LOG_STORE")]
        store: PathBuf,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        /// Show current and original players
        Players,
        /// Set the two players
        SetPlayers { first: String, second: String },
        /// Swap asker and answerer
        Swap,
        /// Forget the players
        ClearPlayers,
        /// Log a round
        Add {
            #[arg(long)]
            asker: String,
            #[arg(long)]
            answerer: String,
            #[arg(long)]
            riddle: String,
            #[arg(long)]
            answer: String,
            /// Solved, Unsolved, or a score of 0, 0.5 or 1
            #[arg(long)]
            result: String,
            /// Defaults to today
            #[arg(long)]
            date: Option<String>,
            #[arg(long, default_value_t = 1)]
            attempts: u32,
            /// Seconds taken
            #[arg(long)]
            timer: Option<f64>,
            #[arg(long)]
            notes: Option<String>,
        },
        /// List every round
        Games,
        /// List today's rounds
        Today,
        /// Find rounds by date, or one round by date, asker and answerer
        Find {
            date: String,
            #[arg(long, requires = "answerer")]
            asker: Option<String>,
            #[arg(long, requires = "asker")]
            answerer: Option<String>,
        },
        /// Show or change session settings
        Config {
            #[arg(long)]
            allow_duplicates: Option<bool>,
            #[arg(long)]
            refresh_original_players: Option<bool>,
            /// iso or locale
            #[arg(long)]
            date_style: Option<String>,
        },
    }

    fn parse_outcome(s: &str) -> Option<GameOutcome> {
        match s.to_lowercase().as_str() {
            "solved" => Some(Verdict::Solved.into()),
            "unsolved" => Some(Verdict::Unsolved.into()),
            other => other.parse::<f64>().ok().and_then(Score::from_value).map(Into::into),
        }
    }

    fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to format output: {}", e),
        }
    }

    pub fn run() -> ExitCode {
        env_logger::init();
        let cli = Cli::parse();

        let store = match FileStorage::open(&cli.store) {
            Ok(store) => store,
            Err(e) => {
                eprintln!("Cannot open {}: {}", cli.store.display(), e);
                return ExitCode::FAILURE;
            }
        };
        let mut session = RiddleSession::open(store);

        match cli.command {
            Command::Players => {
                let current = session.players().players().cloned();
                let original = session.players().original_players().cloned();
                print_json(&serde_json::json!({ "players": current, "originalPlayers": original }));
            }
            Command::SetPlayers { first, second } => {
                if !session.players().set_players(&[first, second]) {
                    eprintln!("Players not set: blank name or store write failed");
                    return ExitCode::FAILURE;
                }
            }
            Command::Swap => {
                if !session.players().swap_players() {
                    eprintln!("Players not swapped: none set or store write failed");
                    return ExitCode::FAILURE;
                }
            }
            Command::ClearPlayers => session.players().clear_players(),
            Command::Add {
                asker,
                answerer,
                riddle,
                answer,
                result,
                date,
                attempts,
                timer,
                notes,
            } => {
                let Some(outcome) = parse_outcome(&result) else {
                    eprintln!("Unknown result '{}'", result);
                    return ExitCode::FAILURE;
                };
                if timer.is_some_and(|secs| secs < 0.0) {
                    eprintln!("Timer must not be negative");
                    return ExitCode::FAILURE;
                }
                let date = date.unwrap_or_else(|| platform::today(session.config().date_style));
                let record = GameRecord {
                    riddle,
                    answer,
                    attempts,
                    timer,
                    notes,
                    ..GameRecord::new(date, asker, answerer, outcome)
                };
                if !session.games().add_game(record) {
                    eprintln!("Round not logged: duplicate or store write failed");
                    return ExitCode::FAILURE;
                }
            }
            Command::Games => print_json(session.games().games()),
            Command::Today => print_json(&session.games().games_for_today()),
            Command::Find {
                date,
                asker: Some(asker),
                answerer: Some(answerer),
            } => print_json(&session.games().find_game(&date, &asker, &answerer)),
            Command::Find { date, .. } => print_json(&session.games().find_games_by_date(&date)),
            Command::Config {
                allow_duplicates,
                refresh_original_players,
                date_style,
            } => {
                let mut config = *session.config();
                if let Some(allow) = allow_duplicates {
                    config.allow_duplicate_rounds = allow;
                }
                if let Some(refresh) = refresh_original_players {
                    config.refresh_original_players_on_every_assignment = refresh;
                }
                if let Some(style) = date_style {
                    let Some(style) = DateStyle::from_str(&style) else {
                        eprintln!("Unknown date style '{}'", style);
                        return ExitCode::FAILURE;
                    };
                    config.date_style = style;
                }
                if config != *session.config() && !config.save(session.store()) {
                    return ExitCode::FAILURE;
                }
                print_json(&config);
            }
        }

        ExitCode::SUCCESS
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_outcome() {
            assert_eq!(parse_outcome("Solved"), Some(GameOutcome::Verdict(Verdict::Solved)));
            assert_eq!(parse_outcome("unsolved"), Some(GameOutcome::Verdict(Verdict::Unsolved)));
            assert_eq!(parse_outcome("0.5"), Some(GameOutcome::Score(Score::Partial)));
            assert_eq!(parse_outcome("1"), Some(GameOutcome::Score(Score::Correct)));
            assert_eq!(parse_outcome("0.3"), None);
            assert_eq!(parse_outcome("maybe"), None);
        }

        #[test]
        fn test_cli_parses_find_triple() {
            let cli = Cli::try_parse_from([
                "riddle-log", "find", "2024-01-01", "--asker", "Alice", "--answerer", "Bob",
            ])
            .unwrap();
            assert!(matches!(
                cli.command,
                Command::Find { asker: Some(_), answerer: Some(_), .. }
            ));

            let missing_answerer =
                Cli::try_parse_from(["riddle-log", "find", "2024-01-01", "--asker", "Alice"]);
            assert!(missing_answerer.is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web build starts from `riddle_log::web::start`
}
