//! Interactive mode, entered when `mensa` runs without a subcommand.

use crate::commands::{self, Session};
use anyhow::Result;
use colored::Colorize;
use mensa::format::DisplayOptions;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const COMMAND_NAMES: [&str; 11] = [
    "help",
    "quit",
    "exit",
    "clear",
    "listMensas",
    "setDefault",
    "showMensa",
    "mealToday",
    "mealTomorrow",
    "mealWeek",
    "openingStatus",
];

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Empty,
    Help,
    Quit,
    Clear,
    ListMensas,
    SetDefault(u32),
    ShowMensa(Option<u32>),
    MealToday(Option<u32>),
    MealTomorrow(Option<u32>),
    MealWeek(Option<u32>),
    OpeningStatus {
        id: Option<u32>,
        date: Option<String>,
    },
}

/// Why a line could not be turned into a command
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Unknown { suggestion: Option<&'static str> },
    Usage(String),
}

fn parse_id(token: &str, usage: &str) -> Result<u32, ParseError> {
    match token.parse::<i64>() {
        Ok(id) if id >= 1 && id <= u32::MAX as i64 => Ok(id as u32),
        Ok(_) => Err(ParseError::Usage(
            "Please only use a mensa ID greater than 0!".to_string(),
        )),
        Err(_) => Err(ParseError::Usage(format!(
            "Could not read the mensa ID '{}'. Usage: {}",
            token, usage
        ))),
    }
}

fn optional_id(args: &[&str], usage: &str) -> Result<Option<u32>, ParseError> {
    match args {
        [] => Ok(None),
        [id] => parse_id(id, usage).map(Some),
        _ => Err(ParseError::Usage(format!("Too many arguments. Usage: {}", usage))),
    }
}

/// Closest known command name, if any is reasonably similar
fn suggest(word: &str) -> Option<&'static str> {
    COMMAND_NAMES
        .iter()
        .map(|name| (*name, strsim::jaro_winkler(&word.to_lowercase(), &name.to_lowercase())))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| name)
}

pub fn parse_line(line: &str) -> Result<ReplCommand, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = tokens.split_first() else {
        return Ok(ReplCommand::Empty);
    };

    match name {
        "help" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        "clear" => Ok(ReplCommand::Clear),
        "listMensas" => Ok(ReplCommand::ListMensas),
        "setDefault" => {
            let usage = "setDefault (mensaID)";
            match args {
                [id] => parse_id(id, usage).map(ReplCommand::SetDefault),
                _ => Err(ParseError::Usage(format!(
                    "Could not read the mensa ID to set your default mensa. Usage: {}",
                    usage
                ))),
            }
        }
        "showMensa" => optional_id(args, "showMensa [mensaID]").map(ReplCommand::ShowMensa),
        "mealToday" => optional_id(args, "mealToday [mensaID]").map(ReplCommand::MealToday),
        "mealTomorrow" => {
            optional_id(args, "mealTomorrow [mensaID]").map(ReplCommand::MealTomorrow)
        }
        "mealWeek" => optional_id(args, "mealWeek [mensaID]").map(ReplCommand::MealWeek),
        "openingStatus" => {
            let usage = "openingStatus [mensaID] [YYYY-MM-DD]";
            match args {
                [] => Ok(ReplCommand::OpeningStatus { id: None, date: None }),
                // A lone argument is either an ID or a date for the default mensa
                [arg] if !arg.contains('-') => {
                    Ok(ReplCommand::OpeningStatus {
                        id: Some(parse_id(arg, usage)?),
                        date: None,
                    })
                }
                [date] => Ok(ReplCommand::OpeningStatus {
                    id: None,
                    date: Some(date.to_string()),
                }),
                [id, date] => Ok(ReplCommand::OpeningStatus {
                    id: Some(parse_id(id, usage)?),
                    date: Some(date.to_string()),
                }),
                _ => Err(ParseError::Usage(format!("Invalid format! Please use: {}", usage))),
            }
        }
        other => Err(ParseError::Unknown {
            suggestion: suggest(other),
        }),
    }
}

fn print_menu() {
    println!("Commands:");
    println!("\t-> help");
    println!("\t-> quit");
    println!("\t-> clear");
    println!("\t-> listMensas");
    println!("\t-> setDefault (mensaID)");
    println!("\t-> showMensa [mensaID]");
    println!("\t-> mealToday [mensaID]");
    println!("\t-> mealTomorrow [mensaID]");
    println!("\t-> mealWeek [mensaID]");
    println!("\t-> openingStatus [mensaID] [YYYY-MM-DD]");
    println!("\t values in [] are optional, values in () are needed!");
}

async fn execute(session: &Session, command: ReplCommand, options: &DisplayOptions) -> Result<()> {
    match command {
        ReplCommand::Empty | ReplCommand::Quit => {}
        ReplCommand::Help => {
            println!();
            print_menu();
        }
        ReplCommand::Clear => print!("\x1b[H\x1b[2J"),
        ReplCommand::ListMensas => commands::list(session, None).await?,
        ReplCommand::SetDefault(id) => commands::set_default(session, id).await?,
        ReplCommand::ShowMensa(id) => commands::show(session, id).await?,
        ReplCommand::MealToday(id) => commands::today(session, id, options).await?,
        ReplCommand::MealTomorrow(id) => commands::tomorrow(session, id, options).await?,
        ReplCommand::MealWeek(id) => commands::week(session, id, options).await?,
        ReplCommand::OpeningStatus { id, date } => {
            commands::status(session, id, date.as_deref()).await?
        }
    }
    Ok(())
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run(session: &Session) -> Result<()> {
    println!("\t----- mensa - your easy mensa helper! -----");
    print_menu();

    let options = DisplayOptions::detailed();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            Ok(ReplCommand::Quit) => break,
            Ok(command) => {
                // Failures are reported and the loop keeps going
                if let Err(e) = execute(session, command, &options).await {
                    println!("{} {}", "✗".red(), e);
                }
            }
            Err(ParseError::Usage(message)) => println!("{}", message),
            Err(ParseError::Unknown { suggestion }) => {
                println!("\nUnknown command :(");
                if let Some(name) = suggestion {
                    println!("Did you mean {}?", name.cyan());
                }
                print_menu();
            }
        }
    }

    Ok(())
}
