// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::Parser;

use crate::clock::SystemClock;
use crate::cmd::add::add_card;
use crate::cmd::decks::list_decks;
use crate::cmd::drill::drill;
use crate::cmd::export::ExportOptions;
use crate::cmd::export::export_to;
use crate::cmd::import::import_file;
use crate::cmd::rollover::rollover;
use crate::cmd::stats::print_stats;
use crate::csv_export::Separator;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// List decks with their card counts.
    Decks {
        /// Path to the collection directory. Defaults to the current directory.
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Create a deck from a CSV file of `front;back` or `front,back` rows.
    Import {
        /// The CSV file to import.
        file: PathBuf,
        /// Name of the new deck. Defaults to the file name.
        #[arg(long)]
        name: Option<String>,
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Export a deck's active cards as CSV.
    Export {
        deck: String,
        #[arg(long, default_value_t = Separator::Semicolon)]
        separator: Separator,
        /// Omit the `front,back` header row.
        #[arg(long)]
        no_header: bool,
        /// Directory to write the file into. Prints to stdout if absent.
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Add a card to a deck, creating the deck if needed.
    Add {
        deck: String,
        front: String,
        back: String,
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Study the due and new cards of a deck.
    Drill {
        deck: String,
        /// Override the maximum number of new cards.
        #[arg(long)]
        new_limit: Option<usize>,
        /// Override the maximum number of cards.
        #[arg(long)]
        total_limit: Option<usize>,
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Print study statistics as JSON.
    Stats {
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Reset the daily statistics if the day has changed.
    Rollover {
        #[arg(long, short)]
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    let clock = SystemClock;
    match cli {
        Command::Decks { directory } => list_decks(directory, &clock),
        Command::Import {
            file,
            name,
            directory,
        } => import_file(directory, &file, name, &clock),
        Command::Export {
            deck,
            separator,
            no_header,
            output,
            directory,
        } => {
            let options = ExportOptions {
                separator,
                header: !no_header,
                output,
            };
            export_to(directory, &deck, options, &clock)
        }
        Command::Add {
            deck,
            front,
            back,
            directory,
        } => add_card(directory, &deck, &front, &back, &clock),
        Command::Drill {
            deck,
            new_limit,
            total_limit,
            directory,
        } => drill(directory, &deck, new_limit, total_limit, &clock),
        Command::Stats { directory } => print_stats(directory, &clock),
        Command::Rollover { directory } => rollover(directory, &clock),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Command::command().debug_assert();
    }

    #[test]
    fn test_parse_drill() {
        let cli = Command::try_parse_from([
            "memit",
            "drill",
            "Italian",
            "--new-limit",
            "5",
            "-d",
            "/tmp",
        ]);
        match cli {
            Ok(Command::Drill {
                deck,
                new_limit,
                total_limit,
                directory,
            }) => {
                assert_eq!(deck, "Italian");
                assert_eq!(new_limit, Some(5));
                assert_eq!(total_limit, None);
                assert_eq!(directory.as_deref(), Some("/tmp"));
            }
            _ => panic!("expected a drill command"),
        }
    }

    #[test]
    fn test_parse_export_separator() {
        let cli = Command::try_parse_from(["memit", "export", "Italian", "--separator", "comma"]);
        match cli {
            Ok(Command::Export {
                separator,
                no_header,
                ..
            }) => {
                assert_eq!(separator, Separator::Comma);
                assert!(!no_header);
            }
            _ => panic!("expected an export command"),
        }
    }
}
