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

use std::fs::write;
use std::path::Path;
use std::path::PathBuf;

use crate::clock::Clock;
use crate::collection::Collection;
use crate::csv_export::Separator;
use crate::csv_export::export_deck;
use crate::csv_export::export_filename;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::deck::Deck;
use crate::types::timestamp::Timestamp;

pub struct ExportOptions {
    pub separator: Separator,
    pub header: bool,
    /// Directory to write the file into. Without one, the CSV goes to stdout.
    pub output: Option<PathBuf>,
}

pub fn export_to(
    directory: Option<String>,
    deck_name: &str,
    options: ExportOptions,
    clock: &dyn Clock,
) -> Fallible<()> {
    let coll = Collection::open(directory, clock)?;
    let deck = coll.deck(deck_name)?;
    match options.output {
        Some(ref dir) => {
            let path = write_export(deck, dir, &options, clock.now())?;
            println!("Exported {} to {}.", deck.name, path.display());
        }
        None => {
            let csv = export_deck(deck, options.separator, options.header)?;
            print!("{csv}");
        }
    }
    Ok(())
}

/// Write the export of `deck` into `dir`, returning the file's path.
pub fn write_export(
    deck: &Deck,
    dir: &Path,
    options: &ExportOptions,
    now: Timestamp,
) -> Fallible<PathBuf> {
    if !dir.is_dir() {
        return fail("output directory does not exist.");
    }
    let csv = export_deck(deck, options.separator, options.header)?;
    let path = dir.join(export_filename(deck, now.local_date()));
    write(&path, csv)?;
    Ok(path)
}
