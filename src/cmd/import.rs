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

use std::path::Path;

use crate::clock::Clock;
use crate::collection::Collection;
use crate::csv_import::create_deck;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::DeckStore;
use crate::types::timestamp::Timestamp;

pub fn import_file(
    directory: Option<String>,
    file: &Path,
    name: Option<String>,
    clock: &dyn Clock,
) -> Fallible<()> {
    let mut coll = Collection::open(directory, clock)?;
    let name = match name {
        Some(name) => name,
        None => file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| ErrorReport::new("cannot derive a deck name from the file name."))?,
    };
    let count = import_into(&mut coll, file, &name, clock.now())?;
    println!("Imported {count} cards into {name}.");
    Ok(())
}

/// Create and store a deck named `name` from `file`. Returns the number of
/// cards imported.
pub fn import_into(coll: &mut Collection, file: &Path, name: &str, now: Timestamp) -> Fallible<usize> {
    let name = name.trim();
    if name.is_empty() {
        return fail("deck name must not be empty.");
    }
    if coll.has_deck(name) {
        return fail(format!("a deck named {name} already exists."));
    }
    let deck = create_deck(file, name, now)?;
    coll.db.save_deck(&deck)?;
    let count = deck.total_count();
    log::debug!("Imported {count} cards into {name}.");
    coll.decks.push(deck);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use super::*;
    use crate::clock::FixedClock;
    use crate::helper::t0;
    use crate::helper::tmp_collection;

    #[test]
    fn test_import_into() -> Fallible<()> {
        let (_dir, path) = tmp_collection(None)?;
        let file = path.join("words.csv");
        write(&file, "front;back\ncane;dog\ngatto;cat\n")?;
        let clock = FixedClock::new(t0());
        let directory = Some(path.display().to_string());

        let mut coll = Collection::open(directory.clone(), &clock)?;
        assert_eq!(import_into(&mut coll, &file, "Animali", t0())?, 2);
        assert!(import_into(&mut coll, &file, "Animali", t0()).is_err());
        assert!(import_into(&mut coll, &file, "  ", t0()).is_err());

        let coll = Collection::open(directory, &clock)?;
        let deck = coll.deck("Animali")?;
        assert_eq!(deck.total_count(), 2);
        assert_eq!(deck.cards()[1].front(), "gatto");
        Ok(())
    }

    #[test]
    fn test_failed_import_stores_nothing() -> Fallible<()> {
        let (_dir, path) = tmp_collection(None)?;
        let file = path.join("broken.csv");
        write(&file, "cane;dog\nno separator\n")?;
        let clock = FixedClock::new(t0());
        let mut coll = Collection::open(Some(path.display().to_string()), &clock)?;
        assert!(import_into(&mut coll, &file, "Animali", t0()).is_err());
        assert!(coll.decks.is_empty());
        assert!(coll.db.load_decks()?.is_empty());
        Ok(())
    }
}
