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

use std::env::current_dir;
use std::path::PathBuf;
use std::time::Instant;

use crate::clock::Clock;
use crate::config::Settings;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::stats::GlobalStats;
use crate::store::DeckStore;
use crate::store::StatsStore;
use crate::types::deck::Deck;

/// The name of the database file in a collection directory.
pub const DATABASE_FILE: &str = "memit.db";

pub struct Collection {
    pub directory: PathBuf,
    pub settings: Settings,
    pub db: Database,
    pub decks: Vec<Deck>,
    pub stats: GlobalStats,
    /// Whether opening the collection reset the daily statistics.
    pub rolled_over: bool,
}

impl Collection {
    pub fn open(directory: Option<String>, clock: &dyn Clock) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let settings = Settings::load(&directory)?;

        let db_path: PathBuf = directory.join(DATABASE_FILE);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let mut db: Database = Database::new(db_path)?;

        let decks = {
            log::debug!("Loading decks...");
            let start = Instant::now();
            let decks = db.load_decks()?;
            let duration = start.elapsed().as_millis();
            log::debug!("Loaded {} decks in {duration}ms.", decks.len());
            decks
        };

        let today = clock.now().local_date();
        let mut stats = db.load_global_stats(today)?;
        let rolled_over = stats.check_rollover(today);
        if rolled_over {
            db.save_global_stats(&stats)?;
        }

        Ok(Self {
            directory,
            settings,
            db,
            decks,
            stats,
            rolled_over,
        })
    }

    pub fn deck(&self, name: &str) -> Fallible<&Deck> {
        match self.decks.iter().find(|deck| deck.name == name) {
            Some(deck) => Ok(deck),
            None => fail(format!("no deck named {name}.")),
        }
    }

    pub fn has_deck(&self, name: &str) -> bool {
        self.decks.iter().any(|deck| deck.name == name)
    }
}
