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

use serde::Serialize;

use crate::clock::Clock;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::stats::GlobalStats;
use crate::types::deck::Deck;
use crate::types::timestamp::Timestamp;

pub fn print_stats(directory: Option<String>, clock: &dyn Clock) -> Fallible<()> {
    let coll = Collection::open(directory, clock)?;
    let stats = Stats::new(&coll.stats, &coll.decks, clock.now());
    let stats_json = serde_json::to_string_pretty(&stats)?;
    println!("{stats_json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats<'a> {
    deck_count: usize,
    card_count: usize,
    due_count: usize,
    new_count: usize,
    accuracy: f64,
    today_accuracy: f64,
    #[serde(flatten)]
    global: &'a GlobalStats,
}

impl<'a> Stats<'a> {
    pub fn new(global: &'a GlobalStats, decks: &[Deck], now: Timestamp) -> Self {
        Self {
            deck_count: decks.len(),
            card_count: decks.iter().map(Deck::total_count).sum(),
            due_count: decks.iter().map(|deck| deck.due_count(now)).sum(),
            new_count: decks.iter().map(Deck::new_count).sum(),
            accuracy: global.accuracy(),
            today_accuracy: global.today_accuracy(),
            global,
        }
    }
}
