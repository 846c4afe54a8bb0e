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

use std::fmt::Display;
use std::fmt::Formatter;

use crate::clock::Clock;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::deck::Deck;
use crate::types::timestamp::Timestamp;

#[derive(Debug, PartialEq)]
pub struct DeckSummary {
    pub name: String,
    pub total: usize,
    pub due: usize,
    pub new: usize,
}

impl DeckSummary {
    pub fn new(deck: &Deck, now: Timestamp) -> Self {
        Self {
            name: deck.name.clone(),
            total: deck.total_count(),
            due: deck.due_count(now),
            new: deck.new_count(),
        }
    }
}

impl Display for DeckSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} cards ({} due, {} new)",
            self.name, self.total, self.due, self.new
        )
    }
}

pub fn list_decks(directory: Option<String>, clock: &dyn Clock) -> Fallible<()> {
    let coll = Collection::open(directory, clock)?;
    if coll.decks.is_empty() {
        println!("No decks.");
        return Ok(());
    }
    let now = clock.now();
    for deck in coll.decks.iter() {
        println!("{}", DeckSummary::new(deck, now));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::deck_with;
    use crate::helper::t0;

    #[test]
    fn test_summary() -> Fallible<()> {
        let mut deck = deck_with(2, 3)?;
        let mut archived = deck.cards()[4].clone();
        archived.set_archived(true, t0());
        deck.update_card(archived, t0());

        let summary = DeckSummary::new(&deck, t0());
        assert_eq!(
            summary,
            DeckSummary {
                name: "Italian".to_string(),
                total: 4,
                due: 2,
                new: 2,
            }
        );
        assert_eq!(summary.to_string(), "Italian: 4 cards (2 due, 2 new)");
        Ok(())
    }
}
