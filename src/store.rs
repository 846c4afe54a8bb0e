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

use crate::error::Fallible;
use crate::error::fail;
use crate::stats::GlobalStats;
use crate::types::card::Card;
use crate::types::date::Date;
use crate::types::deck::Deck;

/// Durable storage for decks and their cards.
pub trait DeckStore {
    fn load_decks(&self) -> Fallible<Vec<Deck>>;

    /// Replace every stored deck with `decks`.
    fn save_decks(&mut self, decks: &[Deck]) -> Fallible<()>;

    /// Insert or replace a single deck, cards included.
    fn save_deck(&mut self, deck: &Deck) -> Fallible<()>;

    /// Persist one card of an already stored deck.
    fn save_card(&mut self, deck_name: &str, card: &Card) -> Fallible<()>;
}

/// Durable storage for the single global statistics record.
pub trait StatsStore {
    /// Load the statistics, or fresh ones dated `today` if none were saved.
    fn load_global_stats(&self, today: Date) -> Fallible<GlobalStats>;

    fn save_global_stats(&mut self, stats: &GlobalStats) -> Fallible<()>;
}

/// A store that lives only as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    decks: Vec<Deck>,
    stats: Option<GlobalStats>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeckStore for MemoryStore {
    fn load_decks(&self) -> Fallible<Vec<Deck>> {
        Ok(self.decks.clone())
    }

    fn save_decks(&mut self, decks: &[Deck]) -> Fallible<()> {
        self.decks = decks.to_vec();
        Ok(())
    }

    fn save_deck(&mut self, deck: &Deck) -> Fallible<()> {
        match self.decks.iter_mut().find(|d| d.name == deck.name) {
            Some(slot) => *slot = deck.clone(),
            None => self.decks.push(deck.clone()),
        }
        Ok(())
    }

    fn save_card(&mut self, deck_name: &str, card: &Card) -> Fallible<()> {
        let Some(deck) = self.decks.iter_mut().find(|d| d.name == deck_name) else {
            return fail(format!("no deck named {deck_name}."));
        };
        if !deck.update_card(card.clone(), card.updated_at()) {
            return fail(format!("card {} not found in {deck_name}.", card.id().short()));
        }
        Ok(())
    }
}

impl StatsStore for MemoryStore {
    fn load_global_stats(&self, today: Date) -> Fallible<GlobalStats> {
        Ok(self
            .stats
            .clone()
            .unwrap_or_else(|| GlobalStats::new(today)))
    }

    fn save_global_stats(&mut self, stats: &GlobalStats) -> Fallible<()> {
        self.stats = Some(stats.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::deck_with;
    use crate::helper::new_card;
    use crate::helper::t0;

    #[test]
    fn test_save_card_updates_stored_deck() -> Fallible<()> {
        let mut store = MemoryStore::new();
        let deck = deck_with(0, 2)?;
        store.save_deck(&deck)?;

        let mut card = deck.cards()[1].clone();
        card.set_archived(true, t0().plus_days(1));
        store.save_card(&deck.name, &card)?;

        let decks = store.load_decks()?;
        assert_eq!(decks.len(), 1);
        assert!(decks[0].cards()[1].is_archived());
        assert_eq!(decks[0].updated_at, t0().plus_days(1));
        Ok(())
    }

    #[test]
    fn test_save_card_rejects_unknown_targets() -> Fallible<()> {
        let mut store = MemoryStore::new();
        let card = new_card("ciao", 0)?;
        assert!(store.save_card("Missing", &card).is_err());
        store.save_deck(&deck_with(0, 1)?)?;
        assert!(store.save_card("Italian", &card).is_err());
        Ok(())
    }

    #[test]
    fn test_stats_default_when_absent() -> Fallible<()> {
        let mut store = MemoryStore::new();
        let today = t0().local_date();
        let stats = store.load_global_stats(today)?;
        assert_eq!(stats, GlobalStats::new(today));

        let mut changed = stats.clone();
        changed.study_sessions = 3;
        store.save_global_stats(&changed)?;
        assert_eq!(store.load_global_stats(today)?.study_sessions, 3);
        Ok(())
    }
}
