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

use crate::clock::Clock;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::DeckStore;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::deck::Deck;
use crate::types::timestamp::Timestamp;

pub fn add_card(
    directory: Option<String>,
    deck_name: &str,
    front: &str,
    back: &str,
    clock: &dyn Clock,
) -> Fallible<()> {
    let mut coll = Collection::open(directory, clock)?;
    let id = add_to(&mut coll, deck_name, front, back, clock.now())?;
    println!("Added card {} to {deck_name}.", id.short());
    Ok(())
}

/// Append a new card to the named deck, creating the deck if needed.
pub fn add_to(
    coll: &mut Collection,
    deck_name: &str,
    front: &str,
    back: &str,
    now: Timestamp,
) -> Fallible<CardId> {
    let deck_name = deck_name.trim();
    if deck_name.is_empty() {
        return fail("deck name must not be empty.");
    }
    let position = coll.decks.iter().position(|deck| deck.name == deck_name);
    let ordinal = position.map_or(0, |index| coll.decks[index].cards().len());
    let card = Card::new(deck_name, front, back, now, ordinal)?;
    let id = card.id();

    let index = match position {
        Some(index) => index,
        None => {
            log::debug!("Creating deck {deck_name}.");
            coll.decks.push(Deck::new(deck_name, "", now));
            coll.decks.len() - 1
        }
    };
    let deck = &mut coll.decks[index];
    deck.add_card(card, now);
    coll.db.save_deck(deck)?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::helper::t0;
    use crate::helper::tmp_collection;

    #[test]
    fn test_add_creates_deck_then_appends() -> Fallible<()> {
        let (_dir, path) = tmp_collection(None)?;
        let clock = FixedClock::new(t0());
        let directory = Some(path.display().to_string());
        let mut coll = Collection::open(directory.clone(), &clock)?;

        let first = add_to(&mut coll, "Italian", "cane", "dog", t0())?;
        let second = add_to(&mut coll, "Italian", "cane", "dog", t0())?;
        assert_ne!(first, second);

        let coll = Collection::open(directory, &clock)?;
        let deck = coll.deck("Italian")?;
        assert_eq!(deck.total_count(), 2);
        assert!(deck.card(first).is_some_and(|card| card.is_new()));
        Ok(())
    }

    #[test]
    fn test_add_rejects_blank_sides() -> Fallible<()> {
        let (_dir, path) = tmp_collection(None)?;
        let clock = FixedClock::new(t0());
        let mut coll = Collection::open(Some(path.display().to_string()), &clock)?;
        assert!(add_to(&mut coll, "Italian", "  ", "dog", t0()).is_err());
        assert!(add_to(&mut coll, " ", "cane", "dog", t0()).is_err());
        Ok(())
    }
}
