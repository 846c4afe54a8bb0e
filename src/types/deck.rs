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

use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::timestamp::Timestamp;

/// A named, ordered collection of cards. The deck owns its cards; the order
/// is insertion order and carries no meaning beyond display.
#[derive(Clone, PartialEq, Debug)]
pub struct Deck {
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    cards: Vec<Card>,
}

impl Deck {
    pub fn new(name: impl Into<String>, description: impl Into<String>, now: Timestamp) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
            cards: Vec::new(),
        }
    }

    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = cards;
        self
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id() == id)
    }

    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }

    pub fn add_card(&mut self, card: Card, now: Timestamp) {
        self.cards.push(card);
        self.touch(now);
    }

    /// Remove a card by id. Returns the removed card, if there was one.
    pub fn remove_card(&mut self, id: CardId, now: Timestamp) -> Option<Card> {
        let index = self.cards.iter().position(|card| card.id() == id)?;
        self.touch(now);
        Some(self.cards.remove(index))
    }

    /// Replace the card with the same id in place. Returns false, leaving the
    /// deck untouched, if no such card exists.
    pub fn update_card(&mut self, updated: Card, now: Timestamp) -> bool {
        match self.cards.iter_mut().find(|card| card.id() == updated.id()) {
            Some(slot) => {
                *slot = updated;
                self.touch(now);
                true
            }
            None => false,
        }
    }

    /// Cards that are not archived.
    pub fn active_cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|card| !card.is_archived())
    }

    /// Active cards that have been reviewed and are due at `now`.
    pub fn due_cards(&self, now: Timestamp) -> impl Iterator<Item = &Card> {
        self.active_cards().filter(move |card| card.review().is_due(now))
    }

    /// Active cards that have never been successfully reviewed.
    pub fn new_cards(&self) -> impl Iterator<Item = &Card> {
        self.active_cards().filter(|card| card.is_new())
    }

    pub fn total_count(&self) -> usize {
        self.active_cards().count()
    }

    pub fn due_count(&self, now: Timestamp) -> usize {
        self.due_cards(now).count()
    }

    pub fn new_count(&self) -> usize {
        self.new_cards().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::helper::card_due_at;
    use crate::helper::new_card;
    use crate::helper::t0;

    #[test]
    fn test_filters_skip_archived_cards() -> Fallible<()> {
        let now = t0();
        let mut archived = new_card("archived", 0)?;
        archived.set_archived(true, now);
        let deck = Deck::new("Italian", "", now).with_cards(vec![
            new_card("fresh", 1)?,
            card_due_at("due", 2, now)?,
            card_due_at("later", 3, now.plus_days(3))?,
            archived,
        ]);
        assert_eq!(deck.cards().len(), 4);
        assert_eq!(deck.total_count(), 3);
        assert_eq!(deck.new_count(), 1);
        assert_eq!(deck.due_count(now), 1);
        assert_eq!(deck.due_count(now.plus_days(3)), 2);
        Ok(())
    }

    #[test]
    fn test_update_card_replaces_in_place() -> Fallible<()> {
        let now = t0();
        let first = new_card("first", 0)?;
        let second = new_card("second", 1)?;
        let mut deck = Deck::new("Italian", "", now).with_cards(vec![first.clone(), second]);

        let mut edited = first.clone();
        edited.edit("primo", "first", now.plus_days(1))?;
        assert!(deck.update_card(edited, now.plus_days(1)));
        assert_eq!(deck.cards()[0].front(), "primo");
        assert_eq!(deck.cards().len(), 2);
        assert_eq!(deck.updated_at, now.plus_days(1));
        Ok(())
    }

    #[test]
    fn test_update_unknown_card_is_a_no_op() -> Fallible<()> {
        let now = t0();
        let mut deck = Deck::new("Italian", "", now).with_cards(vec![new_card("first", 0)?]);
        let stranger = new_card("stranger", 9)?;
        assert!(!deck.update_card(stranger, now.plus_days(1)));
        assert_eq!(deck.updated_at, now);
        Ok(())
    }

    #[test]
    fn test_add_and_remove() -> Fallible<()> {
        let now = t0();
        let mut deck = Deck::new("Italian", "", now);
        let card = new_card("ciao", 0)?;
        let id = card.id();
        deck.add_card(card, now);
        assert!(deck.card(id).is_some());
        assert!(deck.remove_card(id, now).is_some());
        assert!(deck.remove_card(id, now).is_none());
        assert!(deck.cards().is_empty());
        Ok(())
    }
}
