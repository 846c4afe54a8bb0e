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

//! Fixtures shared by the test modules.

use std::fs::write;
use std::path::PathBuf;

use chrono::TimeZone;
use chrono::Utc;
use tempfile::TempDir;
use tempfile::tempdir;

use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::deck::Deck;
use crate::types::review_state::ReviewState;
use crate::types::timestamp::Timestamp;

pub const DECK_NAME: &str = "Italian";

/// A fixed reference instant: noon UTC, so that the local date is the same
/// calendar day in every timezone within eleven hours of UTC.
pub fn t0() -> Timestamp {
    Timestamp::new(Utc.with_ymd_and_hms(2026, 1, 4, 12, 0, 0).unwrap())
}

pub fn new_card(front: &str, ordinal: usize) -> Fallible<Card> {
    Card::new(DECK_NAME, front, &format!("{front} (back)"), t0(), ordinal)
}

/// A card that has been recalled twice and falls due at `due_at`.
pub fn card_due_at(front: &str, ordinal: usize, due_at: Timestamp) -> Fallible<Card> {
    let mut card = new_card(front, ordinal)?;
    let review = ReviewState {
        due_at,
        ease_factor: 2.6,
        interval_days: 6,
        repetitions: 2,
        lapses: 0,
    };
    card.set_review(review, t0());
    Ok(card)
}

/// A deck holding `due` review cards already due at `t0` (the first one the
/// most overdue) followed by `new` cards never studied.
pub fn deck_with(due: usize, new: usize) -> Fallible<Deck> {
    let mut cards = Vec::new();
    for i in 0..due {
        let overdue_by = (due - i) as u32;
        let due_at = Timestamp::new(t0().into_inner() - chrono::Duration::days(overdue_by.into()));
        cards.push(card_due_at(&format!("due {i}"), i, due_at)?);
    }
    for i in 0..new {
        cards.push(new_card(&format!("new {i}"), due + i)?);
    }
    Ok(Deck::new(DECK_NAME, "", t0()).with_cards(cards))
}

/// An empty collection directory with an optional settings file.
pub fn tmp_collection(settings: Option<&str>) -> Fallible<(TempDir, PathBuf)> {
    let dir = tempdir()?;
    let path = dir.path().canonicalize()?;
    if let Some(settings) = settings {
        write(path.join("memit.toml"), settings)?;
    }
    Ok((dir, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_with() -> Fallible<()> {
        let deck = deck_with(5, 10)?;
        assert_eq!(deck.due_count(t0()), 5);
        assert_eq!(deck.new_count(), 10);
        Ok(())
    }

    #[test]
    fn test_tmp_collection() -> Fallible<()> {
        let (_dir, path) = tmp_collection(Some("daily-new-cards = 3\n"))?;
        assert!(path.join("memit.toml").exists());
        Ok(())
    }
}
