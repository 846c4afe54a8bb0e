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
use crate::types::card_id::CardId;
use crate::types::review_state::ReviewState;
use crate::types::timestamp::Timestamp;

#[derive(Clone, PartialEq, Debug)]
pub struct Card {
    /// The card's stable identifier.
    id: CardId,
    /// The prompt side.
    front: String,
    /// The answer side.
    back: String,
    created_at: Timestamp,
    updated_at: Timestamp,
    /// Archived cards are never scheduled.
    archived: bool,
    review: ReviewState,
}

impl Card {
    /// Create a new card. Both sides are trimmed, and must be non-empty.
    pub fn new(
        deck_name: &str,
        front: &str,
        back: &str,
        now: Timestamp,
        ordinal: usize,
    ) -> Fallible<Self> {
        let front = front.trim();
        let back = back.trim();
        if !is_valid_text(front, back) {
            return fail("card front and back must not be empty.");
        }
        Ok(Self {
            id: CardId::derive(deck_name, front, back, now, ordinal),
            front: front.to_string(),
            back: back.to_string(),
            created_at: now,
            updated_at: now,
            archived: false,
            review: ReviewState::new(now),
        })
    }

    /// Rebuild a card from storage. No validation happens here: stored text
    /// is opaque to the scheduler.
    pub fn restore(
        id: CardId,
        front: String,
        back: String,
        created_at: Timestamp,
        updated_at: Timestamp,
        archived: bool,
        review: ReviewState,
    ) -> Self {
        Self {
            id,
            front,
            back,
            created_at,
            updated_at,
            archived,
            review,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn back(&self) -> &str {
        &self.back
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn is_archived(&self) -> bool {
        self.archived
    }

    pub fn review(&self) -> &ReviewState {
        &self.review
    }

    pub fn is_valid(&self) -> bool {
        is_valid_text(&self.front, &self.back)
    }

    pub fn is_new(&self) -> bool {
        self.review.is_new()
    }

    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }

    /// Replace the card's text. Rejects empty sides, leaving the card as it
    /// was.
    pub fn edit(&mut self, front: &str, back: &str, now: Timestamp) -> Fallible<()> {
        let front = front.trim();
        let back = back.trim();
        if !is_valid_text(front, back) {
            return fail("card front and back must not be empty.");
        }
        self.front = front.to_string();
        self.back = back.to_string();
        self.touch(now);
        Ok(())
    }

    pub fn set_archived(&mut self, archived: bool, now: Timestamp) {
        self.archived = archived;
        self.touch(now);
    }

    pub fn set_review(&mut self, review: ReviewState, now: Timestamp) {
        self.review = review;
        self.touch(now);
    }
}

fn is_valid_text(front: &str, back: &str) -> bool {
    !front.trim().is_empty() && !back.trim().is_empty()
}
