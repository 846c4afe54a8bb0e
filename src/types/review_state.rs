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

use crate::sm2::INITIAL_EASE_FACTOR;
use crate::types::timestamp::Timestamp;

/// A card's spaced repetition memory.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ReviewState {
    /// When the card is next due.
    pub due_at: Timestamp,
    /// Multiplier for interval growth. Never below 1.3.
    pub ease_factor: f64,
    /// Days until the next review after a successful recall. At least 1.
    pub interval_days: u32,
    /// Consecutive successful recalls. Zero means the card is new.
    pub repetitions: u32,
    /// Failed recalls over the card's lifetime.
    pub lapses: u32,
}

impl ReviewState {
    /// The state of a card that has never been reviewed.
    pub fn new(created_at: Timestamp) -> Self {
        Self {
            due_at: created_at,
            ease_factor: INITIAL_EASE_FACTOR,
            interval_days: 1,
            repetitions: 0,
            lapses: 0,
        }
    }

    pub fn is_new(&self) -> bool {
        self.repetitions == 0
    }

    /// Whether a reviewed card is due at `now`. New cards are never due.
    pub fn is_due(&self, now: Timestamp) -> bool {
        !self.is_new() && self.due_at <= now
    }

    /// The next review time, or `None` for cards that are still new.
    pub fn next_review(&self) -> Option<Timestamp> {
        if self.is_new() { None } else { Some(self.due_at) }
    }
}
