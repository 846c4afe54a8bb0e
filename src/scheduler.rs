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

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::deck::Deck;
use crate::types::timestamp::Timestamp;

/// Daily quotas for a study session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Limits {
    /// The most new cards a session may introduce.
    pub daily_new: usize,
    /// The most cards, new and due together, a session may contain.
    pub daily_total: usize,
}

/// Select and order the cards for a study session.
///
/// Due cards take priority: they are ranked by how long they have been due
/// and fill the total quota first. Whatever quota remains, up to the new card
/// limit, goes to a random sample of new cards. The selection is then
/// shuffled for presentation. Archived cards and cards in `exclude` are never
/// selected. An empty result means there is nothing to study.
pub fn build_queue<R: Rng + ?Sized>(
    deck: &Deck,
    now: Timestamp,
    limits: Limits,
    exclude: &HashSet<CardId>,
    rng: &mut R,
) -> Vec<Card> {
    let mut due: Vec<&Card> = deck
        .due_cards(now)
        .filter(|card| !exclude.contains(&card.id()))
        .collect();
    due.sort_by_key(|card| card.review().due_at);
    due.truncate(limits.daily_total);

    let remaining = limits.daily_total - due.len();
    let new_quota = limits.daily_new.min(remaining);

    let mut new: Vec<&Card> = deck
        .new_cards()
        .filter(|card| !exclude.contains(&card.id()))
        .collect();
    new.shuffle(rng);
    new.truncate(new_quota);

    log::debug!(
        "Selected {} due and {} new cards (quota {} new, {} total).",
        due.len(),
        new.len(),
        limits.daily_new,
        limits.daily_total
    );

    let mut queue: Vec<Card> = due.into_iter().chain(new).cloned().collect();
    queue.shuffle(rng);
    queue
}
