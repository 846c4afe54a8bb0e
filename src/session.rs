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
use std::collections::VecDeque;
use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use rand::Rng;

use crate::scheduler::Limits;
use crate::scheduler::build_queue;
use crate::sm2;
use crate::stats::GlobalStats;
use crate::stats::SessionStats;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::date::Date;
use crate::types::deck::Deck;
use crate::types::rating::Rating;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// No session is running.
    Idle,
    /// A card is being shown.
    Active,
    /// Every card in the queue was rated, and the statistics were folded.
    Completed,
}

/// A call that the session's current phase does not allow. These indicate a
/// bug in the caller, and leave the session unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionError {
    /// The call needs an active session.
    NotActive,
    /// Rating needs the answer to be revealed first.
    NotRevealed,
    /// A session is already running.
    AlreadyActive,
    /// The current card is missing from the deck it is being written to.
    CardNotInDeck(CardId),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NotActive => write!(f, "no study session is active."),
            SessionError::NotRevealed => write!(
                f,
                "the current card must be revealed before it can be rated."
            ),
            SessionError::AlreadyActive => write!(f, "a study session is already active."),
            SessionError::CardNotInDeck(id) => {
                write!(f, "card {} is not in the deck.", id.short())
            }
        }
    }
}

impl Error for SessionError {}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StartOutcome {
    Started { cards: usize },
    /// Nothing is due and no new cards are available. The session stays idle.
    NoCards,
}

#[derive(Clone, Debug)]
pub struct RateOutcome {
    /// The rated card, as written back to the deck.
    pub card: Card,
    /// Whether that was the last card of the session.
    pub completed: bool,
    /// Whether the session statistics were folded by this call.
    pub folded: bool,
}

/// Drives a single study session over one deck.
pub struct Session {
    phase: Phase,
    queue: VecDeque<Card>,
    current: Option<Card>,
    revealed: bool,
    stats: SessionStats,
    /// Cards rated since the runner was last reset. Never re-queued.
    graded: HashSet<CardId>,
    total: usize,
    folded: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            queue: VecDeque::new(),
            current: None,
            revealed: false,
            stats: SessionStats::default(),
            graded: HashSet::new(),
            total: 0,
            folded: false,
        }
    }

    /// Build a queue from `deck` and show its first card.
    ///
    /// A completed session may be started again: cards rated earlier stay
    /// excluded, and a fresh tally begins.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        deck: &Deck,
        now: Timestamp,
        limits: Limits,
        rng: &mut R,
    ) -> Result<StartOutcome, SessionError> {
        if self.phase == Phase::Active {
            return Err(SessionError::AlreadyActive);
        }
        self.stats = SessionStats::default();
        self.folded = false;

        let mut queue: VecDeque<Card> = build_queue(deck, now, limits, &self.graded, rng).into();
        match queue.pop_front() {
            None => {
                log::debug!("No cards to study in {}.", deck.name);
                self.phase = Phase::Idle;
                self.total = 0;
                Ok(StartOutcome::NoCards)
            }
            Some(first) => {
                self.total = queue.len() + 1;
                self.current = Some(first);
                self.queue = queue;
                self.revealed = false;
                self.phase = Phase::Active;
                log::debug!("Session started with {} cards.", self.total);
                Ok(StartOutcome::Started { cards: self.total })
            }
        }
    }

    /// Toggle between the front and back of the current card. Returns whether
    /// the back is now shown.
    pub fn flip(&mut self) -> Result<bool, SessionError> {
        if self.phase != Phase::Active {
            return Err(SessionError::NotActive);
        }
        self.revealed = !self.revealed;
        Ok(self.revealed)
    }

    /// Rate the current card at `now`, write it back into `deck`, and move on
    /// to the next one. Rating the last card completes the session and folds
    /// its statistics into `global`.
    pub fn rate(
        &mut self,
        rating: Rating,
        deck: &mut Deck,
        global: &mut GlobalStats,
        now: Timestamp,
    ) -> Result<RateOutcome, SessionError> {
        if self.phase != Phase::Active {
            return Err(SessionError::NotActive);
        }
        if !self.revealed {
            return Err(SessionError::NotRevealed);
        }
        let current = self.current.as_ref().ok_or(SessionError::NotActive)?;
        let id = current.id();
        if deck.card(id).is_none() {
            return Err(SessionError::CardNotInDeck(id));
        }

        let was_new = current.is_new();
        let review = sm2::apply(rating, current.review(), now);
        let mut card = current.clone();
        card.set_review(review, now);
        deck.update_card(card.clone(), now);
        log::debug!(
            "{} {} EF={:.2} I={}d due={}",
            id.short(),
            rating.as_str(),
            review.ease_factor,
            review.interval_days,
            review.due_at
        );

        self.stats.record(was_new, rating);
        self.graded.insert(id);
        self.current = self.queue.pop_front();
        self.revealed = false;

        let completed = self.current.is_none();
        let mut folded = false;
        if completed {
            log::debug!("Session completed.");
            self.phase = Phase::Completed;
            folded = self.fold(global, now.local_date());
        }
        Ok(RateOutcome {
            card,
            completed,
            folded,
        })
    }

    /// Fold this session's statistics into `global`, unless nothing was rated
    /// or they were already folded. Returns whether anything was folded.
    pub fn fold(&mut self, global: &mut GlobalStats, today: Date) -> bool {
        if self.folded || self.stats.total_studied() == 0 {
            return false;
        }
        global.fold(&self.stats, today);
        self.folded = true;
        true
    }

    /// Abandon the session, folding any partial statistics first, and return
    /// to idle. Returns whether statistics were folded.
    pub fn reset(&mut self, global: &mut GlobalStats, today: Date) -> bool {
        let folded = self.fold(global, today);
        *self = Self::new();
        folded
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current.as_ref()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Cards still waiting behind the current one.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn total_in_session(&self) -> usize {
        self.total
    }

    /// Cards rated so far in this session.
    pub fn progress(&self) -> usize {
        self.stats.total_studied() as usize
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
