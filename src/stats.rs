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

use crate::types::date::Date;
use crate::types::rating::Rating;

/// Tallies for a single study session.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub new_cards_studied: u32,
    pub review_cards_studied: u32,
    pub again_count: u32,
    pub hard_count: u32,
    pub good_count: u32,
    pub easy_count: u32,
}

impl SessionStats {
    /// Count one graded card. `was_new` is the card's category before the
    /// rating was applied.
    pub fn record(&mut self, was_new: bool, rating: Rating) {
        if was_new {
            self.new_cards_studied += 1;
        } else {
            self.review_cards_studied += 1;
        }
        match rating {
            Rating::Again => self.again_count += 1,
            Rating::Hard => self.hard_count += 1,
            Rating::Good => self.good_count += 1,
            Rating::Easy => self.easy_count += 1,
        }
    }

    pub fn total_studied(&self) -> u32 {
        self.new_cards_studied + self.review_cards_studied
    }

    pub fn total_rated(&self) -> u32 {
        self.again_count + self.hard_count + self.good_count + self.easy_count
    }

    pub fn correct(&self) -> u32 {
        self.good_count + self.easy_count
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total_rated())
    }
}

/// Lifetime statistics, plus a bucket for the current day.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_cards_studied: u32,
    pub total_new_cards_studied: u32,
    pub total_review_cards_studied: u32,
    pub total_again_count: u32,
    pub total_hard_count: u32,
    pub total_good_count: u32,
    pub total_easy_count: u32,
    pub study_sessions: u32,
    pub last_study_date: Option<Date>,
    /// The day the `today_*` fields refer to.
    pub today_date: Date,
    pub today_cards_studied: u32,
    pub today_new_cards: u32,
    pub today_reviews: u32,
    /// Cards rated Good or Easy today.
    pub today_correct: u32,
}

impl GlobalStats {
    pub fn new(today: Date) -> Self {
        Self {
            total_cards_studied: 0,
            total_new_cards_studied: 0,
            total_review_cards_studied: 0,
            total_again_count: 0,
            total_hard_count: 0,
            total_good_count: 0,
            total_easy_count: 0,
            study_sessions: 0,
            last_study_date: None,
            today_date: today,
            today_cards_studied: 0,
            today_new_cards: 0,
            today_reviews: 0,
            today_correct: 0,
        }
    }

    /// Merge a session's tallies into these statistics.
    pub fn fold(&mut self, session: &SessionStats, today: Date) {
        self.total_cards_studied += session.total_studied();
        self.total_new_cards_studied += session.new_cards_studied;
        self.total_review_cards_studied += session.review_cards_studied;
        self.total_again_count += session.again_count;
        self.total_hard_count += session.hard_count;
        self.total_good_count += session.good_count;
        self.total_easy_count += session.easy_count;
        self.study_sessions += 1;
        self.last_study_date = Some(today);

        self.check_rollover(today);
        self.today_cards_studied += session.total_studied();
        self.today_new_cards += session.new_cards_studied;
        self.today_reviews += session.review_cards_studied;
        self.today_correct += session.correct();
    }

    /// Zero the day bucket if `today` is not the day it refers to. Lifetime
    /// totals are left alone. Returns whether the bucket was reset.
    pub fn check_rollover(&mut self, today: Date) -> bool {
        if self.today_date == today {
            return false;
        }
        log::info!("New day ({today}), resetting daily statistics.");
        self.today_date = today;
        self.today_cards_studied = 0;
        self.today_new_cards = 0;
        self.today_reviews = 0;
        self.today_correct = 0;
        true
    }

    /// Fraction of all ratings that were Good or Easy.
    pub fn accuracy(&self) -> f64 {
        let total = self.total_again_count
            + self.total_hard_count
            + self.total_good_count
            + self.total_easy_count;
        ratio(self.total_good_count + self.total_easy_count, total)
    }

    /// Fraction of today's cards that were rated Good or Easy.
    pub fn today_accuracy(&self) -> f64 {
        ratio(self.today_correct, self.today_cards_studied)
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}
