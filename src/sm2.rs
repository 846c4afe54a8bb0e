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

//! The SM-2 scheduling function, restricted to a four-point rating scale.

use crate::types::rating::Rating;
use crate::types::review_state::ReviewState;
use crate::types::timestamp::Timestamp;

/// The ease factor of a card that has never been reviewed.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// The ease factor never drops below this.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Interval after the first successful recall, in days.
const FIRST_INTERVAL: u32 = 1;

/// Interval after the second consecutive successful recall, in days.
const SECOND_INTERVAL: u32 = 6;

/// Intervals are capped at roughly a century.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Compute a card's next review state after it was rated at `now`.
pub fn apply(rating: Rating, state: &ReviewState, now: Timestamp) -> ReviewState {
    let q = rating.quality();
    let mut next = *state;

    if rating.is_correct() {
        next.interval_days = match state.repetitions {
            0 => FIRST_INTERVAL,
            1 => SECOND_INTERVAL,
            // Truncation, not rounding. Uses the ease from before this review.
            _ => ((state.interval_days as f64) * state.ease_factor) as u32,
        }
        .clamp(1, MAX_INTERVAL_DAYS);
        next.repetitions = state.repetitions + 1;
    } else {
        next.repetitions = 0;
        next.interval_days = FIRST_INTERVAL;
        next.lapses = state.lapses + 1;
    }

    next.ease_factor = (state.ease_factor + ease_delta(q)).max(MIN_EASE_FACTOR);
    next.due_at = now.plus_days(next.interval_days);
    next
}

/// The canonical SM-2 ease adjustment for quality `q`.
fn ease_delta(q: u8) -> f64 {
    let d = 5.0 - f64::from(q);
    0.1 - d * (0.08 + d * 0.02)
}
