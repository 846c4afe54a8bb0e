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

/// How well the user recalled a card after seeing its answer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rating {
    /// Not remembered.
    Again,
    /// Barely remembered.
    Hard,
    /// Remembered with effort.
    Good,
    /// Remembered easily.
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// The SM-2 quality score. Only 1 through 4 of the usual 0 to 5 scale
    /// are reachable.
    pub fn quality(self) -> u8 {
        match self {
            Rating::Again => 1,
            Rating::Hard => 2,
            Rating::Good => 3,
            Rating::Easy => 4,
        }
    }

    /// Whether this rating counts as a successful recall.
    pub fn is_correct(self) -> bool {
        self.quality() >= 3
    }

    pub fn from_quality(quality: u8) -> Option<Self> {
        match quality {
            1 => Some(Rating::Again),
            2 => Some(Rating::Hard),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Again => "Again",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_mapping() {
        assert_eq!(Rating::Again.quality(), 1);
        assert_eq!(Rating::Hard.quality(), 2);
        assert_eq!(Rating::Good.quality(), 3);
        assert_eq!(Rating::Easy.quality(), 4);
        for rating in Rating::ALL {
            assert_eq!(Rating::from_quality(rating.quality()), Some(rating));
        }
        assert_eq!(Rating::from_quality(0), None);
        assert_eq!(Rating::from_quality(5), None);
    }

    #[test]
    fn test_correctness() {
        assert!(!Rating::Again.is_correct());
        assert!(!Rating::Hard.is_correct());
        assert!(Rating::Good.is_correct());
        assert!(Rating::Easy.is_correct());
    }
}
