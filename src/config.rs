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

use std::fs::read_to_string;
use std::path::Path;

use chrono::NaiveTime;
use serde::Deserialize;

use crate::error::Fallible;
use crate::scheduler::Limits;

/// The name of the settings file in a collection directory.
pub const SETTINGS_FILE: &str = "memit.toml";

/// Per-collection study settings.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// The most new cards introduced per session.
    pub daily_new_cards: usize,
    /// The most cards, new and due together, per session.
    pub max_review_cards: usize,
    /// Time of day for study reminders, as `HH:MM`.
    pub study_reminder: String,
    /// Show the back of each card as the prompt.
    pub study_reversed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_new_cards: 20,
            max_review_cards: 80,
            study_reminder: "09:00".to_string(),
            study_reversed: false,
        }
    }
}

impl Settings {
    /// Load the settings file from `directory`, falling back to the defaults
    /// when there is none.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(SETTINGS_FILE);
        if !path.exists() {
            log::debug!("No settings file, using defaults.");
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.reminder_time()?;
        Ok(settings)
    }

    pub fn reminder_time(&self) -> Fallible<NaiveTime> {
        Ok(NaiveTime::parse_from_str(&self.study_reminder, "%H:%M")?)
    }

    /// The session quotas, with optional overrides.
    pub fn limits(&self, new_limit: Option<usize>, total_limit: Option<usize>) -> Limits {
        Limits {
            daily_new: new_limit.unwrap_or(self.daily_new_cards),
            daily_total: total_limit.unwrap_or(self.max_review_cards),
        }
    }
}
