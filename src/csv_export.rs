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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use csv::Terminator;
use csv::WriterBuilder;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::date::Date;
use crate::types::deck::Deck;

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug, Default)]
pub enum Separator {
    /// `front;back`
    #[default]
    Semicolon,
    /// `front,back`
    Comma,
}

impl Separator {
    fn byte(self) -> u8 {
        match self {
            Separator::Semicolon => b';',
            Separator::Comma => b',',
        }
    }
}

impl Display for Separator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Separator::Semicolon => write!(f, "semicolon"),
            Separator::Comma => write!(f, "comma"),
        }
    }
}

/// Render the active cards of `deck` as CSV text.
pub fn export_deck(deck: &Deck, separator: Separator, header: bool) -> Fallible<String> {
    if deck.total_count() == 0 {
        return fail(format!("cannot export empty deck {}.", deck.name));
    }
    let mut writer = WriterBuilder::new()
        .delimiter(separator.byte())
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    if header {
        writer.write_record(["front", "back"])?;
    }
    for card in deck.active_cards() {
        writer.write_record([card.front(), card.back()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ErrorReport::new(&format!("failed to flush CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|_| ErrorReport::new("exported CSV is not valid UTF-8."))
}

/// A filesystem-safe name for an export of `deck` made on `date`.
pub fn export_filename(deck: &Deck, date: Date) -> String {
    let name: String = deck
        .name
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' => '-',
            c => c,
        })
        .collect();
    format!("{name}_{date}.csv")
}
