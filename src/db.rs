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

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::error::fail;
use crate::stats::GlobalStats;
use crate::store::DeckStore;
use crate::store::StatsStore;
use crate::types::card::Card;
use crate::types::date::Date;
use crate::types::deck::Deck;
use crate::types::review_state::ReviewState;

/// The key of the one row in `global_stats`.
const GLOBAL_STATS_KEY: &str = "global";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let conn = Connection::open(database_path)?;
        Self::setup(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Fallible<Self> {
        Self::setup(Connection::open_in_memory()?)
    }

    fn setup(mut conn: Connection) -> Fallible<Self> {
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating database schema.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    fn load_cards(&self, deck_name: &str) -> Fallible<Vec<Card>> {
        let sql = "select card_id, front, back, created_at, updated_at, archived, due_at, ease_factor, interval_days, repetitions, lapses from cards where deck_name = ? order by position;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([deck_name])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            let review = ReviewState {
                due_at: row.get(6)?,
                ease_factor: row.get(7)?,
                interval_days: row.get(8)?,
                repetitions: row.get(9)?,
                lapses: row.get(10)?,
            };
            cards.push(Card::restore(
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                review,
            ));
        }
        Ok(cards)
    }
}

impl DeckStore for Database {
    fn load_decks(&self) -> Fallible<Vec<Deck>> {
        let mut decks = Vec::new();
        let mut stmt = self.conn.prepare(
            "select name, description, created_at, updated_at from decks order by created_at, name;",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            let cards = self.load_cards(&name)?;
            let mut deck = Deck::new(name, row.get::<_, String>(1)?, row.get(2)?).with_cards(cards);
            deck.updated_at = row.get(3)?;
            decks.push(deck);
        }
        log::debug!("Loaded {} decks.", decks.len());
        Ok(decks)
    }

    fn save_decks(&mut self, decks: &[Deck]) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        tx.execute("delete from cards;", [])?;
        tx.execute("delete from decks;", [])?;
        for deck in decks {
            insert_deck(&tx, deck)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn save_deck(&mut self, deck: &Deck) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        tx.execute("delete from cards where deck_name = ?;", [&deck.name])?;
        insert_deck(&tx, deck)?;
        tx.commit()?;
        Ok(())
    }

    fn save_card(&mut self, deck_name: &str, card: &Card) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        let sql = "update cards set front = ?, back = ?, updated_at = ?, archived = ?, due_at = ?, ease_factor = ?, interval_days = ?, repetitions = ?, lapses = ? where card_id = ? and deck_name = ?;";
        let review = card.review();
        let changed = tx.execute(
            sql,
            (
                card.front(),
                card.back(),
                card.updated_at(),
                card.is_archived(),
                review.due_at,
                review.ease_factor,
                review.interval_days,
                review.repetitions,
                review.lapses,
                card.id(),
                deck_name,
            ),
        )?;
        if changed == 0 {
            return fail(format!(
                "card {} not found in {deck_name}.",
                card.id().short()
            ));
        }
        tx.execute(
            "update decks set updated_at = ? where name = ?;",
            (card.updated_at(), deck_name),
        )?;
        tx.commit()?;
        Ok(())
    }
}

impl StatsStore for Database {
    fn load_global_stats(&self, today: Date) -> Fallible<GlobalStats> {
        let sql = "select total_cards_studied, total_new_cards_studied, total_review_cards_studied, total_again_count, total_hard_count, total_good_count, total_easy_count, study_sessions, last_study_date, today_date, today_cards_studied, today_new_cards, today_reviews, today_correct from global_stats where stats_key = ?;";
        let stats = self
            .conn
            .query_row(sql, [GLOBAL_STATS_KEY], read_global_stats)
            .optional()?;
        Ok(stats.unwrap_or_else(|| GlobalStats::new(today)))
    }

    fn save_global_stats(&mut self, stats: &GlobalStats) -> Fallible<()> {
        let sql = "insert or replace into global_stats (stats_key, total_cards_studied, total_new_cards_studied, total_review_cards_studied, total_again_count, total_hard_count, total_good_count, total_easy_count, study_sessions, last_study_date, today_date, today_cards_studied, today_new_cards, today_reviews, today_correct) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);";
        self.conn.execute(
            sql,
            (
                GLOBAL_STATS_KEY,
                stats.total_cards_studied,
                stats.total_new_cards_studied,
                stats.total_review_cards_studied,
                stats.total_again_count,
                stats.total_hard_count,
                stats.total_good_count,
                stats.total_easy_count,
                stats.study_sessions,
                stats.last_study_date,
                stats.today_date,
                stats.today_cards_studied,
                stats.today_new_cards,
                stats.today_reviews,
                stats.today_correct,
            ),
        )?;
        log::debug!("Saved global statistics.");
        Ok(())
    }
}

fn insert_deck(tx: &Transaction, deck: &Deck) -> Fallible<()> {
    let sql = "insert into decks (name, description, created_at, updated_at) values (?, ?, ?, ?) on conflict (name) do update set description = excluded.description, updated_at = excluded.updated_at;";
    tx.execute(
        sql,
        (&deck.name, &deck.description, deck.created_at, deck.updated_at),
    )?;
    for (position, card) in deck.cards().iter().enumerate() {
        insert_card(tx, &deck.name, position, card)?;
    }
    Ok(())
}

fn insert_card(tx: &Transaction, deck_name: &str, position: usize, card: &Card) -> Fallible<()> {
    let sql = "insert into cards (card_id, deck_name, position, front, back, created_at, updated_at, archived, due_at, ease_factor, interval_days, repetitions, lapses) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);";
    let review = card.review();
    tx.execute(
        sql,
        (
            card.id(),
            deck_name,
            position as i64,
            card.front(),
            card.back(),
            card.created_at(),
            card.updated_at(),
            card.is_archived(),
            review.due_at,
            review.ease_factor,
            review.interval_days,
            review.repetitions,
            review.lapses,
        ),
    )?;
    Ok(())
}

fn read_global_stats(row: &Row<'_>) -> rusqlite::Result<GlobalStats> {
    Ok(GlobalStats {
        total_cards_studied: row.get(0)?,
        total_new_cards_studied: row.get(1)?,
        total_review_cards_studied: row.get(2)?,
        total_again_count: row.get(3)?,
        total_hard_count: row.get(4)?,
        total_good_count: row.get(5)?,
        total_easy_count: row.get(6)?,
        study_sessions: row.get(7)?,
        last_study_date: row.get(8)?,
        today_date: row.get(9)?,
        today_cards_studied: row.get(10)?,
        today_new_cards: row.get(11)?,
        today_reviews: row.get(12)?,
        today_correct: row.get(13)?,
    })
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}
