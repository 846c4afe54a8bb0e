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

use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;

use rand::Rng;

use crate::clock::Clock;
use crate::collection::Collection;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::scheduler::Limits;
use crate::session::Session;
use crate::session::StartOutcome;
use crate::stats::GlobalStats;
use crate::store::DeckStore;
use crate::store::StatsStore;
use crate::types::deck::Deck;
use crate::types::rating::Rating;

/// What happened in a drill.
#[derive(Debug, PartialEq)]
pub struct DrillSummary {
    pub studied: u32,
    pub correct: u32,
    /// Whether every card in the queue was rated.
    pub completed: bool,
}

pub fn drill(
    directory: Option<String>,
    deck_name: &str,
    new_limit: Option<usize>,
    total_limit: Option<usize>,
    clock: &dyn Clock,
) -> Fallible<()> {
    let mut coll = Collection::open(directory, clock)?;
    let limits = coll.settings.limits(new_limit, total_limit);
    let reversed = coll.settings.study_reversed;
    let Collection {
        db, decks, stats, ..
    } = &mut coll;
    let deck = decks
        .iter_mut()
        .find(|deck| deck.name == deck_name)
        .ok_or_else(|| ErrorReport::new(&format!("no deck named {deck_name}.")))?;

    let drill = Drill {
        store: db,
        deck,
        stats,
        clock,
        limits,
        reversed,
    };
    let mut input = stdin().lock();
    let mut output = stdout().lock();
    drill.run(&mut input, &mut output, &mut rand::rng())?;
    Ok(())
}

/// A terminal drill over one deck. Each rating is persisted as soon as it is
/// made.
pub struct Drill<'a, S: DeckStore + StatsStore> {
    pub store: &'a mut S,
    pub deck: &'a mut Deck,
    pub stats: &'a mut GlobalStats,
    pub clock: &'a dyn Clock,
    pub limits: Limits,
    /// Prompt with the back of the card instead of the front.
    pub reversed: bool,
}

/// How the rating loop ended.
enum Exit {
    NoCards,
    Completed,
    Quit,
}

impl<S: DeckStore + StatsStore> Drill<'_, S> {
    /// Run the drill. However it ends, including on error, whatever was rated
    /// is folded into the global statistics exactly once.
    pub fn run<I: BufRead, W: Write, R: Rng + ?Sized>(
        mut self,
        input: &mut I,
        output: &mut W,
        rng: &mut R,
    ) -> Fallible<DrillSummary> {
        let mut session = Session::new();
        let exit = match self.drive(&mut session, input, output, rng) {
            Ok(exit) => exit,
            Err(e) => {
                if let Err(save) = self.abandon(&mut session) {
                    log::warn!("Failed to save statistics after drill error: {save}");
                }
                return Err(e);
            }
        };
        match exit {
            Exit::NoCards => {
                writeln!(output, "Nothing to study in {}.", self.deck.name)?;
                Ok(summarize(&session, true))
            }
            Exit::Completed => {
                let summary = summarize(&session, true);
                writeln!(
                    output,
                    "Session complete: {} cards, {} correct.",
                    summary.studied, summary.correct
                )?;
                Ok(summary)
            }
            Exit::Quit => {
                let summary = summarize(&session, false);
                self.abandon(&mut session)?;
                writeln!(
                    output,
                    "Stopped after {} cards, {} correct.",
                    summary.studied, summary.correct
                )?;
                Ok(summary)
            }
        }
    }

    fn drive<I: BufRead, W: Write, R: Rng + ?Sized>(
        &mut self,
        session: &mut Session,
        input: &mut I,
        output: &mut W,
        rng: &mut R,
    ) -> Fallible<Exit> {
        match session.start(self.deck, self.clock.now(), self.limits, rng)? {
            StartOutcome::NoCards => return Ok(Exit::NoCards),
            StartOutcome::Started { cards } => {
                writeln!(output, "Studying {cards} cards from {}.", self.deck.name)?;
            }
        }

        while let Some(card) = session.current_card() {
            let (prompt, answer) = if self.reversed {
                (card.back().to_string(), card.front().to_string())
            } else {
                (card.front().to_string(), card.back().to_string())
            };
            writeln!(
                output,
                "[{}/{}] Q: {prompt}",
                session.progress() + 1,
                session.total_in_session()
            )?;
            writeln!(output, "[press enter to reveal, q to quit]")?;
            match read_line(input)? {
                Some(line) if line != "q" => {}
                _ => return Ok(Exit::Quit),
            }
            session.flip()?;
            writeln!(output, "A: {answer}")?;

            let Some(rating) = read_rating(input, output)? else {
                return Ok(Exit::Quit);
            };
            let outcome = session.rate(rating, self.deck, self.stats, self.clock.now())?;
            self.store.save_card(&self.deck.name, &outcome.card)?;
            if outcome.folded {
                self.store.save_global_stats(self.stats)?;
            }
        }
        Ok(Exit::Completed)
    }

    /// Fold and save whatever was rated, unless that already happened.
    fn abandon(&mut self, session: &mut Session) -> Fallible<()> {
        let today = self.clock.now().local_date();
        if session.reset(self.stats, today) {
            self.store.save_global_stats(self.stats)?;
        }
        Ok(())
    }
}

fn summarize(session: &Session, completed: bool) -> DrillSummary {
    DrillSummary {
        studied: session.stats().total_studied(),
        correct: session.stats().correct(),
        completed,
    }
}

/// Read a trimmed line, or `None` at end of input.
fn read_line<I: BufRead>(input: &mut I) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompt until a valid rating is entered. `None` means quit.
fn read_rating<I: BufRead, W: Write>(input: &mut I, output: &mut W) -> Fallible<Option<Rating>> {
    loop {
        writeln!(output, "Rating: (1 = Again, 2 = Hard, 3 = Good, 4 = Easy)")?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if line == "q" {
            return Ok(None);
        }
        match line.parse::<u8>().ok().and_then(Rating::from_quality) {
            Some(rating) => return Ok(Some(rating)),
            None => writeln!(output, "Invalid input. Please enter a number between 1 and 4.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::clock::FixedClock;
    use crate::error::fail;
    use crate::helper::deck_with;
    use crate::helper::t0;
    use crate::store::MemoryStore;
    use crate::types::card::Card;
    use crate::types::date::Date;

    struct Run {
        summary: DrillSummary,
        output: String,
        store: MemoryStore,
        deck: Deck,
        stats: GlobalStats,
    }

    fn run(deck: Deck, limits: Limits, reversed: bool, input: &str) -> Fallible<Run> {
        let mut store = MemoryStore::new();
        store.save_deck(&deck)?;
        let mut deck = deck;
        let mut stats = GlobalStats::new(t0().local_date());
        let clock = FixedClock::new(t0());
        let drill = Drill {
            store: &mut store,
            deck: &mut deck,
            stats: &mut stats,
            clock: &clock,
            limits,
            reversed,
        };
        let mut output = Vec::new();
        let summary = drill.run(
            &mut Cursor::new(input.as_bytes()),
            &mut output,
            &mut StdRng::seed_from_u64(7),
        )?;
        let output = String::from_utf8(output).unwrap();
        Ok(Run {
            summary,
            output,
            store,
            deck,
            stats,
        })
    }

    const LIMITS: Limits = Limits {
        daily_new: 20,
        daily_total: 80,
    };

    #[test]
    fn test_complete_drill() -> Fallible<()> {
        let run = run(deck_with(1, 2)?, LIMITS, false, "\n3\n\n1\n\n4\n")?;
        assert_eq!(
            run.summary,
            DrillSummary {
                studied: 3,
                correct: 2,
                completed: true
            }
        );
        assert!(run.output.contains("Studying 3 cards from Italian."));
        assert!(run.output.contains("Session complete: 3 cards, 2 correct."));

        let stored = &run.store.load_decks()?[0];
        assert_eq!(stored, &run.deck);
        assert!(stored.cards().iter().all(|card| card.review().due_at > t0()));
        let saved = run.store.load_global_stats(t0().local_date())?;
        assert_eq!(saved, run.stats);
        assert_eq!(saved.study_sessions, 1);
        assert_eq!(saved.today_cards_studied, 3);
        assert_eq!(saved.today_correct, 2);
        Ok(())
    }

    #[test]
    fn test_quit_keeps_partial_progress() -> Fallible<()> {
        let run = run(deck_with(0, 3)?, LIMITS, false, "\n3\nq\n")?;
        assert_eq!(
            run.summary,
            DrillSummary {
                studied: 1,
                correct: 1,
                completed: false
            }
        );
        assert!(run.output.contains("Stopped after 1 cards, 1 correct."));
        let stored = &run.store.load_decks()?[0];
        assert_eq!(stored.new_count(), 2);
        let saved = run.store.load_global_stats(t0().local_date())?;
        assert_eq!(saved.total_cards_studied, 1);
        assert_eq!(saved.study_sessions, 1);
        Ok(())
    }

    #[test]
    fn test_end_of_input_before_any_rating() -> Fallible<()> {
        let run = run(deck_with(0, 3)?, LIMITS, false, "\n")?;
        assert_eq!(run.summary.studied, 0);
        assert!(!run.summary.completed);
        assert_eq!(run.stats.study_sessions, 0);
        assert_eq!(run.store.load_decks()?[0].new_count(), 3);
        Ok(())
    }

    #[test]
    fn test_invalid_ratings_are_reprompted() -> Fallible<()> {
        let run = run(deck_with(0, 1)?, LIMITS, false, "\n0\nfive\n2\n")?;
        assert_eq!(run.summary.studied, 1);
        assert_eq!(run.summary.correct, 0);
        assert_eq!(
            run.output
                .matches("Invalid input. Please enter a number between 1 and 4.")
                .count(),
            2
        );
        Ok(())
    }

    #[test]
    fn test_reversed_prompts_with_the_back() -> Fallible<()> {
        let run = run(deck_with(0, 1)?, LIMITS, true, "\n3\n")?;
        assert!(run.output.contains("Q: new 0 (back)"));
        assert!(run.output.contains("A: new 0\n"));
        Ok(())
    }

    #[test]
    fn test_nothing_to_study() -> Fallible<()> {
        let limits = Limits {
            daily_new: 0,
            daily_total: 80,
        };
        let run = run(deck_with(0, 3)?, limits, false, "")?;
        assert_eq!(run.summary.studied, 0);
        assert!(run.output.contains("Nothing to study in Italian."));
        Ok(())
    }

    /// A store that refuses card writes after the first `capacity`.
    struct FullDisk {
        inner: MemoryStore,
        capacity: usize,
    }

    impl DeckStore for FullDisk {
        fn load_decks(&self) -> Fallible<Vec<Deck>> {
            self.inner.load_decks()
        }

        fn save_decks(&mut self, decks: &[Deck]) -> Fallible<()> {
            self.inner.save_decks(decks)
        }

        fn save_deck(&mut self, deck: &Deck) -> Fallible<()> {
            self.inner.save_deck(deck)
        }

        fn save_card(&mut self, deck_name: &str, card: &Card) -> Fallible<()> {
            if self.capacity == 0 {
                return fail("disk full");
            }
            self.capacity -= 1;
            self.inner.save_card(deck_name, card)
        }
    }

    impl StatsStore for FullDisk {
        fn load_global_stats(&self, today: Date) -> Fallible<GlobalStats> {
            self.inner.load_global_stats(today)
        }

        fn save_global_stats(&mut self, stats: &GlobalStats) -> Fallible<()> {
            self.inner.save_global_stats(stats)
        }
    }

    #[test]
    fn test_failed_save_still_folds_statistics() -> Fallible<()> {
        let deck = deck_with(0, 3)?;
        let mut store = FullDisk {
            inner: MemoryStore::new(),
            capacity: 1,
        };
        store.save_deck(&deck)?;
        let mut deck = deck;
        let mut stats = GlobalStats::new(t0().local_date());
        let clock = FixedClock::new(t0());
        let drill = Drill {
            store: &mut store,
            deck: &mut deck,
            stats: &mut stats,
            clock: &clock,
            limits: LIMITS,
            reversed: false,
        };
        let result = drill.run(
            &mut Cursor::new("\n3\n\n3\n\n3\n".as_bytes()),
            &mut Vec::new(),
            &mut StdRng::seed_from_u64(7),
        );
        assert_eq!(result, Err(ErrorReport::new("disk full")));

        let stored = &store.load_decks()?[0];
        assert_eq!(stored.new_count(), 2);
        let saved = store.load_global_stats(t0().local_date())?;
        assert_eq!(saved, stats);
        assert_eq!(saved.study_sessions, 1);
        assert_eq!(saved.total_cards_studied, 2);
        Ok(())
    }
}
