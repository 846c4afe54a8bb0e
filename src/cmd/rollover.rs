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

use crate::clock::Clock;
use crate::collection::Collection;
use crate::error::Fallible;

/// Reset the daily statistics if the day has changed. Opening the collection
/// does the work; this reports the outcome.
pub fn rollover(directory: Option<String>, clock: &dyn Clock) -> Fallible<()> {
    let coll = Collection::open(directory, clock)?;
    let today = coll.stats.today_date;
    if coll.rolled_over {
        println!("Daily statistics reset for {today}.");
    } else {
        println!("Daily statistics are already current for {today}.");
    }
    Ok(())
}
