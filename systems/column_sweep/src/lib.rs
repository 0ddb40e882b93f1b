#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure strategy that clears the contribution grid one week at a time.
//!
//! For every week the ship makes as many top-to-bottom passes as the highest
//! level in that week. On each pass it fires at every day whose simulated
//! health is still positive and flies over the rest. Weeks without activity
//! produce no actions at all.

use std::iter::{Enumerate, FusedIterator};
use std::slice::Iter;

use space_shooter_core::{
    Action, ContributionData, GridCoord, Level, Strategy, Week, DAYS_PER_WEEK,
};

/// Column-by-column clearing strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnSweep;

impl ColumnSweep {
    /// Creates the column sweep strategy.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Number of actions the sweep emits for the provided data.
    #[must_use]
    pub fn planned_len(data: &ContributionData) -> usize {
        data.weeks().iter().map(week_len).fold(0, usize::saturating_add)
    }
}

impl Strategy for ColumnSweep {
    type Actions<'data> = SweepActions<'data>;

    fn name(&self) -> &'static str {
        "column"
    }

    fn actions<'data>(&'data self, data: &'data ContributionData) -> Self::Actions<'data> {
        SweepActions::new(data)
    }
}

/// Lazy stream of actions produced by [`ColumnSweep`].
#[derive(Clone, Debug)]
pub struct SweepActions<'data> {
    weeks: Enumerate<Iter<'data, Week>>,
    column: Option<ColumnPass>,
    remaining: usize,
}

impl<'data> SweepActions<'data> {
    fn new(data: &'data ContributionData) -> Self {
        Self {
            weeks: data.weeks().iter().enumerate(),
            column: None,
            remaining: ColumnSweep::planned_len(data),
        }
    }
}

impl Iterator for SweepActions<'_> {
    type Item = Action;

    fn next(&mut self) -> Option<Action> {
        loop {
            if let Some(action) = self.column.as_mut().and_then(ColumnPass::next_action) {
                self.remaining = self.remaining.saturating_sub(1);
                return Some(action);
            }

            let (index, week) = self.weeks.next()?;
            self.column = Some(ColumnPass::new(index, week));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SweepActions<'_> {}

impl FusedIterator for SweepActions<'_> {}

/// Progress through the passes over a single week.
#[derive(Clone, Debug)]
struct ColumnPass {
    week: usize,
    health: [Level; DAYS_PER_WEEK],
    passes: Level,
    pass: Level,
    day: usize,
}

impl ColumnPass {
    fn new(week: usize, data: &Week) -> Self {
        Self {
            week,
            health: data.levels(),
            passes: data.max_level(),
            pass: 0,
            day: 0,
        }
    }

    fn next_action(&mut self) -> Option<Action> {
        if self.pass >= self.passes {
            return None;
        }

        let cell = GridCoord::from_indices(self.week, self.day);
        let health = &mut self.health[self.day];
        let action = if *health > 0 {
            *health -= 1;
            Action::fire(cell)
        } else {
            Action::pass(cell)
        };

        self.day += 1;
        if self.day == DAYS_PER_WEEK {
            self.day = 0;
            self.pass += 1;
        }

        Some(action)
    }
}

fn week_len(week: &Week) -> usize {
    usize::try_from(week.max_level())
        .unwrap_or(usize::MAX)
        .saturating_mul(DAYS_PER_WEEK)
}
