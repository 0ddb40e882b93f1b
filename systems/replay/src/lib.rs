#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Driver that replays an action stream against the world and samples frames.
//!
//! Actions are pulled one at a time, translated into world commands and
//! applied in order. A [`FrameSink`] is asked to capture the world before the
//! first action, after every `frame_interval`-th action, and once more after
//! the last applied action if that one was not already captured. The replay
//! stops pulling actions as soon as the world reports the sweep completed.

use std::num::NonZeroUsize;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use space_shooter_core::{Action, Command, Event};
use space_shooter_world::{self as world, query, World};

/// Determines what happens to the bullet history once a frame was captured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BulletPolicy {
    /// Bullets are cleared after every captured frame.
    #[default]
    ClearAfterFrame,
    /// Bullets accumulate for the entire replay.
    Accumulate,
}

/// Configuration for a single replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayConfig {
    frame_interval: NonZeroUsize,
    bullets: BulletPolicy,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            frame_interval: NonZeroUsize::MIN,
            bullets: BulletPolicy::default(),
        }
    }
}

impl ReplayConfig {
    /// Creates a configuration that captures a frame after every action.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures a frame after every `interval` actions.
    #[must_use]
    pub const fn with_frame_interval(mut self, interval: NonZeroUsize) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Selects how bullets are handled between frames.
    #[must_use]
    pub const fn with_bullet_policy(mut self, bullets: BulletPolicy) -> Self {
        self.bullets = bullets;
        self
    }

    /// Number of actions applied between captured frames.
    #[must_use]
    pub const fn frame_interval(&self) -> NonZeroUsize {
        self.frame_interval
    }

    /// Bullet handling between frames.
    #[must_use]
    pub const fn bullet_policy(&self) -> BulletPolicy {
        self.bullets
    }
}

/// Sequential index of a captured frame, starting at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameIndex(usize);

impl FrameIndex {
    /// Creates a frame index with the provided value.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Consumer of world snapshots taken during a replay.
pub trait FrameSink {
    /// Captures the current world state as the frame with the provided index.
    fn capture(&mut self, frame: FrameIndex, world: &World) -> Result<()>;
}

impl<F> FrameSink for F
where
    F: FnMut(FrameIndex, &World) -> Result<()>,
{
    fn capture(&mut self, frame: FrameIndex, world: &World) -> Result<()> {
        self(frame, world)
    }
}

/// Totals gathered while replaying an action stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ReplaySummary {
    /// Actions pulled from the stream and applied.
    pub actions: usize,
    /// Actions that fired a bullet.
    pub shots: usize,
    /// Bullets that damaged a living enemy.
    pub hits: usize,
    /// Enemies whose health reached zero.
    pub destroyed: usize,
    /// Frames handed to the sink, including the initial frame.
    pub frames: usize,
    /// Whether every enemy was destroyed when the replay ended.
    pub complete: bool,
}

/// Replays action streams against a world.
#[derive(Debug, Default)]
pub struct Replay {
    config: ReplayConfig,
    scratch: Vec<Event>,
}

impl Replay {
    /// Creates a replay driver with the provided configuration.
    #[must_use]
    pub fn new(config: ReplayConfig) -> Self {
        Self {
            config,
            scratch: Vec::new(),
        }
    }

    /// Configuration used by the driver.
    #[must_use]
    pub const fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Applies actions to the world until the stream ends or the sweep completes.
    ///
    /// Sink failures abort the replay and are returned with the index of the
    /// failing frame attached. A stream that ends before every enemy is
    /// destroyed is not an error; it is reported through
    /// [`ReplaySummary::complete`].
    pub fn run<I, S>(&mut self, world: &mut World, actions: I, sink: &mut S) -> Result<ReplaySummary>
    where
        I: IntoIterator<Item = Action>,
        S: FrameSink + ?Sized,
    {
        let mut summary = ReplaySummary::default();
        self.capture(world, sink, &mut summary)?;

        if query::is_complete(world) {
            summary.complete = true;
            info!("nothing to clear, replay finished after the initial frame");
            return Ok(summary);
        }

        let interval = self.config.frame_interval.get();
        let mut since_capture = 0;

        for action in actions {
            self.scratch.clear();
            for command in action.commands() {
                world::apply(world, command, &mut self.scratch);
            }

            summary.actions += 1;
            if action.shoots() {
                summary.shots += 1;
            }

            let mut completed = false;
            for event in &self.scratch {
                match event {
                    Event::EnemyDamaged { .. } => summary.hits += 1,
                    Event::EnemyDestroyed { .. } => summary.destroyed += 1,
                    Event::SweepCompleted => completed = true,
                    _ => {}
                }
            }

            since_capture += 1;
            if since_capture == interval || completed {
                self.capture(world, sink, &mut summary)?;
                since_capture = 0;
            }

            if completed {
                debug!("sweep completed after {} actions", summary.actions);
                break;
            }
        }

        if since_capture > 0 {
            self.capture(world, sink, &mut summary)?;
        }

        summary.complete = query::is_complete(world);
        if summary.complete {
            info!(
                "replay cleared {} enemies with {} shots over {} actions, {} frames",
                summary.destroyed, summary.shots, summary.actions, summary.frames
            );
        } else {
            warn!(
                "action stream ended after {} actions with {} enemies still alive",
                summary.actions,
                query::alive_enemies(world).len()
            );
        }

        Ok(summary)
    }

    fn capture<S>(&mut self, world: &mut World, sink: &mut S, summary: &mut ReplaySummary) -> Result<()>
    where
        S: FrameSink + ?Sized,
    {
        let frame = FrameIndex::new(summary.frames);
        sink.capture(frame, world)
            .with_context(|| format!("failed to capture frame {}", frame.get()))?;
        summary.frames += 1;
        debug!(
            "captured frame {} after {} actions, {} bullets in flight",
            frame.get(),
            summary.actions,
            query::bullet_count(world)
        );

        if self.config.bullets == BulletPolicy::ClearAfterFrame {
            self.scratch.clear();
            world::apply(world, Command::ClearBullets, &mut self.scratch);
        }

        Ok(())
    }
}
