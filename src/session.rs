//! One play-through of the game, from first spawn to fifth miss.
//!
//! The session is deliberately free of windowing and GPU types: the event
//! loop feeds it clicks and cursor positions, calls `tick` at a fixed rate,
//! and reads back which sound cues to fire. That keeps every rule in here
//! testable without a window.

use std::time::Instant;

use cgmath::Vector2;
use rand::{distributions::Uniform, rngs::ThreadRng, Rng};

use crate::consts::{HEIGHT, LIVES, MAX_TARGETS, SPAWN_INTERVAL_TICKS, TARGET_PADDING, WIDTH};
use crate::difficulty::Difficulty;
use crate::target::Target;

/// Sound cues owed after a tick. One cue per removed target, so several
/// overlapping targets hit by a single click produce several hit cues.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickFeedback {
    pub hits: u32,
    pub misses: u32,
}

/// Snapshot handed to the end screen when the session is over.
#[derive(Debug, Clone, Copy)]
pub struct SessionStats {
    pub elapsed: f32,
    pub hits: u32,
    pub clicks: u32,
}

pub struct Session {
    difficulty: Difficulty,
    targets: Vec<Target>,
    tick_count: u64,
    hits: u32,
    clicks: u32,
    misses: u32,
    /// Set by a mouse-down edge, consumed by the next tick. Several
    /// mouse-down events between ticks collapse into one flag, though each
    /// still counts as a click.
    pending_click: bool,
    started: Instant,
    rng: ThreadRng,
}

impl Session {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            targets: Vec::with_capacity(MAX_TARGETS),
            tick_count: 0,
            hits: 0,
            clicks: 0,
            misses: 0,
            pending_click: false,
            started: Instant::now(),
            rng: rand::thread_rng(),
        }
    }

    /// Records a mouse-button-down edge.
    pub fn register_click(&mut self) {
        self.clicks += 1;
        self.pending_click = true;
    }

    /// Advances the session by one tick: spawn attempt on the timer, then
    /// update/collide/remove every target. The hit check runs before the
    /// decay check, so a target clicked on the tick its radius runs out is
    /// a hit, never also a miss.
    pub fn tick(&mut self, cursor: Vector2<f32>) -> TickFeedback {
        self.tick_count += 1;
        if self.tick_count % SPAWN_INTERVAL_TICKS == 0 && self.targets.len() < MAX_TARGETS {
            self.spawn();
        }

        let click = std::mem::take(&mut self.pending_click);
        let mut feedback = TickFeedback::default();

        // Rebuild the target list instead of removing mid-iteration.
        let mut kept = Vec::with_capacity(self.targets.len());
        for mut target in self.targets.drain(..) {
            target.update();
            if click && target.collide(cursor.x, cursor.y) {
                feedback.hits += 1;
            } else if target.decayed() {
                feedback.misses += 1;
            } else {
                kept.push(target);
            }
        }
        self.targets = kept;

        self.hits += feedback.hits;
        self.misses += feedback.misses;
        feedback
    }

    fn spawn(&mut self) {
        let x_range = Uniform::new(TARGET_PADDING, WIDTH as f32 - TARGET_PADDING);
        let y_range = Uniform::new(TARGET_PADDING, HEIGHT as f32 - TARGET_PADDING);
        self.targets.push(Target::new(
            self.rng.sample(x_range),
            self.rng.sample(y_range),
            self.difficulty.max_radius(),
            self.difficulty.growth_rate(),
        ));
    }

    /// True once the miss count has reached the life limit.
    pub fn is_over(&self) -> bool {
        self.misses >= LIVES
    }

    pub fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            elapsed: self.elapsed(),
            hits: self.hits,
            clicks: self.clicks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_cursor() -> Vector2<f32> {
        Vector2::new(400.0, 300.0)
    }

    /// A target that decays two ticks after being pushed: grows to 0.3,
    /// flips, shrinks to 0.0.
    fn short_lived_target(x: f32, y: f32) -> Target {
        Target::new(x, y, 0.5, 0.3)
    }

    #[test]
    fn first_spawn_fires_on_the_spawn_interval_tick() {
        let mut session = Session::new(Difficulty::Easy);
        for _ in 0..SPAWN_INTERVAL_TICKS - 1 {
            session.tick(idle_cursor());
        }
        assert!(session.targets.is_empty());
        session.tick(idle_cursor());
        assert_eq!(session.targets.len(), 1);
    }

    #[test]
    fn active_targets_never_exceed_the_cap() {
        let mut session = Session::new(Difficulty::Easy);
        for _ in 0..10_000 {
            session.tick(idle_cursor());
            assert!(session.targets.len() <= MAX_TARGETS);
        }
    }

    #[test]
    fn decayed_target_counts_exactly_one_miss_and_is_removed() {
        let mut session = Session::new(Difficulty::Easy);
        session.targets.push(short_lived_target(100.0, 100.0));

        let first = session.tick(idle_cursor());
        assert_eq!(first, TickFeedback::default());

        let second = session.tick(idle_cursor());
        assert_eq!(second.misses, 1);
        assert_eq!(session.misses, 1);
        assert!(session.targets.is_empty());

        // Nothing left to decay, so no further misses.
        session.tick(idle_cursor());
        assert_eq!(session.misses, 1);
    }

    #[test]
    fn hit_takes_precedence_over_decay_on_the_same_tick() {
        let mut session = Session::new(Difficulty::Easy);
        session.targets.push(short_lived_target(100.0, 100.0));
        session.tick(idle_cursor());

        // This tick shrinks the radius to exactly zero, but the click lands
        // on the center first.
        session.register_click();
        let feedback = session.tick(Vector2::new(100.0, 100.0));
        assert_eq!(feedback.hits, 1);
        assert_eq!(feedback.misses, 0);
        assert_eq!(session.hits, 1);
        assert!(session.targets.is_empty());
    }

    #[test]
    fn one_click_can_hit_several_overlapping_targets() {
        let mut session = Session::new(Difficulty::Easy);
        session.targets.push(Target::new(200.0, 200.0, 40.0, 5.0));
        session.targets.push(Target::new(205.0, 200.0, 40.0, 5.0));
        session.tick(idle_cursor()); // both grow to radius 5

        session.register_click();
        let feedback = session.tick(Vector2::new(202.0, 200.0));
        assert_eq!(feedback.hits, 2);
        assert_eq!(session.clicks, 1);
    }

    #[test]
    fn click_flag_collapses_but_every_click_is_counted() {
        let mut session = Session::new(Difficulty::Easy);
        session.register_click();
        session.register_click();
        assert_eq!(session.clicks, 2);

        session.targets.push(Target::new(300.0, 300.0, 40.0, 5.0));
        session.targets.push(Target::new(600.0, 500.0, 40.0, 5.0));
        // One flag, one cursor position: only the target under the cursor
        // can be credited.
        let feedback = session.tick(Vector2::new(300.0, 300.0));
        assert_eq!(feedback.hits, 1);

        // The flag was consumed; the survivor is not hit retroactively.
        let feedback = session.tick(Vector2::new(600.0, 500.0));
        assert_eq!(feedback.hits, 0);
    }

    #[test]
    fn session_ends_exactly_on_the_fifth_miss() {
        let mut session = Session::new(Difficulty::Easy);
        for expected in 1..=LIVES {
            assert!(!session.is_over());
            session.targets.push(short_lived_target(100.0, 100.0));
            session.tick(idle_cursor());
            session.tick(idle_cursor());
            assert_eq!(session.misses, expected);
        }
        assert!(session.is_over());
        assert_eq!(session.misses, LIVES);
    }

    #[test]
    fn stats_reflect_counters() {
        let mut session = Session::new(Difficulty::Medium);
        session.targets.push(Target::new(100.0, 100.0, 40.0, 5.0));
        session.tick(idle_cursor());
        session.register_click();
        session.tick(Vector2::new(100.0, 100.0));

        let stats = session.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.clicks, 1);
        assert!(stats.elapsed >= 0.0);
    }
}
