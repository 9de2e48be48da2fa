//! Timed tile animations for the terminal
//!
//! [`TileAnimator`] keeps one sprite per tile and a list of deadlines. The
//! render loop calls [`TileAnimator::advance`] every frame, which fires the
//! completion signals whose animations have run their course.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::game::{Animator, Completion, CompletionHandle, GameConfig, Position, TileId};

/// Visual state of one tile
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub id: TileId,
    pub value: u32,
    from: Position,
    to: Position,
    moved_at: Instant,
    slide: Duration,
    born_at: Instant,
    spawn: Duration,
    highlight_until: Option<Instant>,
}

impl Sprite {
    /// Interpolated (column, row) on the board at `now`
    pub fn placement(&self, now: Instant) -> (f32, f32) {
        let t = progress(self.moved_at, self.slide, now);
        let lerp = |a: usize, b: usize| a as f32 + (b as f32 - a as f32) * t;
        (lerp(self.from.x, self.to.x), lerp(self.from.y, self.to.y))
    }

    /// Spawn pop progress, 0 when just placed, 1 once fully grown
    pub fn scale(&self, now: Instant) -> f32 {
        progress(self.born_at, self.spawn, now)
    }

    /// Recently merged tiles are drawn highlighted
    pub fn is_highlighted(&self, now: Instant) -> bool {
        self.highlight_until.is_some_and(|until| now < until)
    }
}

fn progress(start: Instant, duration: Duration, now: Instant) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
}

/// Animator that drives sprites by wall-clock time
#[derive(Debug)]
pub struct TileAnimator {
    slide: Duration,
    spawn: Duration,
    merge: Duration,
    sprites: BTreeMap<TileId, Sprite>,
    timers: Vec<(Instant, CompletionHandle)>,
}

impl TileAnimator {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            slide: config.slide_duration(),
            spawn: config.spawn_duration(),
            merge: config.merge_duration(),
            sprites: BTreeMap::new(),
            timers: Vec::new(),
        }
    }

    /// Fire every signal whose deadline is at or before `now`
    pub fn advance(&mut self, now: Instant) {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|(deadline, _)| *deadline <= now);
        self.timers = waiting;

        for (_, handle) in due {
            handle.complete();
        }
    }

    /// Whether anything still has to finish
    pub fn is_animating(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Sprites in creation order, so newer tiles draw on top
    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.values()
    }

    pub fn sprite(&self, id: TileId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    fn schedule(&mut self, start: Instant, duration: Duration) -> Completion {
        if duration.is_zero() {
            return Completion::ready();
        }
        let (handle, completion) = Completion::pending();
        self.timers.push((start + duration, handle));
        completion
    }
}

impl Animator for TileAnimator {
    fn tile_appeared(&mut self, id: TileId, value: u32, at: Position) -> Completion {
        let now = Instant::now();
        self.sprites.insert(
            id,
            Sprite {
                id,
                value,
                from: at,
                to: at,
                moved_at: now,
                slide: Duration::ZERO,
                born_at: now,
                spawn: self.spawn,
                highlight_until: None,
            },
        );
        self.schedule(now, self.spawn)
    }

    fn tile_moved(&mut self, id: TileId, from: Position, to: Position) -> Completion {
        let now = Instant::now();
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.from = from;
            sprite.to = to;
            sprite.moved_at = now;
            sprite.slide = self.slide;
        }
        self.schedule(now, self.slide)
    }

    fn tile_merged(&mut self, id: TileId, value: u32, absorbed: TileId) {
        let now = Instant::now();
        self.sprites.remove(&absorbed);
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.value = value;
            sprite.highlight_until = Some(now + self.merge);
        }
        // Nobody waits on the highlight; the timer keeps frames coming until it fades
        let _ = self.schedule(now, self.merge);
    }

    fn board_cleared(&mut self) {
        self.sprites.clear();
        // Dropping the handles resolves anything still waiting
        self.timers.clear();
    }
}
