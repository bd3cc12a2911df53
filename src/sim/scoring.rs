//! Score, combo streak and level progression

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Outcome of crediting a kill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillAward {
    /// Streak after this kill
    pub combo: u32,
    /// Combo bonus added on top of the base value
    pub bonus: u64,
    /// New level, if any part of the award crossed a level boundary
    pub level_up: Option<u32>,
}

/// Score bookkeeping for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreKeeper {
    pub score: u64,
    pub level: u32,
    pub combo: u32,
    pub last_kill_ms: Option<f64>,
}

impl Default for ScoreKeeper {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            combo: 0,
            last_kill_ms: None,
        }
    }

    /// `floor(score / points_per_level) + 1`
    pub fn level_for(score: u64, points_per_level: u64) -> u32 {
        let per_level = points_per_level.max(1);
        (score / per_level).saturating_add(1).min(u32::MAX as u64) as u32
    }

    /// Add points and re-derive the level
    ///
    /// Returns the new level when it increased.
    pub fn add(&mut self, points: u64, tuning: &Tuning) -> Option<u32> {
        self.score = self.score.saturating_add(points);
        let level = Self::level_for(self.score, tuning.points_per_level);
        if level > self.level {
            self.level = level;
            Some(level)
        } else {
            None
        }
    }

    /// Advance the streak for a kill at `now_ms` and return the bonus
    pub fn bump_combo(&mut self, now_ms: f64, tuning: &Tuning) -> u64 {
        let within_window = self
            .last_kill_ms
            .is_some_and(|last| now_ms - last < tuning.combo_window_ms);
        self.combo = if within_window { self.combo + 1 } else { 1 };
        self.last_kill_ms = Some(now_ms);
        self.combo.min(tuning.combo_bonus_cap) as u64 * tuning.combo_bonus_step
    }

    /// Credit a kill worth `base` points: base, level check, combo bonus, level check
    pub fn credit_kill(&mut self, base: u64, now_ms: f64, tuning: &Tuning) -> KillAward {
        let mut level_up = self.add(base, tuning);
        let bonus = self.bump_combo(now_ms, tuning);
        if let Some(level) = self.add(bonus, tuning) {
            level_up = Some(level);
        }
        KillAward {
            combo: self.combo,
            bonus,
            level_up,
        }
    }
}
