//! Persistent high score
//!
//! A single integer, stored as a decimal string so the browser's
//! LocalStorage and the native file store hold the same thing.

use crate::persistence::KeyValueStore;

/// Best score across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "neon_defender_high_score";

    /// Read the stored value; absent or malformed reads as 0
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(raw) = store.get_item(Self::STORAGE_KEY) else {
            log::info!("No high score found, starting fresh");
            return Self::default();
        };
        match parse_score(&raw) {
            Some(best) => {
                log::info!("Loaded high score {}", best);
                Self { best }
            }
            None => {
                log::warn!("Ignoring malformed high score {:?}", raw);
                Self::default()
            }
        }
    }

    /// Record a finished run's score
    ///
    /// Stores `max(previous, score)`; returns true if this run set a new record.
    pub fn record(&mut self, score: u64, store: &mut impl KeyValueStore) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if store.set_item(Self::STORAGE_KEY, &score.to_string()) {
            log::info!("New high score saved: {}", score);
        }
        true
    }
}

/// Lenient integer parse: surrounding whitespace and a fractional part are
/// tolerated, negatives and garbage are not
fn parse_score(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<u64>() {
        return Some(v);
    }
    let v = trimmed.parse::<f64>().ok()?;
    (v.is_finite() && v >= 0.0).then(|| v.floor() as u64)
}
