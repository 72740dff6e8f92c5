use std::collections::HashSet;

use derive_more::{Deref, DerefMut};
use getset::{CopyGetters, Getters};

/// Glyphs already spawned at the current level, excluded from future spawns
/// until the pool is exhausted.
#[derive(Debug, Clone, Default, PartialEq, Deref, DerefMut)]
pub struct UsedGlyphs(HashSet<char>);

/// Score, level, and progress for one mode session. Score only ever grows
/// within a session; it resets to zero exactly when a mode is (re)selected,
/// never on a level advance.
#[derive(Debug, Clone, PartialEq, CopyGetters, Getters)]
pub struct Session {
    #[getset(get_copy = "pub")]
    score: usize,
    #[getset(get_copy = "pub")]
    level: usize,
    #[getset(get_copy = "pub")]
    right_count: usize,
    #[getset(get_copy = "pub")]
    target_right: usize,
    #[getset(get = "pub")]
    used_glyphs: UsedGlyphs,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            right_count: 0,
            target_right: 1,
            used_glyphs: UsedGlyphs::default(),
        }
    }
}

impl Session {
    #[inline]
    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }

    /// `10 × level` per correct resolution.
    #[inline]
    pub(super) fn award(&mut self) {
        self.score += 10 * self.level;
        self.right_count += 1;
    }

    #[inline]
    pub fn target_reached(&self) -> bool {
        self.right_count >= self.target_right
    }

    pub(super) fn advance_level(&mut self, target: usize) {
        self.level += 1;
        self.right_count = 0;
        self.used_glyphs.clear();
        self.set_target(target);
    }

    #[inline]
    pub(super) fn set_target(&mut self, target: usize) {
        self.target_right = target.max(1);
    }

    #[inline]
    pub(super) fn record_glyph(&mut self, glyph: char) {
        self.used_glyphs.insert(glyph);
    }

    #[inline]
    pub(super) fn refill_pool(&mut self) {
        self.used_glyphs.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scoring_scales_with_level() {
        let mut s = Session::default();
        s.set_target(3);
        s.award();
        assert_eq!(s.score(), 10);
        assert_eq!(s.right_count(), 1);
        assert!(!s.target_reached());
        s.award();
        s.award();
        assert!(s.target_reached());

        s.advance_level(2);
        assert_eq!(s.level(), 2);
        assert_eq!(s.right_count(), 0);
        assert_eq!(s.score(), 30);
        s.award();
        assert_eq!(s.score(), 50);
    }

    #[test]
    fn target_never_below_one() {
        let mut s = Session::default();
        s.set_target(0);
        assert_eq!(s.target_right(), 1);
    }

    #[test]
    fn glyph_pool_cycle() {
        let mut s = Session::default();
        s.record_glyph('日');
        s.record_glyph('月');
        assert!(s.used_glyphs().contains(&'日'));
        s.refill_pool();
        assert!(s.used_glyphs().is_empty());

        s.record_glyph('日');
        s.advance_level(1);
        assert!(s.used_glyphs().is_empty());
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut s = Session::default();
        s.award();
        s.advance_level(5);
        s.record_glyph('水');
        s.reset();
        assert_eq!(s, Session::default());
    }
}
