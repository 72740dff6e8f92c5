use crate::pinyin::PinyinRound;

/// Per-mode round state. The variant is the explicit state machine the mode
/// flows through between spawns; `Empty` means nothing is in play (no mode
/// selected, or a spawn was refused for lack of content).
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Round {
    Empty,
    Rotate {
        glyph: char,
    },
    Pinyin {
        glyph: char,
        pinyin: String,
        choices: PinyinRound,
        /// Freeze-until timestamp after a correct pick; respawn at expiry.
        success_until: Option<f64>,
    },
    Idiom {
        /// Ground-truth character order.
        target: Vec<char>,
        /// Provisionally matched pieces in click order. Glyphs are kept
        /// alongside ids so final validation survives a piece that settles
        /// into the grid mid-round.
        clicked: Vec<(u32, char)>,
        /// Index into `target` of the next expected character.
        match_index: usize,
        success_until: Option<f64>,
    },
}

impl Round {
    #[inline]
    pub(super) fn success_until(&self) -> Option<f64> {
        match self {
            Round::Pinyin { success_until, .. } | Round::Idiom { success_until, .. } => {
                *success_until
            }
            _ => None,
        }
    }
}
