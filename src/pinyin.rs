//! Tone-mark tables and the distractor generator for Pinyin mode.
//!
//! Given one correct tone-marked romanization, [`build_round`] produces the
//! four options shown to the player: the original plus three distractors that
//! are wrong in tone, initial, and vowel respectively. Duplicates that the
//! rules happen to reproduce are accepted as-is; there is no dedup pass.

use getset::{CopyGetters, Getters};
use iter_tools::Itertools;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

/// Tone-marked vowels as `(marked, base, tone)`, tones 1 through 4.
const TONED_VOWELS: &[(char, char, u8)] = &[
    ('ā', 'a', 1),
    ('á', 'a', 2),
    ('ǎ', 'a', 3),
    ('à', 'a', 4),
    ('ē', 'e', 1),
    ('é', 'e', 2),
    ('ě', 'e', 3),
    ('è', 'e', 4),
    ('ī', 'i', 1),
    ('í', 'i', 2),
    ('ǐ', 'i', 3),
    ('ì', 'i', 4),
    ('ō', 'o', 1),
    ('ó', 'o', 2),
    ('ǒ', 'o', 3),
    ('ò', 'o', 4),
    ('ū', 'u', 1),
    ('ú', 'u', 2),
    ('ǔ', 'u', 3),
    ('ù', 'u', 4),
    ('ǖ', 'ü', 1),
    ('ǘ', 'ü', 2),
    ('ǚ', 'ü', 3),
    ('ǜ', 'ü', 4),
];

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'ü'];

const INITIALS: &[&str] = &[
    "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "h", "j", "q", "x", "zh", "ch", "sh", "r",
    "z", "c", "s", "y", "w",
];

/// Split a tone-marked vowel into its base vowel and tone number.
#[inline]
pub fn tone_split(c: char) -> Option<(char, u8)> {
    TONED_VOWELS
        .iter()
        .find(|&&(marked, _, _)| marked == c)
        .map(|&(_, base, tone)| (base, tone))
}

/// Put a tone mark on a base vowel; tone 0 (or an unknown vowel) returns the
/// base unchanged.
#[inline]
pub fn apply_tone(base: char, tone: u8) -> char {
    TONED_VOWELS
        .iter()
        .find(|&&(_, b, t)| b == base && t == tone)
        .map_or(base, |&(marked, _, _)| marked)
}

/// One spawn's worth of answer options.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct PinyinRound {
    /// Exactly four strings: the correct romanization and three distractors,
    /// uniformly shuffled.
    #[getset(get = "pub")]
    options: Vec<String>,
    /// Post-shuffle index of the correct option.
    #[getset(get_copy = "pub")]
    correct: usize,
}

pub fn build_round(correct: &str, rng: &mut impl Rng) -> PinyinRound {
    let mut tagged = vec![
        (0usize, correct.to_string()),
        (1, wrong_tone(correct)),
        (2, wrong_initial(correct, rng)),
        (3, wrong_vowel(correct, rng)),
    ];
    tagged.shuffle(rng);
    let correct = tagged
        .iter()
        .find_position(|(tag, _)| *tag == 0)
        .map(|(i, _)| i)
        .unwrap_or(0);
    PinyinRound {
        options: tagged.into_iter().map(|(_, s)| s).collect(),
        correct,
    }
}

/// Replace the first tone mark with the cyclic next tone; a syllable without
/// any tone mark gets tone 2 on its first vowel.
pub fn wrong_tone(syllable: &str) -> String {
    let mut chars: Vec<char> = syllable.chars().collect();
    let marked = chars
        .iter()
        .enumerate()
        .find_map(|(i, &c)| tone_split(c).map(|(base, tone)| (i, base, tone)));
    if let Some((i, base, tone)) = marked {
        chars[i] = apply_tone(base, tone % 4 + 1);
    } else if let Some(i) = chars.iter().position(|c| VOWELS.contains(c)) {
        chars[i] = apply_tone(chars[i], 2);
    }
    chars.into_iter().collect()
}

/// Swap the initial consonant (two letters for zh/ch/sh) for a different one
/// from the fixed set, keeping the final and reapplying the tone mark to the
/// vowel that carried it.
pub fn wrong_initial(syllable: &str, rng: &mut impl Rng) -> String {
    let chars: Vec<char> = syllable.chars().collect();
    let marked = chars
        .iter()
        .enumerate()
        .find_map(|(i, &c)| tone_split(c).map(|(base, tone)| (i, base, tone)));
    let bare: Vec<char> = chars
        .iter()
        .map(|&c| tone_split(c).map_or(c, |(base, _)| base))
        .collect();
    let bare_str: String = bare.iter().collect();

    let init_len = if bare_str.starts_with("zh")
        || bare_str.starts_with("ch")
        || bare_str.starts_with("sh")
    {
        2
    } else {
        1
    };
    let init_len = init_len.min(bare.len());
    let current: String = bare[..init_len].iter().collect();
    let candidates: Vec<&str> = INITIALS.iter().copied().filter(|&i| i != current).collect();
    let replacement = candidates.choose(rng).copied().unwrap_or("b");

    let mut out: Vec<char> = replacement
        .chars()
        .chain(bare[init_len..].iter().copied())
        .collect();
    if let Some((i, base, tone)) = marked
        && i >= init_len
    {
        let j = i - init_len + replacement.chars().count();
        out[j] = apply_tone(base, tone);
    }
    out.into_iter().collect()
}

/// Swap the tone-bearing vowel (or the first vowel when nothing is marked)
/// for a different one, preserving the original tone mark.
pub fn wrong_vowel(syllable: &str, rng: &mut impl Rng) -> String {
    let mut chars: Vec<char> = syllable.chars().collect();
    let pos = chars
        .iter()
        .position(|&c| tone_split(c).is_some())
        .or_else(|| chars.iter().position(|c| VOWELS.contains(c)));
    if let Some(i) = pos {
        let (base, tone) = tone_split(chars[i]).unwrap_or((chars[i], 0));
        let candidates: Vec<char> = VOWELS.iter().copied().filter(|&v| v != base).collect();
        if let Some(&pick) = candidates.choose(rng) {
            chars[i] = apply_tone(pick, tone);
        }
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[inline]
    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn tone_table_round_trips() {
        for &(marked, base, tone) in TONED_VOWELS {
            assert_eq!(tone_split(marked), Some((base, tone)));
            assert_eq!(apply_tone(base, tone), marked);
        }
        assert_eq!(tone_split('a'), None);
        assert_eq!(apply_tone('a', 0), 'a');
        assert_eq!(apply_tone('x', 3), 'x');
    }

    #[test]
    fn tone_cycles_forward() {
        assert_eq!(wrong_tone("mā"), "má");
        assert_eq!(wrong_tone("má"), "mǎ");
        assert_eq!(wrong_tone("mǎ"), "mà");
        // tone 4 wraps back to 1
        assert_eq!(wrong_tone("mà"), "mā");
        assert_eq!(wrong_tone("zhōng"), "zhóng");
    }

    #[test]
    fn unmarked_syllable_gets_tone_two() {
        assert_eq!(wrong_tone("ma"), "má");
        assert_eq!(wrong_tone("ri"), "rí");
    }

    #[test]
    fn initial_swap_keeps_final_and_tone() {
        for seed in 0..32 {
            let out = wrong_initial("zhōng", &mut rng(seed));
            assert_ne!(out, "zhōng");
            assert!(!out.starts_with("zh"), "kept its initial: {out}");
            assert!(out.ends_with("ōng"), "mangled the final: {out}");
        }
        for seed in 0..32 {
            let out = wrong_initial("mā", &mut rng(seed));
            assert!(!out.starts_with('m'), "kept its initial: {out}");
            assert!(out.ends_with('ā'), "lost the tone: {out}");
        }
    }

    #[test]
    fn vowel_swap_preserves_tone() {
        for seed in 0..32 {
            let out = wrong_vowel("mā", &mut rng(seed));
            assert_ne!(out, "mā");
            let toned: Vec<_> = out.chars().filter(|&c| tone_split(c).is_some()).collect();
            assert_eq!(toned.len(), 1, "expected one tone mark in {out}");
            assert_eq!(tone_split(toned[0]).map(|(_, t)| t), Some(1));
            assert!(out.starts_with('m'));
        }
    }

    #[test]
    fn vowel_swap_without_tone_mark() {
        for seed in 0..32 {
            let out = wrong_vowel("ma", &mut rng(seed));
            assert_ne!(out, "ma");
            assert!(out.starts_with('m'));
            assert!(out.chars().all(|c| tone_split(c).is_none()));
        }
    }

    #[test]
    fn round_contains_original_at_reported_index() {
        for seed in 0..64 {
            let round = build_round("zhōng", &mut rng(seed));
            assert_eq!(round.options().len(), 4);
            assert_eq!(round.options()[round.correct()], "zhōng");
            // identity lookup: the original appears at the reported index even
            // if a distractor happens to collide with another option
            let originals = round.options().iter().filter(|o| *o == "zhōng").count();
            assert!(originals >= 1);
        }
    }

    #[test]
    fn shuffle_reaches_every_slot() {
        let mut seen = [false; 4];
        for seed in 0..64 {
            seen[build_round("mā", &mut rng(seed)).correct()] = true;
        }
        assert_eq!(seen, [true; 4]);
    }
}
