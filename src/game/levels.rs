use std::collections::HashMap;

/// Level content supplied by the host, usually the result of an asynchronous
/// fetch. The core never loads anything itself; it polls `ready` and treats
/// absent or empty levels as "no content available".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Levels {
    characters: Vec<HashMap<char, String>>,
    idioms: Vec<Vec<String>>,
    ready: bool,
}

impl Levels {
    pub const CHARACTER_LEVELS: usize = 14;
    pub const IDIOM_LEVELS: usize = 6;

    /// Fully loaded content.
    #[inline]
    pub fn new(characters: Vec<HashMap<char, String>>, idioms: Vec<Vec<String>>) -> Self {
        Self {
            characters,
            idioms,
            ready: true,
        }
    }

    /// Placeholder while the host's fetch is still in flight.
    #[inline]
    pub fn pending() -> Self {
        Self::default()
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.ready
    }

    /// Glyph → romanization mapping for a 1-based character level.
    #[inline]
    pub fn character_level(&self, level: usize) -> Option<&HashMap<char, String>> {
        level.checked_sub(1).and_then(|i| self.characters.get(i))
    }

    /// Idiom list for a 1-based idiom level.
    #[inline]
    pub fn idiom_level(&self, level: usize) -> Option<&[String]> {
        level
            .checked_sub(1)
            .and_then(|i| self.idioms.get(i))
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pending_is_not_ready() {
        let levels = Levels::pending();
        assert!(!levels.ready());
        assert_eq!(levels.character_level(1), None);
        assert_eq!(levels.idiom_level(1), None);
    }

    #[test]
    fn one_based_lookup() {
        let map = HashMap::from([('日', "rì".to_string())]);
        let levels = Levels::new(vec![map.clone()], vec![vec!["一心一意".to_string()]]);
        assert!(levels.ready());
        assert_eq!(levels.character_level(0), None);
        assert_eq!(levels.character_level(1), Some(&map));
        assert_eq!(levels.character_level(2), None);
        assert_eq!(levels.idiom_level(1).map(<[String]>::len), Some(1));
        assert_eq!(levels.idiom_level(2), None);
    }
}
