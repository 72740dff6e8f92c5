/// One-shot notifications for the host's presentation and pronunciation
/// collaborators, drained with [`super::Game::take_signals`]. The core never
/// blocks on any of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Vocalize a glyph or a whole idiom.
    Speak(String),
    /// Firework burst centered on a resolved piece or idiom group.
    Burst { x: f64, y: f64 },
    /// The session advanced to this level.
    LevelUp(usize),
    /// The final level's target was reached.
    LevelsComplete,
    /// The stack reached the top; the mode has been cleared.
    GameOver,
}
