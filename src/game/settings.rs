use getset::WithSetters;

/// Tunables for the simulation core. Speeds are pixels per second; intervals
/// and delays are milliseconds on the core's own clock.
#[derive(Debug, Clone, Copy, WithSetters, PartialEq)]
pub struct Settings {
    #[getset(set_with = "pub")]
    pub width: f64,
    #[getset(set_with = "pub")]
    pub height: f64,
    #[getset(set_with = "pub")]
    pub fall_speed: f64,
    #[getset(set_with = "pub")]
    pub fast_fall_speed: f64,
    /// Fall-speed factor applied in Rotate and Pinyin modes.
    #[getset(set_with = "pub")]
    pub character_fall_factor: f64,
    /// Fall-speed factor applied in Idiom mode.
    #[getset(set_with = "pub")]
    pub idiom_fall_factor: f64,
    /// Minimum interval between accepted left/right/rotate actions.
    #[getset(set_with = "pub")]
    pub action_interval: f64,
    /// Visual-feedback pause after a correct pinyin pick or idiom completion.
    #[getset(set_with = "pub")]
    pub success_delay: f64,
    /// Pause before the single deferred retry of a mode start that raced the
    /// level-data load.
    #[getset(set_with = "pub")]
    pub data_retry_delay: f64,
    /// Downward shove applied to provisionally matched idiom pieces when a
    /// mismatch releases them back into the fall.
    #[getset(set_with = "pub")]
    pub release_nudge: f64,
    /// When on, settling idiom pieces are not pronounced.
    #[getset(set_with = "pub")]
    pub idiom_hint: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            fall_speed: 120.0,
            fast_fall_speed: 480.0,
            character_fall_factor: 0.7,
            idiom_fall_factor: 0.5,
            action_interval: 100.0,
            success_delay: 1_000.0,
            data_retry_delay: 500.0,
            release_nudge: 4.0,
            idiom_hint: true,
        }
    }
}
