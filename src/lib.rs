//! Simulation core for a falling-block game that teaches Chinese characters.
//!
//! Three modes share one engine: rotate a tilted character upright, pick the
//! pinyin for a falling character, or click scattered pieces in idiom order.
//! The crate is the round controller and session state only; a host owns the
//! frame loop, rendering, input decoding, audio, and level-data loading, and
//! drives [`game::Game`] through [`game::Event`] values.

pub mod game;
pub mod idiom;
pub mod pinyin;

pub use game::{Event, Game, Levels, Mode, Settings, Signal};
