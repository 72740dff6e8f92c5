pub mod block;
mod debounce;
pub mod grid;
pub mod levels;
mod round;
pub mod session;
pub mod settings;
pub mod signal;

use std::collections::HashMap;

use getset::{CopyGetters, Getters};
use rand::Rng;
use rand::seq::IndexedRandom;

pub use block::Block;
use debounce::Debounce;
pub use grid::Grid;
pub use levels::Levels;
use round::Round;
pub use session::Session;
pub use settings::Settings;
pub use signal::Signal;

use crate::idiom;
use crate::pinyin::{self, PinyinRound};

/// The three selectable games layered on the shared falling-block core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Rotate,
    Pinyin,
    Idiom,
}

impl Mode {
    #[inline]
    pub fn max_level(self) -> usize {
        match self {
            Mode::Rotate | Mode::Pinyin => Levels::CHARACTER_LEVELS,
            Mode::Idiom => Levels::IDIOM_LEVELS,
        }
    }
}

/// Logical inputs from the host. `Tick` carries elapsed milliseconds; the
/// movement and rotation actions are debounced on the core's own clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Tick(f64),
    Left,
    Right,
    Rotate,
    SoftDrop(bool),
    /// Pick one of the four displayed pinyin options.
    Select(usize),
    /// Pointer press at viewport coordinates, used by Idiom mode.
    Click { x: f64, y: f64 },
}

enum Outcome {
    Moved(f64),
    Settled(f64),
}

/// The round controller and session state behind all three modes. The host
/// drives it with [`Game::handle_event`] once per frame plus player actions,
/// renders from the passive getters, and drains [`Game::take_signals`] for
/// pronunciation and effect triggers.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct Game {
    #[getset(get = "pub")]
    settings: Settings,
    #[getset(get = "pub")]
    grid: Grid,
    #[getset(get = "pub")]
    session: Session,
    #[getset(get = "pub")]
    blocks: Vec<Block>,
    #[getset(get_copy = "pub")]
    mode: Option<Mode>,
    levels: Levels,
    round: Round,
    next_block_id: u32,
    now: f64,
    soft_drop: bool,
    message: Option<(String, f64)>,
    instruction: Option<String>,
    pending_mode: Option<(Mode, f64)>,
    signals: Vec<Signal>,
    left_gate: Debounce,
    right_gate: Debounce,
    rotate_gate: Debounce,
    /// Romanization remembered for each settled obstacle in Pinyin mode so
    /// the presentation layer can label the stack.
    #[getset(get = "pub")]
    settled_pinyin: HashMap<(usize, usize), String>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Game {
    pub fn new(settings: Settings) -> Self {
        let action = settings.action_interval;
        Self {
            grid: layout_grid(&settings),
            settings,
            session: Session::default(),
            blocks: Vec::new(),
            mode: None,
            levels: Levels::pending(),
            round: Round::Empty,
            next_block_id: 0,
            now: 0.0,
            soft_drop: false,
            message: None,
            instruction: None,
            pending_mode: None,
            signals: Vec::new(),
            left_gate: Debounce::new(action),
            right_gate: Debounce::new(action),
            rotate_gate: Debounce::new(action),
            settled_pinyin: HashMap::new(),
        }
    }

    /// Hand the core its level content, usually once the host's async fetch
    /// resolves.
    #[inline]
    pub fn install_levels(&mut self, levels: Levels) {
        self.levels = levels;
    }

    /// Rebuild the grid for a new viewport. The grid is replaced wholesale,
    /// never resized in place.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.settings.width = width;
        self.settings.height = height;
        self.grid = layout_grid(&self.settings);
        self.settled_pinyin.clear();
    }

    /// Select a mode, resetting the session and clearing the grid. Requests
    /// that race the level-data load are deferred once and retried after a
    /// short delay before surfacing a load failure.
    pub fn start_mode(&mut self, mode: Mode) -> bool {
        if !self.levels.ready() {
            self.set_message("Loading game data...\nPlease wait.", 2_000.0);
            self.pending_mode = Some((mode, self.now + self.settings.data_retry_delay));
            return true;
        }
        self.pending_mode = None;
        self.mode = Some(mode);
        self.session.reset();
        self.session.set_target(self.level_target(mode, 1));
        self.grid.clear();
        self.settled_pinyin.clear();
        self.soft_drop = false;
        self.instruction = Some(
            match mode {
                Mode::Rotate => "Rotate the block to its correct orientation.",
                Mode::Pinyin => "Pick the pinyin for the falling character.",
                Mode::Idiom => "Click characters in correct idiom order.",
            }
            .to_string(),
        );
        self.spawn_round();
        true
    }

    /// Handle the given event and return a boolean indicating whether state
    /// has changed.
    #[inline]
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Tick(dt) => self.tick(dt),
            Event::Left => self.shift(-1),
            Event::Right => self.shift(1),
            Event::Rotate => self.rotate_piece(),
            Event::SoftDrop(on) => {
                self.soft_drop = on;
                true
            }
            Event::Select(index) => self.select_option(index),
            Event::Click { x, y } => self.click(x, y),
        }
    }

    /// Timed user message, if one is currently showing.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|(_, until)| self.now < *until)
            .map(|(text, _)| text.as_str())
    }

    #[inline]
    pub fn instruction(&self) -> Option<&str> {
        self.instruction.as_deref()
    }

    /// The four answer options in Pinyin mode.
    pub fn pinyin_choices(&self) -> Option<&PinyinRound> {
        match &self.round {
            Round::Pinyin { choices, .. } => Some(choices),
            _ => None,
        }
    }

    /// The glyph currently being taught in Rotate/Pinyin mode.
    pub fn current_glyph(&self) -> Option<char> {
        match &self.round {
            Round::Rotate { glyph } | Round::Pinyin { glyph, .. } => Some(*glyph),
            _ => None,
        }
    }

    /// Pieces provisionally matched in the current idiom round, in click
    /// order, for highlight rendering.
    pub fn idiom_matched(&self) -> &[(u32, char)] {
        match &self.round {
            Round::Idiom { clicked, .. } => clicked,
            _ => &[],
        }
    }

    /// `(matched, total)` click progress through the current idiom.
    pub fn idiom_progress(&self) -> Option<(usize, usize)> {
        match &self.round {
            Round::Idiom {
                target, match_index, ..
            } => Some((*match_index, target.len())),
            _ => None,
        }
    }

    /// Drain pending one-shot signals for the host's collaborators.
    #[inline]
    pub fn take_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    // --- tick processing ---

    fn tick(&mut self, dt: f64) -> bool {
        self.now += dt;
        let polled = self.poll_pending_mode();
        let Some(mode) = self.mode else { return polled };

        if let Some(until) = self.round.success_until() {
            if self.now >= until {
                self.blocks.clear();
                self.spawn_round();
                return true;
            }
            // frozen for visual feedback until the delay expires
            return polled;
        }

        let moved = match mode {
            Mode::Rotate | Mode::Pinyin => self.fall_character(mode, dt),
            Mode::Idiom => self.fall_idiom(dt),
        };
        if self.grid.is_near_top() {
            self.game_over();
            return true;
        }
        moved || polled
    }

    fn poll_pending_mode(&mut self) -> bool {
        let Some((mode, retry_at)) = self.pending_mode else {
            return false;
        };
        if self.now < retry_at {
            return false;
        }
        self.pending_mode = None;
        if self.levels.ready() {
            self.start_mode(mode)
        } else {
            self.set_message("Failed to load game data.\nPlease reload.", 5_000.0);
            true
        }
    }

    fn fall_step(&self, mode: Mode, dt: f64) -> f64 {
        let base = if self.soft_drop {
            self.settings.fast_fall_speed
        } else {
            self.settings.fall_speed
        };
        let factor = match mode {
            Mode::Rotate | Mode::Pinyin => self.settings.character_fall_factor,
            Mode::Idiom => self.settings.idiom_fall_factor,
        };
        base * factor * dt / 1_000.0
    }

    /// Where a piece ends up after one gravity step: moved down by `dy`, or
    /// settled at its landing height. Settlement happens at the grid bottom,
    /// on top of an occupied cell, or (when the step is blocked any other
    /// way) snapped to the highest free position.
    fn fall_outcome(&self, block: &Block, dy: f64) -> Outcome {
        let bottom = block.position.y + block.size();
        let max_bottom = self.grid.top() + self.grid.height();
        if bottom >= max_bottom {
            return Outcome::Settled(max_bottom - block.size());
        }

        let (c0, c1) = self
            .grid
            .col_span(block.position.x, block.position.x + block.size());
        let current_row = self.grid.row_of(bottom);
        if current_row >= 0 && (current_row as usize) + 1 < self.grid.rows() {
            let below = current_row as usize + 1;
            if self.grid.row_occupied(below, c0, c1) {
                return Outcome::Settled(
                    self.grid.top() + below as f64 * self.grid.cell() - block.size(),
                );
            }
        }

        let stepped = block.rect().shifted(0.0, dy);
        if self.grid.can_place(stepped) {
            Outcome::Moved(stepped.top)
        } else {
            let row = self.grid.clamp_row(self.grid.row_of(block.position.y));
            Outcome::Settled(self.grid.top() + row as f64 * self.grid.cell())
        }
    }

    fn fall_character(&mut self, mode: Mode, dt: f64) -> bool {
        if self.blocks.is_empty() {
            return false;
        }
        let dy = self.fall_step(mode, dt);
        match self.fall_outcome(&self.blocks[0], dy) {
            Outcome::Moved(y) => {
                self.blocks[0].position.y = y;
                true
            }
            Outcome::Settled(y) => {
                self.blocks[0].position.y = y;
                self.blocks[0].set_settled(true);
                self.resolve_settled_character(mode);
                true
            }
        }
    }

    fn resolve_settled_character(&mut self, mode: Mode) {
        let block = self.blocks[0].clone();
        self.signals.push(Signal::Speak(block.glyph().to_string()));
        match mode {
            Mode::Rotate if block.is_upright() => {
                let (cx, cy) = block.center();
                if !self.award_points(cx, cy, Some(block.glyph())) {
                    self.spawn_round();
                }
            }
            Mode::Rotate => {
                // the mistake becomes a permanent obstacle
                self.grid.settle(&block);
                self.spawn_round();
            }
            Mode::Pinyin => {
                let cell = self.grid.settle(&block);
                if let Round::Pinyin { pinyin, .. } = &self.round {
                    self.settled_pinyin.insert(cell, pinyin.clone());
                }
                self.spawn_round();
            }
            Mode::Idiom => unreachable!("idiom pieces resolve in fall_idiom"),
        }
    }

    fn fall_idiom(&mut self, dt: f64) -> bool {
        let dy = self.fall_step(Mode::Idiom, dt);
        let mut changed = false;
        let mut settled_ids = Vec::new();
        for i in 0..self.blocks.len() {
            if self.blocks[i].settled() {
                continue;
            }
            match self.fall_outcome(&self.blocks[i], dy) {
                Outcome::Moved(y) => {
                    self.blocks[i].position.y = y;
                    changed = true;
                }
                Outcome::Settled(y) => {
                    self.blocks[i].position.y = y;
                    self.blocks[i].set_settled(true);
                    let block = self.blocks[i].clone();
                    self.grid.settle(&block);
                    if !self.settings.idiom_hint {
                        self.signals.push(Signal::Speak(block.glyph().to_string()));
                    }
                    settled_ids.push(block.id());
                    changed = true;
                }
            }
        }
        if !settled_ids.is_empty() {
            self.blocks.retain(|b| !settled_ids.contains(&b.id()));
            if self.blocks.is_empty() {
                self.spawn_round();
            }
        }
        changed
    }

    fn game_over(&mut self) {
        self.set_message("Game Over", 6_500.0);
        self.signals.push(Signal::GameOver);
        self.mode = None;
        self.round = Round::Empty;
        self.blocks.clear();
        self.grid.clear();
        self.settled_pinyin.clear();
        self.instruction = None;
        self.soft_drop = false;
    }

    // --- player actions ---

    fn shift(&mut self, dx: i8) -> bool {
        let accepted = if dx < 0 {
            self.left_gate.try_accept(self.now)
        } else {
            self.right_gate.try_accept(self.now)
        };
        if !accepted || !matches!(self.mode, Some(Mode::Rotate | Mode::Pinyin)) {
            return false;
        }
        if self.round.success_until().is_some() {
            return false;
        }
        let Some(block) = self.blocks.first() else {
            return false;
        };
        if block.settled() {
            return false;
        }
        let target = block.rect().shifted(f64::from(dx) * self.grid.cell(), 0.0);
        if self.grid.can_place(target) {
            self.blocks[0].position.x = target.left;
            true
        } else {
            false
        }
    }

    fn rotate_piece(&mut self) -> bool {
        if !self.rotate_gate.try_accept(self.now) || self.mode != Some(Mode::Rotate) {
            return false;
        }
        let Some(block) = self.blocks.first_mut() else {
            return false;
        };
        if block.settled() {
            return false;
        }
        block.rotate();
        true
    }

    fn select_option(&mut self, index: usize) -> bool {
        if self.mode != Some(Mode::Pinyin) {
            return false;
        }
        let correct = match &self.round {
            Round::Pinyin {
                choices,
                success_until: None,
                ..
            } => choices.correct(),
            _ => return false,
        };
        let Some(block) = self.blocks.first().filter(|b| !b.settled()) else {
            return false;
        };
        if index != correct {
            // wrong picks have no effect; play continues uninterrupted
            return false;
        }
        let glyph = block.glyph();
        let (cx, cy) = block.center();
        let advanced = self.award_points(cx, cy, Some(glyph));
        if !advanced && let Round::Pinyin { success_until, .. } = &mut self.round {
            *success_until = Some(self.now + self.settings.success_delay);
        }
        true
    }

    fn click(&mut self, x: f64, y: f64) -> bool {
        if self.mode != Some(Mode::Idiom) {
            return false;
        }
        let (expected, already) = match &self.round {
            Round::Idiom {
                target,
                clicked,
                match_index,
                success_until: None,
            } if *match_index < target.len() => (
                target[*match_index],
                clicked.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            ),
            _ => return false,
        };

        let hit = self
            .blocks
            .iter()
            .find(|b| !b.settled() && !already.contains(&b.id()) && b.contains(x, y));
        let Some(hit) = hit else { return false };
        let (hit_id, hit_glyph) = (hit.id(), hit.glyph());

        if hit_glyph != expected {
            self.release_clicked();
            return true;
        }

        let finished = match &mut self.round {
            Round::Idiom {
                target,
                clicked,
                match_index,
                ..
            } => {
                clicked.push((hit_id, hit_glyph));
                *match_index += 1;
                (*match_index >= target.len()).then(|| {
                    // re-validate the whole sequence against duplicate or
                    // racing clicks before accepting
                    clicked.len() == target.len()
                        && clicked.iter().zip(target.iter()).all(|((_, g), t)| g == t)
                })
            }
            _ => return false,
        };
        match finished {
            Some(true) => self.complete_idiom(),
            Some(false) => self.release_clicked(),
            None => {}
        }
        true
    }

    /// Send provisionally matched pieces back into the fall and reset match
    /// progress. The pieces stay in play; the player gets another attempt.
    fn release_clicked(&mut self) {
        let ids: Vec<u32> = match &mut self.round {
            Round::Idiom {
                clicked,
                match_index,
                ..
            } => {
                *match_index = 0;
                clicked.drain(..).map(|(id, _)| id).collect()
            }
            _ => return,
        };
        let nudge = self.settings.release_nudge;
        for id in ids {
            if let Some(block) = self.blocks.iter_mut().find(|b| b.id() == id) {
                block.set_settled(false);
                block.position.y += nudge;
            }
        }
    }

    fn complete_idiom(&mut self) {
        let (ids, idiom): (Vec<u32>, String) = match &self.round {
            Round::Idiom {
                clicked, target, ..
            } => (
                clicked.iter().map(|(id, _)| *id).collect(),
                target.iter().collect(),
            ),
            _ => return,
        };

        // levitate the matched pieces into a centered display row
        let size = self.grid.cell();
        let group_x = self.grid.left() + (self.grid.width() / 2.0).floor()
            - (ids.len() as f64 * size / 2.0).floor();
        let group_y = self.grid.top() + size;
        for (i, id) in ids.iter().enumerate() {
            if let Some(block) = self.blocks.iter_mut().find(|b| b.id() == *id) {
                block.set_settled(true);
                block.position.x = group_x + i as f64 * size;
                block.position.y = group_y;
            }
        }

        let (cx, cy) = self.idiom_group_center(&ids).unwrap_or((
            self.grid.left() + self.grid.width() / 2.0,
            self.grid.top() + size,
        ));
        self.signals.push(Signal::Speak(idiom));
        let advanced = self.award_points(cx, cy, None);
        if !advanced && let Round::Idiom { success_until, .. } = &mut self.round {
            *success_until = Some(self.now + self.settings.success_delay);
        }
    }

    fn idiom_group_center(&self, ids: &[u32]) -> Option<(f64, f64)> {
        let first_id = *ids.first()?;
        let last_id = *ids.last()?;
        let first = self.blocks.iter().find(|b| b.id() == first_id)?;
        let last = self.blocks.iter().find(|b| b.id() == last_id)?;
        Some((
            ((first.position.x + last.position.x + last.size()) / 2.0).floor(),
            first.position.y + (first.size() / 2.0).floor(),
        ))
    }

    // --- scoring and progression ---

    /// Score a correct resolution and, when the per-level target is reached,
    /// advance the level (or report completion at the mode maximum). Returns
    /// whether the level advanced, in which case a fresh round has already
    /// spawned.
    fn award_points(&mut self, cx: f64, cy: f64, glyph: Option<char>) -> bool {
        if let Some(glyph) = glyph {
            self.session.record_glyph(glyph);
        }
        self.session.award();
        self.signals.push(Signal::Burst { x: cx, y: cy });
        if !self.session.target_reached() {
            return false;
        }
        let Some(mode) = self.mode else { return false };
        if self.session.level() < mode.max_level() {
            let next = self.session.level() + 1;
            let target = self.level_target(mode, next);
            self.session.advance_level(target);
            self.grid.clear();
            self.settled_pinyin.clear();
            self.set_message("Next Level", 1_000.0);
            self.signals.push(Signal::LevelUp(next));
            self.spawn_round();
            true
        } else {
            self.set_message("All levels complete!", 1_500.0);
            self.signals.push(Signal::LevelsComplete);
            false
        }
    }

    /// Per-level correct-answer target: a tenth of the dataset, at least one.
    fn level_target(&self, mode: Mode, level: usize) -> usize {
        let len = match mode {
            Mode::Rotate | Mode::Pinyin => {
                self.levels.character_level(level).map_or(0, HashMap::len)
            }
            Mode::Idiom => self.levels.idiom_level(level).map_or(0, <[String]>::len),
        };
        len / 10
    }

    // --- spawning ---

    fn spawn_round(&mut self) {
        self.blocks.clear();
        self.round = Round::Empty;
        let Some(mode) = self.mode else { return };
        if self.grid.cols() == 0 {
            return;
        }
        let mut rng = rand::rng();
        match mode {
            Mode::Rotate | Mode::Pinyin => self.spawn_character(mode, &mut rng),
            Mode::Idiom => self.spawn_idiom(&mut rng),
        }
    }

    fn spawn_character(&mut self, mode: Mode, rng: &mut impl Rng) {
        let level = self.session.level();
        let entries: Vec<(char, String)> = self
            .levels
            .character_level(level)
            .map(|m| m.iter().map(|(ch, py)| (*ch, py.clone())).collect())
            .unwrap_or_default();
        if entries.is_empty() {
            log::warn!("character level {level} has no content");
            self.set_message(
                "No characters available for this level.\nPlease add level data files.",
                3_000.0,
            );
            return;
        }

        let mut available: Vec<&(char, String)> = entries
            .iter()
            .filter(|(ch, _)| !self.session.used_glyphs().contains(ch))
            .collect();
        if available.is_empty() {
            self.session.refill_pool();
            available = entries.iter().collect();
        }
        let Some((glyph, pinyin)) = available.choose(rng).map(|e| (*e).clone()) else {
            return;
        };

        let angle = if mode == Mode::Rotate {
            *[90u16, 180, 270].choose(rng).unwrap_or(&90)
        } else {
            0
        };
        let size = self.grid.cell();
        let col = rng.random_range(0..self.grid.cols());
        let x = (self.grid.left() + col as f64 * size)
            .min(self.grid.left() + self.grid.width() - size);
        let id = self.next_id();
        self.blocks
            .push(Block::new(id, glyph, x, self.grid.top(), size, angle));
        log::debug!("spawned {glyph} ({pinyin}) at column {col}, angle {angle}");
        self.round = match mode {
            Mode::Rotate => Round::Rotate { glyph },
            _ => Round::Pinyin {
                glyph,
                choices: pinyin::build_round(&pinyin, rng),
                pinyin,
                success_until: None,
            },
        };
    }

    fn spawn_idiom(&mut self, rng: &mut impl Rng) {
        let level = self.session.level();
        let idioms: Vec<String> = self
            .levels
            .idiom_level(level)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        let Some(target) = idioms.choose(rng) else {
            log::warn!("idiom level {level} has no content");
            self.set_message(
                "No idioms available for this level.\nPlease add idiom level data files.",
                3_000.0,
            );
            return;
        };

        let chars: Vec<char> = target.chars().collect();
        let display = idiom::shuffle_distinct(&chars, rng);
        let cols = idiom::landing_columns(self.grid.cols(), display.len().min(4), rng);
        let size = self.grid.cell();
        for (i, col) in cols.iter().enumerate() {
            let id = self.next_id();
            let x = self.grid.left() + *col as f64 * size;
            self.blocks
                .push(Block::new(id, display[i], x, self.grid.top(), size, 0));
        }
        log::debug!("spawned idiom {target}");
        self.round = Round::Idiom {
            target: chars,
            clicked: Vec::new(),
            match_index: 0,
            success_until: None,
        };
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_block_id;
        self.next_block_id += 1;
        id
    }

    fn set_message(&mut self, text: &str, duration: f64) {
        self.message = Some((text.to_string(), self.now + duration));
    }
}

/// Viewport layout: a sidebar takes a fifth of the width, the playfield the
/// rest; cells are a tenth of the height.
fn layout_grid(settings: &Settings) -> Grid {
    let sidebar = (settings.width / 5.0).floor();
    let cell = (settings.height / 10.0).floor();
    Grid::new(sidebar, 0.0, settings.width - sidebar, settings.height, cell)
}
