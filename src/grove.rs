//! Animated forest: one growth tick per frame, click to plant.

use crate::canvas::{Canvas, Viewport};
use crate::config::{GroveConfig, PrintConfig};
use crate::error::Result;
use crate::forest::Forest;
use crate::help::render_help_overlay;
use crate::random::{seed_or_now, RandomSource};
use crate::shapes::Point;
use crate::terminal::Terminal;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

const HELP: &str = "\
CANOPY
─────────────────
Click  Plant a tree
p      Plant at random
c      Clear forest
Space  Pause
1-9,0  Speed
q/Esc  Quit
?      Close help";

const INITIAL_TRUNK: f32 = 120.0;
const INITIAL_DEPTH: u32 = 4;
/// Upper bound on frames print mode spends growing to completion.
const MAX_PRINT_TICKS: u32 = 20_000;
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// What an input event asks the loop to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    None,
    Quit,
    PlantAt(u16),
    PlantRandom,
    Clear,
}

/// Runtime state for interactive controls
pub struct GroveState {
    pub speed: f32,
    pub paused: bool,
    pub show_help: bool,
}

impl GroveState {
    pub fn new(initial_speed: f32) -> Self {
        Self {
            speed: initial_speed,
            paused: false,
            show_help: false,
        }
    }

    pub fn handle_event(&mut self, event: &Event) -> Action {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                ..
            }) => Action::PlantAt(*column),
            _ => Action::None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Action {
        match normalize_key(key.code, key.modifiers) {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('p') => return Action::PlantRandom,
            KeyCode::Char('c') => return Action::Clear,
            // Number keys: change speed (1=fastest, 9=slowest, 0=very slow)
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.speed = match c {
                    '0' => 0.2,
                    '1' => 0.005,
                    '2' => 0.01,
                    '3' => 0.02,
                    '4' => 0.03,
                    '5' => 0.05,
                    '6' => 0.07,
                    '7' => 0.1,
                    '8' => 0.15,
                    _ => 0.2,
                };
            }
            _ => {}
        }
        Action::None
    }
}

fn normalize_key(code: KeyCode, mods: KeyModifiers) -> KeyCode {
    if code == KeyCode::Char('/') && mods.contains(KeyModifiers::SHIFT) {
        KeyCode::Char('?')
    } else {
        code
    }
}

/// Plant the starting tree in the middle of the view.
fn plant_initial<R: RandomSource + ?Sized>(
    forest: &mut Forest,
    view: &Viewport,
    columns: u16,
    rng: &mut R,
) -> Result<()> {
    let origin = Point::new(view.world_width(columns) / 2.0, view.ground());
    forest.plant_sized(origin, INITIAL_TRUNK, INITIAL_DEPTH, rng)?;
    Ok(())
}

/// Paint the forest into the terminal back buffer.
fn compose(forest: &Forest, view: &Viewport, canvas: &mut Canvas, term: &mut Terminal) {
    canvas.paint(view, &forest.sprites());
    canvas.blit(term);
}

/// Run the interactive forest
pub fn run(config: &GroveConfig) -> Result<()> {
    let seed = seed_or_now(config.seed);
    let mut rng = StdRng::seed_from_u64(seed);
    info!(seed, ?config, "starting grove");

    let mut term = Terminal::new()?;
    term.clear_screen()?;

    let (mut width, mut height) = term.size();
    let mut view = Viewport::for_terminal(height, config.world_height);
    let mut canvas = Canvas::for_terminal(width, height);
    let mut state = GroveState::new(config.time_step);
    let mut forest = Forest::new(config.max_trees, config.params);
    plant_initial(&mut forest, &view, width, &mut rng)?;

    loop {
        let (new_w, new_h) = crossterm::terminal::size().unwrap_or((width, height));
        if new_w != width || new_h != height {
            width = new_w;
            height = new_h;
            term.resize(width, height);
            term.clear_screen()?;
            view = Viewport::for_terminal(height, config.world_height);
            canvas = Canvas::for_terminal(width, height);
            debug!(width, height, "terminal resized");
        }

        while let Some(event) = term.poll_event()? {
            match state.handle_event(&event) {
                Action::Quit => return Ok(()),
                Action::PlantAt(column) => {
                    forest.plant_at(view.column_to_world(column), view.ground(), &mut rng)?;
                }
                Action::PlantRandom => {
                    let x = rng.range(0.0, view.world_width(width));
                    forest.plant_at(x, view.ground(), &mut rng)?;
                }
                Action::Clear => {
                    debug!(trees = forest.len(), "clearing forest");
                    forest.clear();
                }
                Action::None => {}
            }
        }

        if !state.paused {
            forest.tick(&mut rng);
        }

        compose(&forest, &view, &mut canvas, &mut term);
        if state.show_help {
            render_help_overlay(&mut term, HELP);
        }
        term.present()?;
        term.sleep(state.speed);
    }
}

/// Grow until every tree is finished, or for exactly `ticks` frames.
/// Returns the number of frames run.
fn grow_forest<R: RandomSource + ?Sized>(
    forest: &mut Forest,
    rng: &mut R,
    ticks: Option<u32>,
) -> u32 {
    let limit = ticks.unwrap_or(MAX_PRINT_TICKS);
    let mut ran = 0;
    while ran < limit {
        if ticks.is_none() && forest.is_fully_grown() {
            break;
        }
        forest.tick(rng);
        ran += 1;
    }
    ran
}

/// Grow a forest off-screen and print the final frame
pub fn print(config: &PrintConfig) -> Result<()> {
    let seed = seed_or_now(config.grove.seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let detected = crossterm::terminal::size().unwrap_or(FALLBACK_SIZE);
    let width = config.width.unwrap_or(detected.0).max(1);
    let height = config.height.unwrap_or(detected.1).max(1);

    let mut term = Terminal::headless(width, height);
    let view = Viewport::for_terminal(height, config.grove.world_height);
    let mut canvas = Canvas::for_terminal(width, height);
    let mut forest = Forest::new(config.grove.max_trees, config.grove.params);

    plant_initial(&mut forest, &view, width, &mut rng)?;
    for _ in 0..config.extra_trees {
        let x = rng.range(0.0, view.world_width(width));
        forest.plant_at(x, view.ground(), &mut rng)?;
    }

    let ran = grow_forest(&mut forest, &mut rng, config.ticks);
    let branches: usize = forest.iter().map(|t| t.branches().len()).sum();
    let fruits: usize = forest.iter().map(|t| t.fruits().len()).sum();
    info!(
        seed,
        ticks = ran,
        trees = forest.len(),
        branches,
        fruits,
        "printing forest"
    );

    compose(&forest, &view, &mut canvas, &mut term);
    term.print_to_stdout()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{compose, grow_forest, plant_initial, Action, GroveState};
    use crate::canvas::{Canvas, Viewport};
    use crate::forest::Forest;
    use crate::random::Scripted;
    use crate::terminal::Terminal;
    use crate::tree::TreeParams;
    use crossterm::event::{
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    };
    use crossterm::style::Color;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(column: u16, button: MouseButton) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row: 3,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn keys_map_to_actions() {
        let mut state = GroveState::new(0.03);
        assert_eq!(state.handle_event(&key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(state.handle_event(&key(KeyCode::Esc)), Action::Quit);
        assert_eq!(state.handle_event(&key(KeyCode::Char('p'))), Action::PlantRandom);
        assert_eq!(state.handle_event(&key(KeyCode::Char('c'))), Action::Clear);

        assert_eq!(state.handle_event(&key(KeyCode::Char(' '))), Action::None);
        assert!(state.paused);
        state.handle_event(&key(KeyCode::Char(' ')));
        assert!(!state.paused);
    }

    #[test]
    fn shifted_slash_toggles_help() {
        let mut state = GroveState::new(0.03);
        let event = Event::Key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::SHIFT));
        state.handle_event(&event);
        assert!(state.show_help);
        state.handle_event(&key(KeyCode::Char('?')));
        assert!(!state.show_help);
    }

    #[test]
    fn speed_presets() {
        let mut state = GroveState::new(0.03);
        state.handle_event(&key(KeyCode::Char('1')));
        assert!((state.speed - 0.005).abs() < f32::EPSILON);
        state.handle_event(&key(KeyCode::Char('0')));
        assert!((state.speed - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn left_click_plants_at_column() {
        let mut state = GroveState::new(0.03);
        assert_eq!(state.handle_event(&click(17, MouseButton::Left)), Action::PlantAt(17));
        assert_eq!(state.handle_event(&click(17, MouseButton::Right)), Action::None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut state = GroveState::new(0.03);
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(state.handle_event(&Event::Key(release)), Action::None);
    }

    #[test]
    fn grow_forest_respects_tick_budget() {
        let mut rng = Scripted::constant(0.5);
        let view = Viewport::for_terminal(20, 480.0);
        let mut forest = Forest::new(10, TreeParams::default());
        plant_initial(&mut forest, &view, 40, &mut rng).expect("valid tree");

        assert_eq!(grow_forest(&mut forest, &mut rng, Some(5)), 5);
        assert!(forest.iter().all(|t| t.trunk_length() == 2.5));

        let ran = grow_forest(&mut forest, &mut rng, None);
        assert!(ran > 0);
        assert!(forest.is_fully_grown());
        assert_eq!(grow_forest(&mut forest, &mut rng, None), 0);
    }

    #[test]
    fn compose_draws_trunk_over_ground() {
        let mut rng = Scripted::constant(0.5);
        let mut forest = Forest::new(10, TreeParams::default());
        let view = Viewport::for_terminal(20, 480.0);
        plant_initial(&mut forest, &view, 40, &mut rng).expect("valid tree");
        grow_forest(&mut forest, &mut rng, Some(240));

        let mut canvas = Canvas::for_terminal(40, 20);
        let mut term = Terminal::headless(40, 20);
        compose(&forest, &view, &mut canvas, &mut term);

        let trunk = forest.sprites()[0].trunk.color.to_rgb();
        let cell = term.cell(19, 16).expect("in bounds");
        assert_eq!(cell.ch, '▀');
        assert_eq!(cell.fg, Some(Color::from(trunk)));
        assert_eq!(cell.bg, Some(Color::from(trunk)));

        // Far corner is sky.
        let sky = term.cell(0, 0).expect("in bounds");
        assert_ne!(sky.fg, Some(Color::from(trunk)));
    }
}
