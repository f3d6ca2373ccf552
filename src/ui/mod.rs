pub mod layout;

use crate::game::{CardView, Game, Rgb};
use anyhow::Context;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use layout::{BUTTON_LABEL, CELL_GAP, Direction, FACE_WIDTH, Focus, GRID_COLS};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

const TICK_MS: u64 = 33;
const FOCUS_COLOR: Rgb = Rgb { r: 255, g: 255, b: 255 };
const BORDER_COLOR: Rgb = Rgb { r: 110, g: 110, b: 110 };

struct TerminalGuard
{
    stdout: Stdout,
}

impl TerminalGuard
{
    fn enter() -> io::Result<Self>
    {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(Self { stdout })
    }

    fn stdout(&mut self) -> &mut Stdout
    {
        &mut self.stdout
    }
}

impl Drop for TerminalGuard
{
    fn drop(&mut self)
    {
        let _ = execute!(self.stdout, Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Action
{
    Quit,
    NewGame,
    ActivateFocused,
    Activate(Focus),
    Move(Direction),
}

pub fn run(mut game: Game) -> anyhow::Result<()>
{
    let mut term = TerminalGuard::enter().context("Failed to prepare terminal")?;
    let mut focus = Focus::Card(0);
    let mut last_draw: Option<Instant> = None;

    loop {
        let now = Instant::now();
        let actions = read_actions()?;
        if step(&mut game, &mut focus, actions, now) {
            break;
        }

        if last_draw.is_none_or(|at| at.elapsed() >= Duration::from_millis(TICK_MS)) {
            draw_ui(term.stdout(), &game, focus)?;
            last_draw = Some(Instant::now());
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    log::info!("quit after {} turns", game.turns());
    Ok(())
}

fn read_actions() -> anyhow::Result<Vec<Action>>
{
    let mut actions = Vec::new();
    while event::poll(Duration::from_millis(0)).context("Failed to poll input")? {
        let event = event::read().context("Failed to read input")?;
        actions.extend(action_for(&event));
    }
    Ok(actions)
}

/// Fires an elapsed mismatch reset before applying input, so a click landing
/// on the deadline is not swallowed by the lock. Returns true on quit.
fn step(game: &mut Game, focus: &mut Focus, actions: Vec<Action>, now: Instant) -> bool
{
    if game.tick(now) {
        log::debug!("mismatched pair turned back over");
    }
    actions
        .into_iter()
        .any(|action| apply(game, focus, action, now))
}

fn action_for(event: &Event) -> Option<Action>
{
    match *event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::NewGame),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ActivateFocused),
            KeyCode::Up => Some(Action::Move(Direction::Up)),
            KeyCode::Down => Some(Action::Move(Direction::Down)),
            KeyCode::Left => Some(Action::Move(Direction::Left)),
            KeyCode::Right => Some(Action::Move(Direction::Right)),
            _ => None,
        },
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => layout::hit_test(column, row).map(Action::Activate),
        _ => None,
    }
}

/// Returns true when the action ends the session.
fn apply(game: &mut Game, focus: &mut Focus, action: Action, now: Instant) -> bool
{
    match action {
        Action::Quit => return true,
        Action::NewGame => game.new_game(),
        Action::Move(direction) => *focus = layout::move_focus(*focus, direction),
        Action::ActivateFocused => activate(game, *focus, now),
        Action::Activate(target) => {
            *focus = target;
            activate(game, target, now);
        }
    }
    false
}

fn activate(game: &mut Game, target: Focus, now: Instant)
{
    match target {
        Focus::NewGame => game.new_game(),
        Focus::Card(index) => {
            game.click(index, now);
        }
    }
}

fn draw_ui(stdout: &mut Stdout, game: &Game, focus: Focus) -> anyhow::Result<()>
{
    let output = format!("{}\r\n", render_lines(game, focus).join("\r\n"));
    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All)).context("Failed to clear screen")?;
    stdout.write_all(output.as_bytes()).context("Failed to draw")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn render_lines(game: &Game, focus: Focus) -> Vec<String>
{
    let footer = layout::footer_row() as usize;
    let mut lines = vec![String::new(); footer + 3];
    lines[layout::HEADING_ROW as usize] = "Magic Match".to_string();
    lines[layout::BUTTON_ROW as usize] = if focus == Focus::NewGame {
        format!("\x1b[7m{}\x1b[0m", BUTTON_LABEL)
    } else {
        BUTTON_LABEL.to_string()
    };

    for index in 0..game.cards().len() {
        let Some(view) = game.card_view(index) else {
            continue;
        };
        let top = layout::cell_rect(index).y as usize;
        let border = if focus == Focus::Card(index) {
            FOCUS_COLOR
        } else {
            BORDER_COLOR
        };
        let segments = [
            paint(&format!("┌{}┐", "─".repeat(FACE_WIDTH)), border),
            render_face(&view, border),
            paint(&format!("└{}┘", "─".repeat(FACE_WIDTH)), border),
        ];
        for (offset, segment) in segments.iter().enumerate() {
            let line = &mut lines[top + offset];
            if index % GRID_COLS > 0 {
                line.push_str(&" ".repeat(CELL_GAP as usize));
            }
            line.push_str(segment);
        }
    }

    lines[footer] = format!("Turn: {}", game.turns());
    lines[footer + 1] = status_line(game).to_string();
    lines[footer + 2] = "Arrows move, Enter/Space or click flips, N new game, Esc quits.".to_string();
    lines
}

fn render_face(view: &CardView, border: Rgb) -> String
{
    let face = view.face();
    let text = format!("{:^width$}", face.text, width = FACE_WIDTH);
    let body = if face.face_up {
        format!("\x1b[1m{}", paint(&text, face.color))
    } else {
        paint(&text, face.color)
    };
    format!("{}{}{}", paint("│", border), body, paint("│", border))
}

fn status_line(game: &Game) -> &'static str
{
    if game.is_complete() {
        "All pairs found!"
    } else if game.locked() {
        "No match."
    } else if game.choices().0.is_some() {
        "Pick a second card."
    } else {
        "Pick a card."
    }
}

fn paint(text: &str, color: Rgb) -> String
{
    format!("\x1b[38;2;{};{};{}m{}\x1b[0m", color.r, color.g, color.b, text)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::game::DECK_SIZE;
    use layout::GRID_ROWS;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> Event
    {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn strip_ansi(line: &str) -> String
    {
        let mut out = String::new();
        let mut chars = line.chars();
        while let Some(ch) = chars.next() {
            if ch == '\x1b' {
                for esc in chars.by_ref() {
                    if esc == 'm' {
                        break;
                    }
                }
            } else {
                out.push(ch);
            }
        }
        out
    }

    #[test]
    fn test_initial_screen()
    {
        let game = Game::new(Some(1), crate::game::DEFAULT_REVEAL_DELAY);
        let lines: Vec<String> = render_lines(&game, Focus::Card(0)).iter().map(|line| strip_ansi(line)).collect();
        assert_eq!(lines[layout::HEADING_ROW as usize], "Magic Match");
        assert_eq!(lines[layout::BUTTON_ROW as usize], BUTTON_LABEL);
        assert_eq!(lines[layout::footer_row() as usize], "Turn: 0");
        assert_eq!(lines.iter().filter(|line| line.contains(crate::game::card_view::BACK_PATTERN)).count(), GRID_ROWS);
    }

    #[test]
    fn test_rendered_cells_line_up_with_layout()
    {
        let game = Game::new(Some(1), crate::game::DEFAULT_REVEAL_DELAY);
        let lines: Vec<String> = render_lines(&game, Focus::NewGame).iter().map(|line| strip_ansi(line)).collect();
        for index in 0..DECK_SIZE {
            let rect = layout::cell_rect(index);
            let row: Vec<char> = lines[rect.y as usize].chars().collect();
            assert_eq!(row[rect.x as usize], '┌');
            assert_eq!(row[(rect.x + rect.width - 1) as usize], '┐');
        }
    }

    #[test]
    fn test_flipped_card_shows_label()
    {
        let mut game = Game::new(Some(1), crate::game::DEFAULT_REVEAL_DELAY);
        game.click(0, Instant::now());
        let label = game.cards()[0].template.label;
        let rect = layout::cell_rect(0);
        let lines = render_lines(&game, Focus::Card(0));
        assert!(strip_ansi(&lines[(rect.y + 1) as usize]).contains(label));
    }

    #[test]
    fn test_key_bindings()
    {
        assert_eq!(action_for(&key(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(action_for(&key(KeyCode::Char('n'))), Some(Action::NewGame));
        assert_eq!(action_for(&key(KeyCode::Char(' '))), Some(Action::ActivateFocused));
        assert_eq!(action_for(&key(KeyCode::Left)), Some(Action::Move(Direction::Left)));
        assert_eq!(action_for(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_mouse_click_activates_cell()
    {
        let rect = layout::cell_rect(7);
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: rect.x + 2,
            row: rect.y + 1,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(action_for(&click), Some(Action::Activate(Focus::Card(7))));
    }

    #[test]
    fn test_apply_flips_focused_card_and_starts_new_game()
    {
        let mut game = Game::new(Some(2), crate::game::DEFAULT_REVEAL_DELAY);
        let mut focus = Focus::Card(0);
        let now = Instant::now();

        assert!(!apply(&mut game, &mut focus, Action::Move(Direction::Right), now));
        assert!(!apply(&mut game, &mut focus, Action::ActivateFocused, now));
        assert_eq!(game.choices().0.map(|card| card.id), Some(game.cards()[1].id));

        assert!(!apply(&mut game, &mut focus, Action::Activate(Focus::NewGame), now));
        assert_eq!(focus, Focus::NewGame);
        assert_eq!(game.choices(), (None, None));
        assert!(apply(&mut game, &mut focus, Action::Quit, now));
    }

    #[test]
    fn test_step_fires_reset_before_click_at_deadline()
    {
        let mut game = Game::new(Some(5), crate::game::DEFAULT_REVEAL_DELAY);
        let mut focus = Focus::Card(0);
        let start = Instant::now();

        let first = game.cards()[0];
        let other = (1..DECK_SIZE)
            .find(|&index| !game.cards()[index].same_template(&first))
            .unwrap();
        let third = (1..DECK_SIZE).find(|&index| index != other).unwrap();

        assert!(!step(&mut game, &mut focus, vec![Action::Activate(Focus::Card(0))], start));
        assert!(!step(&mut game, &mut focus, vec![Action::Activate(Focus::Card(other))], start));
        assert!(game.locked());

        let deadline = start + crate::game::DEFAULT_REVEAL_DELAY;
        assert!(!step(&mut game, &mut focus, vec![Action::Activate(Focus::Card(third))], deadline));
        assert_eq!(game.turns(), 1);
        assert!(!game.locked());
        assert_eq!(game.choices().0.map(|card| card.id), Some(game.cards()[third].id));
    }

    #[test]
    fn test_step_stops_on_quit()
    {
        let mut game = Game::new(Some(5), crate::game::DEFAULT_REVEAL_DELAY);
        let mut focus = Focus::Card(0);
        let actions = vec![Action::Move(Direction::Down), Action::Quit];
        assert!(step(&mut game, &mut focus, actions, Instant::now()));
        assert_eq!(focus, Focus::Card(GRID_COLS));
    }
}
