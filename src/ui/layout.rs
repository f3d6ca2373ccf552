//! Screen geometry shared by drawing and mouse hit-testing.

use crate::game::DECK_SIZE;

pub const GRID_COLS: usize = 4;
pub const GRID_ROWS: usize = DECK_SIZE / GRID_COLS;
pub const CELL_WIDTH: u16 = 10;
pub const CELL_HEIGHT: u16 = 3;
pub const CELL_GAP: u16 = 1;
pub const FACE_WIDTH: usize = CELL_WIDTH as usize - 2;

pub const HEADING_ROW: u16 = 0;
pub const BUTTON_ROW: u16 = 2;
pub const BUTTON_LABEL: &str = "[ New Game ]";
pub const GRID_TOP: u16 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus
{
    NewGame,
    Card(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction
{
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect
{
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect
{
    pub fn contains(&self, column: u16, row: u16) -> bool
    {
        column >= self.x && column < self.x + self.width && row >= self.y && row < self.y + self.height
    }
}

pub fn button_rect() -> Rect
{
    Rect {
        x: 0,
        y: BUTTON_ROW,
        width: BUTTON_LABEL.chars().count() as u16,
        height: 1,
    }
}

pub fn cell_rect(index: usize) -> Rect
{
    let col = (index % GRID_COLS) as u16;
    let row = (index / GRID_COLS) as u16;
    Rect {
        x: col * (CELL_WIDTH + CELL_GAP),
        y: GRID_TOP + row * CELL_HEIGHT,
        width: CELL_WIDTH,
        height: CELL_HEIGHT,
    }
}

/// First screen row below the card grid.
pub fn footer_row() -> u16
{
    GRID_TOP + GRID_ROWS as u16 * CELL_HEIGHT + 1
}

pub fn hit_test(column: u16, row: u16) -> Option<Focus>
{
    if button_rect().contains(column, row) {
        return Some(Focus::NewGame);
    }
    (0..DECK_SIZE)
        .find(|&index| cell_rect(index).contains(column, row))
        .map(Focus::Card)
}

pub fn move_focus(focus: Focus, direction: Direction) -> Focus
{
    match focus {
        Focus::NewGame => match direction {
            Direction::Down => Focus::Card(0),
            _ => Focus::NewGame,
        },
        Focus::Card(index) => {
            let col = index % GRID_COLS;
            let row = index / GRID_COLS;
            match direction {
                Direction::Up if row == 0 => Focus::NewGame,
                Direction::Up => Focus::Card(index - GRID_COLS),
                Direction::Down if row + 1 < GRID_ROWS => Focus::Card(index + GRID_COLS),
                Direction::Left if col > 0 => Focus::Card(index - 1),
                Direction::Right if col + 1 < GRID_COLS => Focus::Card(index + 1),
                _ => focus,
            }
        }
    }
}
