use super::deck::{Card, Rgb};

pub const BACK_PATTERN: &str = "░▒░▒░▒";
const BACK_COLOR: Rgb = Rgb { r: 60, g: 60, b: 110 };

/// Stateless view over one card. The owner supplies `flipped` and `locked`
/// on every render.
#[derive(Clone, Copy, Debug)]
pub struct CardView
{
    card: Card,
    flipped: bool,
    locked: bool,
}

pub struct Face
{
    pub text: &'static str,
    pub color: Rgb,
    pub face_up: bool,
}

impl CardView
{
    pub fn new(card: Card, flipped: bool, locked: bool) -> Self
    {
        Self {
            card,
            flipped,
            locked,
        }
    }

    pub fn face(&self) -> Face
    {
        if self.flipped {
            Face {
                text: self.card.template.label,
                color: self.card.template.color,
                face_up: true,
            }
        } else {
            Face {
                text: BACK_PATTERN,
                color: BACK_COLOR,
                face_up: false,
            }
        }
    }

    /// Forwards the click to `on_choice` unless the card is already face-up
    /// or input is locked. Returns whether the click was forwarded.
    pub fn click<F>(&self, on_choice: F) -> bool
    where
        F: FnOnce(Card),
    {
        if self.flipped || self.locked {
            return false;
        }
        on_choice(self.card);
        true
    }
}
