pub mod card_view;
pub mod deck;
pub mod state;

pub use card_view::CardView;
pub use deck::{DECK_SIZE, Rgb};
pub use state::{DEFAULT_REVEAL_DELAY, Game};
