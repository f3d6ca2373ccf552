use super::card_view::CardView;
use super::deck::{self, Card, IdSource};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};

pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(1000);

/// Owns the whole game. Every transition happens on a click or on `tick`.
pub struct Game
{
    cards: Vec<Card>,
    choice_one: Option<Card>,
    choice_two: Option<Card>,
    turns: u32,
    locked: bool,
    reset_at: Option<Instant>,
    reveal_delay: Duration,
    rng: StdRng,
    ids: IdSource,
}

impl Game
{
    /// Creates the game and deals the first shuffle.
    pub fn new(seed: Option<u64>, reveal_delay: Duration) -> Self
    {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut game = Self {
            cards: Vec::new(),
            choice_one: None,
            choice_two: None,
            turns: 0,
            locked: false,
            reset_at: None,
            reveal_delay,
            rng,
            ids: IdSource::default(),
        };
        game.new_game();
        game
    }

    pub fn new_game(&mut self)
    {
        self.cards = deck::shuffled_deck(&mut self.rng, &mut self.ids);
        self.choice_one = None;
        self.choice_two = None;
        self.turns = 0;
        self.locked = false;
        // A mismatch reset scheduled against the old deck must not fire.
        self.reset_at = None;
        log::info!("new game dealt with {} cards", self.cards.len());
    }

    pub fn cards(&self) -> &[Card]
    {
        &self.cards
    }

    pub fn choices(&self) -> (Option<Card>, Option<Card>)
    {
        (self.choice_one, self.choice_two)
    }

    pub fn turns(&self) -> u32
    {
        self.turns
    }

    pub fn locked(&self) -> bool
    {
        self.locked
    }

    #[cfg(test)]
    pub fn reset_deadline(&self) -> Option<Instant>
    {
        self.reset_at
    }

    pub fn is_complete(&self) -> bool
    {
        self.cards.iter().all(Card::matched)
    }

    pub fn is_flipped(&self, card: &Card) -> bool
    {
        card.matched()
            || self.choice_one.is_some_and(|choice| choice.id == card.id)
            || self.choice_two.is_some_and(|choice| choice.id == card.id)
    }

    pub fn card_view(&self, index: usize) -> Option<CardView>
    {
        let card = self.cards.get(index)?;
        Some(CardView::new(*card, self.is_flipped(card), self.locked))
    }

    /// Clicks the card at `index` through its view. Returns whether the click
    /// registered a choice.
    pub fn click(&mut self, index: usize, now: Instant) -> bool
    {
        match self.card_view(index) {
            Some(view) => view.click(|card| self.register_choice(card, now)),
            None => false,
        }
    }

    pub fn register_choice(&mut self, card: Card, now: Instant)
    {
        if self.locked || self.is_flipped(&card) {
            log::debug!("ignored choice of card {:?}", card.id);
            return;
        }

        if self.choice_one.is_none() {
            log::debug!("first choice {} ({:?})", card.src(), card.id);
            self.choice_one = Some(card);
        } else {
            log::debug!("second choice {} ({:?})", card.src(), card.id);
            self.choice_two = Some(card);
            self.compare(now);
        }
    }

    fn compare(&mut self, now: Instant)
    {
        let (Some(first), Some(second)) = (self.choice_one, self.choice_two) else {
            return;
        };
        self.locked = true;

        if first.same_template(&second) {
            for card in self.cards.iter_mut().filter(|card| card.same_template(&first)) {
                card.template.matched = true;
            }
            log::info!("matched {}", first.src());
            self.reset_turn();
        } else {
            log::debug!(
                "mismatch {} / {}, hiding in {}ms",
                first.src(),
                second.src(),
                self.reveal_delay.as_millis()
            );
            self.reset_at = Some(now + self.reveal_delay);
        }
    }

    /// Fires the pending mismatch reset once its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> bool
    {
        match self.reset_at {
            Some(deadline) if now >= deadline => {
                self.reset_at = None;
                self.reset_turn();
                true
            }
            _ => false,
        }
    }

    fn reset_turn(&mut self)
    {
        self.choice_one = None;
        self.choice_two = None;
        self.turns += 1;
        self.locked = false;
        log::debug!("turn {} complete", self.turns);
    }
}
