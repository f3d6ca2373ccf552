//! Card templates and deck construction.

use rand::Rng;
use rand::seq::SliceRandom;

pub const DECK_SIZE: usize = TEMPLATES.len() * 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb
{
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// One of the distinct card faces. Every shuffle holds two copies of each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardTemplate
{
    pub src: &'static str,
    pub label: &'static str,
    pub color: Rgb,
    pub matched: bool,
}

pub const TEMPLATES: [CardTemplate; 6] = [
    CardTemplate {
        src: "/img/helmet-1.png",
        label: "HELMET",
        color: Rgb { r: 170, g: 170, b: 190 },
        matched: false,
    },
    CardTemplate {
        src: "/img/potion-1.png",
        label: "POTION",
        color: Rgb { r: 80, g: 200, b: 120 },
        matched: false,
    },
    CardTemplate {
        src: "/img/ring-1.png",
        label: "RING",
        color: Rgb { r: 255, g: 215, b: 0 },
        matched: false,
    },
    CardTemplate {
        src: "/img/scroll-1.png",
        label: "SCROLL",
        color: Rgb { r: 230, g: 190, b: 140 },
        matched: false,
    },
    CardTemplate {
        src: "/img/shield-1.png",
        label: "SHIELD",
        color: Rgb { r: 80, g: 140, b: 255 },
        matched: false,
    },
    CardTemplate {
        src: "/img/sword-1.png",
        label: "SWORD",
        color: Rgb { r: 255, g: 80, b: 80 },
        matched: false,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Card
{
    pub id: CardId,
    pub template: CardTemplate,
}

impl Card
{
    pub fn src(&self) -> &'static str
    {
        self.template.src
    }

    pub fn matched(&self) -> bool
    {
        self.template.matched
    }

    pub fn same_template(&self, other: &Card) -> bool
    {
        self.template.src == other.template.src
    }
}

/// Issues card ids. Ids keep increasing across games, so they never repeat
/// within a shuffle.
#[derive(Debug, Default)]
pub struct IdSource
{
    next: u64,
}

impl IdSource
{
    pub fn next_id(&mut self) -> CardId
    {
        let id = CardId(self.next);
        self.next += 1;
        id
    }
}

/// Duplicates every template, tags each copy with a fresh id, and applies a
/// uniform Fisher-Yates shuffle.
pub fn shuffled_deck(rng: &mut impl Rng, ids: &mut IdSource) -> Vec<Card>
{
    let mut templates: Vec<CardTemplate> = TEMPLATES.iter().chain(TEMPLATES.iter()).copied().collect();
    templates.shuffle(rng);
    templates
        .into_iter()
        .map(|template| Card {
            id: ids.next_id(),
            template,
        })
        .collect()
}
