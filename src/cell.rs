//! What a cell of a level can hold.

use std::fmt::{Display, Formatter};

use strum::VariantArray;

/// Scored items. Each kind has a fixed glyph in the map alphabet and a fixed value.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray)]
pub enum Fruit {
    /// `C`, worth 3.
    Cherry,
    /// `G`, worth 10.
    GoldenApple,
    /// `S`, worth -5.
    Skull,
}

impl Fruit {
    /// Score adjustment for enclosing this fruit, on top of the one point every enclosed cell earns.
    pub const fn value(self) -> i64 {
        match self {
            Self::Cherry => 3,
            Self::GoldenApple => 10,
            Self::Skull => -5,
        }
    }

    /// Map glyph for this fruit.
    pub const fn glyph(self) -> char {
        match self {
            Self::Cherry => 'C',
            Self::GoldenApple => 'G',
            Self::Skull => 'S',
        }
    }

    /// The fruit encoded by `glyph`, if any.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        Self::VARIANTS.iter().find(|fruit| fruit.glyph() == glyph).copied()
    }
}

pub(crate) const START_GLYPH: char = 'H';
pub(crate) const WATER_GLYPH: char = '~';
pub(crate) const EMPTY_GLYPH: char = '.';

/// The content of one cell of a level, before any wall is placed.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Tile {
    /// Plain grass; the only kind of cell that may become a wall.
    #[default]
    Empty,
    /// Impassable, never a wall and never enclosed.
    Water,
    /// Where the enclosed region grows from.
    Start,
    /// A scored item.
    Fruit(Fruit),
    /// One end of a teleport group sharing `label`.
    Portal(char),
}

impl Tile {
    /// Classify a map glyph; `None` if the glyph is not part of the map alphabet.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            EMPTY_GLYPH => Some(Self::Empty),
            WATER_GLYPH => Some(Self::Water),
            START_GLYPH => Some(Self::Start),
            _ => match Fruit::from_glyph(glyph) {
                Some(fruit) => Some(Self::Fruit(fruit)),
                None if glyph.is_alphanumeric() => Some(Self::Portal(glyph)),
                None => None,
            }
        }
    }

    /// Whether a wall may be placed on this tile.
    pub fn is_wall_eligible(&self) -> bool {
        *self == Self::Empty
    }

    /// Score earned by enclosing this tile.
    pub fn weight(&self) -> i64 {
        match self {
            Self::Fruit(fruit) => 1 + fruit.value(),
            _ => 1,
        }
    }
}

impl Display for Tile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            Tile::Empty => EMPTY_GLYPH,
            Tile::Water => WATER_GLYPH,
            Tile::Start => START_GLYPH,
            Tile::Fruit(fruit) => fruit.glyph(),
            Tile::Portal(label) => *label,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::cell::{Fruit, Tile};

    #[test]
    fn classify_alphabet() {
        assert_eq!(Tile::from_glyph('.'), Some(Tile::Empty));
        assert_eq!(Tile::from_glyph('~'), Some(Tile::Water));
        assert_eq!(Tile::from_glyph('H'), Some(Tile::Start));
        assert_eq!(Tile::from_glyph('C'), Some(Tile::Fruit(Fruit::Cherry)));
        assert_eq!(Tile::from_glyph('G'), Some(Tile::Fruit(Fruit::GoldenApple)));
        assert_eq!(Tile::from_glyph('S'), Some(Tile::Fruit(Fruit::Skull)));
        assert_eq!(Tile::from_glyph('0'), Some(Tile::Portal('0')));
        assert_eq!(Tile::from_glyph('a'), Some(Tile::Portal('a')));
        assert_eq!(Tile::from_glyph('#'), None);
        assert_eq!(Tile::from_glyph(' '), None);
    }

    #[test]
    fn weights() {
        assert_eq!(Tile::Empty.weight(), 1);
        assert_eq!(Tile::Portal('1').weight(), 1);
        assert_eq!(Tile::Fruit(Fruit::Cherry).weight(), 4);
        assert_eq!(Tile::Fruit(Fruit::GoldenApple).weight(), 11);
        assert_eq!(Tile::Fruit(Fruit::Skull).weight(), -4);
    }

    #[test]
    fn only_empty_is_wall_eligible() {
        assert!(Tile::Empty.is_wall_eligible());
        for tile in [Tile::Water, Tile::Start, Tile::Fruit(Fruit::Skull), Tile::Portal('x')] {
            assert!(!tile.is_wall_eligible());
        }
    }

    #[test]
    fn display_round_trips_glyph() {
        for glyph in ['.', '~', 'H', 'C', 'G', 'S', '7'] {
            assert_eq!(Tile::from_glyph(glyph).unwrap().to_string(), glyph.to_string());
        }
    }
}
