use std::fmt::Write;

use crossterm::style::{Color, Stylize};
use enclosure::cell::{Fruit, Tile};
use enclosure::{Enclosure, Level};

const CELL_WIDTH: usize = 3;

const WATER: Color = rgb(0x062F48);
const WALL: Color = rgb(0x7B7979);
const HORSE: Color = Color::AnsiValue(255);
const INSIDE: Color = rgb(0xD1AE5A);
const OUTSIDE: Color = rgb(0x208044);
const CHERRY: Color = Color::AnsiValue(160);
const APPLE: Color = Color::AnsiValue(214);
const SKULL: Color = Color::AnsiValue(53);

const DARK: Color = Color::AnsiValue(16);
const LIGHT: Color = Color::AnsiValue(231);

const fn rgb(hex: u32) -> Color {
    Color::Rgb {
        r: (hex >> 16) as u8,
        g: (hex >> 8) as u8,
        b: hex as u8,
    }
}

/// Colors a solved level cell by cell, one line per row.
pub fn board(level: &Level, enclosure: &Enclosure) -> String {
    let mut out = String::new();

    for (cell, tile) in level.cells() {
        let walled = enclosure.walls().contains(&cell);
        let inside = enclosure.reach().contains(&cell);

        let ground = match tile {
            Tile::Water => WATER,
            _ if walled => WALL,
            Tile::Start => HORSE,
            Tile::Fruit(Fruit::Cherry) => CHERRY,
            Tile::Fruit(Fruit::GoldenApple) => APPLE,
            Tile::Fruit(Fruit::Skull) => SKULL,
            _ if inside => INSIDE,
            _ => OUTSIDE,
        };
        let (glyph, ink) = match tile {
            Tile::Start => ('H', DARK),
            Tile::Fruit(fruit) => (fruit.glyph(), DARK),
            Tile::Portal(label) => (label, LIGHT),
            _ if walled => ('#', LIGHT),
            _ => (' ', LIGHT),
        };

        // writing to a String cannot fail
        let _ = write!(out, "{}", format!("{glyph:^CELL_WIDTH$}").with(ink).on(ground).bold());
        if (cell + 1) % level.width() == 0 {
            out.push('\n');
        }
    }

    out
}
