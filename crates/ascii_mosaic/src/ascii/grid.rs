use std::io::{self, Write};

/// One matched symbol per source pixel, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphGrid {
    pub width: u32,
    pub height: u32,
    pub symbols: Vec<u8>,
}

impl GlyphGrid {
    pub fn new(width: u32, height: u32, symbols: Vec<u8>) -> Self {
        assert_eq!(width as usize * height as usize, symbols.len());
        Self { width, height, symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol_at(&self, column: u32, row: u32) -> u8 {
        self.symbols[(row * self.width + column) as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        let width = (self.width as usize).max(1);
        self.symbols
            .chunks(width)
            .map(|row| row.iter().map(|&symbol| char::from(symbol)).collect::<String>())
    }

    /// Writes every row followed by a newline.
    pub fn write_text<W: Write>(&self, mut out: W) -> io::Result<()> {
        for row in self.rows() {
            writeln!(out, "{}", row)?;
        }
        out.flush()
    }

    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.symbols.len() + self.height as usize);
        for row in self.rows() {
            text.push_str(&row);
            text.push('\n');
        }
        text
    }
}
