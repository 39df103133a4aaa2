use ratatui::style::Color;
use term_color_support::ColorSupport;

/// Colour depth the terminal reports on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    TrueColor,
    Indexed256,
    Basic,
}

impl Depth {
    pub fn detect() -> Depth {
        let support = ColorSupport::stdout();
        if support.has_16m {
            Depth::TrueColor
        } else if support.has_256 {
            Depth::Indexed256
        } else {
            Depth::Basic
        }
    }

    /// Pin an ANSI colour to the Windows Terminal "Campbell" look so the
    /// board reads the same across terminals. Non-ANSI colours pass through.
    pub fn adapt(self, c: Color) -> Color {
        let entry = match c {
            Color::Black => ((12, 12, 12), 232),
            Color::Red => ((197, 15, 31), 160),
            Color::Green => ((19, 161, 14), 28),
            Color::Yellow => ((193, 156, 0), 178),
            Color::Blue => ((0, 55, 218), 20),
            Color::Magenta => ((136, 23, 152), 90),
            Color::Cyan => ((58, 150, 221), 38),
            Color::Gray => ((204, 204, 204), 250),
            Color::DarkGray => ((118, 118, 118), 243),
            Color::LightRed => ((231, 72, 86), 203),
            Color::LightBlue => ((59, 120, 255), 63),
            Color::White => ((242, 242, 242), 255),
            _ => return c,
        };
        let ((r, g, b), idx) = entry;
        match self {
            Depth::TrueColor => Color::Rgb(r, g, b),
            Depth::Indexed256 => Color::Indexed(idx),
            Depth::Basic => c,
        }
    }
}

/// Every colour the board view uses, resolved once at startup
#[derive(Debug, Clone)]
pub struct Palette {
    pub board_bg: Color,
    pub hidden_fg: Color,
    pub cursor_bg: Color,
    pub flag_fg: Color,
    pub mine_fg: Color,
    pub exploded_bg: Color,
    pub key_fg: Color,
    numbers: [Color; 8],
}

impl Palette {
    pub fn new(depth: Depth) -> Palette {
        // classic 1..8 number colours
        let numbers = [
            Color::LightBlue,
            Color::Green,
            Color::LightRed,
            Color::Blue,
            Color::Red,
            Color::Cyan,
            Color::Black,
            Color::Gray,
        ]
        .map(|c| depth.adapt(c));
        Palette {
            board_bg: depth.adapt(Color::DarkGray),
            hidden_fg: depth.adapt(Color::Gray),
            cursor_bg: depth.adapt(Color::LightBlue),
            flag_fg: depth.adapt(Color::Red),
            mine_fg: depth.adapt(Color::Black),
            exploded_bg: depth.adapt(Color::Red),
            key_fg: depth.adapt(Color::Yellow),
            numbers,
        }
    }

    /// Colour for an adjacency count of 1..=8
    pub fn number(&self, n: u8) -> Color {
        let i = usize::from(n.clamp(1, 8)) - 1;
        self.numbers[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_depth_keeps_ansi_colours() {
        assert_eq!(Depth::Basic.adapt(Color::Red), Color::Red);
        assert_eq!(Depth::TrueColor.adapt(Color::Red), Color::Rgb(197, 15, 31));
        assert_eq!(Depth::Indexed256.adapt(Color::Red), Color::Indexed(160));
        assert_eq!(Depth::TrueColor.adapt(Color::Rgb(1, 2, 3)), Color::Rgb(1, 2, 3));
    }

    #[test]
    fn number_colours_are_distinct_per_count() {
        let p = Palette::new(Depth::Basic);
        assert_eq!(p.number(1), Color::LightBlue);
        assert_eq!(p.number(2), Color::Green);
        assert_eq!(p.number(8), Color::Gray);
    }
}
