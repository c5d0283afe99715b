use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    pub const TRANSPARENT: Color = Color(0, 0, 0, 0);
    pub const BLACK: Color = Color(0, 0, 0, 255);
    pub const WHITE: Color = Color(255, 255, 255, 255);
    pub const RED: Color = Color(255, 59, 48, 255);
    pub const YELLOW: Color = Color(255, 204, 0, 255);
    pub const GREEN: Color = Color(52, 199, 89, 255);
    pub const PINK: Color = Color(255, 45, 85, 255);

    const NAMED: [(Color, &'static str); 7] = [
        (Color::TRANSPARENT, "transparent"),
        (Color::BLACK, "black"),
        (Color::WHITE, "white"),
        (Color::RED, "red"),
        (Color::YELLOW, "yellow"),
        (Color::GREEN, "green"),
        (Color::PINK, "pink"),
    ];

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r, g, b, 255)
    }

    pub fn from_hex(hex: &str) -> Self {
        let s = hex.trim_start_matches('#');
        let channel = |i: usize, default: u8| {
            s.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .unwrap_or(default)
        };
        match s.len() {
            6 => Color(channel(0, 0), channel(2, 0), channel(4, 0), 255),
            8 => Color(channel(0, 0), channel(2, 0), channel(4, 0), channel(6, 255)),
            _ => Color::BLACK,
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(c, _)| c == self)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None if self.3 == 255 => write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2),
            None => write!(
                f,
                "#{:02X}{:02X}{:02X}{:02X}",
                self.0, self.1, self.2, self.3
            ),
        }
    }
}
