use observa_core::{Color, Entropy, Field, Store, field};

/// App-wide state, provided once at the root.
#[derive(Debug, Default)]
pub struct GlobalAppState {
    pub alert_presented: bool,
}

impl GlobalAppState {
    pub const ALERT_PRESENTED: Field<GlobalAppState, bool> =
        field!(GlobalAppState, alert_presented);
}

/// State owned by one mounted `ContentView`.
#[derive(Debug)]
pub struct ScreenState {
    pub counter: i64,
    pub sheet_presented: bool,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            counter: 1,
            sheet_presented: false,
        }
    }
}

impl ScreenState {
    pub const COUNTER: Field<ScreenState, i64> = field!(ScreenState, counter);
    pub const SHEET_PRESENTED: Field<ScreenState, bool> = field!(ScreenState, sheet_presented);
}

pub const TINT_PALETTE: [Color; 3] = [Color::RED, Color::YELLOW, Color::GREEN];

/// A fresh uniform pick on every call; never cached.
pub fn tint_color(entropy: &Entropy) -> Color {
    entropy
        .choose(&TINT_PALETTE)
        .copied()
        .unwrap_or(Color::PINK)
}

pub fn sheet_height_fraction(sheet_presented: bool) -> f32 {
    if sheet_presented { 2.0 / 3.0 } else { 1.0 }
}

/// Tracked: a component calling this re-renders when the sheet toggles.
pub fn height_fraction(state: &Store<ScreenState>) -> f32 {
    sheet_height_fraction(state.get(ScreenState::SHEET_PRESENTED))
}

/// Integer with thousands separators, e.g. `-12,345`.
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
