//! A screen with a counter, a sheet that edits it, and a global alert.
//!
//! - `GlobalAppState` lives for the whole process and is reached through
//!   context by any view that needs it.
//! - `ScreenState` is remembered by `ContentView` and shared with the sheet's
//!   `IncrementerView` through bindings.

pub mod state;
pub mod tests;
pub mod views;

pub use state::*;
pub use views::*;
