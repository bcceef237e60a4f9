pub mod browser;

pub use browser::{ChromiumPage, ChromiumSession};
