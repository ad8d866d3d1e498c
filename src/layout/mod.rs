// Placement helpers shared by the certificate composer.
pub mod fit;
pub mod table;
pub mod wrap;

pub use fit::{fit_into_box, FitSize};
pub use table::{LevelLayout, LevelRow, TableLayout};
pub use wrap::{capitalize_first, estimate_lines, strip_tags, wrap_words, WordLines};
