// Reusable library API — visible to both CLI and WASM builds
pub mod adjacency;
pub mod board;
pub mod dictionary;
pub mod errors;
pub mod letters;
pub mod log;
pub mod modes;
pub mod rng;
pub mod session;
pub mod solver;
pub mod tile;
mod trie;

// Compile the wasm glue only when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use board::Grid;
pub use dictionary::Dictionary;
pub use letters::LetterSource;
pub use tile::Tile;
