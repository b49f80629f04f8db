/// Tweet normalization
pub mod clean;

/// Word index tokenizer
pub mod tokenizer;

/// Sequence padding and truncation
pub mod sequence;

pub use clean::clean_text;
pub use sequence::{pad_sequence, pad_sequences, Side};
pub use tokenizer::{Tokenizer, TokenizerConfig, TokenizerError};

/// Tokenizer artifact repair
pub mod repair;
