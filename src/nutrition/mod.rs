//! Nutrition label extraction
//!
//! Text normalization, per-field strategies and the driver that reconciles
//! region transcripts with the global transcript.

pub mod chain;
pub mod extractor;
pub mod lines;
pub mod normalizer;
pub mod scanner;
pub mod serving_size;
pub mod servings_per_pack;
pub mod sugar;
pub mod units;
pub mod vocabulary;

pub use extractor::{parse_nutrition, Extraction, Extractor, Transcript};
pub use normalizer::normalize;
pub use scanner::all_numbers;
pub use serving_size::parse_serving_size;
pub use servings_per_pack::parse_servings_per_pack;
pub use sugar::{parse_sugar_per_pack, parse_sugar_per_serving};
pub use units::{LabelUnit, Quantity};
