//! Nutriscan Library
//!
//! Extraction of serving size, servings per pack and sugar figures from the
//! OCR text of Indonesian and English nutrition labels.

pub mod build_info;
pub mod config;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod source;
pub mod tools;
