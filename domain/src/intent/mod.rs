//! Intent recognition
//!
//! Turns free text into ranked tool candidates without executing anything.
//!
//! ```text
//! text ──▶ trigger patterns (lower-cased) ──▶ base confidence
//!      ──▶ parameter extractors          ──▶ +0.1 if anything extracted
//!      ──▶ structural heuristics          ──▶ URL / path candidates
//!      ──▶ stable sort, best first
//! ```
//!
//! | Heuristic | Tool | Confidence |
//! |-----------|------|------------|
//! | URL + scrape keyword | `web_scraper` | 0.8 |
//! | URL + API keyword | `api_call` | 0.7 (method `GET` unless stated) |
//! | path-shaped token | `file_operations` | 0.75 |
//!
//! [`IntentRecognizer::best_match`] is the confidence gate used before any
//! automatic dispatch.

pub mod entities;
pub mod heuristics;
pub mod recognizer;

pub use entities::IntentMatch;
pub use recognizer::{EXTRACTION_BONUS, IntentRecognizer};
