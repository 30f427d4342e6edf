//! Core data models for paper records.

mod paper;

pub use paper::{Author, Paper};
