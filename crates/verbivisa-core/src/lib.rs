//! verbivisa-core — Word lists, study packets, quiz sessions and highscores.
//!
//! This crate holds everything the quiz needs apart from the terminal surface:
//! loading a word list, dividing it into packets, running one quiz attempt and
//! keeping the best attempt per configuration.

pub mod answer;
pub mod config;
pub mod error;
pub mod highscores;
pub mod model;
pub mod packets;
pub mod scoring;
pub mod session;
pub mod words;
