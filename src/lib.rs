//! Sketch-to-UI service: sends sketch images to an image-analysis provider
//! and normalizes the UI element tree it describes.
//!
//! The interesting part is [`ui::normalizer::normalize`]; everything else is
//! plumbing around it.

pub mod cli;
pub mod pipeline;
pub mod provider;
pub mod server;
pub mod trace;
pub mod ui;
