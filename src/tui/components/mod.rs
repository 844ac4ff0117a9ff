//! Reusable UI components.

pub mod chart;
pub mod status_bar;
