//! Renders a single-page PDF invoice from a CSV of line items.

pub mod builder;
pub mod config;
pub mod elements;
pub mod fonts;
pub mod ingest;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod viewer;
