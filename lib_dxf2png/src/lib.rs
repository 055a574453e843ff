//! Rendering of DXF drawings to PNG images.
//!
//! The pipeline loads a drawing with the [`dxf`] crate (with a one-shot
//! recovery fallback for structurally damaged files), composes the model
//! space as an SVG document and rasterizes it with [`resvg`]. Text entities
//! are rendered with a Japanese-capable system font when [`fonts`] can
//! resolve one.

pub use resvg::usvg::fontdb;

pub mod document;
pub mod error;
pub mod fonts;
pub mod render;

pub use error::{Error, Result};
