//! Layout engine for Plutchik flower diagrams: scores in, drawable
//! primitives out. Drawing them is left to a [`DrawingSurface`].

pub mod compose;
pub mod grid;
pub mod options;
pub mod petal;
pub mod primitive;
#[cfg(test)]
mod tests;

pub use compose::{layout, layout_onto};
pub use options::{
    FontWeight, HighlightSelection, IntensityLabels, LabelFormat, Normalization, RenderOptions,
};
pub use petal::{build_petal, Band, HighlightState, OpacityTier, Petal, PetalBuilder, Spine};
pub use primitive::{
    DrawingSurface, Geometry, Layer, LayoutResult, LineDash, Paint, Primitive, Stroke, Style,
    TextStyle,
};
