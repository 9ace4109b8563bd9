use plutchik_core::{classify, FlowerError, ScoreMap};
use tracing::debug;

use crate::grid::{canvas_extent, central_disk, polar_grid, title};
use crate::options::RenderOptions;
use crate::petal::{Petal, PetalBuilder};
use crate::primitive::{DrawingSurface, LayoutResult};

/// Classifies `scores`, builds every petal and assembles the primitive list.
///
/// Draw order: grid, petal shapes in slot order, central disk, spines and
/// labels in slot order, title. Any failing petal aborts the whole layout.
pub fn layout(scores: &ScoreMap, options: &RenderOptions) -> Result<LayoutResult, FlowerError> {
    let classified = classify(scores)?;
    let kind = classified.kind;
    let builder = PetalBuilder::new(kind, options)?;

    let petals = classified
        .entries()
        .map(|(spec, entry)| builder.build(spec, entry))
        .collect::<Result<Vec<Petal>, _>>()?;

    let extent = canvas_extent(kind, options);
    let mut primitives = polar_grid(kind, options);
    primitives.extend(petals.iter().flat_map(|p| p.shapes.iter().cloned()));
    primitives.extend(central_disk(kind, options));
    primitives.extend(petals.iter().flat_map(|p| p.annotations.iter().cloned()));
    primitives.extend(title(options, extent));

    debug!(
        kind = %kind,
        petals = petals.len(),
        primitives = primitives.len(),
        "laid out flower"
    );
    Ok(LayoutResult {
        kind,
        extent,
        petals,
        primitives,
    })
}

/// Lays out `scores` and replays the primitives onto a caller-owned surface.
/// Nothing is drawn when the layout fails.
pub fn layout_onto<S: DrawingSurface + ?Sized>(
    scores: &ScoreMap,
    options: &RenderOptions,
    surface: &mut S,
) -> Result<LayoutResult, FlowerError> {
    let result = layout(scores, options)?;
    result.render_to(surface);
    Ok(result)
}
