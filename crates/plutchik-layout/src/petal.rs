//! Turns one category's score into petal bands, polygons and labels.
//!
//! Petals are built pointing straight up and rotated onto their slot
//! afterwards. Each band polygon reaches from the origin to the band's outer
//! radius, so inner bands are drawn over outer ones and stack their opacity.

use plutchik_core::{
    clip_to_disk, is_blank, petal_lens, rotate_point, rotate_region, split_at_axis, CategorySpec,
    FlowerError, MultiPolygon, Palette, Point, Rgb, ScoreEntry, ScoreKind,
};
use serde::Serialize;
use tracing::trace;

use crate::options::{FontWeight, RenderOptions};
use crate::primitive::{Layer, Paint, Primitive, Stroke, Style, TextStyle};

/// Outer end of every spine, independent of normalization.
pub const SPINE_LENGTH: f64 = 1.03;
const SPINE_TICK: f64 = 0.03;
const SPINE_WIDTH: f64 = 0.75;
const SPINE_ALPHA: f64 = 0.3;

pub const FILL_ALPHA: f64 = 0.5;
pub const DYAD_FILL_ALPHA: f64 = 0.7;
/// Outermost band of a banded petal, faded so inner bands read darker.
pub const OUTER_BAND_ALPHA: f64 = 0.3;
/// Extra overlay on the innermost band of a banded petal.
pub const INNER_DARKENING_ALPHA: f64 = 0.3;
pub const SHADOWED_FILL_ALPHA: f64 = 0.0;
pub const SHADOWED_STROKE_ALPHA: f64 = 0.2;
const SHADOWED_OUTLINE_ALPHA: f64 = 0.8;
const SHADOWED_LABEL_ALPHA: f64 = 0.8;

const OUTLINE_WIDTH: f64 = 1.0;
const BAND_STROKE_WIDTH: f64 = 1.3;
const INNER_STROKE_WIDTH: f64 = 1.5;

/// Radius of the two-colored arcs drawn outside dyad petals.
pub const DYAD_ARC_RADIUS: f64 = 1.45;
const DYAD_ARC_HALF_SPAN_DEGREES: f64 = 18.0;
const DYAD_ARC_SEGMENTS: usize = 24;
const DYAD_ARC_WIDTH: f64 = 3.0;
const COMPONENT_LABEL_RADIUS: f64 = 1.55;
const COMPONENT_LABEL_SPREAD_DEGREES: f64 = 9.0;
const COMPONENT_LABEL_TILT_DEGREES: f64 = 8.0;
const COMPONENT_LABEL_SCALE: f64 = 0.7;

const SCORE_LABEL_RADIUS: f64 = 1.13;
const NAME_LABEL_RADIUS: f64 = 1.26;
const INTENSITY_LABEL_RADII: [f64; 3] = [1.10, 1.20, 1.30];
const INTENSITY_NAME_RADIUS: f64 = 1.43;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpacityTier {
    Full,
    DarkerInner,
    Shadowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightState {
    Full,
    Shadowed,
}

/// One ring of a petal, innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub color: Palette,
    pub opacity_tier: OpacityTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spine {
    pub start: Point,
    pub end: Point,
    pub tick_end: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Petal {
    pub category: &'static CategorySpec,
    pub score: ScoreEntry,
    pub highlight: HighlightState,
    pub bands: Vec<Band>,
    /// Full petal silhouette, rotated onto its slot. Empty for a zero score.
    pub outline: MultiPolygon,
    pub spine: Spine,
    /// Fills and strokes, in draw order.
    pub shapes: Vec<Primitive>,
    /// Spine, arcs and labels, in draw order.
    pub annotations: Vec<Primitive>,
}

impl Petal {
    pub fn outer_radius(&self) -> f64 {
        self.bands.last().map_or(0.0, |b| b.outer_radius)
    }
}

/// Builds petals for one score kind under one set of options.
pub struct PetalBuilder<'a> {
    kind: ScoreKind,
    options: &'a RenderOptions,
}

impl<'a> PetalBuilder<'a> {
    pub fn new(kind: ScoreKind, options: &'a RenderOptions) -> Result<Self, FlowerError> {
        options.validate()?;
        options.validate_selections(kind)?;
        Ok(Self { kind, options })
    }

    pub fn build(&self, spec: &'static CategorySpec, entry: &ScoreEntry) -> Result<Petal, FlowerError> {
        if spec.kind != self.kind {
            return Err(FlowerError::MixedCategoryKinds {
                category: spec.name.to_string(),
                expected: self.kind,
                found: spec.kind,
            });
        }
        entry
            .validate()
            .map_err(|reason| FlowerError::invalid_score(spec.name, reason))?;

        let highlight = if self.options.highlight_categories.includes(spec.name) {
            HighlightState::Full
        } else {
            HighlightState::Shadowed
        };
        let bands = self.bands(spec, entry, highlight);
        let tip = bands.last().map_or(self.options.offset_radius, |b| b.outer_radius);
        let lens = petal_lens(tip, self.options.offset_radius, self.options.height_width_ratio);
        let angle = spec.angle_radians();

        let outline = rotate_region(&lens, angle);
        let shapes = self.shapes(spec, &bands, &lens, &outline, highlight, angle);
        let spine = Spine {
            start: rotate_point(Point::new(0.0, self.options.offset_radius), angle),
            end: rotate_point(Point::new(0.0, SPINE_LENGTH), angle),
            tick_end: rotate_point(Point::new(-SPINE_TICK, SPINE_LENGTH), angle),
        };
        let annotations = self.annotations(spec, entry, highlight, &spine);

        trace!(
            category = spec.name,
            bands = bands.len(),
            outer_radius = tip,
            shadowed = highlight == HighlightState::Shadowed,
            "built petal"
        );
        Ok(Petal {
            category: spec,
            score: *entry,
            highlight,
            bands,
            outline,
            spine,
            shapes,
            annotations,
        })
    }

    fn bands(&self, spec: &CategorySpec, entry: &ScoreEntry, highlight: HighlightState) -> Vec<Band> {
        let offset = self.options.offset_radius;
        let shadowed = highlight == HighlightState::Shadowed;
        let tier = |full: OpacityTier| if shadowed { OpacityTier::Shadowed } else { full };

        match entry {
            ScoreEntry::Cumulative(score) => vec![Band {
                inner_radius: offset,
                outer_radius: self.options.score_radius(*score),
                color: spec.palette,
                opacity_tier: tier(OpacityTier::Full),
            }],
            ScoreEntry::Intensities([low, mid, high]) => {
                let bounds = [
                    offset,
                    self.options.score_radius(*low),
                    self.options.score_radius(low + mid),
                    self.options.score_radius(low + mid + high),
                ];
                (0..3)
                    .map(|i| Band {
                        inner_radius: bounds[i],
                        outer_radius: bounds[i + 1],
                        color: spec.palette,
                        opacity_tier: tier(if i == 0 {
                            OpacityTier::DarkerInner
                        } else {
                            OpacityTier::Full
                        }),
                    })
                    .collect()
            }
        }
    }

    fn shapes(
        &self,
        spec: &CategorySpec,
        bands: &[Band],
        lens: &MultiPolygon,
        outline: &MultiPolygon,
        highlight: HighlightState,
        angle: f64,
    ) -> Vec<Primitive> {
        let mut shapes = Vec::new();
        if is_blank(lens) {
            return shapes;
        }
        let offset = self.options.offset_radius;
        let banded = bands.len() > 1;
        let shadowed = highlight == HighlightState::Shadowed;

        shapes.extend(Primitive::region(
            Layer::Petal,
            outline,
            Style::filled(Paint::opaque(Rgb::WHITE)),
        ));

        for (i, band) in bands.iter().enumerate().rev() {
            if band.outer_radius <= offset {
                continue;
            }
            let outermost = i + 1 == bands.len();
            let region = if outermost {
                lens.clone()
            } else {
                clip_to_disk(lens, band.outer_radius)
            };
            if is_blank(&region) {
                continue;
            }

            let fill_alpha = match band.opacity_tier {
                OpacityTier::Shadowed => SHADOWED_FILL_ALPHA,
                _ if banded && outermost => OUTER_BAND_ALPHA,
                _ if banded => FILL_ALPHA,
                _ if spec.is_dyad() => DYAD_FILL_ALPHA,
                _ => FILL_ALPHA,
            };
            let edge = (banded && !outermost).then(|| {
                let alpha = if shadowed { SHADOWED_STROKE_ALPHA } else { 1.0 };
                Stroke::solid(Paint::new(band.color.primary(), alpha), BAND_STROKE_WIDTH)
            });
            push_fill(&mut shapes, &region, band.color, fill_alpha, edge, angle);

            if band.opacity_tier == OpacityTier::DarkerInner {
                let stroke = Stroke::solid(Paint::opaque(band.color.primary()), INNER_STROKE_WIDTH);
                push_fill(
                    &mut shapes,
                    &region,
                    band.color,
                    INNER_DARKENING_ALPHA,
                    Some(stroke),
                    angle,
                );
            }
        }

        let outline_alpha = if shadowed { SHADOWED_OUTLINE_ALPHA } else { 1.0 };
        shapes.extend(Primitive::region(
            Layer::Petal,
            outline,
            Style::stroked(Stroke::solid(
                Paint::new(spec.palette.primary(), outline_alpha),
                OUTLINE_WIDTH,
            )),
        ));
        shapes
    }

    fn annotations(
        &self,
        spec: &CategorySpec,
        entry: &ScoreEntry,
        highlight: HighlightState,
        spine: &Spine,
    ) -> Vec<Primitive> {
        let mut out = Vec::new();
        let angle_deg = spec.angle_degrees();

        if self.options.show_coordinates {
            let stroke = Stroke::solid(Paint::new(Rgb::BLACK, SPINE_ALPHA), SPINE_WIDTH);
            out.push(Primitive::line(Layer::Annotation, vec![spine.start, spine.end], stroke));
            out.push(Primitive::line(Layer::Annotation, vec![spine.end, spine.tick_end], stroke));
            if let Some((first, second)) = spec.components {
                let half = DYAD_ARC_HALF_SPAN_DEGREES;
                // The second component sits clockwise of the spine.
                out.push(dyad_arc(angle_deg - half, angle_deg, second.color()));
                out.push(dyad_arc(angle_deg, angle_deg + half, first.color()));
            }
        }
        if !self.options.show_labels {
            return out;
        }

        let rotation = readable_rotation(angle_deg);
        let shadowed = highlight == HighlightState::Shadowed;
        let score_paint = match (shadowed, spec.is_dyad()) {
            (true, _) => Paint::new(Rgb::LIGHT_GREY, SHADOWED_LABEL_ALPHA),
            (false, true) => Paint::opaque(Rgb::CHARCOAL),
            (false, false) => Paint::opaque(spec.palette.primary()),
        };
        let at = |radius: f64| rotate_point(Point::new(0.0, radius), angle_deg.to_radians());
        let format = self.options.label_format;

        match entry {
            ScoreEntry::Intensities(values) if self.options.show_intensity_labels.includes(spec.name) => {
                let weights = [FontWeight::Regular, FontWeight::Demibold, FontWeight::Regular];
                for ((value, radius), weight) in values.iter().zip(INTENSITY_LABEL_RADII).zip(weights) {
                    out.push(Primitive::text(
                        Layer::Annotation,
                        at(radius),
                        format.format(*value),
                        self.text_style(self.options.font_size, weight, score_paint, rotation),
                    ));
                }
                out.push(self.name_label(spec.name, at(INTENSITY_NAME_RADIUS), rotation));
            }
            _ => {
                out.push(Primitive::text(
                    Layer::Annotation,
                    at(SCORE_LABEL_RADIUS),
                    format.format(entry.total()),
                    self.text_style(self.options.font_size, FontWeight::Demibold, score_paint, rotation),
                ));
                out.push(self.name_label(spec.name, at(NAME_LABEL_RADIUS), rotation));
            }
        }

        if let Some((first, second)) = spec.components {
            let size = self.options.font_size * COMPONENT_LABEL_SCALE;
            let placed = [
                (second, -COMPONENT_LABEL_SPREAD_DEGREES, -COMPONENT_LABEL_TILT_DEGREES),
                (first, COMPONENT_LABEL_SPREAD_DEGREES, COMPONENT_LABEL_TILT_DEGREES),
            ];
            for (emotion, spread, tilt) in placed {
                let position = rotate_point(
                    Point::new(0.0, COMPONENT_LABEL_RADIUS),
                    (angle_deg + spread).to_radians(),
                );
                out.push(Primitive::text(
                    Layer::Annotation,
                    position,
                    emotion.name(),
                    self.text_style(
                        size,
                        FontWeight::Demibold,
                        Paint::opaque(emotion.color()),
                        rotation + tilt,
                    ),
                ));
            }
        }
        out
    }

    fn name_label(&self, name: &str, position: Point, rotation: f64) -> Primitive {
        Primitive::text(
            Layer::Annotation,
            position,
            name,
            self.text_style(
                self.options.font_size,
                self.options.font_weight,
                Paint::opaque(Rgb::BLACK),
                rotation,
            ),
        )
    }

    fn text_style(&self, size: f64, weight: FontWeight, paint: Paint, rotation: f64) -> TextStyle {
        TextStyle {
            font_family: self.options.font_family.clone(),
            size,
            weight,
            paint,
            rotation_degrees: rotation,
        }
    }
}

/// Builds a single petal; see [`PetalBuilder`].
pub fn build_petal(
    spec: &'static CategorySpec,
    entry: &ScoreEntry,
    options: &RenderOptions,
) -> Result<Petal, FlowerError> {
    PetalBuilder::new(spec.kind, options)?.build(spec, entry)
}

fn push_fill(
    shapes: &mut Vec<Primitive>,
    region: &MultiPolygon,
    palette: Palette,
    alpha: f64,
    edge: Option<Stroke>,
    angle: f64,
) {
    let style = |color: Rgb| {
        let style = Style::filled(Paint::new(color, alpha));
        match edge {
            Some(stroke) => style.with_stroke(stroke),
            None => style,
        }
    };
    match palette {
        Palette::Single(color) => {
            shapes.extend(Primitive::region(
                Layer::Petal,
                &rotate_region(region, angle),
                style(color),
            ));
        }
        Palette::Pair(first, second) => {
            // First component on the counterclockwise (left) half.
            let (left, right) = split_at_axis(region);
            for (half, color) in [(left, first), (right, second)] {
                if !is_blank(&half) {
                    shapes.extend(Primitive::region(
                        Layer::Petal,
                        &rotate_region(&half, angle),
                        style(color),
                    ));
                }
            }
        }
    }
}

/// Arc between two spine directions (degrees from "up") outside the petals.
fn dyad_arc(from_deg: f64, to_deg: f64, color: Rgb) -> Primitive {
    let points = plutchik_core::arc_points(
        DYAD_ARC_RADIUS,
        (from_deg + 90.0).to_radians(),
        (to_deg + 90.0).to_radians(),
        DYAD_ARC_SEGMENTS,
    );
    Primitive::line(
        Layer::Annotation,
        points,
        Stroke::solid(Paint::opaque(color), DYAD_ARC_WIDTH),
    )
}

/// Flips labels in the lower half of the wheel so they never read upside down.
pub fn readable_rotation(angle_deg: f64) -> f64 {
    if -260.0 < angle_deg && angle_deg < -110.0 {
        angle_deg + 180.0
    } else {
        angle_deg
    }
}
