//! Background polar grid, central disk and canvas extent.

use plutchik_core::{rotate_point, Point, Rgb, ScoreKind, ORIGIN};

use crate::options::{FontWeight, RenderOptions};
use crate::petal::DYAD_ARC_RADIUS;
use crate::primitive::{Layer, Paint, Primitive, Stroke, Style, TextStyle};

/// Grid circles split the score range into this many steps.
pub const GRID_STEPS: u32 = 5;
const GRID_ALPHA: f64 = 0.3;
const GRID_WIDTH: f64 = 1.0;
const MAX_TICK_DECIMALS: usize = 6;

const EXTENT_WITH_ANNOTATIONS: f64 = 1.45;
const EXTENT_BARE: f64 = 1.05;
const DYAD_EXTRA_EXTENT: f64 = 0.15;
const TITLE_GAP: f64 = 0.08;

fn grid_stroke() -> Stroke {
    Stroke::solid(Paint::new(Rgb::GREY, GRID_ALPHA), GRID_WIDTH)
}

/// Score values marked by the grid circles, from 0 up to the full-scale score.
pub fn tick_scores(options: &RenderOptions) -> Vec<f64> {
    let full = options.full_scale_score();
    (0..=GRID_STEPS)
        .map(|k| full * f64::from(k) / f64::from(GRID_STEPS))
        .collect()
}

/// Ascending tick values printed with the fewest decimals that keep every
/// label distinct, trailing zeros dropped.
pub fn tick_labels(ticks: &[f64]) -> Vec<String> {
    let render = |decimals: usize| -> Vec<String> {
        ticks
            .iter()
            .map(|tick| trim_trailing_zeros(format!("{tick:.decimals$}")))
            .collect()
    };
    (1..MAX_TICK_DECIMALS)
        .map(&render)
        .find(|labels| labels.windows(2).all(|pair| pair[0] != pair[1]))
        .unwrap_or_else(|| render(MAX_TICK_DECIMALS))
}

fn trim_trailing_zeros(label: String) -> String {
    if label.contains('.') {
        label.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        label
    }
}

pub fn polar_grid(kind: ScoreKind, options: &RenderOptions) -> Vec<Primitive> {
    let mut out = Vec::new();
    if !options.show_coordinates {
        return out;
    }

    let ticks = tick_scores(options);
    for score in &ticks {
        out.push(Primitive::circle(
            Layer::Grid,
            ORIGIN,
            options.score_radius(*score),
            Style::stroked(grid_stroke()),
        ));
    }

    if options.show_tick_labels {
        let angle = options.tick_label_angle_radians;
        let labelled = &ticks[1..];
        for (score, label) in labelled.iter().zip(tick_labels(labelled)) {
            let position = rotate_point(Point::new(0.0, options.score_radius(*score)), angle);
            out.push(Primitive::text(
                Layer::Grid,
                position,
                label,
                TextStyle {
                    font_family: options.font_family.clone(),
                    size: options.tick_label_size,
                    weight: options.font_weight,
                    paint: Paint::opaque(Rgb::BLACK),
                    rotation_degrees: angle.to_degrees(),
                },
            ));
        }
    }

    if kind.is_dyad() {
        out.push(Primitive::circle(
            Layer::Grid,
            ORIGIN,
            DYAD_ARC_RADIUS,
            Style::stroked(Stroke::dotted(Paint::new(Rgb::GREY, GRID_ALPHA), GRID_WIDTH)),
        ));
    }
    out
}

/// White disk covering the petal roots, plus the dyad level tag.
pub fn central_disk(kind: ScoreKind, options: &RenderOptions) -> Vec<Primitive> {
    let mut out = vec![Primitive::circle(
        Layer::Center,
        ORIGIN,
        options.offset_radius,
        Style::filled(Paint::opaque(Rgb::WHITE)).with_stroke(grid_stroke()),
    )];
    if let Some(level) = kind.level_label() {
        out.push(Primitive::text(
            Layer::Center,
            ORIGIN,
            level,
            TextStyle {
                font_family: options.font_family.clone(),
                size: options.font_size,
                weight: FontWeight::Bold,
                paint: Paint::opaque(Rgb::BLACK),
                rotation_degrees: 0.0,
            },
        ));
    }
    out
}

/// Half-width of the square drawing area.
pub fn canvas_extent(kind: ScoreKind, options: &RenderOptions) -> f64 {
    let annotated = options.show_coordinates || options.show_labels;
    let base = if annotated {
        EXTENT_WITH_ANNOTATIONS
    } else {
        EXTENT_BARE
    };
    if annotated && kind.is_dyad() {
        base + DYAD_EXTRA_EXTENT
    } else {
        base
    }
}

pub fn title(options: &RenderOptions, extent: f64) -> Option<Primitive> {
    let text = options.title.as_deref()?;
    Some(Primitive::text(
        Layer::Title,
        Point::new(0.0, extent + TITLE_GAP),
        text,
        TextStyle {
            font_family: options.font_family.clone(),
            size: options.title_size(),
            weight: FontWeight::Bold,
            paint: Paint::opaque(Rgb::BLACK),
            rotation_degrees: 0.0,
        },
    ))
}
