use crate::petal::{DYAD_FILL_ALPHA, OUTER_BAND_ALPHA, SHADOWED_FILL_ALPHA};
use crate::*;
use plutchik_core::{
    lookup, norm, random_scores, rotate_point, Emotion, FlowerError, Point, ScoreEntry, ScoreKind,
    ScoreMap, ScoreViolation, ORIGIN,
};
use proptest::prelude::*;

const EPS: f64 = 1e-12;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn scores<E: Into<ScoreEntry> + Copy>(pairs: &[(&str, E)]) -> ScoreMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), (*v).into()))
        .collect()
}

fn emotion_scores() -> ScoreMap {
    scores(&[
        ("joy", 0.6),
        ("trust", 0.4),
        ("fear", 0.1),
        ("surprise", 0.7),
        ("sadness", 0.1),
        ("disgust", 0.5),
        ("anger", 0.4),
        ("anticipation", 0.6),
    ])
}

fn intensity_scores() -> ScoreMap {
    scores(&[
        ("joy", [0.3, 0.2, 0.5]),
        ("trust", [0.5, 0.1, 0.0]),
        ("fear", [0.1, 0.4, 0.2]),
        ("surprise", [0.15, 0.5, 0.35]),
        ("sadness", [0.0, 0.5, 0.5]),
        ("disgust", [0.4, 0.33, 0.22]),
        ("anger", [0.43, 0.12, 0.09]),
        ("anticipation", [0.3, 0.5, 0.2]),
    ])
}

fn fills(petal: &Petal) -> Vec<Paint> {
    petal.shapes.iter().filter_map(|p| p.style.fill).collect()
}

fn centroid(points: &[Point]) -> Point {
    let n = points.len() as f64;
    let sum = points.iter().fold(ORIGIN, |acc, p| acc + *p);
    sum * (1.0 / n)
}

#[test]
fn emotion_flower_has_single_band_petals() -> anyhow::Result<()> {
    init_tracing();
    let result = layout(&emotion_scores(), &RenderOptions::default())?;
    assert_eq!(result.kind, ScoreKind::Emotions);
    assert_eq!(result.petals.len(), 8);
    assert!(result.petals.iter().all(|p| p.bands.len() == 1));

    let joy = result.petal("joy").ok_or_else(|| anyhow::anyhow!("joy missing"))?;
    assert!((joy.outer_radius() - 0.66).abs() < EPS);
    assert!((joy.bands[0].inner_radius - 0.15).abs() < EPS);
    assert_eq!(joy.bands[0].opacity_tier, OpacityTier::Full);
    Ok(())
}

#[test]
fn intensity_flower_stacks_three_bands() -> anyhow::Result<()> {
    init_tracing();
    let result = layout(&intensity_scores(), &RenderOptions::default())?;
    assert_eq!(result.kind, ScoreKind::Emotions);
    assert!(result.petals.iter().all(|p| p.bands.len() == 3));

    let joy = result.petal("joy").ok_or_else(|| anyhow::anyhow!("joy missing"))?;
    let outer: Vec<f64> = joy.bands.iter().map(|b| b.outer_radius).collect();
    assert!((outer[0] - 0.405).abs() < EPS);
    assert!((outer[1] - 0.575).abs() < EPS);
    assert!((outer[2] - 1.0).abs() < EPS);
    let tiers: Vec<OpacityTier> = joy.bands.iter().map(|b| b.opacity_tier).collect();
    assert_eq!(
        tiers,
        vec![OpacityTier::DarkerInner, OpacityTier::Full, OpacityTier::Full]
    );
    // Faded outer band, then the middle band, then the inner band and its overlay.
    let alphas: Vec<f64> = fills(joy).iter().skip(1).map(|p| p.alpha).collect();
    assert_eq!(alphas, vec![OUTER_BAND_ALPHA, 0.5, 0.5, 0.3]);
    Ok(())
}

#[test]
fn band_polygons_stay_inside_their_radius() -> anyhow::Result<()> {
    let result = layout(&intensity_scores(), &RenderOptions::default())?;
    for petal in &result.petals {
        let tip = petal.outer_radius();
        for shape in &petal.shapes {
            if let Geometry::Polygon { points } = &shape.geometry {
                let reach = points.iter().map(|p| norm(*p)).fold(0.0, f64::max);
                assert!(reach <= tip + 1e-3, "{} overshoots", petal.category.name);
            }
        }
    }
    Ok(())
}

#[test]
fn mixed_families_fail() {
    let mut map = emotion_scores();
    map.insert("love".into(), ScoreEntry::Cumulative(0.3));
    assert!(matches!(
        layout(&map, &RenderOptions::default()),
        Err(FlowerError::MixedCategoryKinds { .. })
    ));
}

#[test]
fn out_of_range_scalar_fails() {
    assert_eq!(
        layout(&scores(&[("joy", 1.5)]), &RenderOptions::default()),
        Err(FlowerError::invalid_score(
            "joy",
            ScoreViolation::ScalarOutOfRange(1.5)
        ))
    );
}

#[test]
fn scalar_just_over_one_fails() {
    let just_over = 1.0 + 5e-10;
    assert_eq!(
        layout(&scores(&[("joy", just_over)]), &RenderOptions::default()),
        Err(FlowerError::invalid_score(
            "joy",
            ScoreViolation::ScalarOutOfRange(just_over)
        ))
    );
}

#[test]
fn highlight_shadows_the_rest() -> anyhow::Result<()> {
    let options = RenderOptions {
        highlight_categories: HighlightSelection::only(["joy", "trust"]),
        ..RenderOptions::default()
    };
    let result = layout(&emotion_scores(), &options)?;
    for petal in &result.petals {
        let highlighted = matches!(petal.category.name, "joy" | "trust");
        let expected = if highlighted {
            HighlightState::Full
        } else {
            HighlightState::Shadowed
        };
        assert_eq!(petal.highlight, expected, "{}", petal.category.name);
        if !highlighted {
            assert!(petal
                .bands
                .iter()
                .all(|b| b.opacity_tier == OpacityTier::Shadowed));
            assert!(fills(petal)
                .iter()
                .skip(1)
                .all(|p| p.alpha == SHADOWED_FILL_ALPHA));
        }
        // Shadowed petals keep their labels.
        let texts = petal.annotations.iter().filter(|p| p.kind() == "text").count();
        assert_eq!(texts, 2);
    }
    Ok(())
}

#[test]
fn highlight_must_name_active_kind() {
    let options = RenderOptions {
        highlight_categories: HighlightSelection::only(["love"]),
        ..RenderOptions::default()
    };
    assert_eq!(
        layout(&emotion_scores(), &options),
        Err(FlowerError::UnknownHighlightCategory {
            category: "love".into(),
            kind: ScoreKind::Emotions,
        })
    );
    let options = RenderOptions {
        show_intensity_labels: IntensityLabels::only(["hope"]),
        ..RenderOptions::default()
    };
    assert!(matches!(
        layout(&intensity_scores(), &options),
        Err(FlowerError::UnknownIntensityLabelCategory { .. })
    ));
}

#[test]
fn option_bounds_are_enforced() {
    let bad_ratio = RenderOptions {
        height_width_ratio: 0.0,
        ..RenderOptions::default()
    };
    assert_eq!(
        layout(&emotion_scores(), &bad_ratio),
        Err(FlowerError::InvalidHeightWidthRatio(0.0))
    );
    let bad_offset = RenderOptions {
        offset_radius: 1.0,
        ..RenderOptions::default()
    };
    assert_eq!(
        layout(&emotion_scores(), &bad_offset),
        Err(FlowerError::InvalidOffsetRadius(1.0))
    );
    let bad_ceiling = RenderOptions {
        normalize: Normalization::Ceiling(-0.5),
        ..RenderOptions::default()
    };
    assert_eq!(
        layout(&emotion_scores(), &bad_ceiling),
        Err(FlowerError::InvalidNormalization(-0.5))
    );
}

#[test]
fn normalization_maps_ceiling_to_boundary() -> anyhow::Result<()> {
    let map = scores(&[
        ("joy", 0.23),
        ("trust", 0.1),
        ("fear", 0.05),
        ("anger", 0.2),
    ]);
    let classified = plutchik_core::classify(&map)?;
    let options = RenderOptions {
        normalize: Normalization::to_max(&classified),
        ..RenderOptions::default()
    };
    let result = layout(&map, &options)?;
    let radius = |name: &str| result.petal(name).map(Petal::outer_radius).unwrap_or_default();
    assert!((radius("joy") - 1.0).abs() < EPS);
    assert!(radius("trust") < radius("anger"));
    assert!(radius("fear") < radius("trust"));

    let quarter = RenderOptions {
        normalize: Normalization::Ceiling(0.25),
        ..RenderOptions::default()
    };
    let result = layout(&map, &quarter)?;
    let joy = result.petal("joy").map(Petal::outer_radius).unwrap_or_default();
    assert!((joy - (0.15 + 0.92 * 0.85)).abs() < 1e-9);
    assert!(joy < 1.0);
    Ok(())
}

#[test]
fn normalized_grid_is_relabelled() {
    let options = RenderOptions {
        normalize: Normalization::Ceiling(0.5),
        show_tick_labels: true,
        ..RenderOptions::default()
    };
    let labels: Vec<String> = grid::polar_grid(ScoreKind::Emotions, &options)
        .into_iter()
        .filter_map(|p| match p.geometry {
            Geometry::Text { content, .. } => Some(content),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["0.1", "0.2", "0.3", "0.4", "0.5"]);
    let outermost = grid::tick_scores(&options).last().copied().unwrap_or_default();
    assert!((options.score_radius(outermost) - 1.0).abs() < EPS);
}

#[test]
fn uneven_ceiling_keeps_tick_labels_distinct() {
    let options = RenderOptions {
        normalize: Normalization::Ceiling(0.3),
        show_tick_labels: true,
        ..RenderOptions::default()
    };
    let labels: Vec<String> = grid::polar_grid(ScoreKind::Emotions, &options)
        .into_iter()
        .filter_map(|p| match p.geometry {
            Geometry::Text { content, .. } => Some(content),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["0.06", "0.12", "0.18", "0.24", "0.3"]);
}

#[test]
fn tick_labels_use_fewest_distinct_decimals() {
    assert_eq!(grid::tick_labels(&[0.2, 0.4, 0.6, 0.8, 1.0]), vec!["0.2", "0.4", "0.6", "0.8", "1"]);
    assert_eq!(
        grid::tick_labels(&[0.046, 0.092, 0.138, 0.184, 0.23]),
        vec!["0.05", "0.09", "0.14", "0.18", "0.23"]
    );
    let tiny = grid::tick_labels(&[0.0002, 0.0004, 0.0006, 0.0008, 0.001]);
    assert_eq!(tiny, vec!["0.0002", "0.0004", "0.0006", "0.0008", "0.001"]);
}

#[test]
fn dyad_petals_split_into_component_colors() -> anyhow::Result<()> {
    init_tracing();
    let result = layout(&scores(&[("love", 0.8), ("alarm", 0.4)]), &RenderOptions::default())?;
    assert_eq!(result.kind, ScoreKind::PrimaryDyads);
    let love = result.petal("love").ok_or_else(|| anyhow::anyhow!("love missing"))?;

    let half = |emotion: Emotion| {
        love.shapes.iter().find_map(|p| match (&p.geometry, p.style.fill) {
            (Geometry::Polygon { points }, Some(fill))
                if fill.color == emotion.color() && fill.alpha == DYAD_FILL_ALPHA =>
            {
                Some(points.clone())
            }
            _ => None,
        })
    };
    let joy_half = half(Emotion::Joy).ok_or_else(|| anyhow::anyhow!("joy half missing"))?;
    let trust_half = half(Emotion::Trust).ok_or_else(|| anyhow::anyhow!("trust half missing"))?;

    // Undo the slot rotation: joy sits counterclockwise (left) of the spine.
    let back = -love.category.angle_radians();
    assert!(rotate_point(centroid(&joy_half), back).x() < 0.0);
    assert!(rotate_point(centroid(&trust_half), back).x() > 0.0);
    Ok(())
}

#[test]
fn dyad_flowers_carry_arcs_and_level_tag() -> anyhow::Result<()> {
    let result = layout(&scores(&[("bittersweetness", 0.5)]), &RenderOptions::default())?;
    let level = result.primitives.iter().any(|p| {
        p.layer == Layer::Center
            && matches!(&p.geometry, Geometry::Text { content, .. } if content == "opp.")
    });
    assert!(level);
    let petal = result
        .petal("bittersweetness")
        .ok_or_else(|| anyhow::anyhow!("petal missing"))?;
    let arcs = petal
        .annotations
        .iter()
        .filter(|p| matches!(&p.geometry, Geometry::Line { points } if points.len() > 2))
        .count();
    assert_eq!(arcs, 2);
    let names: Vec<&str> = petal
        .annotations
        .iter()
        .filter_map(|p| match &p.geometry {
            Geometry::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect();
    assert!(names.contains(&"joy"));
    assert!(names.contains(&"sadness"));
    assert!(names.contains(&"bittersweetness"));
    let dotted = result.primitives.iter().any(|p| {
        p.style.stroke.map(|s| s.dash) == Some(LineDash::Dotted)
    });
    assert!(dotted);
    Ok(())
}

#[test]
fn primitives_follow_layer_order() -> anyhow::Result<()> {
    let options = RenderOptions {
        title: Some("Flower".into()),
        show_tick_labels: true,
        ..RenderOptions::default()
    };
    let result = layout(&intensity_scores(), &options)?;
    let layers: Vec<Layer> = result.primitives.iter().map(|p| p.layer).collect();
    assert!(layers.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(layers.first(), Some(&Layer::Grid));
    assert_eq!(layers.last(), Some(&Layer::Title));

    let title_size = result.primitives.last().and_then(|p| p.style.text.as_ref()).map(|t| t.size);
    assert_eq!(title_size, Some(options.font_size));
    Ok(())
}

#[test]
fn petals_are_emitted_in_slot_order() -> anyhow::Result<()> {
    let result = layout(&emotion_scores(), &RenderOptions::default())?;
    let slots: Vec<u8> = result.petals.iter().map(|p| p.category.slot).collect();
    assert_eq!(slots, (0..8).collect::<Vec<u8>>());
    Ok(())
}

#[test]
fn intensity_labels_show_each_band() -> anyhow::Result<()> {
    let options = RenderOptions {
        show_intensity_labels: IntensityLabels::only(["joy"]),
        label_format: LabelFormat::Percent,
        ..RenderOptions::default()
    };
    let result = layout(&intensity_scores(), &options)?;
    let texts = |name: &str| -> Vec<String> {
        result
            .petal(name)
            .map(|p| {
                p.annotations
                    .iter()
                    .filter_map(|a| match &a.geometry {
                        Geometry::Text { content, .. } => Some(content.clone()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    };
    assert_eq!(texts("joy"), vec!["30%", "20%", "50%", "joy"]);
    assert_eq!(texts("trust"), vec!["60%", "trust"]);
    Ok(())
}

#[test]
fn bare_layout_skips_grid_and_labels() -> anyhow::Result<()> {
    let options = RenderOptions {
        show_coordinates: false,
        show_labels: false,
        ..RenderOptions::default()
    };
    let result = layout(&emotion_scores(), &options)?;
    assert!(result.primitives.iter().all(|p| p.layer != Layer::Grid));
    assert!(result.primitives.iter().all(|p| p.layer != Layer::Annotation));
    assert!(result.extent < grid::canvas_extent(ScoreKind::Emotions, &RenderOptions::default()));
    Ok(())
}

#[test]
fn zero_score_draws_no_petal() -> anyhow::Result<()> {
    let result = layout(&scores(&[("joy", 0.0), ("fear", 0.5)]), &RenderOptions::default())?;
    let joy = result.petal("joy").ok_or_else(|| anyhow::anyhow!("joy missing"))?;
    assert!(joy.shapes.is_empty());
    assert!(joy.outline.0.is_empty());
    assert!((joy.outer_radius() - 0.15).abs() < EPS);
    Ok(())
}

#[test]
fn petals_point_along_their_slot() -> anyhow::Result<()> {
    let result = layout(&emotion_scores(), &RenderOptions::default())?;
    for petal in &result.petals {
        let tip = petal
            .outline
            .0
            .iter()
            .flat_map(|polygon| polygon.exterior().points())
            .fold(ORIGIN, |far, p| if norm(p) > norm(far) { p } else { far });
        let expected = rotate_point(Point::new(0.0, petal.outer_radius()), petal.category.angle_radians());
        assert!(norm(tip - expected) < 2e-3, "{}", petal.category.name);
    }
    let joy = lookup("joy")?;
    let trust = lookup("trust")?;
    assert_eq!(joy.angle_degrees(), 0.0);
    assert_eq!(trust.angle_degrees(), -45.0);
    Ok(())
}

#[test]
fn surface_receives_primitives_in_order() -> anyhow::Result<()> {
    let mut surface: Vec<Primitive> = Vec::new();
    let result = layout_onto(&emotion_scores(), &RenderOptions::default(), &mut surface)?;
    assert_eq!(surface, result.primitives);

    let mut untouched: Vec<Primitive> = Vec::new();
    let failed = layout_onto(&scores(&[("joy", 2.0)]), &RenderOptions::default(), &mut untouched);
    assert!(failed.is_err());
    assert!(untouched.is_empty());
    Ok(())
}

#[test]
fn options_load_from_json() -> anyhow::Result<()> {
    let options = RenderOptions::from_json_str(
        r#"{
            "highlight_categories": ["Joy", "sadness"],
            "show_intensity_labels": "all",
            "normalize": 0.5,
            "label_format": "percent",
            "title": "Reviews"
        }"#,
    )?;
    assert!(options.highlight_categories.includes("joy"));
    assert!(!options.highlight_categories.includes("fear"));
    assert_eq!(options.show_intensity_labels, IntensityLabels::All);
    assert_eq!(options.normalize, Normalization::Ceiling(0.5));
    assert_eq!(options.offset_radius, 0.15);
    assert_eq!(options.title_size(), 15.0);

    let off = RenderOptions::from_json_str(r#"{"normalize": false}"#)?;
    assert_eq!(off.normalize, Normalization::Off);
    assert!(matches!(
        RenderOptions::from_json_str(r#"{"highlight_categories": "some"}"#),
        Err(FlowerError::MalformedJson(_))
    ));
    assert!(matches!(
        RenderOptions::from_json_str(r#"{"offset_radius": 0}"#),
        Err(FlowerError::InvalidOffsetRadius(_))
    ));
    Ok(())
}

#[test]
fn layout_serializes_with_kind_tags() -> anyhow::Result<()> {
    let result = layout(&scores(&[("joy", 0.5)]), &RenderOptions::default())?;
    let json: serde_json::Value = serde_json::from_str(&result.to_json()?)?;
    let first = &json["primitives"][0];
    assert_eq!(first["kind"], "circle");
    assert_eq!(first["layer"], "grid");
    assert_eq!(json["kind"], "emotions");
    Ok(())
}

#[test]
fn random_flowers_lay_out() -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    for kind in ScoreKind::ALL {
        for _ in 0..10 {
            let map = random_scores(kind, &mut rng);
            let result = layout(&map, &RenderOptions::default())?;
            assert_eq!(result.kind, kind);
            assert_eq!(result.petals.len(), kind.categories().len());
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn scalar_radius_is_monotone(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let joy = lookup("joy").map_err(|e| TestCaseError::fail(e.to_string()))?;
        let options = RenderOptions::default();
        let ra = build_petal(joy, &ScoreEntry::Cumulative(a), &options)
            .map_err(|e| TestCaseError::fail(e.to_string()))?
            .outer_radius();
        let rb = build_petal(joy, &ScoreEntry::Cumulative(b), &options)
            .map_err(|e| TestCaseError::fail(e.to_string()))?
            .outer_radius();
        if a < b {
            prop_assert!(ra <= rb);
        }
        prop_assert!((options.score_radius(0.0) - 0.15).abs() < EPS);
        prop_assert!((options.score_radius(1.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn bands_are_ordered_and_match_total(a in 0.0f64..0.33, b in 0.0f64..0.33, c in 0.0f64..0.33) {
        let fear = lookup("fear").map_err(|e| TestCaseError::fail(e.to_string()))?;
        let options = RenderOptions::default();
        let banded = build_petal(fear, &ScoreEntry::Intensities([a, b, c]), &options)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let scalar = build_petal(fear, &ScoreEntry::Cumulative(a + b + c), &options)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(banded.bands.len(), 3);
        for band in &banded.bands {
            prop_assert!(band.inner_radius <= band.outer_radius);
        }
        for pair in banded.bands.windows(2) {
            prop_assert!((pair[0].outer_radius - pair[1].inner_radius).abs() < EPS);
        }
        prop_assert!((banded.outer_radius() - scalar.outer_radius()).abs() < EPS);
    }

    #[test]
    fn normalization_preserves_order(s1 in 0.0f64..0.5, gap in 0.001f64..0.5, headroom in 0.0f64..2.0) {
        let s2 = s1 + gap;
        let options = RenderOptions {
            normalize: Normalization::Ceiling(s2 + headroom),
            ..RenderOptions::default()
        };
        prop_assert!(options.score_radius(s1) < options.score_radius(s2));
    }
}
