//! Render configuration. Every option has a documented default and can be
//! loaded from JSON; sentinel values such as `"all"` map to typed variants.

use plutchik_core::{Classified, FlowerError, ScoreKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Radius of the neutral centre every petal starts from. Must lie in (0, 1).
    pub offset_radius: f64,
    /// Lower values give fatter petals. Must be positive.
    pub height_width_ratio: f64,
    /// Categories drawn at full opacity; the rest are shadowed.
    pub highlight_categories: HighlightSelection,
    /// Categories whose three intensities are printed instead of their sum.
    pub show_intensity_labels: IntensityLabels,
    /// Concentric grid circles, spines and dyad arcs.
    pub show_coordinates: bool,
    /// Category names and score labels.
    pub show_labels: bool,
    pub show_tick_labels: bool,
    pub tick_label_angle_radians: f64,
    pub tick_label_size: f64,
    pub normalize: Normalization,
    pub label_format: LabelFormat,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub title: Option<String>,
    /// Falls back to `font_size`.
    pub title_size: Option<f64>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            offset_radius: 0.15,
            height_width_ratio: 1.0,
            highlight_categories: HighlightSelection::All,
            show_intensity_labels: IntensityLabels::None,
            show_coordinates: true,
            show_labels: true,
            show_tick_labels: false,
            tick_label_angle_radians: 0.0,
            tick_label_size: 11.0,
            normalize: Normalization::Off,
            label_format: LabelFormat::Value,
            font_family: "sans-serif".to_string(),
            font_size: 15.0,
            font_weight: FontWeight::Light,
            title: None,
            title_size: None,
        }
    }
}

impl RenderOptions {
    pub fn from_json_str(json: &str) -> Result<Self, FlowerError> {
        let options: RenderOptions =
            serde_json::from_str(json).map_err(|e| FlowerError::MalformedJson(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Checks the options that do not depend on the score kind.
    pub fn validate(&self) -> Result<(), FlowerError> {
        let offset = self.offset_radius;
        if !(offset > 0.0 && offset < 1.0) {
            return Err(FlowerError::InvalidOffsetRadius(offset));
        }
        let ratio = self.height_width_ratio;
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(FlowerError::InvalidHeightWidthRatio(ratio));
        }
        if let Normalization::Ceiling(ceiling) = self.normalize {
            if !(ceiling.is_finite() && ceiling > 0.0) {
                return Err(FlowerError::InvalidNormalization(ceiling));
            }
        }
        Ok(())
    }

    /// Checks that every named category belongs to `kind`.
    pub fn validate_selections(&self, kind: ScoreKind) -> Result<(), FlowerError> {
        let in_kind = |name: &str| kind.categories().iter().any(|spec| spec.name == name);
        if let HighlightSelection::Only(names) = &self.highlight_categories {
            if let Some(name) = names.iter().find(|n| !in_kind(n)) {
                return Err(FlowerError::UnknownHighlightCategory {
                    category: name.clone(),
                    kind,
                });
            }
        }
        if let IntensityLabels::Only(names) = &self.show_intensity_labels {
            if let Some(name) = names.iter().find(|n| !in_kind(n)) {
                return Err(FlowerError::UnknownIntensityLabelCategory {
                    category: name.clone(),
                    kind,
                });
            }
        }
        Ok(())
    }

    /// Radius reached by a cumulative `score`, after normalization.
    pub fn score_radius(&self, score: f64) -> f64 {
        let offset = self.offset_radius;
        offset + self.normalize.apply(score) * (1.0 - offset)
    }

    /// Score whose petal reaches the outer drawing boundary.
    pub fn full_scale_score(&self) -> f64 {
        match self.normalize {
            Normalization::Off => 1.0,
            Normalization::Ceiling(ceiling) => ceiling,
        }
    }

    pub fn title_size(&self) -> f64 {
        self.title_size.unwrap_or(self.font_size)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "SelectionRepr", into = "SelectionRepr")]
pub enum HighlightSelection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl HighlightSelection {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        HighlightSelection::Only(canonical_names(names))
    }

    pub fn includes(&self, name: &str) -> bool {
        match self {
            HighlightSelection::All => true,
            HighlightSelection::Only(names) => names.contains(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "SelectionRepr", into = "SelectionRepr")]
pub enum IntensityLabels {
    #[default]
    None,
    All,
    Only(BTreeSet<String>),
}

impl IntensityLabels {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        IntensityLabels::Only(canonical_names(names))
    }

    pub fn includes(&self, name: &str) -> bool {
        match self {
            IntensityLabels::None => false,
            IntensityLabels::All => true,
            IntensityLabels::Only(names) => names.contains(name),
        }
    }
}

fn canonical_names<I, S>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().trim().to_lowercase())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum SelectionRepr {
    Keyword(String),
    Names(Vec<String>),
}

impl TryFrom<SelectionRepr> for HighlightSelection {
    type Error = String;

    fn try_from(repr: SelectionRepr) -> Result<Self, Self::Error> {
        match repr {
            SelectionRepr::Keyword(k) if k.eq_ignore_ascii_case("all") => Ok(HighlightSelection::All),
            SelectionRepr::Keyword(k) => Err(format!("expected \"all\" or a list of names, got \"{k}\"")),
            SelectionRepr::Names(names) => Ok(HighlightSelection::only(names)),
        }
    }
}

impl From<HighlightSelection> for SelectionRepr {
    fn from(selection: HighlightSelection) -> Self {
        match selection {
            HighlightSelection::All => SelectionRepr::Keyword("all".into()),
            HighlightSelection::Only(names) => SelectionRepr::Names(names.into_iter().collect()),
        }
    }
}

impl TryFrom<SelectionRepr> for IntensityLabels {
    type Error = String;

    fn try_from(repr: SelectionRepr) -> Result<Self, Self::Error> {
        match repr {
            SelectionRepr::Keyword(k) if k.eq_ignore_ascii_case("none") => Ok(IntensityLabels::None),
            SelectionRepr::Keyword(k) if k.eq_ignore_ascii_case("all") => Ok(IntensityLabels::All),
            SelectionRepr::Keyword(k) => {
                Err(format!("expected \"none\", \"all\" or a list of names, got \"{k}\""))
            }
            SelectionRepr::Names(names) => Ok(IntensityLabels::only(names)),
        }
    }
}

impl From<IntensityLabels> for SelectionRepr {
    fn from(labels: IntensityLabels) -> Self {
        match labels {
            IntensityLabels::None => SelectionRepr::Keyword("none".into()),
            IntensityLabels::All => SelectionRepr::Keyword("all".into()),
            IntensityLabels::Only(names) => SelectionRepr::Names(names.into_iter().collect()),
        }
    }
}

/// Optional rescaling so that score `ceiling` reaches the outer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "NormalizationRepr", into = "NormalizationRepr")]
pub enum Normalization {
    #[default]
    Off,
    /// Score that lands exactly on the outer boundary; every radius is
    /// scaled by `1 / ceiling`. To put the highest-scoring category on the
    /// boundary, pass `Classified::max_total()` from `plutchik_core::classify`.
    Ceiling(f64),
}

impl Normalization {
    /// Ceiling equal to the largest cumulative score in `classified`.
    pub fn to_max(classified: &Classified) -> Self {
        Normalization::Ceiling(classified.max_total())
    }

    pub fn apply(self, score: f64) -> f64 {
        match self {
            Normalization::Off => score,
            Normalization::Ceiling(ceiling) => score / ceiling,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum NormalizationRepr {
    Ceiling(f64),
    Flag(bool),
    Keyword(String),
}

impl TryFrom<NormalizationRepr> for Normalization {
    type Error = String;

    fn try_from(repr: NormalizationRepr) -> Result<Self, Self::Error> {
        match repr {
            NormalizationRepr::Ceiling(ceiling) => Ok(Normalization::Ceiling(ceiling)),
            NormalizationRepr::Flag(false) => Ok(Normalization::Off),
            NormalizationRepr::Keyword(k) if k.eq_ignore_ascii_case("off") => Ok(Normalization::Off),
            other => Err(format!("expected \"off\" or a positive number, got {other:?}")),
        }
    }
}

impl From<Normalization> for NormalizationRepr {
    fn from(normalization: Normalization) -> Self {
        match normalization {
            Normalization::Off => NormalizationRepr::Keyword("off".into()),
            Normalization::Ceiling(ceiling) => NormalizationRepr::Ceiling(ceiling),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelFormat {
    /// Two decimals, e.g. `0.66`.
    #[default]
    Value,
    /// Whole percent, e.g. `66%`.
    Percent,
}

impl LabelFormat {
    pub fn format(self, score: f64) -> String {
        match self {
            LabelFormat::Value => format!("{score:.2}"),
            LabelFormat::Percent => format!("{:.0}%", score * 100.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Light,
    Regular,
    Demibold,
    Bold,
}
