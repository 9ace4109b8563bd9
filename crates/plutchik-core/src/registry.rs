//! Static category tables: the eight emotions and the four dyad families.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::error::FlowerError;

/// Angular distance between neighbouring slots, in degrees.
pub const SLOT_STEP_DEGREES: f64 = 45.0;

pub const SLOT_COUNT: usize = 8;

/// Opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    pub const WHITE: Rgb = Rgb::from_hex(0xffffff);
    pub const BLACK: Rgb = Rgb::from_hex(0x000000);
    pub const GREY: Rgb = Rgb::from_hex(0x808080);
    pub const LIGHT_GREY: Rgb = Rgb::from_hex(0xd3d3d3);
    pub const CHARCOAL: Rgb = Rgb::from_hex(0x363636);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Trust,
    Fear,
    Surprise,
    Sadness,
    Disgust,
    Anger,
    Anticipation,
}

impl Emotion {
    pub const ALL: [Emotion; 8] = [
        Emotion::Joy,
        Emotion::Trust,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Sadness,
        Emotion::Disgust,
        Emotion::Anger,
        Emotion::Anticipation,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Trust => "trust",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Sadness => "sadness",
            Emotion::Disgust => "disgust",
            Emotion::Anger => "anger",
            Emotion::Anticipation => "anticipation",
        }
    }

    pub const fn color(self) -> Rgb {
        match self {
            Emotion::Joy => Rgb::from_hex(0xffd700),          // gold
            Emotion::Trust => Rgb::from_hex(0x6b8e23),        // olive drab
            Emotion::Fear => Rgb::from_hex(0x228b22),         // forest green
            Emotion::Surprise => Rgb::from_hex(0x87ceeb),     // sky blue
            Emotion::Sadness => Rgb::from_hex(0x1e90ff),      // dodger blue
            Emotion::Disgust => Rgb::from_hex(0x6a5acd),      // slate blue
            Emotion::Anger => Rgb::from_hex(0xff4500),        // orange red
            Emotion::Anticipation => Rgb::from_hex(0xff8c00), // dark orange
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The five mutually exclusive score families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    Emotions,
    PrimaryDyads,
    SecondaryDyads,
    TertiaryDyads,
    OppositeDyads,
}

impl ScoreKind {
    /// Classification priority order.
    pub const ALL: [ScoreKind; 5] = [
        ScoreKind::Emotions,
        ScoreKind::PrimaryDyads,
        ScoreKind::SecondaryDyads,
        ScoreKind::TertiaryDyads,
        ScoreKind::OppositeDyads,
    ];

    pub fn is_dyad(self) -> bool {
        self != ScoreKind::Emotions
    }

    /// Direction of slot 0, in degrees clockwise-negative from "up".
    pub fn phase_degrees(self) -> f64 {
        match self {
            ScoreKind::Emotions | ScoreKind::SecondaryDyads | ScoreKind::OppositeDyads => 0.0,
            ScoreKind::PrimaryDyads | ScoreKind::TertiaryDyads => -SLOT_STEP_DEGREES / 2.0,
        }
    }

    /// Tag printed at the wheel centre for dyad flowers.
    pub fn level_label(self) -> Option<&'static str> {
        match self {
            ScoreKind::Emotions => None,
            ScoreKind::PrimaryDyads => Some("1"),
            ScoreKind::SecondaryDyads => Some("2"),
            ScoreKind::TertiaryDyads => Some("3"),
            ScoreKind::OppositeDyads => Some("opp."),
        }
    }

    pub fn categories(self) -> &'static [CategorySpec] {
        match self {
            ScoreKind::Emotions => &EMOTIONS,
            ScoreKind::PrimaryDyads => &PRIMARY_DYADS,
            ScoreKind::SecondaryDyads => &SECONDARY_DYADS,
            ScoreKind::TertiaryDyads => &TERTIARY_DYADS,
            ScoreKind::OppositeDyads => &OPPOSITE_DYADS,
        }
    }
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreKind::Emotions => "emotions",
            ScoreKind::PrimaryDyads => "primary dyads",
            ScoreKind::SecondaryDyads => "secondary dyads",
            ScoreKind::TertiaryDyads => "tertiary dyads",
            ScoreKind::OppositeDyads => "opposite dyads",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Palette {
    Single(Rgb),
    /// Colors of a dyad's two component emotions, in component order.
    Pair(Rgb, Rgb),
}

impl Palette {
    pub fn primary(self) -> Rgb {
        match self {
            Palette::Single(c) | Palette::Pair(c, _) => c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategorySpec {
    pub name: &'static str,
    pub slot: u8,
    pub kind: ScoreKind,
    pub palette: Palette,
    /// Component emotions for dyads.
    pub components: Option<(Emotion, Emotion)>,
}

impl CategorySpec {
    const fn emotion(emotion: Emotion, slot: u8) -> Self {
        Self {
            name: emotion.name(),
            slot,
            kind: ScoreKind::Emotions,
            palette: Palette::Single(emotion.color()),
            components: None,
        }
    }

    const fn dyad(name: &'static str, kind: ScoreKind, slot: u8, a: Emotion, b: Emotion) -> Self {
        Self {
            name,
            slot,
            kind,
            palette: Palette::Pair(a.color(), b.color()),
            components: Some((a, b)),
        }
    }

    /// Spine direction in degrees; negative turns clockwise from "up".
    pub fn angle_degrees(&self) -> f64 {
        self.kind.phase_degrees() - SLOT_STEP_DEGREES * f64::from(self.slot)
    }

    /// Rotation that carries an upward-pointing petal onto this slot.
    pub fn angle_radians(&self) -> f64 {
        self.angle_degrees().to_radians()
    }

    pub fn is_dyad(&self) -> bool {
        self.components.is_some()
    }
}

use Emotion::*;
use ScoreKind::*;

pub static EMOTIONS: [CategorySpec; 8] = [
    CategorySpec::emotion(Joy, 0),
    CategorySpec::emotion(Trust, 1),
    CategorySpec::emotion(Fear, 2),
    CategorySpec::emotion(Surprise, 3),
    CategorySpec::emotion(Sadness, 4),
    CategorySpec::emotion(Disgust, 5),
    CategorySpec::emotion(Anger, 6),
    CategorySpec::emotion(Anticipation, 7),
];

pub static PRIMARY_DYADS: [CategorySpec; 8] = [
    CategorySpec::dyad("love", PrimaryDyads, 0, Joy, Trust),
    CategorySpec::dyad("submission", PrimaryDyads, 1, Trust, Fear),
    CategorySpec::dyad("alarm", PrimaryDyads, 2, Fear, Surprise),
    CategorySpec::dyad("disappointment", PrimaryDyads, 3, Surprise, Sadness),
    CategorySpec::dyad("remorse", PrimaryDyads, 4, Sadness, Disgust),
    CategorySpec::dyad("contempt", PrimaryDyads, 5, Disgust, Anger),
    CategorySpec::dyad("aggressiveness", PrimaryDyads, 6, Anger, Anticipation),
    CategorySpec::dyad("optimism", PrimaryDyads, 7, Anticipation, Joy),
];

pub static SECONDARY_DYADS: [CategorySpec; 8] = [
    CategorySpec::dyad("hope", SecondaryDyads, 0, Anticipation, Trust),
    CategorySpec::dyad("guilt", SecondaryDyads, 1, Joy, Fear),
    CategorySpec::dyad("curiosity", SecondaryDyads, 2, Trust, Surprise),
    CategorySpec::dyad("despair", SecondaryDyads, 3, Fear, Sadness),
    CategorySpec::dyad("unbelief", SecondaryDyads, 4, Surprise, Disgust),
    CategorySpec::dyad("envy", SecondaryDyads, 5, Sadness, Anger),
    CategorySpec::dyad("cynism", SecondaryDyads, 6, Disgust, Anticipation),
    CategorySpec::dyad("pride", SecondaryDyads, 7, Anger, Joy),
];

pub static TERTIARY_DYADS: [CategorySpec; 8] = [
    CategorySpec::dyad("anxiety", TertiaryDyads, 0, Anticipation, Fear),
    CategorySpec::dyad("delight", TertiaryDyads, 1, Joy, Surprise),
    CategorySpec::dyad("sentimentality", TertiaryDyads, 2, Trust, Sadness),
    CategorySpec::dyad("shame", TertiaryDyads, 3, Fear, Disgust),
    CategorySpec::dyad("outrage", TertiaryDyads, 4, Surprise, Anger),
    CategorySpec::dyad("pessimism", TertiaryDyads, 5, Sadness, Anticipation),
    CategorySpec::dyad("morbidness", TertiaryDyads, 6, Disgust, Joy),
    CategorySpec::dyad("dominance", TertiaryDyads, 7, Anger, Trust),
];

/// Opposites pair each emotion with the one across the wheel, so there are four.
pub static OPPOSITE_DYADS: [CategorySpec; 4] = [
    CategorySpec::dyad("bittersweetness", OppositeDyads, 0, Joy, Sadness),
    CategorySpec::dyad("ambivalence", OppositeDyads, 1, Trust, Disgust),
    CategorySpec::dyad("frozenness", OppositeDyads, 2, Fear, Anger),
    CategorySpec::dyad("confusion", OppositeDyads, 3, Surprise, Anticipation),
];

/// Name index over every table, built on first lookup.
pub struct Registry {
    by_name: HashMap<&'static str, &'static CategorySpec>,
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::build);

impl Registry {
    fn build() -> Self {
        let by_name = ScoreKind::ALL
            .iter()
            .flat_map(|kind| kind.categories())
            .map(|spec| (spec.name, spec))
            .collect();
        Self { by_name }
    }

    pub fn global() -> &'static Registry {
        &REGISTRY
    }

    pub fn get(&self, name: &str) -> Option<&'static CategorySpec> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Any category, emotion or dyad.
pub fn lookup(name: &str) -> Result<&'static CategorySpec, FlowerError> {
    Registry::global()
        .get(name)
        .ok_or_else(|| FlowerError::UnknownCategory(name.to_string()))
}

pub fn lookup_emotion(name: &str) -> Result<&'static CategorySpec, FlowerError> {
    match lookup(name)? {
        spec if spec.kind == ScoreKind::Emotions => Ok(spec),
        _ => Err(FlowerError::UnknownCategory(name.to_string())),
    }
}

pub fn lookup_dyad(name: &str) -> Result<&'static CategorySpec, FlowerError> {
    match lookup(name)? {
        spec if spec.is_dyad() => Ok(spec),
        _ => Err(FlowerError::UnknownCategory(name.to_string())),
    }
}
