//! Drawable primitives handed to a rendering surface.

use plutchik_core::{MultiPolygon, Point, Polygon, Rgb, ScoreKind};
use serde::Serialize;

use crate::options::FontWeight;
use crate::petal::Petal;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Paint {
    pub color: Rgb,
    pub alpha: f64,
}

impl Paint {
    pub const fn new(color: Rgb, alpha: f64) -> Self {
        Self { color, alpha }
    }

    pub const fn opaque(color: Rgb) -> Self {
        Self { color, alpha: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    Solid,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f64,
    pub dash: LineDash,
}

impl Stroke {
    pub const fn solid(paint: Paint, width: f64) -> Self {
        Self {
            paint,
            width,
            dash: LineDash::Solid,
        }
    }

    pub const fn dotted(paint: Paint, width: f64) -> Self {
        Self {
            paint,
            width,
            dash: LineDash::Dotted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font_family: String,
    pub size: f64,
    pub weight: FontWeight,
    pub paint: Paint,
    /// Counterclockwise, text centred on its anchor.
    pub rotation_degrees: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextStyle>,
}

impl Style {
    pub fn filled(fill: Paint) -> Self {
        Self {
            fill: Some(fill),
            ..Self::default()
        }
    }

    pub fn stroked(stroke: Stroke) -> Self {
        Self {
            stroke: Some(stroke),
            ..Self::default()
        }
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn text(text: TextStyle) -> Self {
        Self {
            text: Some(text),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    Circle { center: Point, radius: f64 },
    Polygon { points: Vec<Point> },
    /// Open polyline; two points for a straight segment.
    Line { points: Vec<Point> },
    Text { position: Point, content: String },
}

/// Which pass of the layout produced a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Grid,
    Petal,
    Center,
    Annotation,
    Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Primitive {
    pub layer: Layer,
    #[serde(flatten)]
    pub geometry: Geometry,
    pub style: Style,
}

impl Primitive {
    pub fn circle(layer: Layer, center: Point, radius: f64, style: Style) -> Self {
        Self {
            layer,
            geometry: Geometry::Circle { center, radius },
            style,
        }
    }

    /// Exterior ring of `polygon`, without the repeated closing vertex.
    pub fn polygon(layer: Layer, polygon: &Polygon, style: Style) -> Self {
        let mut points: Vec<Point> = polygon.exterior().points().collect();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self {
            layer,
            geometry: Geometry::Polygon { points },
            style,
        }
    }

    /// One polygon primitive per part of `region`, all sharing `style`.
    pub fn region<'a>(
        layer: Layer,
        region: &'a MultiPolygon,
        style: Style,
    ) -> impl Iterator<Item = Primitive> + 'a {
        region
            .0
            .iter()
            .map(move |part| Primitive::polygon(layer, part, style.clone()))
    }

    pub fn line(layer: Layer, points: Vec<Point>, stroke: Stroke) -> Self {
        Self {
            layer,
            geometry: Geometry::Line { points },
            style: Style::stroked(stroke),
        }
    }

    pub fn text(layer: Layer, position: Point, content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            layer,
            geometry: Geometry::Text {
                position,
                content: content.into(),
            },
            style: Style::text(style),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self.geometry {
            Geometry::Circle { .. } => "circle",
            Geometry::Polygon { .. } => "polygon",
            Geometry::Line { .. } => "line",
            Geometry::Text { .. } => "text",
        }
    }
}

/// Anything that can render primitives, owned by the caller.
pub trait DrawingSurface {
    /// Half-width of the square area the flower occupies, centred on the origin.
    fn set_extent(&mut self, _extent: f64) {}

    fn draw(&mut self, primitive: &Primitive);
}

/// Records primitives in draw order.
impl DrawingSurface for Vec<Primitive> {
    fn draw(&mut self, primitive: &Primitive) {
        self.push(primitive.clone());
    }
}

/// Everything one layout call produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub kind: ScoreKind,
    pub extent: f64,
    /// Slot order.
    #[serde(skip)]
    pub petals: Vec<Petal>,
    /// Draw order.
    pub primitives: Vec<Primitive>,
}

impl LayoutResult {
    pub fn render_to<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        surface.set_extent(self.extent);
        for primitive in &self.primitives {
            surface.draw(primitive);
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn petal(&self, name: &str) -> Option<&Petal> {
        self.petals.iter().find(|p| p.category.name == name)
    }
}
