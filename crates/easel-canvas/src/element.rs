//! Canvas Element Types
//!
//! This module defines the element model for the Easel canvas. An element is
//! a positioned visual object: text, image, shape, video, audio, or the
//! background template that sits beneath everything else. The kind set is
//! closed; classification is an exhaustive match on the tagged enum rather
//! than marker-attribute inspection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default canvas z layer for text elements
pub const TEXT_Z_ORDER: i32 = 10;
/// Default canvas z layer for image elements
pub const IMAGE_Z_ORDER: i32 = 5;
/// Default canvas z layer for shape elements
pub const SHAPE_Z_ORDER: i32 = 8;
/// Default canvas z layer for video and audio elements
pub const MEDIA_Z_ORDER: i32 = 5;
/// The background template is always the bottom layer
pub const BACKGROUND_Z_ORDER: i32 = 0;

/// Element kinds, as a closed tag set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    /// Literal text
    Text,
    /// Raster image
    Image,
    /// Simple vector shape
    Shape,
    /// Video clip
    Video,
    /// Audio clip
    Audio,
    /// Full-bleed background template image
    BackgroundTemplate,
}

impl ElementKind {
    /// Get the string representation (matches the stored `kind` tag)
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Shape => "shape",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::BackgroundTemplate => "background-template",
        }
    }

    /// Check if this kind references external media rather than literal content
    #[must_use]
    pub fn is_media(&self) -> bool {
        matches!(
            self,
            Self::Image | Self::Video | Self::Audio | Self::BackgroundTemplate
        )
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position, size and basic visual transform of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// X position in canvas pixels
    pub x: f64,
    /// Y position in canvas pixels
    pub y: f64,
    /// Width in pixels; `None` means size-to-content
    #[serde(default)]
    pub width: Option<f64>,
    /// Height in pixels; `None` means size-to-content
    #[serde(default)]
    pub height: Option<f64>,
    /// Rotation in degrees, normalized to [0, 360)
    #[serde(default)]
    pub rotation_deg: f64,
    /// Opacity in [0.0, 1.0]
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
            rotation_deg: 0.0,
            opacity: 1.0,
        }
    }
}

impl Geometry {
    /// Create a geometry at a position with size-to-content dimensions
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Set the size
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the rotation in degrees
    #[must_use]
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_deg = degrees.rem_euclid(360.0);
        self
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left aligned (default)
    #[default]
    Left,
    /// Centered
    Center,
    /// Right aligned
    Right,
}

impl TextAlign {
    /// CSS value for this alignment
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Presentation attributes for text elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font family name
    pub font_family: String,
    /// Font size in pixels
    pub font_size: f64,
    /// Bold weight
    pub bold: bool,
    /// Italic style
    pub italic: bool,
    /// Underline decoration
    pub underline: bool,
    /// Horizontal alignment
    pub align: TextAlign,
    /// Text color (CSS color string)
    pub color: String,
    /// Background fill behind the text, if any
    pub background: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 16.0,
            bold: false,
            italic: false,
            underline: false,
            align: TextAlign::Left,
            color: "#ffffff".to_string(),
            background: None,
        }
    }
}

/// Image filter effects, a closed set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFilter {
    /// No filter (default)
    #[default]
    None,
    /// Full grayscale
    Grayscale,
    /// Sepia tone
    Sepia,
    /// Slight blur
    Blur,
    /// Brightness boost
    Brightness,
    /// Contrast boost
    Contrast,
    /// Saturation boost
    Saturate,
}

impl ImageFilter {
    /// CSS `filter` value for this effect
    #[must_use]
    pub fn css_value(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Grayscale => "grayscale(100%)",
            Self::Sepia => "sepia(100%)",
            Self::Blur => "blur(2px)",
            Self::Brightness => "brightness(150%)",
            Self::Contrast => "contrast(150%)",
            Self::Saturate => "saturate(200%)",
        }
    }
}

/// Presentation attributes for image elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageStyle {
    /// Border shorthand (CSS), if any
    pub border: Option<String>,
    /// Border radius (CSS), if any
    pub border_radius: Option<String>,
    /// Box shadow (CSS), if any
    pub shadow: Option<String>,
    /// Filter effect
    pub filter: ImageFilter,
    /// Mirrored horizontally
    pub flip_h: bool,
    /// Mirrored vertically
    pub flip_v: bool,
}

/// Shape variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle
    Rectangle,
    /// Circle
    Circle,
}

/// Kind-dependent payload of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ElementContent {
    /// Literal text with its presentation
    Text {
        /// The text itself
        content: String,
        /// Text presentation attributes
        #[serde(default)]
        style: TextStyle,
    },

    /// Image with its presentation
    Image {
        /// Resource locator (URL or embedded data blob)
        src: String,
        /// Image presentation attributes
        #[serde(default)]
        style: ImageStyle,
    },

    /// Simple vector shape
    Shape {
        /// Shape variant
        shape: ShapeKind,
        /// Fill color (CSS color string)
        #[serde(default = "default_fill")]
        fill: String,
    },

    /// Video clip
    Video {
        /// Resource locator
        src: String,
        /// Display name (original file name)
        #[serde(default)]
        name: String,
    },

    /// Audio clip
    Audio {
        /// Resource locator
        src: String,
        /// Display name (original file name)
        #[serde(default)]
        name: String,
    },

    /// Background template image, rendered beneath all other elements
    BackgroundTemplate {
        /// Resource locator
        src: String,
        /// Template display name
        #[serde(default)]
        name: String,
    },
}

fn default_fill() -> String {
    "#667eea".to_string()
}

impl ElementContent {
    /// Get the element kind for this payload
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Text { .. } => ElementKind::Text,
            Self::Image { .. } => ElementKind::Image,
            Self::Shape { .. } => ElementKind::Shape,
            Self::Video { .. } => ElementKind::Video,
            Self::Audio { .. } => ElementKind::Audio,
            Self::BackgroundTemplate { .. } => ElementKind::BackgroundTemplate,
        }
    }
}

/// A positioned visual object on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    /// Unique identifier, stable across save/restore
    pub id: Uuid,

    /// Kind-dependent payload (serialized under the `kind` tag)
    #[serde(flatten)]
    pub content: ElementContent,

    /// Position, size and transform
    #[serde(default)]
    pub geometry: Geometry,

    /// Stacking order; ties broken by insertion order
    #[serde(default)]
    pub z_order: i32,

    /// Open mapping of auxiliary tags (e.g. `text-type` = script/narration)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl CanvasElement {
    /// Create a new text element at a position with default styling
    #[must_use]
    pub fn text(content: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: ElementContent::Text {
                content: content.into(),
                style: TextStyle::default(),
            },
            geometry: Geometry::at(x, y),
            z_order: TEXT_Z_ORDER,
            attributes: BTreeMap::new(),
        }
    }

    /// Create a new image element at a position (default 150x150)
    #[must_use]
    pub fn image(src: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: ElementContent::Image {
                src: src.into(),
                style: ImageStyle::default(),
            },
            geometry: Geometry::at(x, y).with_size(150.0, 150.0),
            z_order: IMAGE_Z_ORDER,
            attributes: BTreeMap::new(),
        }
    }

    /// Create a new shape element at a position
    ///
    /// Circles default to 80x80, rectangles to 120x80.
    #[must_use]
    pub fn shape(shape: ShapeKind, x: f64, y: f64) -> Self {
        let geometry = match shape {
            ShapeKind::Circle => Geometry::at(x, y).with_size(80.0, 80.0),
            ShapeKind::Rectangle => Geometry::at(x, y).with_size(120.0, 80.0),
        };
        Self {
            id: Uuid::new_v4(),
            content: ElementContent::Shape {
                shape,
                fill: default_fill(),
            },
            geometry,
            z_order: SHAPE_Z_ORDER,
            attributes: BTreeMap::new(),
        }
    }

    /// Create a new video element at a position
    #[must_use]
    pub fn video(src: impl Into<String>, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: ElementContent::Video {
                src: src.into(),
                name: name.into(),
            },
            geometry: Geometry::at(x, y).with_size(320.0, 180.0),
            z_order: MEDIA_Z_ORDER,
            attributes: BTreeMap::new(),
        }
    }

    /// Create a new audio element at a position
    #[must_use]
    pub fn audio(src: impl Into<String>, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: ElementContent::Audio {
                src: src.into(),
                name: name.into(),
            },
            geometry: Geometry::at(x, y),
            z_order: MEDIA_Z_ORDER,
            attributes: BTreeMap::new(),
        }
    }

    /// Create a background template element (full-bleed, bottom layer)
    #[must_use]
    pub fn background_template(src: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: ElementContent::BackgroundTemplate {
                src: src.into(),
                name: name.into(),
            },
            geometry: Geometry::default(),
            z_order: BACKGROUND_Z_ORDER,
            attributes: BTreeMap::new(),
        }
    }

    /// Replace the generated id
    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Set the z order
    #[must_use]
    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    /// Attach an auxiliary attribute
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get the element kind
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    /// Check whether this is the background template layer
    #[must_use]
    pub fn is_background_template(&self) -> bool {
        self.kind() == ElementKind::BackgroundTemplate
    }

    /// Get the primary content: literal text for text elements, the
    /// resource locator for everything that references media
    #[must_use]
    pub fn content_str(&self) -> &str {
        match &self.content {
            ElementContent::Text { content, .. } => content,
            ElementContent::Image { src, .. }
            | ElementContent::Video { src, .. }
            | ElementContent::Audio { src, .. }
            | ElementContent::BackgroundTemplate { src, .. } => src,
            ElementContent::Shape { fill, .. } => fill,
        }
    }

    /// Replace the primary content in place
    pub fn set_content(&mut self, new_content: impl Into<String>) {
        let new_content = new_content.into();
        match &mut self.content {
            ElementContent::Text { content, .. } => *content = new_content,
            ElementContent::Image { src, .. }
            | ElementContent::Video { src, .. }
            | ElementContent::Audio { src, .. }
            | ElementContent::BackgroundTemplate { src, .. } => *src = new_content,
            ElementContent::Shape { fill, .. } => *fill = new_content,
        }
    }

    /// Move the element to an absolute position
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.geometry.x = x;
        self.geometry.y = y;
    }

    /// Move the element by a relative offset
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.geometry.x += dx;
        self.geometry.y += dy;
    }

    /// Set opacity, clamped to [0.0, 1.0]
    pub fn set_opacity(&mut self, opacity: f64) {
        self.geometry.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Rotate by a relative angle, wrapping at 360 degrees
    pub fn rotate_by(&mut self, degrees: f64) {
        self.geometry.rotation_deg = (self.geometry.rotation_deg + degrees).rem_euclid(360.0);
    }

    /// Mutable access to the text style, if this is a text element
    pub fn text_style_mut(&mut self) -> Option<&mut TextStyle> {
        match &mut self.content {
            ElementContent::Text { style, .. } => Some(style),
            _ => None,
        }
    }

    /// Mutable access to the image style, if this is an image element
    pub fn image_style_mut(&mut self) -> Option<&mut ImageStyle> {
        match &mut self.content {
            ElementContent::Image { style, .. } => Some(style),
            _ => None,
        }
    }
}
