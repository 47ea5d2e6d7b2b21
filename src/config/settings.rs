use std::borrow::Cow;

use glam::Vec3;
use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

use super::color::Color;
use crate::util::easing::EasingFunction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Settings", inline)]
#[serde(default, rename_all = "camelCase")]
/// Interaction behavior and the hotspot list.
pub struct SettingsConfig {
    /// Spin the camera around the target while idle.
    pub auto_rotate: bool,
    /// Auto-rotate speed; 2.0 is one revolution every 30 seconds.
    #[schemars(range(min = 0.0, max = 20.0))]
    pub rotate_speed: f32,
    /// Allow the user to orbit, pan and zoom.
    pub enable_controls: bool,
    /// Show on-screen UI controls. Parsed but not acted on.
    #[serde(rename = "showUIControls")]
    pub show_ui_controls: bool,
    /// Draw hotspots as numbered badges instead of shapes.
    pub number_hotspots: bool,
    /// Projection and control tuning.
    pub camera: CameraOptions,
    /// Ordered hotspot list.
    pub hotspots: Vec<HotspotConfig>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            auto_rotate: false,
            rotate_speed: 2.0,
            enable_controls: true,
            show_ui_controls: true,
            number_hotspots: false,
            camera: CameraOptions::default(),
            hotspots: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default, rename_all = "camelCase")]
/// Camera projection, control sensitivity and transition parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 120.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Drag-to-orbit sensitivity.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 5.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Drag-to-pan sensitivity.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 5.0), extend("step" = 0.05))]
    pub pan_speed: f32,
    /// Scroll-to-zoom sensitivity.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Fraction of the remaining orbit motion applied per frame; 0 disables
    /// inertia.
    #[schemars(range(min = 0.0, max = 1.0))]
    pub damping_factor: f32,
    /// Length of a scripted camera transition in milliseconds.
    pub transition_ms: u64,
    /// Easing curve of scripted camera transitions.
    pub easing: EasingFunction,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 0.1,
            damping_factor: 0.05,
            transition_ms: 1500,
            easing: EasingFunction::CubicInOut,
        }
    }
}

/// Marker geometry. Any unrecognized name falls back to a sphere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HotspotShape {
    /// Cube with edge length `size`.
    Box,
    /// Sphere with radius `size`.
    #[default]
    Sphere,
}

impl From<String> for HotspotShape {
    fn from(name: String) -> Self {
        if name.eq_ignore_ascii_case("box") {
            Self::Box
        } else {
            Self::Sphere
        }
    }
}

impl JsonSchema for HotspotShape {
    fn schema_name() -> Cow<'static, str> {
        "HotspotShape".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "description": "\"box\" or \"sphere\"; anything else is drawn as a sphere",
            "examples": ["sphere", "box"]
        })
    }
}

impl From<HotspotShape> for String {
    fn from(shape: HotspotShape) -> Self {
        match shape {
            HotspotShape::Box => "box".to_owned(),
            HotspotShape::Sphere => "sphere".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
/// World-space position as an `{x, y, z}` object.
pub struct Position {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl From<Position> for Vec3 {
    fn from(p: Position) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl From<Vec3> for Position {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
/// Text revealed when a hotspot is focused.
pub struct HotspotContent {
    /// Popup heading.
    pub title: String,
    /// Popup body.
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
/// One interactive marker.
pub struct HotspotConfig {
    /// Optional stable identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Marker geometry.
    pub shape: HotspotShape,
    /// Sphere radius or box edge length.
    pub size: f32,
    /// Marker color.
    pub color: Color,
    /// Pulse the marker scale over time.
    pub pulsate: bool,
    /// Position relative to the centered model.
    pub position: Position,
    /// Popup content.
    pub content: HotspotContent,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            id: None,
            shape: HotspotShape::Sphere,
            size: 0.1,
            color: Color::from_rgba8(0xff, 0x6b, 0x35, 0xff),
            pulsate: false,
            position: Position::default(),
            content: HotspotContent::default(),
        }
    }
}
