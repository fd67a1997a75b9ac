//! Scene and sketch configuration models.
//!
//! These are the deserialized forms of the `config_json` column on
//! `art_pieces`. Scene-based pieces (A-Frame, Three.js) describe a list of
//! primitive shapes plus environment settings; sketch-based pieces (p5.js,
//! C2.js) carry the sketch source verbatim. Unknown JSON fields are ignored
//! so configs written by newer admin clients still render.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default shape color when the config omits one.
pub const DEFAULT_COLOR: &str = "#888888";

/// Default scene background color.
pub const DEFAULT_BACKGROUND: &str = "#111111";

/// Default ground plane color.
pub const DEFAULT_GROUND_COLOR: &str = "#444444";

/// Default ground plane side length in meters.
pub const DEFAULT_GROUND_SIZE: f64 = 30.0;

/// Default for every shape dimension (radius, width, height, depth, tube).
pub const DEFAULT_DIMENSION: f64 = 1.0;

/// Default seconds per full rotation for spinning shapes.
pub const DEFAULT_SECS_PER_TURN: f64 = 10.0;

/// Default camera position (standing eye height, stepped back from origin).
pub const DEFAULT_CAMERA_POSITION: Vec3 = Vec3 {
    x: 0.0,
    y: 1.6,
    z: 4.0,
};

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

fn default_ground_color() -> String {
    DEFAULT_GROUND_COLOR.to_string()
}

fn default_ground_size() -> f64 {
    DEFAULT_GROUND_SIZE
}

fn default_dimension() -> f64 {
    DEFAULT_DIMENSION
}

fn default_opacity() -> f64 {
    1.0
}

fn default_secs_per_turn() -> f64 {
    DEFAULT_SECS_PER_TURN
}

fn default_spin_axis() -> SpinAxis {
    SpinAxis::Y
}

fn default_camera_position() -> Vec3 {
    DEFAULT_CAMERA_POSITION
}

// ---------------------------------------------------------------------------
// Vectors
// ---------------------------------------------------------------------------

/// A 3D vector. Displays in A-Frame attribute form: `"x y z"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The unit scale vector `(1, 1, 1)`.
    pub const fn one() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// Primitive shape kinds supported by both scene renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Plane,
    Ring,
}

/// Optional constant rotation applied to a shape by the render loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpinConfig {
    #[serde(default = "default_spin_axis")]
    pub axis: SpinAxis,
    #[serde(default = "default_secs_per_turn")]
    pub secs_per_turn: f64,
}

/// The axis a spinning shape rotates around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpinAxis {
    X,
    Y,
    Z,
}

impl SpinAxis {
    /// Lowercase axis letter, matching the Three.js `rotation` property keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

/// One shape in a scene. Only the dimensions relevant to the kind are read
/// by the renderers; the rest keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeConfig {
    pub kind: ShapeKind,
    #[serde(default)]
    pub position: Vec3,
    /// Euler rotation in degrees.
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "Vec3::one")]
    pub scale: Vec3,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_dimension")]
    pub radius: f64,
    #[serde(default = "default_dimension")]
    pub width: f64,
    #[serde(default = "default_dimension")]
    pub height: f64,
    #[serde(default = "default_dimension")]
    pub depth: f64,
    /// Second radius: tube thickness for toruses, inner radius for rings.
    #[serde(default = "default_dimension")]
    pub tube: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub wireframe: bool,
    #[serde(default)]
    pub spin: Option<SpinConfig>,
}

// ---------------------------------------------------------------------------
// Scene and sketch documents
// ---------------------------------------------------------------------------

/// Ground plane settings for scene-based pieces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundConfig {
    #[serde(default = "default_ground_color")]
    pub color: String,
    #[serde(default = "default_ground_size")]
    pub size: f64,
}

/// Camera settings for scene-based pieces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: DEFAULT_CAMERA_POSITION,
        }
    }
}

/// Configuration document for A-Frame and Three.js pieces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_background")]
    pub background: String,
    /// Sky dome color. `None` renders no sky.
    #[serde(default)]
    pub sky: Option<String>,
    /// Ground plane. `None` renders no ground.
    #[serde(default)]
    pub ground: Option<GroundConfig>,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub shapes: Vec<ShapeConfig>,
}

/// Configuration document for p5.js and C2.js pieces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchConfig {
    /// Sketch JavaScript source, embedded verbatim (minus the closing-tag
    /// guard applied by the renderer).
    pub source: String,
    /// Extra script URLs to load before the sketch.
    #[serde(default)]
    pub libraries: Vec<String>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a `config_json` value as a scene configuration.
pub fn parse_scene(config: &serde_json::Value) -> Result<SceneConfig, CoreError> {
    serde_json::from_value(config.clone())
        .map_err(|e| CoreError::Validation(format!("Invalid scene config: {e}")))
}

/// Parse a `config_json` value as a sketch configuration.
pub fn parse_sketch(config: &serde_json::Value) -> Result<SketchConfig, CoreError> {
    serde_json::from_value(config.clone())
        .map_err(|e| CoreError::Validation(format!("Invalid sketch config: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- Vec3 ----------------------------------------------------------------

    #[test]
    fn vec3_displays_in_attribute_form() {
        assert_eq!(Vec3::new(0.0, 1.6, -3.0).to_string(), "0 1.6 -3");
        assert_eq!(Vec3::default().to_string(), "0 0 0");
    }

    // -- Scene parsing -------------------------------------------------------

    #[test]
    fn empty_object_parses_with_defaults() {
        let scene = parse_scene(&json!({})).unwrap();
        assert_eq!(scene.background, DEFAULT_BACKGROUND);
        assert!(scene.sky.is_none());
        assert!(scene.ground.is_none());
        assert_eq!(scene.camera.position, DEFAULT_CAMERA_POSITION);
        assert!(scene.shapes.is_empty());
    }

    #[test]
    fn shape_defaults_applied() {
        let scene = parse_scene(&json!({ "shapes": [{ "kind": "sphere" }] })).unwrap();
        let shape = &scene.shapes[0];
        assert_eq!(shape.kind, ShapeKind::Sphere);
        assert_eq!(shape.color, DEFAULT_COLOR);
        assert_eq!(shape.radius, DEFAULT_DIMENSION);
        assert_eq!(shape.scale, Vec3::one());
        assert_eq!(shape.opacity, 1.0);
        assert!(!shape.wireframe);
        assert!(shape.spin.is_none());
    }

    #[test]
    fn full_shape_parses() {
        let scene = parse_scene(&json!({
            "background": "#000000",
            "sky": "#ECECEC",
            "ground": { "color": "#225533", "size": 50.0 },
            "camera": { "position": { "x": 0.0, "y": 2.0, "z": 8.0 } },
            "shapes": [{
                "kind": "torus",
                "position": { "x": 0.0, "y": 2.0, "z": -4.0 },
                "rotation": { "x": 90.0, "y": 0.0, "z": 0.0 },
                "color": "#FF6347",
                "radius": 1.5,
                "tube": 0.3,
                "opacity": 0.8,
                "spin": { "axis": "z", "secs_per_turn": 6.0 }
            }]
        }))
        .unwrap();
        assert_eq!(scene.sky.as_deref(), Some("#ECECEC"));
        assert_eq!(scene.ground.as_ref().unwrap().size, 50.0);
        let shape = &scene.shapes[0];
        assert_eq!(shape.tube, 0.3);
        let spin = shape.spin.unwrap();
        assert_eq!(spin.axis, SpinAxis::Z);
        assert_eq!(spin.secs_per_turn, 6.0);
    }

    #[test]
    fn unknown_fields_ignored() {
        let scene = parse_scene(&json!({
            "fog": "dense",
            "shapes": [{ "kind": "box", "glow": true }]
        }))
        .unwrap();
        assert_eq!(scene.shapes.len(), 1);
    }

    #[test]
    fn shape_without_kind_rejected() {
        assert!(parse_scene(&json!({ "shapes": [{ "color": "#fff" }] })).is_err());
    }

    #[test]
    fn spin_defaults_applied() {
        let scene = parse_scene(&json!({ "shapes": [{ "kind": "box", "spin": {} }] })).unwrap();
        let spin = scene.shapes[0].spin.unwrap();
        assert_eq!(spin.axis, SpinAxis::Y);
        assert_eq!(spin.secs_per_turn, DEFAULT_SECS_PER_TURN);
    }

    // -- Sketch parsing ------------------------------------------------------

    #[test]
    fn sketch_requires_source() {
        assert!(parse_sketch(&json!({})).is_err());
        let sketch = parse_sketch(&json!({ "source": "function draw() {}" })).unwrap();
        assert!(sketch.libraries.is_empty());
    }

    #[test]
    fn sketch_with_libraries() {
        let sketch = parse_sketch(&json!({
            "source": "new c2.Renderer();",
            "libraries": ["https://cdn.example.com/extra.js"]
        }))
        .unwrap();
        assert_eq!(sketch.libraries.len(), 1);
    }
}
