//! Scene-to-markup rendering.
//!
//! This is the mechanical half of the public site: a [`SceneConfig`] becomes
//! A-Frame entity markup or a Three.js bootstrap script, a [`SketchConfig`]
//! becomes an inline `<script>` embed, and everything is wrapped in a
//! minimal HTML page shell. Every user-controlled string is escaped on the
//! way into the page; sketch sources additionally get the closing-tag guard
//! from [`inline_script`].
//!
//! Shape dimensions map onto library primitives as follows:
//!
//! | Kind     | A-Frame attributes               | Three.js geometry                  |
//! |----------|----------------------------------|------------------------------------|
//! | Box      | width, height, depth             | BoxGeometry(w, h, d)               |
//! | Sphere   | radius                           | SphereGeometry(r, 32, 16)          |
//! | Cylinder | radius, height                   | CylinderGeometry(r, r, h, 32)      |
//! | Cone     | radius-bottom, height            | ConeGeometry(r, h, 32)             |
//! | Torus    | radius, radius-tubular (tube)    | TorusGeometry(r, tube, 16, 48)     |
//! | Plane    | width, height                    | PlaneGeometry(w, h)                |
//! | Ring     | radius-inner (tube), radius-outer| RingGeometry(tube, r, 32)          |

use std::f64::consts::TAU;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::piece::ArtType;
use crate::scene::{self, SceneConfig, ShapeConfig, ShapeKind, SketchConfig, SpinConfig, Vec3};

// ---------------------------------------------------------------------------
// Library CDN URLs
// ---------------------------------------------------------------------------

pub const AFRAME_CDN: &str = "https://aframe.io/releases/1.5.0/aframe.min.js";
pub const THREE_CDN: &str = "https://cdn.jsdelivr.net/npm/three@0.160.0/build/three.min.js";
pub const P5_CDN: &str = "https://cdn.jsdelivr.net/npm/p5@1.9.0/lib/p5.min.js";
pub const C2_CDN: &str = "https://cdn.jsdelivr.net/npm/c2.js@1.0.0/dist/c2.min.js";

/// The primary rendering library URL for an art type.
pub fn lib_cdn(art_type: ArtType) -> &'static str {
    match art_type {
        ArtType::AFrame => AFRAME_CDN,
        ArtType::Three => THREE_CDN,
        ArtType::P5 => P5_CDN,
        ArtType::C2 => C2_CDN,
    }
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Escape a string for HTML text content.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape a string for a double-quoted HTML attribute value.
///
/// The escape set is the same as [`escape_html`]; the separate name marks
/// intent at call sites.
pub fn escape_attr(s: &str) -> String {
    escape_html(s)
}

/// Quote a string as a single-quoted JavaScript literal.
///
/// `<` and `>` are hex-escaped so the literal can never form `</script` or
/// an HTML comment open inside an inline script body.
fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3C"),
            '>' => out.push_str("\\x3E"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// Format a finite f64 for markup and script output.
///
/// JSON cannot carry NaN or infinities, so plain `{}` formatting is safe
/// for every number that reaches the renderers.
fn fmt_num(v: f64) -> String {
    format!("{v}")
}

// ---------------------------------------------------------------------------
// A-Frame rendering
// ---------------------------------------------------------------------------

/// Render one shape as an A-Frame primitive entity.
pub fn aframe_shape(shape: &ShapeConfig) -> String {
    let tag = match shape.kind {
        ShapeKind::Box => "a-box",
        ShapeKind::Sphere => "a-sphere",
        ShapeKind::Cylinder => "a-cylinder",
        ShapeKind::Cone => "a-cone",
        ShapeKind::Torus => "a-torus",
        ShapeKind::Plane => "a-plane",
        ShapeKind::Ring => "a-ring",
    };
    let mut out = format!("<{tag}");
    push_attr(&mut out, "position", &shape.position.to_string());
    push_attr(&mut out, "rotation", &shape.rotation.to_string());
    push_attr(&mut out, "scale", &shape.scale.to_string());
    push_attr(&mut out, "color", &shape.color);

    match shape.kind {
        ShapeKind::Box => {
            push_attr(&mut out, "width", &fmt_num(shape.width));
            push_attr(&mut out, "height", &fmt_num(shape.height));
            push_attr(&mut out, "depth", &fmt_num(shape.depth));
        }
        ShapeKind::Sphere => {
            push_attr(&mut out, "radius", &fmt_num(shape.radius));
        }
        ShapeKind::Cylinder => {
            push_attr(&mut out, "radius", &fmt_num(shape.radius));
            push_attr(&mut out, "height", &fmt_num(shape.height));
        }
        ShapeKind::Cone => {
            push_attr(&mut out, "radius-bottom", &fmt_num(shape.radius));
            push_attr(&mut out, "radius-top", "0");
            push_attr(&mut out, "height", &fmt_num(shape.height));
        }
        ShapeKind::Torus => {
            push_attr(&mut out, "radius", &fmt_num(shape.radius));
            push_attr(&mut out, "radius-tubular", &fmt_num(shape.tube));
        }
        ShapeKind::Plane => {
            push_attr(&mut out, "width", &fmt_num(shape.width));
            push_attr(&mut out, "height", &fmt_num(shape.height));
        }
        ShapeKind::Ring => {
            push_attr(&mut out, "radius-inner", &fmt_num(shape.tube));
            push_attr(&mut out, "radius-outer", &fmt_num(shape.radius));
        }
    }

    let mut material = Vec::new();
    if shape.opacity < 1.0 {
        material.push(format!("opacity: {}", fmt_num(shape.opacity)));
        material.push("transparent: true".to_string());
    }
    if shape.wireframe {
        material.push("wireframe: true".to_string());
    }
    if !material.is_empty() {
        push_attr(&mut out, "material", &material.join("; "));
    }

    if let Some(spin) = &shape.spin {
        push_attr(&mut out, "animation", &spin_animation(shape.rotation, spin));
    }

    out.push_str("></");
    out.push_str(tag);
    out.push('>');
    out
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attr(value));
    out.push('"');
}

/// Build the A-Frame animation component value for a spinning shape: one
/// full turn around the spin axis, linear, looping.
fn spin_animation(base_rotation: Vec3, spin: &SpinConfig) -> String {
    let to = match spin.axis {
        scene::SpinAxis::X => Vec3 {
            x: base_rotation.x + 360.0,
            ..base_rotation
        },
        scene::SpinAxis::Y => Vec3 {
            y: base_rotation.y + 360.0,
            ..base_rotation
        },
        scene::SpinAxis::Z => Vec3 {
            z: base_rotation.z + 360.0,
            ..base_rotation
        },
    };
    let dur_ms = (effective_secs_per_turn(spin) * 1000.0).round() as i64;
    format!("property: rotation; to: {to}; dur: {dur_ms}; easing: linear; loop: true")
}

/// Spin period guard: zero or negative periods would divide by zero in the
/// Three.js render loop, so both renderers fall back to the default.
fn effective_secs_per_turn(spin: &SpinConfig) -> f64 {
    if spin.secs_per_turn > 0.0 {
        spin.secs_per_turn
    } else {
        scene::DEFAULT_SECS_PER_TURN
    }
}

/// Render a full `<a-scene>` element for a scene config.
pub fn aframe_scene(config: &SceneConfig) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "<a-scene background=\"color: {}\">",
        escape_attr(&config.background)
    ));
    if let Some(sky) = &config.sky {
        lines.push(format!("  <a-sky color=\"{}\"></a-sky>", escape_attr(sky)));
    }
    if let Some(ground) = &config.ground {
        lines.push(format!(
            "  <a-plane rotation=\"-90 0 0\" width=\"{size}\" height=\"{size}\" color=\"{color}\"></a-plane>",
            size = fmt_num(ground.size),
            color = escape_attr(&ground.color),
        ));
    }
    for shape in &config.shapes {
        lines.push(format!("  {}", aframe_shape(shape)));
    }
    lines.push(format!(
        "  <a-camera position=\"{}\"></a-camera>",
        config.camera.position
    ));
    lines.push("</a-scene>".to_string());
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Three.js rendering
// ---------------------------------------------------------------------------

/// Render a scene config as a Three.js bootstrap script body.
///
/// The script builds the scene, camera, renderer, and lights, adds one mesh
/// per shape, and drives per-shape spins from a clock-delta render loop.
pub fn three_scene_script(config: &SceneConfig) -> String {
    let mut js = String::new();
    js.push_str("const scene = new THREE.Scene();\n");
    js.push_str(&format!(
        "scene.background = new THREE.Color({});\n",
        js_string(&config.background)
    ));
    js.push_str(
        "const camera = new THREE.PerspectiveCamera(75, window.innerWidth / window.innerHeight, 0.1, 1000);\n",
    );
    let cam = config.camera.position;
    js.push_str(&format!(
        "camera.position.set({}, {}, {});\n",
        fmt_num(cam.x),
        fmt_num(cam.y),
        fmt_num(cam.z)
    ));
    js.push_str("const renderer = new THREE.WebGLRenderer({ antialias: true });\n");
    js.push_str("renderer.setSize(window.innerWidth, window.innerHeight);\n");
    js.push_str("document.body.appendChild(renderer.domElement);\n");
    js.push_str("scene.add(new THREE.AmbientLight(0xffffff, 0.6));\n");
    js.push_str("const keyLight = new THREE.DirectionalLight(0xffffff, 0.8);\n");
    js.push_str("keyLight.position.set(1, 2, 1);\n");
    js.push_str("scene.add(keyLight);\n");

    if let Some(ground) = &config.ground {
        js.push_str(&format!(
            "const ground = new THREE.Mesh(new THREE.PlaneGeometry({size}, {size}), new THREE.MeshStandardMaterial({{ color: {color}, side: THREE.DoubleSide }}));\n",
            size = fmt_num(ground.size),
            color = js_string(&ground.color),
        ));
        js.push_str("ground.rotation.x = -Math.PI / 2;\n");
        js.push_str("scene.add(ground);\n");
    }

    js.push_str("const spinning = [];\n");
    for (i, shape) in config.shapes.iter().enumerate() {
        let mesh = format!("mesh{i}");
        js.push_str(&format!(
            "const {mesh} = new THREE.Mesh({}, {});\n",
            three_geometry(shape),
            three_material(shape)
        ));
        js.push_str(&format!(
            "{mesh}.position.set({}, {}, {});\n",
            fmt_num(shape.position.x),
            fmt_num(shape.position.y),
            fmt_num(shape.position.z)
        ));
        js.push_str(&format!(
            "{mesh}.rotation.set({}, {}, {});\n",
            fmt_num(shape.rotation.x.to_radians()),
            fmt_num(shape.rotation.y.to_radians()),
            fmt_num(shape.rotation.z.to_radians())
        ));
        js.push_str(&format!(
            "{mesh}.scale.set({}, {}, {});\n",
            fmt_num(shape.scale.x),
            fmt_num(shape.scale.y),
            fmt_num(shape.scale.z)
        ));
        js.push_str(&format!("scene.add({mesh});\n"));
        if let Some(spin) = &shape.spin {
            let rads_per_sec = TAU / effective_secs_per_turn(spin);
            js.push_str(&format!(
                "spinning.push({{ mesh: {mesh}, axis: '{}', radsPerSec: {} }});\n",
                spin.axis.as_str(),
                fmt_num(rads_per_sec)
            ));
        }
    }

    js.push_str("const clock = new THREE.Clock();\n");
    js.push_str("function animate() {\n");
    js.push_str("  requestAnimationFrame(animate);\n");
    js.push_str("  const delta = clock.getDelta();\n");
    js.push_str("  for (const s of spinning) {\n");
    js.push_str("    s.mesh.rotation[s.axis] += s.radsPerSec * delta;\n");
    js.push_str("  }\n");
    js.push_str("  renderer.render(scene, camera);\n");
    js.push_str("}\n");
    js.push_str("animate();\n");
    js
}

fn three_geometry(shape: &ShapeConfig) -> String {
    match shape.kind {
        ShapeKind::Box => format!(
            "new THREE.BoxGeometry({}, {}, {})",
            fmt_num(shape.width),
            fmt_num(shape.height),
            fmt_num(shape.depth)
        ),
        ShapeKind::Sphere => format!("new THREE.SphereGeometry({}, 32, 16)", fmt_num(shape.radius)),
        ShapeKind::Cylinder => format!(
            "new THREE.CylinderGeometry({r}, {r}, {h}, 32)",
            r = fmt_num(shape.radius),
            h = fmt_num(shape.height)
        ),
        ShapeKind::Cone => format!(
            "new THREE.ConeGeometry({}, {}, 32)",
            fmt_num(shape.radius),
            fmt_num(shape.height)
        ),
        ShapeKind::Torus => format!(
            "new THREE.TorusGeometry({}, {}, 16, 48)",
            fmt_num(shape.radius),
            fmt_num(shape.tube)
        ),
        ShapeKind::Plane => format!(
            "new THREE.PlaneGeometry({}, {})",
            fmt_num(shape.width),
            fmt_num(shape.height)
        ),
        ShapeKind::Ring => format!(
            "new THREE.RingGeometry({}, {}, 32)",
            fmt_num(shape.tube),
            fmt_num(shape.radius)
        ),
    }
}

fn three_material(shape: &ShapeConfig) -> String {
    format!(
        "new THREE.MeshStandardMaterial({{ color: {}, transparent: {}, opacity: {}, wireframe: {} }})",
        js_string(&shape.color),
        shape.opacity < 1.0,
        fmt_num(shape.opacity),
        shape.wireframe
    )
}

// ---------------------------------------------------------------------------
// Sketch embedding
// ---------------------------------------------------------------------------

static SCRIPT_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</script").expect("valid regex"));

/// Prepare sketch source for embedding in an inline `<script>` element.
///
/// Any `</script` occurrence (case-insensitive) would terminate the element
/// early, so it is rewritten to the escaped form `<\/script`.
pub fn inline_script(source: &str) -> String {
    SCRIPT_CLOSE_RE
        .replace_all(source, r"<\/script")
        .into_owned()
}

// ---------------------------------------------------------------------------
// Page shells
// ---------------------------------------------------------------------------

/// Wrap head and body fragments in a minimal HTML page.
///
/// `head` and `body` are trusted markup produced by this module; `title` is
/// user content and gets escaped.
pub fn page(title: &str, head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>{}</title>\n{}\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        head,
        body
    )
}

/// Full page for an A-Frame piece.
pub fn aframe_page(title: &str, config: &SceneConfig) -> String {
    let head = format!("<script src=\"{AFRAME_CDN}\"></script>");
    page(title, &head, &aframe_scene(config))
}

/// Full page for a Three.js piece.
pub fn three_page(title: &str, config: &SceneConfig) -> String {
    let head = format!(
        "<script src=\"{THREE_CDN}\"></script>\n<style>body {{ margin: 0; overflow: hidden; }}</style>"
    );
    let body = format!("<script>\n{}</script>", three_scene_script(config));
    page(title, &head, &body)
}

/// Full page for a p5.js or C2.js sketch piece.
pub fn sketch_page(title: &str, art_type: ArtType, sketch: &SketchConfig) -> String {
    let mut head = format!("<script src=\"{}\"></script>", lib_cdn(art_type));
    for lib in &sketch.libraries {
        head.push_str(&format!("\n<script src=\"{}\"></script>", escape_attr(lib)));
    }
    let body = format!(
        "<main id=\"sketch\"></main>\n<script>\n{}\n</script>",
        inline_script(&sketch.source)
    );
    page(title, &head, &body)
}

/// Render the full public page for a piece from its stored config.
///
/// This is the single entry point the HTTP layer uses; it parses the config
/// according to the art type and picks the matching page renderer.
pub fn render_piece_page(
    title: &str,
    art_type: ArtType,
    config: &serde_json::Value,
) -> Result<String, CoreError> {
    match art_type {
        ArtType::AFrame => Ok(aframe_page(title, &scene::parse_scene(config)?)),
        ArtType::Three => Ok(three_page(title, &scene::parse_scene(config)?)),
        ArtType::P5 | ArtType::C2 => {
            Ok(sketch_page(title, art_type, &scene::parse_sketch(config)?))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
