//! Art piece domain types, validation, and status transition rules.
//!
//! An art piece is a database-configured generative or 3D artwork rendered
//! on its own public page. The rendering library is selected by [`ArtType`];
//! the piece's `config_json` column holds the scene or sketch configuration
//! that the markup renderer turns into a page.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::scene;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum piece title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum piece description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

// ---------------------------------------------------------------------------
// Art type
// ---------------------------------------------------------------------------

/// The rendering library an art piece targets.
///
/// Stored in the `art_pieces.art_type` column and used as the first URL
/// segment of public piece pages (`/art/{type}/{slug}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtType {
    /// A-Frame declarative WebVR scene markup.
    AFrame,
    /// C2.js canvas sketch.
    C2,
    /// p5.js canvas sketch.
    P5,
    /// Three.js programmatic scene script.
    Three,
}

/// All art types, in wire-name order.
pub const ALL_ART_TYPES: &[ArtType] = &[ArtType::AFrame, ArtType::C2, ArtType::P5, ArtType::Three];

impl ArtType {
    /// Parse an art type string from the database or a URL segment.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "aframe" => Ok(Self::AFrame),
            "c2" => Ok(Self::C2),
            "p5" => Ok(Self::P5),
            "three" => Ok(Self::Three),
            _ => Err(CoreError::Validation(format!(
                "Invalid art type '{s}'. Must be one of: aframe, c2, p5, three"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AFrame => "aframe",
            Self::C2 => "c2",
            Self::P5 => "p5",
            Self::Three => "three",
        }
    }

    /// Human-readable library name for page badges and admin listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AFrame => "A-Frame",
            Self::C2 => "C2.js",
            Self::P5 => "p5.js",
            Self::Three => "Three.js",
        }
    }
}

// ---------------------------------------------------------------------------
// Piece status
// ---------------------------------------------------------------------------

/// Lifecycle status of an art piece.
///
/// Only `published` pieces appear on public pages. `archived` keeps a piece
/// out of the gallery without moving it to the trash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceStatus {
    Draft,
    Published,
    Archived,
}

impl PieceStatus {
    /// Parse a status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(CoreError::Validation(format!(
                "Invalid piece status '{s}'. Must be one of: draft, published, archived"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Resolve the target status for a publish request.
///
/// Draft and archived pieces can be published; publishing an already
/// published piece is a conflict.
pub fn publish_transition(current: PieceStatus) -> Result<PieceStatus, CoreError> {
    match current {
        PieceStatus::Draft | PieceStatus::Archived => Ok(PieceStatus::Published),
        PieceStatus::Published => Err(CoreError::Conflict("Piece is already published".into())),
    }
}

/// Resolve the target status for an unpublish request.
///
/// Only published pieces can be unpublished; they return to draft.
pub fn unpublish_transition(current: PieceStatus) -> Result<PieceStatus, CoreError> {
    match current {
        PieceStatus::Published => Ok(PieceStatus::Draft),
        other => Err(CoreError::Conflict(format!(
            "Cannot unpublish a {} piece",
            other.as_str()
        ))),
    }
}

/// Resolve the target status for an archive request.
///
/// Any non-archived piece can be archived.
pub fn archive_transition(current: PieceStatus) -> Result<PieceStatus, CoreError> {
    match current {
        PieceStatus::Archived => Err(CoreError::Conflict("Piece is already archived".into())),
        PieceStatus::Draft | PieceStatus::Published => Ok(PieceStatus::Archived),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a piece title (non-empty after trimming, <= 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a piece description (<= 2000 chars).
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a piece configuration document against its art type.
///
/// Scene-based types (`aframe`, `three`) must deserialize as a
/// [`scene::SceneConfig`]; sketch-based types (`p5`, `c2`) as a
/// [`scene::SketchConfig`]. The error carries the serde message so admin
/// clients can show which field was wrong.
pub fn validate_config(art_type: ArtType, config: &serde_json::Value) -> Result<(), CoreError> {
    if !config.is_object() {
        return Err(CoreError::Validation(
            "Config must be a JSON object".into(),
        ));
    }
    match art_type {
        ArtType::AFrame | ArtType::Three => scene::parse_scene(config).map(|_| ()),
        ArtType::P5 | ArtType::C2 => scene::parse_sketch(config).map(|_| ()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
