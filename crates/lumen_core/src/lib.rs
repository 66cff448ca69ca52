//! Lumen Core - renderer-agnostic scene input for the Lumen path tracer.
//!
//! This crate provides:
//!
//! - **Mesh input**: `Mesh`, a validated triangle list handed over by an
//!   asset loader
//! - **Scene descriptors**: `SceneDescription` and friends, an in-memory
//!   description of camera, materials and objects
//! - **Configuration**: `RenderSettings`, deserializable from JSON
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::RenderSettings;
//!
//! let settings = RenderSettings::from_path("render.json")?;
//! println!("{}x{} @ {} spp", settings.width, settings.height, settings.samples_per_pixel);
//! ```

pub mod config;
pub mod mesh;
pub mod scene;

// Re-export commonly used types
pub use config::{ConfigError, ConfigResult, RenderSettings};
pub use mesh::{Mesh, MeshError, MeshResult, MeshTriangle};
pub use scene::{
    CameraDesc, MaterialDesc, MaterialKind, ObjectDesc, SceneDescription, ShapeDesc, TextureDesc,
    TransformStep,
};
