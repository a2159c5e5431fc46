//! Ray Tracing Library
//!
//! A Monte Carlo ray tracer for scenes made of spheres with diffuse, metal and
//! glass surfaces.

use nalgebra::Vector3;

pub mod cameras;
pub mod error;
pub mod materials;
pub mod objects;
pub mod render;
pub mod scene;
pub mod utils;

pub use error::{Result, TracerError};

pub type Vec3 = Vector3<f64>;
pub type Point = Vec3;
pub type Color = Vec3;

/// Prelude
pub mod prelude {
    pub use crate::cameras::{Camera, CameraConfig};
    pub use crate::materials::{Dielectric, Lambertian, Material, Metal, Scatterable};
    pub use crate::objects::{HitRecord, Hittable, HittableList, Object, Sphere};
    pub use crate::render::{PixelSink, RenderMode, RenderSettings};
    pub use crate::scene::{Scene, SceneConfig};
    pub use crate::{Color, Point, Ray, Result, TracerError, Vec3};
}

/// The ray in ray tracing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub orig: Point,
    /// Not required to be unit length
    pub dir: Vec3,
}
impl Ray {
    pub fn new(orig: Point, dir: Vec3) -> Self {
        Self { orig, dir }
    }

    /// Point along the ray at parameter `t`
    pub fn get(&self, t: f64) -> Point {
        self.orig + t * self.dir
    }
}
