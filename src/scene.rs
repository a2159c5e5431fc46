//! Scene files: image settings, camera and world together

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cameras::{Camera, CameraConfig};
use crate::materials::{DielectricConfig, LambertianConfig, MaterialConfig, MetalConfig};
use crate::objects::{HittableList, HittableListConfig, ObjectConfig, SphereConfig};
use crate::render::RenderSettings;
use crate::utils::SerdeVector;
use crate::{Result, TracerError};

/// Scene Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    pub image: RenderSettings,
    pub camera: CameraConfig,
    pub world: HittableListConfig,
}

/// Everything needed to render, built from a [`SceneConfig`]
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: Camera,
    pub world: HittableList,
    pub settings: RenderSettings,
}

impl SceneConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading scene from {}", path.display());
        let file = std::fs::File::open(path)?;
        let config: Self = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Image settings checks; the camera and world are checked while building
    pub fn validate(&self) -> Result<()> {
        let image = &self.image;
        if image.width == 0 || image.height == 0 {
            return Err(TracerError::InvalidConfig(format!(
                "image must be at least 1x1, got {}x{}",
                image.width, image.height
            )));
        }
        if image.samples_per_pixel == 0 {
            return Err(TracerError::InvalidConfig(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn build(&self) -> Result<Scene> {
        self.validate()?;
        let aspect_ratio = self.image.width as f64 / self.image.height as f64;
        let camera = Camera::from_config(&self.camera, aspect_ratio)?;
        let world = HittableList::from_config(&self.world)?;
        log::debug!("world has {} top-level objects", world.len());
        Ok(Scene {
            camera,
            world,
            settings: self.image,
        })
    }
}

impl Default for SceneConfig {
    /// A blue diffuse ball between a fuzzy gold ball and a hollow glass ball, on a yellow ground
    fn default() -> Self {
        fn sphere(center: [f64; 3], radius: f64, material: MaterialConfig) -> ObjectConfig {
            ObjectConfig::Sphere(SphereConfig {
                center: SerdeVector(center),
                radius,
                material,
            })
        }
        let lambertian = |albedo| {
            MaterialConfig::Lambertian(LambertianConfig {
                albedo: SerdeVector(albedo),
            })
        };
        let glass = || MaterialConfig::Dielectric(DielectricConfig { ir: 1.5 });

        Self {
            image: RenderSettings::default(),
            camera: CameraConfig {
                look_from: SerdeVector([3.0, 3.0, 2.0]),
                look_at: SerdeVector([0.0, 0.0, -1.0]),
                v_up: SerdeVector([0.0, 1.0, 0.0]),
                vertical_fov_deg: 20.0,
                aspect_ratio: None,
                aperture: 2.0,
                focus_distance: None,
            },
            world: HittableListConfig {
                objects: vec![
                    sphere([0.0, 0.0, -1.0], 0.5, lambertian([0.1, 0.2, 0.5])),
                    sphere([0.0, -100.5, -1.0], 100.0, lambertian([0.8, 0.8, 0.0])),
                    sphere(
                        [1.0, 0.0, -1.0],
                        0.5,
                        MaterialConfig::Metal(MetalConfig {
                            albedo: SerdeVector([0.8, 0.6, 0.2]),
                            fuzz: 0.3,
                        }),
                    ),
                    sphere([-1.0, 0.0, -1.0], 0.5, glass()),
                    sphere([-1.0, 0.0, -1.0], -0.45, glass()),
                ],
            },
        }
    }
}
