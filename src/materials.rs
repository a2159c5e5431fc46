//! Implementation of materials

use crate::{
    objects::HitRecord,
    utils::{self, SerdeVector},
    Color, Ray, Result, TracerError, Vec3,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a surface scatters an incoming ray
pub trait Scatterable {
    /// `None` means the ray was absorbed
    fn try_scatter<R: Rng + ?Sized>(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut R,
    ) -> Option<ScatterResult>;
}

/// Scatter Result
#[derive(Debug)]
pub struct ScatterResult {
    /// Attenuation Color
    pub attenuation: Color,
    /// Resulting Scattered Ray
    pub scattered: Ray,
}

/// The closed set of surface materials
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}
impl Material {
    pub fn from_config(config: &MaterialConfig) -> Result<Self> {
        config.validate()?;
        Ok(match config {
            MaterialConfig::Lambertian(c) => Material::Lambertian(Lambertian::from_config(c)),
            MaterialConfig::Metal(c) => Material::Metal(Metal::from_config(c)),
            MaterialConfig::Dielectric(c) => Material::Dielectric(Dielectric::from_config(c)),
        })
    }
}
impl Scatterable for Material {
    fn try_scatter<R: Rng + ?Sized>(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut R,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => m.try_scatter(ray_in, hit_record, rng),
            Material::Metal(m) => m.try_scatter(ray_in, hit_record, rng),
            Material::Dielectric(m) => m.try_scatter(ray_in, hit_record, rng),
        }
    }
}
impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}
impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}
impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

/// Config for materials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaterialConfig {
    Lambertian(LambertianConfig),
    Metal(MetalConfig),
    Dielectric(DielectricConfig),
}
impl MaterialConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(TracerError::InvalidConfig(msg));
        match self {
            MaterialConfig::Lambertian(c) => {
                if !c.albedo.0.iter().all(|x| x.is_finite()) {
                    return invalid(format!("lambertian albedo {:?} is not finite", c.albedo.0));
                }
            }
            MaterialConfig::Metal(c) => {
                if !c.albedo.0.iter().all(|x| x.is_finite()) {
                    return invalid(format!("metal albedo {:?} is not finite", c.albedo.0));
                }
                if !(c.fuzz >= 0.0 && c.fuzz.is_finite()) {
                    return invalid(format!("metal fuzz must be >= 0, got {}", c.fuzz));
                }
            }
            MaterialConfig::Dielectric(c) => {
                if !(c.ir > 0.0 && c.ir.is_finite()) {
                    return invalid(format!("refractive index must be > 0, got {}", c.ir));
                }
            }
        }
        Ok(())
    }
}

/// Lambertian Scatterer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambertian {
    albedo: Color,
}
impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_config(config: &LambertianConfig) -> Self {
        Self::new(config.albedo.into())
    }
}
impl Scatterable for Lambertian {
    fn try_scatter<R: Rng + ?Sized>(
        &self,
        _ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut R,
    ) -> Option<ScatterResult> {
        // Aim at a random point in the unit sphere sitting on the surface along the normal
        let mut scatter_direction = hit_record.normal + utils::random_in_unit_sphere(rng);

        // Protect against the normal and the random offset being exact opposites
        if scatter_direction.norm() < 1e-8 {
            scatter_direction = hit_record.normal;
        }
        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(hit_record.p, scatter_direction),
        })
    }
}

/// Lambertian Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambertianConfig {
    pub albedo: SerdeVector,
}

/// Metal Scatterer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metal {
    albedo: Color,
    /// Not clamped; values above 1 are allowed
    fuzz: f64,
}
impl Metal {
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self { albedo, fuzz }
    }

    pub fn from_config(config: &MetalConfig) -> Self {
        Self::new(config.albedo.into(), config.fuzz)
    }
}
impl Scatterable for Metal {
    fn try_scatter<R: Rng + ?Sized>(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut R,
    ) -> Option<ScatterResult> {
        let reflected = utils::reflect(&ray_in.dir.normalize(), &hit_record.normal);
        let scattered = Ray::new(
            hit_record.p,
            reflected + self.fuzz * utils::random_in_unit_sphere(rng),
        );
        if scattered.dir.dot(&hit_record.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered,
            })
        } else {
            None
        }
    }
}

/// Metal Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetalConfig {
    pub albedo: SerdeVector,
    #[serde(default)]
    pub fuzz: f64,
}

/// A Dielectric is a refractive material, such as glass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dielectric {
    ir: f64,
}
impl Dielectric {
    pub fn new(ir: f64) -> Self {
        Self { ir }
    }

    pub fn from_config(config: &DielectricConfig) -> Self {
        Self::new(config.ir)
    }

    /// Refracted direction and its reflection probability, `None` on total internal reflection
    fn refraction(&self, dir: &Vec3, normal: &Vec3) -> Option<(Vec3, f64)> {
        let d_dot_n = dir.dot(normal);

        // The sign of d.n tells whether we are leaving or entering the medium
        let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
            (-normal, self.ir, self.ir * d_dot_n / dir.norm())
        } else {
            (*normal, 1.0 / self.ir, -d_dot_n / dir.norm())
        };

        utils::refract(dir, &outward_normal, ni_over_nt)
            .map(|refracted| (refracted, schlick(cosine, self.ir)))
    }
}
impl Scatterable for Dielectric {
    fn try_scatter<R: Rng + ?Sized>(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut R,
    ) -> Option<ScatterResult> {
        let attenuation = Color::new(1.0, 1.0, 1.0);
        let dir = ray_in.dir;

        let direction = match self.refraction(&dir, &hit_record.normal) {
            Some((refracted, reflect_prob)) if rng.gen::<f64>() >= reflect_prob => refracted,
            _ => utils::reflect(&dir, &hit_record.normal),
        };

        Some(ScatterResult {
            attenuation,
            scattered: Ray::new(hit_record.p, direction),
        })
    }
}

/// Schlick's approximation for reflectance
pub fn schlick(cosine: f64, ref_idx: f64) -> f64 {
    let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Dielectric Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DielectricConfig {
    pub ir: f64,
}
