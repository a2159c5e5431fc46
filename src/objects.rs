//! Objects
use crate::{
    materials::{Material, MaterialConfig},
    utils::SerdeVector,
    Point, Ray, Result, TracerError, Vec3,
};
use serde::{Deserialize, Serialize};

pub trait Hittable {
    /// Nearest intersection with `t` strictly inside `(t_min, t_max)`
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord<'_>>;
}

/// Represents a hit
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Ray parameter of the intersection
    pub t: f64,
    /// Point of intersection
    pub p: Point,
    /// Normal vector, pointing inward for hollow spheres
    pub normal: Vec3,
    /// Material of the surface that was hit
    pub material: &'a Material,
}

/// Anything that can be placed in a scene
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Sphere(Sphere),
    List(HittableList),
}
impl Hittable for Object {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord<'_>> {
        match self {
            Object::Sphere(s) => s.try_hit(ray, t_min, t_max),
            Object::List(l) => l.try_hit(ray, t_min, t_max),
        }
    }
}
impl From<Sphere> for Object {
    fn from(s: Sphere) -> Self {
        Object::Sphere(s)
    }
}
impl From<HittableList> for Object {
    fn from(l: HittableList) -> Self {
        Object::List(l)
    }
}

/// Object config, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectConfig {
    Sphere(SphereConfig),
    List(HittableListConfig),
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct HittableList(pub Vec<Object>);
impl HittableList {
    pub fn add(&mut self, obj: impl Into<Object>) {
        self.0.push(obj.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_config(config: &HittableListConfig) -> Result<Self> {
        let mut s = Self::default();
        for obj_cfg in &config.objects {
            match obj_cfg {
                ObjectConfig::Sphere(c) => s.add(Sphere::from_config(c)?),
                ObjectConfig::List(c) => s.add(Self::from_config(c)?),
            }
        }
        Ok(s)
    }
}
impl Hittable for HittableList {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord<'_>> {
        let mut closest_so_far = t_max;
        let mut hr_final = None;

        for obj in &self.0 {
            if let Some(hr) = obj.try_hit(ray, t_min, closest_so_far) {
                closest_so_far = hr.t;
                hr_final = Some(hr)
            }
        }
        hr_final
    }
}

/// Hittable List Config
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HittableListConfig {
    pub objects: Vec<ObjectConfig>,
}

/// A sphere. A negative radius keeps the same shell but flips the normal inward, which is how
/// hollow glass is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Point,
    pub radius: f64,
    pub material: Material,
}
impl Sphere {
    pub fn new(center: Point, radius: f64, material: impl Into<Material>) -> Self {
        Self {
            center,
            radius,
            material: material.into(),
        }
    }

    pub fn from_config(config: &SphereConfig) -> Result<Self> {
        let center: Point = config.center.into();
        if !center.iter().all(|x| x.is_finite()) {
            return Err(TracerError::InvalidConfig(format!(
                "sphere center {:?} is not finite",
                config.center.0
            )));
        }
        if config.radius == 0.0 || !config.radius.is_finite() {
            return Err(TracerError::InvalidConfig(format!(
                "sphere radius must be finite and non-zero, got {}",
                config.radius
            )));
        }
        Ok(Self::new(
            center,
            config.radius,
            Material::from_config(&config.material)?,
        ))
    }
}
impl Hittable for Sphere {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord<'_>> {
        let oc = ray.orig - self.center;
        let a = ray.dir.dot(&ray.dir);
        let half_b = oc.dot(&ray.dir);
        let c = oc.dot(&oc) - self.radius.powi(2);
        let discriminant = half_b.powi(2) - a * c;
        if discriminant <= 0.0 {
            return None;
        }

        // Take the nearer root unless it is out of range
        let sqrtd = discriminant.sqrt();
        let root = [(-half_b - sqrtd) / a, (-half_b + sqrtd) / a]
            .into_iter()
            .find(|&t| t_min < t && t < t_max)?;

        let p = ray.get(root);
        Some(HitRecord {
            t: root,
            p,
            // Dividing by the signed radius flips the normal for hollow spheres
            normal: (p - self.center) / self.radius,
            material: &self.material,
        })
    }
}

/// Sphere config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphereConfig {
    pub center: SerdeVector,
    pub radius: f64,
    pub material: MaterialConfig,
}
