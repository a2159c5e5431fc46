//! Utils

use image::Rgb;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Color, Result, TracerError, Vec3};

/// A vector as written in scene files, `[x, y, z]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerdeVector(pub [f64; 3]);
impl From<SerdeVector> for Vec3 {
    fn from(v: SerdeVector) -> Self {
        Vec3::from(v.0)
    }
}
impl From<Vec3> for SerdeVector {
    fn from(v: Vec3) -> Self {
        Self([v[0], v[1], v[2]])
    }
}

/// Normalize `v`, refusing zero-length and non-finite input
pub fn unit_vector(v: &Vec3) -> Result<Vec3> {
    let norm = v.norm();
    if norm == 0.0 || !norm.is_finite() {
        return Err(TracerError::DegenerateVector);
    }
    Ok(v / norm)
}

/// Compute a random vector inside the unit sphere
///
/// Randomly generate vectors in the cube [-1, 1)^3. If the squared norm is < 1, it is inside the
/// unit sphere.
pub fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if p.norm_squared() < 1.0 {
            return p;
        }
    }
}

/// Generate a random vector inside the unit disk on the z = 0 plane
///
/// This simulates defocus blur
pub fn random_in_unit_disk<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0);
        if p.norm_squared() < 1.0 {
            return p;
        }
    }
}

/// Mirror `v` about the normal `n`
pub fn reflect(v: &Vec3, n: &Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Bend `v` through a surface with normal `n` using Snell's law
///
/// `ni_over_nt` is the ratio of refractive indices on either side. Returns `None` on total
/// internal reflection.
pub fn refract(v: &Vec3, n: &Vec3, ni_over_nt: f64) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt.powi(2) * (1.0 - dt.powi(2));
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - dt * n) - discriminant.sqrt() * n)
    } else {
        None
    }
}

/// Average the accumulated samples, gamma-correct for gamma = 2.0 and quantize to 8 bits
pub fn get_pixel(color: &Color, samples_per_pixel: u32) -> Rgb<u8> {
    let scale = 1.0 / samples_per_pixel as f64;

    let r = scale_color((scale * color[0]).sqrt());
    let g = scale_color((scale * color[1]).sqrt());
    let b = scale_color((scale * color[2]).sqrt());

    Rgb([r, g, b])
}

/// scale the color to between 0 and 255
fn scale_color(val: f64) -> u8 {
    (255.99 * val.clamp(0.0, 1.0)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn unit_vector_rejects_zero() {
        assert!(matches!(
            unit_vector(&Vec3::zeros()),
            Err(TracerError::DegenerateVector)
        ));
        assert!(unit_vector(&Vec3::new(f64::NAN, 0.0, 1.0)).is_err());

        let v = unit_vector(&Vec3::new(3.0, 0.0, 4.0)).unwrap();
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert!((v[0] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn rejection_samples_stay_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(random_in_unit_sphere(&mut rng).norm_squared() < 1.0);
            let d = random_in_unit_disk(&mut rng);
            assert!(d.norm_squared() < 1.0);
            assert_eq!(d[2], 0.0);
        }
    }

    #[test]
    fn reflect_flips_normal_component() {
        let n = Vec3::new(0.0, 1.0, 0.0);
        let r = reflect(&Vec3::new(1.0, -1.0, 0.0), &n);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn refract_straight_through_at_normal_incidence() {
        let n = Vec3::new(0.0, 0.0, 1.0);
        let refracted = refract(&Vec3::new(0.0, 0.0, -3.0), &n, 1.0 / 1.5).unwrap();
        assert!((refracted - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn refract_total_internal_reflection() {
        // Grazing ray leaving glass
        let n = Vec3::new(0.0, 1.0, 0.0);
        let v = Vec3::new(1.0, 0.1, 0.0);
        assert!(refract(&v, &n, 1.5).is_none());
    }

    #[test]
    fn pixel_is_averaged_and_gamma_corrected() {
        // Four samples summing to 1.0 average to 0.25, gamma maps that to 0.5
        let rgb = get_pixel(&Color::new(1.0, 4.0, 0.0), 4);
        assert_eq!(rgb, Rgb([127, 255, 0]));
    }

    #[test]
    fn pixel_saturates_out_of_range() {
        let rgb = get_pixel(&Color::new(9.0, -1.0, 1.0), 1);
        assert_eq!(rgb, Rgb([255, 0, 255]));
    }
}
