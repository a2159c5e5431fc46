//! Cameras and configs for cameras
use crate::utils::{self, SerdeVector};
use crate::{Point, Ray, Result, TracerError, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Camera Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub look_from: SerdeVector,
    pub look_at: SerdeVector,
    pub v_up: SerdeVector,
    pub vertical_fov_deg: f64,
    /// Defaults to the image width over height
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
    #[serde(default)]
    pub aperture: f64,
    /// Defaults to the distance between `look_from` and `look_at`
    #[serde(default)]
    pub focus_distance: Option<f64>,
}

/// Camera and related tasks
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point,
    lower_left_corner: Point,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f64,
}
impl Camera {
    /// Build the camera basis and the focus-plane viewport
    ///
    /// Fails with [`TracerError::DegenerateVector`] when `look_from == look_at` or when `v_up` is
    /// parallel to the view direction.
    pub fn new(
        look_from: Point,
        look_at: Point,
        v_up: Vec3,
        vertical_fov_deg: f64,
        aspect_ratio: f64,
        aperture: f64,
        focus_dist: f64,
    ) -> Result<Self> {
        // Establish the viewport
        let theta = vertical_fov_deg.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = aspect_ratio * half_height;

        // Calculate the viewing vectors
        let w = utils::unit_vector(&(look_from - look_at))?;
        let u = utils::unit_vector(&v_up.cross(&w))?;
        let v = w.cross(&u);

        let origin = look_from;
        let lower_left_corner = origin
            - half_width * focus_dist * u
            - half_height * focus_dist * v
            - focus_dist * w;
        let horizontal = 2.0 * half_width * focus_dist * u;
        let vertical = 2.0 * half_height * focus_dist * v;

        Ok(Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: aperture / 2.0,
        })
    }

    pub fn from_config(config: &CameraConfig, default_aspect_ratio: f64) -> Result<Self> {
        let look_from: Point = config.look_from.into();
        let look_at: Point = config.look_at.into();
        let aspect_ratio = config.aspect_ratio.unwrap_or(default_aspect_ratio);
        let focus_dist = config
            .focus_distance
            .unwrap_or_else(|| (look_from - look_at).norm());

        let positive = |name: &str, x: f64| {
            if x > 0.0 && x.is_finite() {
                Ok(())
            } else {
                Err(TracerError::InvalidConfig(format!(
                    "camera {name} must be positive, got {x}"
                )))
            }
        };
        positive("aspect ratio", aspect_ratio)?;
        positive("focus distance", focus_dist)?;
        if !(config.vertical_fov_deg > 0.0 && config.vertical_fov_deg < 180.0) {
            return Err(TracerError::InvalidConfig(format!(
                "camera vertical fov must be in (0, 180) degrees, got {}",
                config.vertical_fov_deg
            )));
        }
        if !(config.aperture >= 0.0 && config.aperture.is_finite()) {
            return Err(TracerError::InvalidConfig(format!(
                "camera aperture must be >= 0, got {}",
                config.aperture
            )));
        }

        let camera = Self::new(
            look_from,
            look_at,
            config.v_up.into(),
            config.vertical_fov_deg,
            aspect_ratio,
            config.aperture,
            focus_dist,
        )?;
        log::debug!("camera: {camera:?}");
        Ok(camera)
    }

    /// Ray through the viewport at `(s, t)`, both in `[0, 1]` from the lower left corner
    ///
    /// The origin is jittered across the lens disk, so objects off the focus plane blur.
    pub fn get_ray<R: Rng + ?Sized>(&self, s: f64, t: f64, rng: &mut R) -> Ray {
        let rd = self.lens_radius * utils::random_in_unit_disk(rng);
        let offset = self.u * rd[0] + self.v * rd[1];

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin - offset,
        )
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The orthonormal basis `(u, v, w)`, with `w` pointing away from the view direction
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn down_negative_z(aperture: f64) -> Camera {
        Camera::new(
            Point::zeros(),
            Point::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            90.0,
            2.0,
            aperture,
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn viewport_matches_classic_layout() {
        let camera = down_negative_z(0.0);
        assert!((camera.lower_left_corner - Point::new(-2.0, -1.0, -1.0)).norm() < 1e-12);
        assert!((camera.horizontal - Vec3::new(4.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((camera.vertical - Vec3::new(0.0, 2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn basis_is_orthonormal() {
        let camera = Camera::new(
            Point::new(3.0, 3.0, 2.0),
            Point::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            20.0,
            2.0,
            2.0,
            5.2,
        )
        .unwrap();
        let (u, v, w) = camera.basis();
        for x in [u, v, w] {
            assert!((x.norm() - 1.0).abs() < 1e-12);
        }
        assert!(u.dot(&v).abs() < 1e-12);
        assert!(u.dot(&w).abs() < 1e-12);
        assert!(v.dot(&w).abs() < 1e-12);
    }

    #[test]
    fn pinhole_rays_start_at_look_from() {
        let look_from = Point::new(3.0, 3.0, 2.0);
        let camera = Camera::new(
            look_from,
            Point::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            20.0,
            2.0,
            0.0,
            5.0,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for (s, t) in [(0.0, 0.0), (0.5, 0.5), (1.0, 0.25), (0.3, 1.0)] {
            assert_eq!(camera.get_ray(s, t, &mut rng).orig, look_from);
        }
    }

    #[test]
    fn center_ray_looks_at_target() {
        let camera = down_negative_z(0.0);
        let mut rng = StdRng::seed_from_u64(10);
        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert!((ray.dir - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn aperture_rays_converge_on_focus_plane() {
        let camera = down_negative_z(0.5);
        let mut rng = StdRng::seed_from_u64(11);
        let target = Point::new(0.4, -0.2, -1.0);
        let (s, t) = ((0.4 + 2.0) / 4.0, (-0.2 + 1.0) / 2.0);

        let mut spread = false;
        for _ in 0..100 {
            let ray = camera.get_ray(s, t, &mut rng);
            // Origins stay on the lens disk
            assert!(ray.orig[2].abs() < 1e-12);
            assert!(ray.orig.norm() < 0.25);
            spread |= ray.orig.norm() > 1e-6;
            // Every ray passes through the same focus-plane point
            assert!((ray.get(1.0) - target).norm() < 1e-12);
        }
        assert!(spread);
    }

    #[test]
    fn degenerate_views_are_rejected() {
        let same_point = Camera::new(
            Point::new(1.0, 1.0, 1.0),
            Point::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
            0.0,
            1.0,
        );
        assert!(matches!(same_point, Err(TracerError::DegenerateVector)));

        let up_along_view = Camera::new(
            Point::zeros(),
            Point::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
            0.0,
            1.0,
        );
        assert!(matches!(up_along_view, Err(TracerError::DegenerateVector)));
    }

    #[test]
    fn config_defaults_focus_and_aspect() {
        let yaml = "look_from: [3.0, 4.0, 0.0]\nlook_at: [0.0, 0.0, 0.0]\nv_up: [0.0, 1.0, 0.0]\nvertical_fov_deg: 40.0\n";
        let config: CameraConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.aperture, 0.0);
        let camera = Camera::from_config(&config, 1.5).unwrap();
        assert_eq!(camera.origin(), Point::new(3.0, 4.0, 0.0));

        // Focus distance 5, so the viewport centre sits 5 units in front of the camera
        let mut rng = StdRng::seed_from_u64(12);
        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert!((ray.dir.norm() - 5.0).abs() < 1e-9);
        let width = camera.horizontal.norm();
        let height = camera.vertical.norm();
        assert!((width / height - 1.5).abs() < 1e-9);
    }

    #[test]
    fn config_rejects_bad_fov() {
        let mut config = CameraConfig {
            look_from: SerdeVector([0.0, 0.0, 0.0]),
            look_at: SerdeVector([0.0, 0.0, -1.0]),
            v_up: SerdeVector([0.0, 1.0, 0.0]),
            vertical_fov_deg: 180.0,
            aspect_ratio: None,
            aperture: 0.0,
            focus_distance: None,
        };
        assert!(Camera::from_config(&config, 1.0).is_err());
        config.vertical_fov_deg = 60.0;
        config.aperture = -1.0;
        assert!(Camera::from_config(&config, 1.0).is_err());
    }
}
