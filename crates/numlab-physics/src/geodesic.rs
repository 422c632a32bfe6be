// ─────────────────────────────────────────────────────────────────────
// NumLab — Photon Geodesics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Light bending around a non-rotating mass.
//!
//! Photons feel a Newtonian pull with the first-order Schwarzschild
//! correction, `a = GM/r² · (1 + 3L²/(r²c²))` toward the origin with
//! `L = |p × v|`, integrated by classical RK4. Below the Schwarzschild
//! radius the force is switched off and the photon is frozen as captured.

use log::debug;
use nalgebra::Vector3;
use numlab_types::config::GeodesicConfig;
use numlab_types::constants::{C_LIGHT, G_NEWTON, SOLAR_MASS};
use numlab_types::error::{NumLabError, NumLabResult};

/// `Rs = 2GM/c²` in metres.
pub fn schwarzschild_radius(mass_kg: f64) -> f64 {
    2.0 * G_NEWTON * mass_kg / (C_LIGHT * C_LIGHT)
}

/// Gravitating point mass at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schwarzschild {
    pub mass_kg: f64,
    pub rs: f64,
    gm: f64,
}

impl Schwarzschild {
    pub fn new(mass_kg: f64) -> NumLabResult<Self> {
        if !mass_kg.is_finite() || mass_kg <= 0.0 {
            return Err(NumLabError::ConfigError(format!(
                "mass must be positive and finite, got {mass_kg}"
            )));
        }
        Ok(Schwarzschild {
            mass_kg,
            rs: schwarzschild_radius(mass_kg),
            gm: G_NEWTON * mass_kg,
        })
    }

    pub fn acceleration(&self, p: &Vector3<f64>, v: &Vector3<f64>) -> Vector3<f64> {
        let r = p.norm();
        if r < self.rs {
            return Vector3::zeros();
        }
        let l_sq = p.cross(v).norm_squared();
        let correction = 1.0 + 3.0 * l_sq / (r * r * C_LIGHT * C_LIGHT);
        p * (-self.gm * correction / (r * r * r))
    }
}

#[derive(Debug, Clone)]
pub struct Photon {
    pub pos: Vector3<f64>,
    pub vel: Vector3<f64>,
    /// Positions after each completed step.
    pub path: Vec<Vector3<f64>>,
    pub captured: bool,
    field: Schwarzschild,
}

impl Photon {
    pub fn new(field: Schwarzschild, pos: Vector3<f64>, vel: Vector3<f64>) -> Self {
        Photon {
            pos,
            vel,
            path: Vec::new(),
            captured: false,
            field,
        }
    }

    pub fn distance(&self) -> f64 {
        self.pos.norm()
    }

    /// One RK4 step. No-op once captured.
    pub fn step(&mut self, dt: f64) {
        if self.captured {
            return;
        }
        let f = &self.field;
        let (p, v) = (self.pos, self.vel);

        let k1_v = f.acceleration(&p, &v) * dt;
        let k1_p = v * dt;
        let k2_v = f.acceleration(&(p + k1_p * 0.5), &(v + k1_v * 0.5)) * dt;
        let k2_p = (v + k1_v * 0.5) * dt;
        let k3_v = f.acceleration(&(p + k2_p * 0.5), &(v + k2_v * 0.5)) * dt;
        let k3_p = (v + k2_v * 0.5) * dt;
        let k4_v = f.acceleration(&(p + k3_p), &(v + k3_v)) * dt;
        let k4_p = (v + k3_v) * dt;

        self.vel += (k1_v + k2_v * 2.0 + k3_v * 2.0 + k4_v) / 6.0;
        self.pos += (k1_p + k2_p * 2.0 + k3_p * 2.0 + k4_p) / 6.0;
        self.path.push(self.pos);
        if self.pos.norm() < f.rs {
            self.captured = true;
        }
    }
}

/// Parallel beam of photons fired along +x past the mass.
#[derive(Debug, Clone)]
pub struct PhotonBeam {
    pub field: Schwarzschild,
    pub photons: Vec<Photon>,
    config: GeodesicConfig,
    dt: f64,
    min_distance_ever: f64,
    frames: usize,
}

impl PhotonBeam {
    pub fn new(config: GeodesicConfig) -> NumLabResult<Self> {
        validate(&config)?;
        let field = Schwarzschild::new(config.solar_masses * SOLAR_MASS)?;
        let rs = field.rs;
        let start = config.start_distance * rs;
        let n = config.num_photons;
        let photons = (0..n)
            .map(|i| {
                // linspace(y_min, y_max, n)
                let frac = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                let y = (config.y_min + frac * (config.y_max - config.y_min)) * rs;
                Photon::new(
                    field,
                    Vector3::new(-start, y, 0.0),
                    Vector3::new(C_LIGHT, 0.0, 0.0),
                )
            })
            .collect();
        Ok(PhotonBeam {
            field,
            photons,
            dt: config.dt_fraction * rs / C_LIGHT,
            min_distance_ever: start,
            frames: 0,
            config,
        })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Advance every photon by `frames × substeps` RK4 steps.
    pub fn advance(&mut self, frames: usize) {
        for _ in 0..frames {
            for (i, photon) in self.photons.iter_mut().enumerate() {
                let was_captured = photon.captured;
                for _ in 0..self.config.substeps {
                    photon.step(self.dt);
                }
                if photon.captured && !was_captured {
                    debug!("geodesic: photon {i} captured in frame {}", self.frames);
                }
            }
            self.frames += 1;
            let now = self.min_distance();
            if now < self.min_distance_ever {
                self.min_distance_ever = now;
            }
        }
    }

    /// Smallest current distance of any photon from the mass.
    pub fn min_distance(&self) -> f64 {
        self.photons
            .iter()
            .map(Photon::distance)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn min_distance_ever(&self) -> f64 {
        self.min_distance_ever
    }

    /// Fraction of the way from the start distance to the horizon covered
    /// by the closest photon right now, clipped to [0, 1].
    pub fn progress(&self) -> f64 {
        let start = self.config.start_distance * self.field.rs;
        ((start - self.min_distance()) / (start - self.field.rs)).clamp(0.0, 1.0)
    }

    /// Half-width of a view window that keeps the closest approach in frame.
    pub fn view_half_width(&self) -> f64 {
        (4.5 * self.field.rs).max(1.5 * self.min_distance_ever)
    }

    pub fn captured_count(&self) -> usize {
        self.photons.iter().filter(|p| p.captured).count()
    }
}

fn validate(config: &GeodesicConfig) -> NumLabResult<()> {
    if !config.dt_fraction.is_finite() || config.dt_fraction <= 0.0 {
        return Err(NumLabError::ConfigError(format!(
            "geodesic.dt_fraction must be positive, got {}",
            config.dt_fraction
        )));
    }
    if config.num_photons == 0 {
        return Err(NumLabError::ConfigError(
            "geodesic.num_photons must be at least 1".to_string(),
        ));
    }
    if config.substeps == 0 {
        return Err(NumLabError::ConfigError(
            "geodesic.substeps must be at least 1".to_string(),
        ));
    }
    // start must lie outside the horizon for progress() to be defined
    if !(config.start_distance > 1.0) {
        return Err(NumLabError::ConfigError(format!(
            "geodesic.start_distance must exceed 1 Rs, got {}",
            config.start_distance
        )));
    }
    if !config.y_min.is_finite() || !config.y_max.is_finite() {
        return Err(NumLabError::ConfigError(
            "geodesic.y_min and y_max must be finite".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sun() -> Schwarzschild {
        Schwarzschild::new(SOLAR_MASS).unwrap()
    }

    #[test]
    fn test_solar_schwarzschild_radius() {
        let rs = schwarzschild_radius(SOLAR_MASS);
        assert_relative_eq!(rs, 2949.9, max_relative = 1e-4);
    }

    #[test]
    fn test_no_force_inside_horizon() {
        let f = sun();
        let p = Vector3::new(0.5 * f.rs, 0.0, 0.0);
        let v = Vector3::new(C_LIGHT, 0.0, 0.0);
        assert_eq!(f.acceleration(&p, &v), Vector3::zeros());
    }

    #[test]
    fn test_radial_motion_has_no_correction() {
        let f = sun();
        let r = 10.0 * f.rs;
        let p = Vector3::new(-r, 0.0, 0.0);
        let v = Vector3::new(C_LIGHT, 0.0, 0.0);
        let a = f.acceleration(&p, &v);
        let newton = G_NEWTON * SOLAR_MASS / (r * r);
        assert_relative_eq!(a.x, newton, max_relative = 1e-9);
        assert_eq!(a.y, 0.0);
    }

    #[test]
    fn test_radial_photon_is_captured_and_frozen() {
        let f = sun();
        let dt = 0.05 * f.rs / C_LIGHT;
        let mut photon = Photon::new(
            f,
            Vector3::new(-3.0 * f.rs, 0.0, 0.0),
            Vector3::new(C_LIGHT, 0.0, 0.0),
        );
        for _ in 0..100 {
            photon.step(dt);
        }
        assert!(photon.captured);
        let frozen = photon.pos;
        let len = photon.path.len();
        photon.step(dt);
        assert_eq!(photon.pos, frozen);
        assert_eq!(photon.path.len(), len);
        assert!(len <= 40, "captured after {len} steps");
    }

    #[test]
    fn test_beam_bends_toward_mass() {
        let mut beam = PhotonBeam::new(GeodesicConfig::default()).unwrap();
        assert_eq!(beam.photons.len(), 10);
        assert_eq!(beam.progress(), 0.0);
        beam.advance(3);
        assert_eq!(beam.frames(), 3);
        for p in &beam.photons {
            assert!(p.vel.y < 0.0);
            assert_eq!(p.path.len(), 3 * 40);
        }
        let p = beam.progress();
        assert!(p > 0.0 && p <= 1.0, "progress {p}");
        assert!(beam.min_distance_ever() <= 12.0 * beam.field.rs);
        assert!(beam.view_half_width() >= 4.5 * beam.field.rs);
    }

    #[test]
    fn test_single_photon_beam_uses_y_min() {
        let cfg = GeodesicConfig {
            num_photons: 1,
            ..GeodesicConfig::default()
        };
        let beam = PhotonBeam::new(cfg).unwrap();
        assert!((beam.photons[0].pos.y - 1.5 * beam.field.rs).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config() {
        for cfg in [
            GeodesicConfig { solar_masses: 0.0, ..GeodesicConfig::default() },
            GeodesicConfig { dt_fraction: -1.0, ..GeodesicConfig::default() },
            GeodesicConfig { num_photons: 0, ..GeodesicConfig::default() },
            GeodesicConfig { start_distance: 0.5, ..GeodesicConfig::default() },
        ] {
            assert!(matches!(PhotonBeam::new(cfg), Err(NumLabError::ConfigError(_))));
        }
    }
}
