//! Initial-condition generators. Not part of the simulation core proper
//! (spec.md treats these as an external, consumed interface), but a
//! runnable crate needs a source of bodies, so the shapes named in
//! spec.md's external-interfaces section are implemented here, ported
//! from the reference C++ `initial_conditions.cpp`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::body::Body;
use crate::vec3::Vec3;

/// N bodies with mass uniform on `[mass_min, mass_max]`, position
/// components uniform on `[-position_range, position_range]`, velocity
/// components uniform on `[-velocity_range, velocity_range]`, from a
/// seeded source.
pub fn uniform_random(
    n: usize,
    mass_min: f64,
    mass_max: f64,
    position_range: f64,
    velocity_range: f64,
    seed: u64,
) -> Vec<Body> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut bodies = Vec::with_capacity(n);

    for _ in 0..n {
        let mass = rng.random_range(mass_min..=mass_max);
        let position = Vec3::new(
            rng.random_range(-position_range..=position_range),
            rng.random_range(-position_range..=position_range),
            rng.random_range(-position_range..=position_range),
        );
        let velocity = Vec3::new(
            rng.random_range(-velocity_range..=velocity_range),
            rng.random_range(-velocity_range..=velocity_range),
            rng.random_range(-velocity_range..=velocity_range),
        );
        bodies.push(Body::new(mass, position, velocity));
    }

    bodies
}

/// Two counter-rotating disks of `n_per_galaxy` bodies each, centered at
/// `(+center_offset, 0, 0)` and `(-center_offset, 0, 0)`, each orbiting a
/// central mass `central_mass` placed at its galaxy's center. Returns
/// `2 * n_per_galaxy + 2` bodies. Planar offsets are Gaussian-distributed
/// around each center with the z axis flattened to keep the disks thin.
pub fn twin_galaxies(
    n_per_galaxy: usize,
    center_offset: f64,
    mass_min: f64,
    mass_max: f64,
    position_spread: f64,
    central_mass: f64,
    seed: u64,
) -> Vec<Body> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let planar = Normal::new(0., position_spread / 4.).unwrap();
    let flatten = Normal::new(0., position_spread / 4.).unwrap();

    let mut bodies = Vec::with_capacity(2 * n_per_galaxy + 2);

    let centers = [Vec3::new(center_offset, 0., 0.), Vec3::new(-center_offset, 0., 0.)];
    // One galaxy swirls counterclockwise (+z axis), the other clockwise
    // (-z axis), matching the original's counter-rotating convention.
    let swirl_axes = [Vec3::new(0., 0., 1.), Vec3::new(0., 0., -1.)];

    for (center, axis) in centers.iter().zip(swirl_axes.iter()) {
        for _ in 0..n_per_galaxy {
            let mass = rng.random_range(mass_min..=mass_max);

            let offset = Vec3::new(
                planar.sample(&mut rng),
                planar.sample(&mut rng),
                0.5 * flatten.sample(&mut rng),
            );
            let position = *center + offset;

            let r_vec = position - *center;
            let r = r_vec.norm();
            let velocity = if r > 0. {
                r_vec.normalize().cross(*axis) * ((central_mass.sqrt()) / (r + 1e-4).sqrt())
            } else {
                Vec3::new_zero()
            };

            bodies.push(Body::new(mass, position, velocity));
        }
    }

    // Central masses, each with a small tangential kick to seed rotation.
    bodies.push(Body::new(central_mass, centers[0], Vec3::new(0., 2.5, 0.)));
    bodies.push(Body::new(central_mass, centers[1], Vec3::new(0., -2.5, 0.)));

    bodies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_random_produces_requested_count() {
        let bodies = uniform_random(16, 1., 10., 50., 1., 42);
        assert_eq!(bodies.len(), 16);
        for b in &bodies {
            assert!(b.is_valid());
        }
    }

    #[test]
    fn uniform_random_is_seed_reproducible() {
        let a = uniform_random(8, 1., 10., 50., 1., 7);
        let b = uniform_random(8, 1., 10., 50., 1., 7);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.velocity, y.velocity);
            assert_eq!(x.mass, y.mass);
        }
    }

    #[test]
    fn twin_galaxies_returns_2n_plus_2_bodies() {
        let bodies = twin_galaxies(10, 20., 0.1, 0.5, 30., 1000., 1234);
        assert_eq!(bodies.len(), 22);
        for b in &bodies {
            assert!(b.mass.is_finite() && b.mass > 0.);
            assert!(b.position.x.is_finite());
            assert!(b.velocity.x.is_finite());
        }
    }
}
