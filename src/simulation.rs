//! Per-step orchestration: reset forces, evaluate, integrate, trace.

use crate::body::Body;
use crate::error::{validate_bodies, validate_theta, SimError};
use crate::force::{evaluate_all_pairs, evaluate_barnes_hut};
use crate::integrator::integrate;
use crate::octree::BhConfig;
use crate::trace::{NullSink, TraceSink};

/// Owns the body sequence exclusively for the lifetime of the
/// simulation; no external reader observes it mid-step.
pub struct Simulation {
    bodies: Vec<Body>,
    g: f64,
    dt: f64,
    step: u64,
    sink: Box<dyn TraceSink>,
}

impl Simulation {
    /// Validates every body (positive mass, finite state) before
    /// accepting it; an invalid input is a programmer error and is
    /// reported rather than silently tolerated.
    pub fn new(bodies: Vec<Body>, g: f64, dt: f64) -> Result<Self, SimError> {
        validate_bodies(&bodies, false)?;
        Ok(Self {
            bodies,
            g,
            dt,
            step: 0,
            sink: Box::new(NullSink),
        })
    }

    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn step_count(&self) -> u64 {
        self.step
    }

    fn time(&self) -> f64 {
        self.step as f64 * self.dt
    }

    /// Clears forces, runs the exact all-pairs evaluator, integrates, and
    /// emits a trace row for every body.
    pub fn step_naive(&mut self) -> Result<(), SimError> {
        evaluate_all_pairs(&mut self.bodies, self.g);
        integrate(&mut self.bodies, self.dt);
        self.sink.emit(self.step, self.time(), &self.bodies)?;
        self.step += 1;
        Ok(())
    }

    /// Clears forces, builds a fresh octree, runs the Barnes-Hut
    /// tree-walk for every body, integrates, and emits a trace row. The
    /// tree is dropped at the end of this call.
    pub fn step_barnes_hut(&mut self, config: &BhConfig) -> Result<(), SimError> {
        validate_bodies(&self.bodies, true)?;
        validate_theta(config.θ)?;

        evaluate_barnes_hut(&mut self.bodies, self.g, config);
        integrate(&mut self.bodies, self.dt);
        self.sink.emit(self.step, self.time(), &self.bodies)?;
        self.step += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::Vec3;

    fn body_at(mass: f64, x: f64, y: f64, z: f64) -> Body {
        Body::new(mass, Vec3::new(x, y, z), Vec3::new_zero())
    }

    #[test]
    fn step_counter_is_monotonic_from_zero() {
        let bodies = vec![body_at(1., 0., 0., 0.)];
        let mut sim = Simulation::new(bodies, 1., 0.01).unwrap();
        assert_eq!(sim.step_count(), 0);
        sim.step_naive().unwrap();
        assert_eq!(sim.step_count(), 1);
        sim.step_naive().unwrap();
        assert_eq!(sim.step_count(), 2);
    }

    #[test]
    fn barnes_hut_rejects_empty_body_set() {
        let mut sim = Simulation::new(Vec::new(), 1., 0.01).unwrap();
        let err = sim.step_barnes_hut(&BhConfig::default()).unwrap_err();
        assert!(matches!(err, SimError::EmptyBodySet));
    }

    #[test]
    fn barnes_hut_rejects_negative_theta() {
        let bodies = vec![body_at(1., 0., 0., 0.)];
        let mut sim = Simulation::new(bodies, 1., 0.01).unwrap();
        let config = BhConfig {
            θ: -0.1,
            ..Default::default()
        };
        let err = sim.step_barnes_hut(&config).unwrap_err();
        assert!(matches!(err, SimError::InvalidTheta { .. }));
    }

    #[test]
    fn barnes_hut_accepts_zero_theta_as_exhaustive_walk() {
        let bodies = vec![body_at(1., 0., 0., 0.), body_at(1., 1., 0., 0.)];
        let mut sim = Simulation::new(bodies, 1., 0.01).unwrap();
        let config = BhConfig {
            θ: 0.,
            ..Default::default()
        };
        assert!(sim.step_barnes_hut(&config).is_ok());
    }

    #[test]
    fn constructor_rejects_nonpositive_mass() {
        let bodies = vec![body_at(0., 0., 0., 0.)];
        let err = Simulation::new(bodies, 1., 0.01).unwrap_err();
        assert!(matches!(err, SimError::NonPositiveMass { .. }));
    }

    #[test]
    fn single_body_translates_by_velocity_times_dt() {
        let mut b = body_at(1., 0., 0., 0.);
        b.velocity = Vec3::new(2., 0., 0.);
        let mut sim = Simulation::new(vec![b], 1., 0.5).unwrap();
        sim.step_naive().unwrap();
        assert_eq!(sim.bodies()[0].position, Vec3::new(1., 0., 0.));
    }
}
