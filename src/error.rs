//! Error taxonomy. Input validation and structural problems are fatal and
//! surface here; numerical degeneracies during stepping (softening,
//! self-exclusion) stay in-band and never produce an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("body {index} has non-positive mass {mass}")]
    NonPositiveMass { index: usize, mass: f64 },

    #[error("body {index} has a non-finite {field}")]
    NonFiniteState { index: usize, field: &'static str },

    #[error("Barnes-Hut requires at least one body, got an empty body set")]
    EmptyBodySet,

    #[error("acceptance parameter theta must be non-negative, got {theta}")]
    InvalidTheta { theta: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Validates a body set before the step loop starts. `require_nonempty`
/// should be `true` when the caller is about to run Barnes-Hut (which
/// cannot build a tree from zero bodies).
pub fn validate_bodies(bodies: &[crate::body::Body], require_nonempty: bool) -> Result<(), SimError> {
    if require_nonempty && bodies.is_empty() {
        return Err(SimError::EmptyBodySet);
    }

    for (index, body) in bodies.iter().enumerate() {
        if body.mass <= 0. {
            return Err(SimError::NonPositiveMass {
                index,
                mass: body.mass,
            });
        }
        if !body.position.x.is_finite() || !body.position.y.is_finite() || !body.position.z.is_finite() {
            return Err(SimError::NonFiniteState { index, field: "position" });
        }
        if !body.velocity.x.is_finite() || !body.velocity.y.is_finite() || !body.velocity.z.is_finite() {
            return Err(SimError::NonFiniteState { index, field: "velocity" });
        }
    }

    Ok(())
}

/// θ = 0 degenerates to an exhaustive tree-walk (every node is opened) and
/// is a valid, well-defined input; only negative θ is rejected.
pub fn validate_theta(theta: f64) -> Result<(), SimError> {
    if theta < 0. {
        return Err(SimError::InvalidTheta { theta });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::vec3::Vec3;

    #[test]
    fn rejects_empty_set_when_required() {
        let bodies: Vec<Body> = Vec::new();
        assert!(matches!(
            validate_bodies(&bodies, true),
            Err(SimError::EmptyBodySet)
        ));
    }

    #[test]
    fn allows_empty_set_when_not_required() {
        let bodies: Vec<Body> = Vec::new();
        assert!(validate_bodies(&bodies, false).is_ok());
    }

    #[test]
    fn rejects_nonpositive_mass() {
        let bodies = vec![Body::new(0., Vec3::new_zero(), Vec3::new_zero())];
        assert!(matches!(
            validate_bodies(&bodies, false),
            Err(SimError::NonPositiveMass { .. })
        ));
    }

    #[test]
    fn rejects_nonfinite_position() {
        let bodies = vec![Body::new(1., Vec3::new(f64::INFINITY, 0., 0.), Vec3::new_zero())];
        assert!(matches!(
            validate_bodies(&bodies, false),
            Err(SimError::NonFiniteState { .. })
        ));
    }

    #[test]
    fn rejects_negative_theta_but_allows_zero() {
        assert!(matches!(validate_theta(-0.1), Err(SimError::InvalidTheta { .. })));
        assert!(validate_theta(0.).is_ok());
        assert!(validate_theta(0.5).is_ok());
    }
}
