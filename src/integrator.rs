//! Semi-implicit (symplectic) Euler integration.

use crate::body::Body;

/// Advances every body by one step of size `dt`, in place: updates
/// velocity from the (already-computed) force first, then position from
/// the freshly updated velocity. Must only run once every body's force
/// has been fully assigned for the step.
pub fn integrate(bodies: &mut [Body], dt: f64) {
    for body in bodies {
        let acceleration = body.force / body.mass;
        body.velocity += acceleration * dt;
        body.position += body.velocity * dt;
    }
}
