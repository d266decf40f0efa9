//! Force evaluation: an exact all-pairs oracle and a Barnes-Hut tree-walk
//! approximation. Both write their results into each `Body::force`.

use crate::body::Body;
use crate::octree::{BhConfig, Tree};
use crate::vec3::Vec3;

/// Softening length. Added (squared) to squared distance to keep close
/// approaches from producing singular forces.
pub const SOFTENING: f64 = 1e-5;

fn clear_forces(bodies: &mut [Body]) {
    for body in bodies {
        body.force = Vec3::new_zero();
    }
}

/// Two-body gravitational force vector on a body of mass `m_target` at
/// `target` from a source of mass `m_source` at `source`, softened by
/// `SOFTENING`. Points from `target` toward `source`.
fn pairwise_force(target: Vec3, m_target: f64, source: Vec3, m_source: f64, g: f64) -> Vec3 {
    let r = source - target;
    let d2 = r.norm2() + SOFTENING * SOFTENING;
    let d = d2.sqrt();
    let f = g * m_target * m_source / (d2 * d);
    r * f
}

/// Exact O(N^2) pairwise evaluator; the numerical reference the
/// Barnes-Hut evaluator is checked against. Clears all forces first.
pub fn evaluate_all_pairs(bodies: &mut [Body], g: f64) {
    clear_forces(bodies);

    let n = bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let f = pairwise_force(
                bodies[i].position,
                bodies[i].mass,
                bodies[j].position,
                bodies[j].mass,
                g,
            );
            bodies[i].force += f;
            bodies[j].force -= f;
        }
    }
}

/// Builds a fresh octree from `bodies` and accumulates Barnes-Hut forces
/// for every body. Clears all forces first; the tree is dropped when this
/// function returns (it never outlives the step).
pub fn evaluate_barnes_hut(bodies: &mut [Body], g: f64, config: &BhConfig) {
    clear_forces(bodies);

    let tree = Tree::build(bodies, config);

    let forces: Vec<Vec3> = (0..bodies.len())
        .map(|id| accumulate(&tree, Tree::ROOT, bodies, id, bodies[id].position, bodies[id].mass, g, config))
        .collect();

    for (body, f) in bodies.iter_mut().zip(forces) {
        body.force = f;
    }
}

/// Walks the tree from `node_id`, accumulating the force on body
/// `target_id` (at `target_pos`, mass `target_mass`). Self-exclusion is by
/// body-index identity, not position, so coincident distinct bodies still
/// interact (bounded by softening). A leaf is never approximated by its
/// aggregate: its resident bodies are summed directly, so a multi-body leaf
/// (normally only the depth-cap pathological case, but reachable any time
/// `max_bodies_per_leaf` is raised above 1) still yields each non-target
/// resident's own force rather than dropping the whole leaf.
fn accumulate(
    tree: &Tree,
    node_id: usize,
    bodies: &[Body],
    target_id: usize,
    target_pos: Vec3,
    target_mass: f64,
    g: f64,
    config: &BhConfig,
) -> Vec3 {
    let node = &tree.nodes[node_id];

    if node.is_leaf() {
        let mut total = Vec3::new_zero();
        for &id in &node.body_ids {
            if id == target_id {
                continue;
            }
            total += pairwise_force(target_pos, target_mass, bodies[id].position, bodies[id].mass, g);
        }
        return total;
    }

    if node.mass <= 0. {
        return Vec3::new_zero();
    }

    let r = node.center_of_mass - target_pos;
    let d2 = r.norm2() + SOFTENING * SOFTENING;
    let d = d2.sqrt();
    if d == 0. {
        return Vec3::new_zero();
    }

    let s = 2. * node.bounds.half_size;
    if s / d < config.θ {
        let f = g * target_mass * node.mass / (d2 * d);
        return r * f;
    }

    let mut total = Vec3::new_zero();
    for child in node.children.into_iter().flatten() {
        total += accumulate(tree, child, bodies, target_id, target_pos, target_mass, g, config);
    }
    total
}
