//! Adaptive octree over a body set, aggregating mass and center of mass up
//! the tree for Barnes-Hut force evaluation.
//!
//! Nodes live in a flat arena (`Tree::nodes`) indexed by `usize`, in the
//! spirit of the teacher's own `Tree { nodes: Vec<Node> }` design: this
//! avoids pointer-chasing during the tree walk and makes bulk teardown
//! (drop the `Vec`) trivial. A tree never outlives the step that built it.

use crate::body::Body;
use crate::region::Region;
use crate::vec3::Vec3;

/// Barnes-Hut tuning knobs. Named after the teacher's own `BhConfig`.
#[derive(Debug, Clone, Copy)]
#[allow(non_snake_case)]
pub struct BhConfig {
    /// Multipole acceptance parameter. 0 degenerates to an exhaustive
    /// tree-walk (still visits every leaf); larger values group more
    /// aggressively at the cost of accuracy. Typical value: 0.5.
    pub θ: f64,
    /// Bodies a leaf may hold before it is considered full; normally 1.
    /// Only exceeded when `max_tree_depth` is reached for near-coincident
    /// bodies, producing a multi-body leaf.
    pub max_bodies_per_leaf: usize,
    /// Recursion/subdivision depth cap. Prevents unbounded subdivision
    /// for bodies at (or extremely near) the same position.
    pub max_tree_depth: usize,
}

impl Default for BhConfig {
    fn default() -> Self {
        Self {
            θ: 0.5,
            max_bodies_per_leaf: 1,
            max_tree_depth: 48,
        }
    }
}

/// A single octree node. A node is a leaf iff all eight `children` slots
/// are absent; it then holds zero or more `body_ids` (more than one only
/// when `max_tree_depth` forced a multi-body leaf). An internal node
/// holds no direct body reference.
#[derive(Debug, Clone)]
pub struct Node {
    pub bounds: Region,
    pub mass: f64,
    pub center_of_mass: Vec3,
    pub children: [Option<usize>; 8],
    pub body_ids: Vec<usize>,
}

impl Node {
    fn empty(bounds: Region) -> Self {
        Self {
            bounds,
            mass: 0.,
            center_of_mass: Vec3::new_zero(),
            children: [None; 8],
            body_ids: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// An octree built fresh from a body set for a single simulation step.
/// Holds non-owning indices into that body set; never retained past the
/// step that built it.
#[derive(Debug)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub const ROOT: usize = 0;

    /// Builds the whole tree: computes the root bounding region, then
    /// inserts every body in order. `bodies` must be non-empty; this is a
    /// programmer-error precondition, not a runtime-recoverable one (see
    /// `Simulation`'s upfront validation).
    pub fn build(bodies: &[Body], config: &BhConfig) -> Self {
        assert!(!bodies.is_empty(), "cannot build an octree from an empty body set");

        let root_bounds = root_region(bodies);
        let mut tree = Self {
            nodes: vec![Node::empty(root_bounds)],
        };

        for (id, body) in bodies.iter().enumerate() {
            tree.insert(Self::ROOT, 0, id, body, bodies, config);
        }

        tree
    }

    /// Inserts `body` (index `body_id` in `bodies`) starting from
    /// `start_node`, which sits at `start_depth` below the root. Follows
    /// spec.md's three insertion cases (empty leaf, occupied leaf,
    /// internal), recomputing aggregates bottom-up once the body reaches
    /// its resting node.
    fn insert(
        &mut self,
        start_node: usize,
        start_depth: usize,
        body_id: usize,
        body: &Body,
        bodies: &[Body],
        config: &BhConfig,
    ) {
        let mut path = Vec::new();
        let mut current = start_node;
        let mut depth = start_depth;

        loop {
            path.push(current);

            if self.nodes[current].is_leaf() {
                if self.nodes[current].body_ids.is_empty() {
                    // Case: empty leaf. Attach directly.
                    self.nodes[current].body_ids.push(body_id);
                    break;
                }

                if depth >= config.max_tree_depth
                    || self.nodes[current].body_ids.len() < config.max_bodies_per_leaf
                {
                    // Depth cap (or leaf not yet full): fold the body into
                    // this leaf rather than subdividing further. This is
                    // the pathological near-coincident-bodies mitigation.
                    self.nodes[current].body_ids.push(body_id);
                    break;
                }

                // Case: occupied leaf at capacity. Materialize all eight
                // children, move the resident body(s) down, then continue
                // the loop to place the new body as an internal insertion.
                let bounds = self.nodes[current].bounds;
                let mut child_ids = [0usize; 8];
                for (i, id) in child_ids.iter_mut().enumerate() {
                    *id = self.nodes.len();
                    self.nodes.push(Node::empty(bounds.child_region(i)));
                }
                self.nodes[current].children = child_ids.map(Some);

                let resident_ids = std::mem::take(&mut self.nodes[current].body_ids);
                for resident_id in resident_ids {
                    let resident = &bodies[resident_id];
                    let idx = bounds.octant_of(resident.position);
                    self.insert(child_ids[idx], depth + 1, resident_id, resident, bodies, config);
                }

                // Fall through to the internal case below for the new body.
            }

            // Case: internal node. Select (or lazily create) the child
            // octant and recurse into it.
            let bounds = self.nodes[current].bounds;
            let idx = bounds.octant_of(body.position);

            let child = match self.nodes[current].children[idx] {
                Some(c) => c,
                None => {
                    let c = self.nodes.len();
                    self.nodes.push(Node::empty(bounds.child_region(idx)));
                    self.nodes[current].children[idx] = Some(c);
                    c
                }
            };

            current = child;
            depth += 1;
        }

        for &node_id in path.iter().rev() {
            self.recompute_aggregate(node_id, bodies);
        }
    }

    fn recompute_aggregate(&mut self, node_id: usize, bodies: &[Body]) {
        let (mass, center_of_mass) = if self.nodes[node_id].is_leaf() {
            let mut mass = 0.;
            let mut weighted = Vec3::new_zero();
            for &id in &self.nodes[node_id].body_ids {
                mass += bodies[id].mass;
                weighted += bodies[id].position * bodies[id].mass;
            }
            (mass, if mass > 0. { weighted / mass } else { Vec3::new_zero() })
        } else {
            let mut mass = 0.;
            let mut weighted = Vec3::new_zero();
            for child in self.nodes[node_id].children.into_iter().flatten() {
                let child_mass = self.nodes[child].mass;
                if child_mass > 0. {
                    mass += child_mass;
                    weighted += self.nodes[child].center_of_mass * child_mass;
                }
            }
            (mass, if mass > 0. { weighted / mass } else { Vec3::new_zero() })
        };

        self.nodes[node_id].mass = mass;
        self.nodes[node_id].center_of_mass = center_of_mass;
    }
}

/// Computes the cubic bounding region enclosing every body, per-axis
/// `(min, max)` centered and coerced to a cube; falls back to a unit
/// half-size when every body is co-located.
fn root_region(bodies: &[Body]) -> Region {
    let mut min = bodies[0].position;
    let mut max = bodies[0].position;

    for body in &bodies[1..] {
        min.x = min.x.min(body.position.x);
        min.y = min.y.min(body.position.y);
        min.z = min.z.min(body.position.z);
        max.x = max.x.max(body.position.x);
        max.y = max.y.max(body.position.y);
        max.z = max.z.max(body.position.z);
    }

    let center = Vec3::new(
        (min.x + max.x) / 2.,
        (min.y + max.y) / 2.,
        (min.z + max.z) / 2.,
    );

    let span = (max.x - min.x).max(max.y - min.y).max(max.z - min.z);
    let half_size = if span > 0. { span / 2. } else { 1. };

    Region::new(center, half_size)
}
