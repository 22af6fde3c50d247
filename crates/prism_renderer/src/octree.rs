//! Octree acceleration structure.
//!
//! Recursively splits the scene bounds into eight octants, keeping only the
//! octants that overlap at least one shape's bounding box. A shape whose box
//! straddles a split plane lands in every leaf it overlaps, so the tree
//! records containment rather than a disjoint partition.
//!
//! Planes have no bounding box and never enter the tree; traversal appends
//! them to every candidate set.

use prism_core::{Scene, ShapeId};
use prism_math::{Aabb, Interval, Ray};

/// Nodes whose every edge is longer than this may still be split.
pub const MIN_NODE_EXTENT: f32 = 0.2;

/// Index of a node in its [`Octree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Octree node: a box with either children or, for a leaf, shapes.
#[derive(Clone, Debug)]
pub struct Node {
    bbox: Aabb,
    children: Vec<NodeId>,
    shapes: Vec<ShapeId>,
}

impl Node {
    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Shapes overlapping this node. Empty for interior nodes.
    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A leaf touched by a ray, as reported by [`Octree::pick`].
#[derive(Clone, Debug, PartialEq)]
pub struct LeafVisit {
    pub bbox: Aabb,
    pub shapes: Vec<ShapeId>,
}

/// Summary numbers for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OctreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub max_depth: usize,
}

/// Node arena plus the root, if the scene has any bounded shapes.
#[derive(Clone, Debug, Default)]
pub struct Octree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    planes: Vec<ShapeId>,
    shape_count: usize,
}

impl Octree {
    /// Build the tree over the scene's bounded shapes.
    pub fn build(scene: &Scene) -> Self {
        let mut tree = Octree {
            nodes: Vec::new(),
            root: None,
            planes: scene.planes().to_vec(),
            shape_count: scene.shape_count(),
        };

        if let Some(bounds) = scene.bounds() {
            let root = tree.push(bounds, scene.bounded().to_vec());
            tree.root = Some(root);
            tree.partition(scene, root);
        }

        let stats = tree.stats();
        log::debug!(
            "Octree: {} nodes, {} leaves, depth {}",
            stats.nodes,
            stats.leaves,
            stats.max_depth
        );
        tree
    }

    fn push(&mut self, bbox: Aabb, shapes: Vec<ShapeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            bbox,
            children: Vec::new(),
            shapes,
        });
        id
    }

    fn should_split(bbox: &Aabb, shape_count: usize) -> bool {
        let extent = bbox.extent();
        shape_count > 1 && extent.min_element() > MIN_NODE_EXTENT
    }

    /// Split `id` into up to eight children, then recurse into each.
    fn partition(&mut self, scene: &Scene, id: NodeId) {
        let bbox = self.nodes[id.0].bbox;
        if !Self::should_split(&bbox, self.nodes[id.0].shapes.len()) {
            return;
        }

        let shapes = std::mem::take(&mut self.nodes[id.0].shapes);
        for octant in bbox.octants() {
            let inside: Vec<ShapeId> = shapes
                .iter()
                .copied()
                .filter(|&shape| {
                    scene
                        .shape(shape)
                        .bounding_box()
                        .is_some_and(|b| b.overlaps(&octant))
                })
                .collect();

            if inside.is_empty() {
                continue;
            }
            let child = self.push(octant, inside);
            self.nodes[id.0].children.push(child);
            self.partition(scene, child);
        }

        // Every shape overlaps the parent, so at least one octant matched.
        // Keep the list anyway if rounding made them all miss.
        if self.nodes[id.0].children.is_empty() {
            self.nodes[id.0].shapes = shapes;
        } else {
            log::trace!(
                "Split node {} ({} shapes) into {} children",
                id.0,
                shapes.len(),
                self.nodes[id.0].children.len()
            );
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn stats(&self) -> OctreeStats {
        let mut stats = OctreeStats {
            nodes: self.nodes.len(),
            ..Default::default()
        };
        if let Some(root) = self.root {
            self.depth_walk(root, 0, &mut stats);
        }
        stats
    }

    fn depth_walk(&self, id: NodeId, depth: usize, stats: &mut OctreeStats) {
        let node = self.node(id);
        stats.max_depth = stats.max_depth.max(depth);
        if node.is_leaf() {
            stats.leaves += 1;
        }
        for &child in &node.children {
            self.depth_walk(child, depth + 1, stats);
        }
    }

    /// Call `visit` for every leaf whose box the ray's line crosses.
    ///
    /// The slab test covers the whole line through the ray, so leaves behind
    /// the origin are visited too.
    pub fn visit_leaves(&self, ray: &Ray, mut visit: impl FnMut(&Node)) {
        if let Some(root) = self.root {
            self.walk(root, ray, &mut visit);
        }
    }

    fn walk(&self, id: NodeId, ray: &Ray, visit: &mut dyn FnMut(&Node)) {
        let node = self.node(id);
        if !node.bbox.hit(ray, Interval::UNIVERSE) {
            return;
        }
        if node.is_leaf() {
            visit(node);
            return;
        }
        for &child in &node.children {
            self.walk(child, ray, visit);
        }
    }

    /// Shapes the ray might hit: the contents of every leaf it crosses,
    /// without duplicates, followed by every plane.
    pub fn candidates(&self, ray: &Ray) -> Vec<ShapeId> {
        let mut seen = vec![false; self.shape_count];
        let mut out: Vec<ShapeId> = Vec::new();
        self.visit_leaves(ray, |leaf| {
            for &shape in &leaf.shapes {
                if !std::mem::replace(&mut seen[shape.0], true) {
                    out.push(shape);
                }
            }
        });
        out.extend_from_slice(&self.planes);
        out
    }

    /// Every leaf the ray crosses, with its box and shapes.
    pub fn pick(&self, ray: &Ray) -> Vec<LeafVisit> {
        let mut visits = Vec::new();
        self.visit_leaves(ray, |leaf| {
            visits.push(LeafVisit {
                bbox: leaf.bbox,
                shapes: leaf.shapes.clone(),
            })
        });
        visits
    }
}
