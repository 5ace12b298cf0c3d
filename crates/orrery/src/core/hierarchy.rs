// core/hierarchy.rs
//
// Body hierarchy: parent-child links by BodyId, resolved parents-first every tick.
//
// Usage:
//   let mut system = BodySystem::from_descs(&descs, 4, seed)?;
//   system.update(delta_days, animation_enabled);
//   let earth = system.world_position(system.id_of("Earth")?);

use glam::DVec3;
use std::collections::HashMap;

use crate::api::types::BodyId;
use crate::components::body::{BodyDesc, BodyNode};
use crate::config::ConfigError;
use crate::core::rng::Rng;

/// Every body of one system, with a cached pre-order traversal.
///
/// Structure is fixed at construction apart from [`BodySystem::remove`], so
/// the ordering check happens once and the per-tick pass is a flat loop.
#[derive(Debug, Clone)]
pub struct BodySystem {
    nodes: HashMap<BodyId, BodyNode>,
    names: HashMap<String, BodyId>,
    /// Bodies with no parent, in construction order.
    roots: Vec<BodyId>,
    /// Pre-order traversal from the roots: every parent precedes its children.
    order: Vec<BodyId>,
    /// Position of each body in `order`.
    index: HashMap<BodyId, usize>,
    max_depth: usize,
    non_converged: u64,
}

impl BodySystem {
    /// Validate the descriptors and build the tree.
    ///
    /// Rejects duplicate names, unknown parents, parent cycles and trees deeper
    /// than `max_depth` levels (roots are level 1). Bodies without an explicit
    /// phase get one from `seed`.
    pub fn from_descs(descs: &[BodyDesc], max_depth: usize, seed: u64) -> Result<Self, ConfigError> {
        if descs.is_empty() {
            return Err(ConfigError::EmptySystem);
        }

        let mut names = HashMap::with_capacity(descs.len());
        for (i, desc) in descs.iter().enumerate() {
            desc.validate()?;
            if names.insert(desc.name.clone(), BodyId(i as u32)).is_some() {
                return Err(ConfigError::DuplicateName(desc.name.clone()));
            }
        }

        let mut parents: Vec<Option<usize>> = Vec::with_capacity(descs.len());
        for desc in descs {
            let parent = match &desc.parent {
                None => None,
                Some(parent) => {
                    let id = names.get(parent).ok_or_else(|| ConfigError::UnknownParent {
                        body: desc.name.clone(),
                        parent: parent.clone(),
                    })?;
                    Some(id.0 as usize)
                }
            };
            parents.push(parent);
        }

        // Walk up from each body. More steps than bodies means a loop.
        let mut depths = Vec::with_capacity(descs.len());
        for (i, desc) in descs.iter().enumerate() {
            let mut depth = 1;
            let mut cursor = parents[i];
            while let Some(p) = cursor {
                if p == i || depth > descs.len() {
                    return Err(ConfigError::Cycle { body: desc.name.clone() });
                }
                depth += 1;
                cursor = parents[p];
            }
            if depth > max_depth {
                return Err(ConfigError::TooDeep { body: desc.name.clone(), depth, max: max_depth });
            }
            depths.push(depth);
        }

        let mut nodes = HashMap::with_capacity(descs.len());
        let mut roots = Vec::new();
        for (i, desc) in descs.iter().enumerate() {
            let id = BodyId(i as u32);
            let phase = desc
                .phase
                .unwrap_or_else(|| Rng::for_index(seed, i as u64).next_angle());
            let mut node = BodyNode::new(id, desc, phase);
            node.parent = parents[i].map(|p| BodyId(p as u32));
            node.depth = depths[i];
            if node.parent.is_none() {
                roots.push(id);
            }
            nodes.insert(id, node);
        }
        for (i, parent) in parents.iter().enumerate() {
            if let Some(p) = parent {
                if let Some(parent_node) = nodes.get_mut(&BodyId(*p as u32)) {
                    parent_node.children.push(BodyId(i as u32));
                }
            }
        }

        let mut system = Self {
            nodes,
            names,
            roots,
            order: Vec::new(),
            index: HashMap::new(),
            max_depth,
            non_converged: 0,
        };
        system.rebuild_order();
        system.resolve();

        log::info!(
            "body system: {} bodies, {} roots, depth {}",
            system.len(),
            system.roots.len(),
            depths.iter().copied().max().unwrap_or(0),
        );
        Ok(system)
    }

    fn rebuild_order(&mut self) {
        let mut order = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            self.collect_preorder(root, &mut order);
        }
        self.index = order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        self.order = order;
    }

    fn collect_preorder(&self, id: BodyId, out: &mut Vec<BodyId>) {
        let Some(node) = self.nodes.get(&id) else { return };
        out.push(id);
        for &child in &node.children {
            self.collect_preorder(child, out);
        }
    }

    /// Advance every body's orbital and spin angles.
    pub fn advance(&mut self, delta_days: f64, animation_enabled: bool) {
        for node in self.nodes.values_mut() {
            node.advance(delta_days, animation_enabled);
        }
    }

    /// Recompute local offsets, then world positions parents-first.
    pub fn resolve(&mut self) {
        for i in 0..self.order.len() {
            let id = self.order[i];
            let parent_world = self
                .nodes
                .get(&id)
                .and_then(|n| n.parent)
                .and_then(|p| self.nodes.get(&p))
                .map(|p| p.state.world);

            let Some(node) = self.nodes.get_mut(&id) else { continue };
            if let Some(solution) = node.resolve_local() {
                if !solution.converged {
                    self.non_converged += 1;
                    if node.non_converged == 1 {
                        log::warn!(
                            "{}: Kepler solve did not converge after {} iterations, using best estimate",
                            node.name,
                            solution.iterations
                        );
                    }
                }
            }
            node.resolve_world(parent_world);
        }
    }

    /// One simulation step: advance, then resolve.
    pub fn update(&mut self, delta_days: f64, animation_enabled: bool) {
        self.advance(delta_days, animation_enabled);
        self.resolve();
    }

    /// Put every body at an absolute epoch and resolve.
    pub fn set_epoch_days(&mut self, days: f64) {
        for node in self.nodes.values_mut() {
            node.set_epoch_days(days);
        }
        self.resolve();
    }

    /// Remove a body and everything orbiting it. Returns the removed ids,
    /// parents first; `None` if no body has that name.
    pub fn remove(&mut self, name: &str) -> Option<Vec<BodyId>> {
        let id = *self.names.get(name)?;
        let mut removed = Vec::new();
        self.collect_preorder(id, &mut removed);

        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        for gone in &removed {
            if let Some(node) = self.nodes.remove(gone) {
                self.names.remove(&node.name);
            }
        }
        self.roots.retain(|r| !removed.contains(r));
        self.rebuild_order();

        log::debug!("removed {name} and {} dependents", removed.len() - 1);
        Some(removed)
    }

    pub fn get(&self, id: BodyId) -> Option<&BodyNode> {
        self.nodes.get(&id)
    }

    /// Mutable access for editing a body's orbit in place. Takes effect on
    /// the next [`BodySystem::resolve`].
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut BodyNode> {
        self.nodes.get_mut(&id)
    }

    pub fn id_of(&self, name: &str) -> Option<BodyId> {
        self.names.get(name).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&BodyNode> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Bodies in traversal order (parents before children).
    pub fn iter(&self) -> impl Iterator<Item = &BodyNode> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Position of the body in traversal order.
    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn world_position(&self, id: BodyId) -> Option<DVec3> {
        self.get(id).map(BodyNode::world_position)
    }

    pub fn roots(&self) -> &[BodyId] {
        &self.roots
    }

    pub fn children(&self, id: BodyId) -> Option<&[BodyId]> {
        self.get(id).map(|n| n.children.as_slice())
    }

    /// Farthest the body can get from the system origin: its own extent plus
    /// every ancestor's.
    pub fn reach(&self, id: BodyId) -> f64 {
        let mut total = 0.0;
        let mut cursor = self.get(id);
        while let Some(node) = cursor {
            total += node.extent();
            cursor = node.parent.and_then(|p| self.get(p));
        }
        total
    }

    /// Radius of a sphere around the origin that holds every body.
    pub fn system_radius(&self) -> f64 {
        self.iter()
            .map(|n| self.reach(n.id) + n.radius)
            .fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Total Kepler solves that did not converge.
    pub fn non_converged(&self) -> u64 {
        self.non_converged
    }
}
