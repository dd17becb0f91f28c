// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Merging R-tree backend: raw boxes are absorbed into leaf clusters chosen by
//! least volume enlargement, and overflowing nodes are split quadratically.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::backend::{BackendKind, ClusterBackend};
use crate::config::ClusterConfig;
use crate::error::ClusterError;
use crate::types::{Aabb3D, Scalar, enlargement, union_aabb, volume};

/// Handle of a node inside a [`MergingRTree`] arena.
///
/// Handles are only meaningful for the tree that produced them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    const fn get(self) -> usize {
        self.0
    }
}

/// Contents of a cluster node.
#[derive(Clone, Debug)]
pub enum NodeKind<T> {
    /// Raw boxes, exactly as inserted.
    Leaf(Vec<Aabb3D<T>>),
    /// Child clusters.
    Interior(Vec<NodeId>),
}

/// A cluster in the tree.
///
/// `bounds` is always the exact union of every raw box below the node.
#[derive(Clone, Debug)]
pub struct ClusterNode<T> {
    bounds: Aabb3D<T>,
    kind: NodeKind<T>,
    parent: Option<NodeId>,
}

impl<T: Scalar> ClusterNode<T> {
    /// Union of every raw box in this subtree.
    pub fn bounds(&self) -> Aabb3D<T> {
        self.bounds
    }

    /// Raw boxes or child handles.
    pub fn kind(&self) -> &NodeKind<T> {
        &self.kind
    }

    /// Non-owning link to the parent; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Whether this node holds raw boxes.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    fn entry_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(boxes) => boxes.len(),
            NodeKind::Interior(children) => children.len(),
        }
    }
}

/// R-tree that clusters raw boxes into leaf nodes.
///
/// All nodes live in one arena and refer to each other by [`NodeId`]; the
/// arena is the sole owner, so dropping the tree drops every node at once.
/// Nodes are never removed individually.
#[derive(Clone)]
pub struct MergingRTree<T: Scalar> {
    config: ClusterConfig,
    root: Option<NodeId>,
    arena: Vec<ClusterNode<T>>,
    size: usize,
}

impl<T: Scalar> Default for MergingRTree<T> {
    fn default() -> Self {
        Self::with_config(ClusterConfig::default())
    }
}

impl<T: Scalar> MergingRTree<T> {
    /// Create an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree with the given shape parameters.
    pub fn with_config(config: ClusterConfig) -> Self {
        Self {
            config,
            root: None,
            arena: Vec::new(),
            size: 0,
        }
    }

    /// Shape parameters of this tree.
    pub fn config(&self) -> ClusterConfig {
        self.config
    }

    /// Validate and insert one raw box.
    pub fn try_insert(&mut self, aabb: Aabb3D<T>) -> Result<(), ClusterError> {
        aabb.validate()?;
        self.insert_valid(aabb);
        Ok(())
    }

    /// Root handle, or `None` while the tree is empty.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Look up a node by handle.
    pub fn node(&self, id: NodeId) -> Option<&ClusterNode<T>> {
        self.arena.get(id.get())
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Number of leaf clusters.
    pub fn cluster_count(&self) -> usize {
        self.arena.iter().filter(|n| n.is_leaf()).count()
    }

    /// Number of levels; 0 when empty, 1 when the root is a leaf.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut next = self.root;
        while let Some(id) = next {
            depth += 1;
            next = match &self.arena[id.get()].kind {
                NodeKind::Leaf(_) => None,
                NodeKind::Interior(children) => children.first().copied(),
            };
        }
        depth
    }

    /// Depth-first enumeration of the raw boxes.
    ///
    /// Every call starts an independent traversal.
    pub fn boxes(&self) -> Boxes<'_, T> {
        Boxes::new(&self.arena, self.root)
    }

    /// Depth-first enumeration of leaf cluster bounds.
    pub fn clusters(&self) -> Clusters<'_, T> {
        Clusters::new(&self.arena, self.root)
    }

    /// Raw boxes intersecting `query`, pruning clusters that miss it.
    pub fn query_box(&self, query: Aabb3D<T>) -> QueryBox<'_, T> {
        QueryBox::new(&self.arena, self.root, query)
    }

    fn push(&mut self, node: ClusterNode<T>) -> NodeId {
        let id = NodeId(self.arena.len());
        self.arena.push(node);
        id
    }

    fn insert_valid(&mut self, aabb: Aabb3D<T>) {
        self.size += 1;
        let Some(root) = self.root else {
            let id = self.push(ClusterNode {
                bounds: aabb,
                kind: NodeKind::Leaf(vec![aabb]),
                parent: None,
            });
            self.root = Some(id);
            return;
        };
        let leaf = self.choose_leaf(root, &aabb);
        if let NodeKind::Leaf(boxes) = &mut self.arena[leaf.get()].kind {
            boxes.push(aabb);
        }
        self.adjust_upwards(leaf);
    }

    fn choose_leaf(&self, mut id: NodeId, aabb: &Aabb3D<T>) -> NodeId {
        loop {
            match &self.arena[id.get()].kind {
                NodeKind::Leaf(_) => return id,
                NodeKind::Interior(children) => id = self.choose_child(children, aabb),
            }
        }
    }

    /// Least enlargement wins; ties go to the smaller resulting volume, then to
    /// the lowest index.
    fn choose_child(&self, children: &[NodeId], aabb: &Aabb3D<T>) -> NodeId {
        let mut best_idx = 0_usize;
        let mut best_cost: Option<(f64, f64)> = None;
        for (i, c) in children.iter().enumerate() {
            let bounds = self.arena[c.get()].bounds;
            let grow = enlargement(&bounds, aabb);
            let vol = volume(&union_aabb(bounds, *aabb));
            let better = best_cost
                .map(|(bg, bv)| grow < bg || (grow == bg && vol < bv))
                .unwrap_or(true);
            if better {
                best_cost = Some((grow, vol));
                best_idx = i;
            }
        }
        children[best_idx]
    }

    /// Split overflowing nodes and recompute bounds from `start` to the root.
    fn adjust_upwards(&mut self, start: NodeId) {
        let mut current = start;
        loop {
            if self.overflows(current) {
                let sibling = self.split(current);
                self.attach_sibling(current, sibling);
            } else {
                self.refresh_bounds(current);
            }
            match self.arena[current.get()].parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }

    fn overflows(&self, id: NodeId) -> bool {
        let node = &self.arena[id.get()];
        let cap = match node.kind {
            NodeKind::Leaf(_) => self.config.max_leaf_boxes(),
            NodeKind::Interior(_) => self.config.max_children(),
        };
        node.entry_count() > cap
    }

    fn content_bounds(&self, kind: &NodeKind<T>) -> Option<Aabb3D<T>> {
        match kind {
            NodeKind::Leaf(boxes) => {
                let mut it = boxes.iter().copied();
                let first = it.next()?;
                Some(it.fold(first, union_aabb))
            }
            NodeKind::Interior(children) => {
                let mut it = children.iter().map(|c| self.arena[c.get()].bounds);
                let first = it.next()?;
                Some(it.fold(first, union_aabb))
            }
        }
    }

    fn refresh_bounds(&mut self, id: NodeId) {
        if let Some(bounds) = self.content_bounds(&self.arena[id.get()].kind) {
            self.arena[id.get()].bounds = bounds;
        }
    }

    /// Keep one half of `id`'s entries in place and move the other half into a
    /// new node, which is returned unattached.
    fn split(&mut self, id: NodeId) -> NodeId {
        let kind = core::mem::replace(&mut self.arena[id.get()].kind, NodeKind::Leaf(Vec::new()));
        let (left, right) = match kind {
            NodeKind::Leaf(boxes) => {
                let (l, r) = quadratic_split(boxes, 1, |b| *b);
                (NodeKind::Leaf(l), NodeKind::Leaf(r))
            }
            NodeKind::Interior(children) => {
                let arena = &self.arena;
                let (l, r) = quadratic_split(children, self.config.min_children(), |c| {
                    arena[c.get()].bounds
                });
                (NodeKind::Interior(l), NodeKind::Interior(r))
            }
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(
            node = id.get(),
            left = entries_in(&left),
            right = entries_in(&right),
            "split cluster"
        );

        self.arena[id.get()].kind = left;
        self.refresh_bounds(id);

        let parent = self.arena[id.get()].parent;
        let bounds = self.content_bounds(&right).unwrap_or(self.arena[id.get()].bounds);
        let moved: Vec<NodeId> = match &right {
            NodeKind::Interior(children) => children.clone(),
            NodeKind::Leaf(_) => Vec::new(),
        };
        let sibling = self.push(ClusterNode {
            bounds,
            kind: right,
            parent,
        });
        for child in moved {
            self.arena[child.get()].parent = Some(sibling);
        }
        sibling
    }

    /// Hang `sibling` next to `node`, growing a new root if `node` was the root.
    fn attach_sibling(&mut self, node: NodeId, sibling: NodeId) {
        match self.arena[node.get()].parent {
            Some(parent) => {
                self.arena[sibling.get()].parent = Some(parent);
                if let NodeKind::Interior(children) = &mut self.arena[parent.get()].kind {
                    let at = children
                        .iter()
                        .position(|&c| c == node)
                        .map_or(children.len(), |p| p + 1);
                    children.insert(at, sibling);
                }
            }
            None => {
                let bounds = union_aabb(
                    self.arena[node.get()].bounds,
                    self.arena[sibling.get()].bounds,
                );
                let root = self.push(ClusterNode {
                    bounds,
                    kind: NodeKind::Interior(vec![node, sibling]),
                    parent: None,
                });
                self.arena[node.get()].parent = Some(root);
                self.arena[sibling.get()].parent = Some(root);
                self.root = Some(root);
                #[cfg(feature = "tracing")]
                tracing::debug!(depth = self.depth(), "grew new root");
            }
        }
    }
}

#[cfg(feature = "tracing")]
fn entries_in<T>(kind: &NodeKind<T>) -> usize {
    match kind {
        NodeKind::Leaf(boxes) => boxes.len(),
        NodeKind::Interior(children) => children.len(),
    }
}

/// Pick the pair whose union wastes the most volume, i.e. maximizes
/// `volume(a ∪ b) - volume(a) - volume(b)`. The first such pair wins ties.
fn pick_seeds<T: Scalar>(bounds: &[Aabb3D<T>]) -> (usize, usize) {
    let mut best = (0, 1);
    let mut best_waste = f64::NEG_INFINITY;
    for i in 0..bounds.len() {
        for j in i + 1..bounds.len() {
            let (a, b) = (&bounds[i], &bounds[j]);
            let waste = volume(&union_aabb(*a, *b)) - volume(a) - volume(b);
            if waste > best_waste {
                best_waste = waste;
                best = (i, j);
            }
        }
    }
    best
}

/// Partition `entries` into two groups seeded by [`pick_seeds`].
///
/// Remaining entries go, in order, to the group whose bounds grow least; ties
/// go to the smaller group, then to the first. Once a group needs every
/// remaining entry to reach `min_fill`, it receives them all.
fn quadratic_split<E, T, F>(entries: Vec<E>, min_fill: usize, bbox_of: F) -> (Vec<E>, Vec<E>)
where
    E: Copy,
    T: Scalar,
    F: Fn(&E) -> Aabb3D<T>,
{
    debug_assert!(entries.len() >= 2, "split requires overflow");
    let bounds: Vec<Aabb3D<T>> = entries.iter().map(&bbox_of).collect();
    let (s1, s2) = pick_seeds(&bounds);
    let mut left = vec![entries[s1]];
    let mut right = vec![entries[s2]];
    let mut left_bounds = bounds[s1];
    let mut right_bounds = bounds[s2];
    let mut remaining = entries.len() - 2;

    for (i, entry) in entries.into_iter().enumerate() {
        if i == s1 || i == s2 {
            continue;
        }
        let b = bounds[i];
        let to_left = if left.len() + remaining <= min_fill {
            true
        } else if right.len() + remaining <= min_fill {
            false
        } else {
            let grow_left = enlargement(&left_bounds, &b);
            let grow_right = enlargement(&right_bounds, &b);
            if grow_left < grow_right {
                true
            } else if grow_right < grow_left {
                false
            } else {
                left.len() <= right.len()
            }
        };
        remaining -= 1;
        if to_left {
            left.push(entry);
            left_bounds = union_aabb(left_bounds, b);
        } else {
            right.push(entry);
            right_bounds = union_aabb(right_bounds, b);
        }
    }
    (left, right)
}

/// Lazy depth-first iterator over raw boxes. See [`MergingRTree::boxes`].
#[derive(Clone, Debug)]
pub struct Boxes<'a, T> {
    arena: &'a [ClusterNode<T>],
    stack: Vec<NodeId>,
    current: core::slice::Iter<'a, Aabb3D<T>>,
}

impl<'a, T> Boxes<'a, T> {
    fn new(arena: &'a [ClusterNode<T>], root: Option<NodeId>) -> Self {
        Self {
            arena,
            stack: root.into_iter().collect(),
            current: core::slice::Iter::default(),
        }
    }
}

impl<T: Copy> Iterator for Boxes<'_, T> {
    type Item = Aabb3D<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(b) = self.current.next() {
                return Some(*b);
            }
            let id = self.stack.pop()?;
            match &self.arena[id.get()].kind {
                NodeKind::Leaf(boxes) => self.current = boxes.iter(),
                // Reversed so the leftmost child is visited first.
                NodeKind::Interior(children) => self.stack.extend(children.iter().rev()),
            }
        }
    }
}

impl<T: Copy> FusedIterator for Boxes<'_, T> {}

/// Lazy depth-first iterator over leaf cluster bounds. See [`MergingRTree::clusters`].
#[derive(Clone, Debug)]
pub struct Clusters<'a, T> {
    arena: &'a [ClusterNode<T>],
    stack: Vec<NodeId>,
}

impl<'a, T> Clusters<'a, T> {
    fn new(arena: &'a [ClusterNode<T>], root: Option<NodeId>) -> Self {
        Self {
            arena,
            stack: root.into_iter().collect(),
        }
    }
}

impl<T: Copy> Iterator for Clusters<'_, T> {
    type Item = Aabb3D<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let node = &self.arena[id.get()];
            match &node.kind {
                NodeKind::Leaf(_) => return Some(node.bounds),
                NodeKind::Interior(children) => self.stack.extend(children.iter().rev()),
            }
        }
        None
    }
}

impl<T: Copy> FusedIterator for Clusters<'_, T> {}

/// Lazy iterator over raw boxes intersecting a query. See [`MergingRTree::query_box`].
#[derive(Clone, Debug)]
pub struct QueryBox<'a, T> {
    arena: &'a [ClusterNode<T>],
    stack: Vec<NodeId>,
    current: core::slice::Iter<'a, Aabb3D<T>>,
    query: Aabb3D<T>,
}

impl<'a, T> QueryBox<'a, T> {
    fn new(arena: &'a [ClusterNode<T>], root: Option<NodeId>, query: Aabb3D<T>) -> Self {
        Self {
            arena,
            stack: root.into_iter().collect(),
            current: core::slice::Iter::default(),
            query,
        }
    }
}

impl<T: Scalar> Iterator for QueryBox<'_, T> {
    type Item = Aabb3D<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for b in self.current.by_ref() {
                if b.intersects(&self.query) {
                    return Some(*b);
                }
            }
            let id = self.stack.pop()?;
            let node = &self.arena[id.get()];
            if !node.bounds.intersects(&self.query) {
                continue;
            }
            match &node.kind {
                NodeKind::Leaf(boxes) => self.current = boxes.iter(),
                NodeKind::Interior(children) => self.stack.extend(children.iter().rev()),
            }
        }
    }
}

impl<T: Scalar> FusedIterator for QueryBox<'_, T> {}

impl<T: Scalar> ClusterBackend<T> for MergingRTree<T> {
    fn kind(&self) -> BackendKind {
        BackendKind::MergingRTree
    }

    fn new_empty(&self) -> Self {
        Self::with_config(self.config)
    }

    fn insert(&mut self, aabb: Aabb3D<T>) {
        debug_assert!(aabb.is_valid(), "backends only accept validated boxes");
        self.insert_valid(aabb);
    }

    fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
        self.size = 0;
    }

    fn len(&self) -> usize {
        self.size
    }

    fn bounds(&self) -> Option<Aabb3D<T>> {
        self.root.map(|r| self.arena[r.get()].bounds)
    }

    fn boxes<'a>(&'a self) -> Box<dyn Iterator<Item = Aabb3D<T>> + 'a> {
        Box::new(Boxes::new(&self.arena, self.root))
    }

    fn clusters<'a>(&'a self) -> Box<dyn Iterator<Item = Aabb3D<T>> + 'a> {
        Box::new(Clusters::new(&self.arena, self.root))
    }

    fn intersects_box(&self, query: &Aabb3D<T>) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.arena[id.get()];
            if !node.bounds.intersects(query) {
                continue;
            }
            match &node.kind {
                NodeKind::Leaf(boxes) => {
                    if boxes.iter().any(|b| b.intersects(query)) {
                        return true;
                    }
                }
                NodeKind::Interior(children) => stack.extend(children.iter().copied()),
            }
        }
        false
    }

    fn query_box<'a>(&'a self, query: Aabb3D<T>) -> Box<dyn Iterator<Item = Aabb3D<T>> + 'a> {
        Box::new(QueryBox::new(&self.arena, self.root, query))
    }
}

impl<T: Scalar> Debug for MergingRTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MergingRTree")
            .field("max_leaf_boxes", &self.config.max_leaf_boxes())
            .field("max_children", &self.config.max_children())
            .field("min_children", &self.config.min_children())
            .field("arena_nodes", &self.arena.len())
            .field("boxes", &self.size)
            .field("has_root", &self.root.is_some())
            .finish_non_exhaustive()
    }
}
