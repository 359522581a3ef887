// ABOUTME: Arena-backed n-ary tree of split containers and leaf panes.
// ABOUTME: Owns frames, divider positions, path identities and the layout pass.

use std::fmt;

use pp_core::{Orientation, Point, Rect, Size};
use slotmap::SlotMap;

use crate::pressure;
use crate::LayoutError;

slotmap::new_key_type! {
    /// Stable handle to a pane or container. Handles of destroyed nodes
    /// never resolve again.
    pub struct NodeId;
}

/// Position of a node from the root, e.g. `0.2.1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PanePath(Vec<usize>);

impl PanePath {
    /// Path given to the root container
    pub fn root() -> Self {
        Self(vec![0])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for PanePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// Leaf content slot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pane {
    pub title: String,
    path: PanePath,
    selected: bool,
}

impl Pane {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: PanePath::default(),
            selected: false,
        }
    }

    pub fn path(&self) -> &PanePath {
        &self.path
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

/// Internal node laying out its children along one axis
#[derive(Debug, Clone)]
pub struct Container {
    orientation: Orientation,
    children: Vec<NodeId>,
    /// Offsets from the container origin, one fewer than children
    dividers: Vec<f32>,
    path: PanePath,
}

impl Container {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            children: Vec::new(),
            dividers: Vec::new(),
            path: PanePath::default(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn dividers(&self) -> &[f32] {
        &self.dividers
    }

    pub fn path(&self) -> &PanePath {
        &self.path
    }

    pub(crate) fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub(crate) fn set_children(&mut self, children: Vec<NodeId>, dividers: Vec<f32>) {
        debug_assert_eq!(dividers.len() + 1, children.len().max(1));
        self.children = children;
        self.dividers = dividers;
    }

    pub(crate) fn take_children(&mut self) -> Vec<NodeId> {
        self.dividers.clear();
        std::mem::take(&mut self.children)
    }

    pub(crate) fn position_of(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|c| *c == child)
    }

    /// Drop a child; the neighbour before it (or after it, for the first
    /// child) takes over its space.
    pub(crate) fn detach(&mut self, child: NodeId) -> Option<usize> {
        let index = self.position_of(child)?;
        self.children.remove(index);
        if !self.dividers.is_empty() {
            self.dividers.remove(index.saturating_sub(1));
        }
        Some(index)
    }

    pub(crate) fn dividers_mut(&mut self) -> &mut Vec<f32> {
        &mut self.dividers
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Pane(Pane),
    Container(Container),
}

#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    frame: Rect,
    kind: NodeKind,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, frame: Rect) -> Self {
        Self {
            parent: None,
            frame,
            kind,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn as_pane(&self) -> Option<&Pane> {
        match &self.kind {
            NodeKind::Pane(pane) => Some(pane),
            NodeKind::Container(_) => None,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match &self.kind {
            NodeKind::Container(container) => Some(container),
            NodeKind::Pane(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct PaneTree {
    pub(crate) nodes: SlotMap<NodeId, Node>,
    pub(crate) root: Option<NodeId>,
    pub(crate) selected: Option<NodeId>,
    bounds: Rect,
    divider_thickness: f32,
}

impl PaneTree {
    /// A root container of `orientation` holding `first` as its only pane
    pub fn new(
        orientation: Orientation,
        bounds: Size,
        divider_thickness: f32,
        first: Pane,
    ) -> Self {
        let bounds = Rect::from_size(bounds);
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(
            NodeKind::Container(Container::new(orientation)),
            bounds,
        ));
        let pane = nodes.insert(Node::new(NodeKind::Pane(first), bounds));
        nodes[pane].parent = Some(root);
        if let NodeKind::Container(container) = &mut nodes[root].kind {
            container.set_children(vec![pane], Vec::new());
        }

        let mut tree = Self {
            nodes,
            root: Some(root),
            selected: None,
            bounds,
            divider_thickness,
        };
        tree.apply_paths(PanePath::root());
        tree
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn divider_thickness(&self) -> f32 {
        self.divider_thickness
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn pane(&self, id: NodeId) -> Option<&Pane> {
        self.nodes.get(id).and_then(Node::as_pane)
    }

    pub fn container(&self, id: NodeId) -> Option<&Container> {
        self.nodes.get(id).and_then(Node::as_container)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(Node::parent)
    }

    pub fn frame(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id).map(Node::frame)
    }

    /// Mutable access to a pane's content; structure stays read-only
    pub fn pane_mut(&mut self, id: NodeId) -> Option<&mut Pane> {
        match &mut self.nodes.get_mut(id)?.kind {
            NodeKind::Pane(pane) => Some(pane),
            NodeKind::Container(_) => None,
        }
    }

    pub(crate) fn expect_pane(&self, id: NodeId) -> Result<&Pane, LayoutError> {
        let node = self.nodes.get(id).ok_or(LayoutError::UnknownNode(id))?;
        node.as_pane().ok_or(LayoutError::NotAPane(id))
    }

    pub(crate) fn expect_container(&self, id: NodeId) -> Result<&Container, LayoutError> {
        let node = self.nodes.get(id).ok_or(LayoutError::UnknownNode(id))?;
        node.as_container().ok_or(LayoutError::NotAContainer(id))
    }

    pub(crate) fn container_mut(&mut self, id: NodeId) -> Option<&mut Container> {
        match &mut self.nodes.get_mut(id)?.kind {
            NodeKind::Container(container) => Some(container),
            NodeKind::Pane(_) => None,
        }
    }

    /// All panes in depth-first order
    pub fn panes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.collect(root, &mut out, true);
        }
        out
    }

    /// All containers in depth-first order, root first
    pub fn containers(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.collect(root, &mut out, false);
        }
        out
    }

    pub fn pane_count(&self) -> usize {
        self.panes().len()
    }

    fn collect(&self, id: NodeId, out: &mut Vec<NodeId>, panes: bool) {
        match &self.nodes[id].kind {
            NodeKind::Pane(_) => {
                if panes {
                    out.push(id);
                }
            }
            NodeKind::Container(container) => {
                if !panes {
                    out.push(id);
                }
                for child in &container.children {
                    self.collect(*child, out, panes);
                }
            }
        }
    }

    /// Pane whose frame contains `point`
    pub fn pane_at(&self, point: Point) -> Option<NodeId> {
        self.panes()
            .into_iter()
            .find(|id| self.nodes[*id].frame.contains(point))
    }

    /// Change the root bounds (window content area) and lay everything out again
    pub fn resize(&mut self, size: Size) {
        self.bounds = Rect::from_size(size);
        self.layout();
    }

    pub(crate) fn layout(&mut self) {
        if let Some(root) = self.root {
            self.layout_node(root, self.bounds);
        }
    }

    /// Assign `frame` to `id` and derive the frames below it. A container
    /// whose extent along its own axis changed rescales its children first.
    pub(crate) fn layout_node(&mut self, id: NodeId, frame: Rect) {
        let thickness = self.divider_thickness;
        let node = &mut self.nodes[id];
        let previous = node.frame;
        node.frame = frame;

        let NodeKind::Container(container) = &mut node.kind else {
            return;
        };

        let orientation = container.orientation;
        let old_extent = previous.extent(orientation);
        let new_extent = frame.extent(orientation);
        if container.children.len() > 1 && (old_extent - new_extent).abs() > f32::EPSILON {
            container.dividers =
                pressure::rescale_dividers(&container.dividers, old_extent, new_extent, thickness);
        }

        let extents = pressure::child_extents(&container.dividers, new_extent, thickness);
        let children = container.children.clone();

        let mut start = 0.0;
        for (child, extent) in children.into_iter().zip(extents) {
            let child_frame = frame.slice(orientation, start, extent);
            self.layout_node(child, child_frame);
            start += extent + thickness;
        }
    }

    /// Recompute path identities top-down from the root
    pub fn apply_paths(&mut self, root_path: PanePath) {
        if let Some(root) = self.root {
            self.apply_paths_from(root, root_path);
        }
    }

    fn apply_paths_from(&mut self, id: NodeId, path: PanePath) {
        match &mut self.nodes[id].kind {
            NodeKind::Pane(pane) => pane.path = path,
            NodeKind::Container(container) => {
                container.path = path.clone();
                let children = container.children.clone();
                for (index, child) in children.into_iter().enumerate() {
                    self.apply_paths_from(child, path.child(index));
                }
            }
        }
    }

    /// Put `new` into the slot `old` occupies, or make it the root
    pub(crate) fn replace_in_parent(&mut self, old: NodeId, new: NodeId) {
        let parent = self.nodes[old].parent;
        match parent {
            Some(parent) => {
                if let Some(container) = self.container_mut(parent) {
                    if let Some(index) = container.position_of(old) {
                        container.children[index] = new;
                    }
                }
            }
            None => self.root = Some(new),
        }
        self.nodes[new].parent = parent;
        self.nodes[old].parent = None;
    }

    pub(crate) fn insert(&mut self, kind: NodeKind, frame: Rect, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.insert(Node::new(kind, frame));
        self.nodes[id].parent = parent;
        id
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id].parent = parent;
    }

    /// Panics when a structural invariant does not hold
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let Some(root) = self.root else {
            assert!(self.nodes.is_empty(), "empty tree still owns nodes");
            return;
        };
        assert!(self.nodes[root].parent.is_none(), "root has a parent");
        assert!(self.container(root).is_some(), "root is not a container");

        let mut reachable = 0;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            reachable += 1;
            if let NodeKind::Container(container) = &self.nodes[id].kind {
                assert!(!container.children.is_empty(), "container without children");
                assert_eq!(container.dividers.len(), container.children.len() - 1);
                if id != root {
                    assert!(container.children.len() > 1, "non-root single-child container");
                }
                for (index, child) in container.children.iter().enumerate() {
                    assert_eq!(self.nodes[*child].parent, Some(id));
                    let expected = container.path.child(index);
                    match &self.nodes[*child].kind {
                        NodeKind::Pane(pane) => assert_eq!(pane.path, expected),
                        NodeKind::Container(inner) => assert_eq!(inner.path, expected),
                    }
                    stack.push(*child);
                }
            }
        }
        assert_eq!(reachable, self.nodes.len(), "detached nodes left in arena");

        let selected = self
            .nodes
            .values()
            .filter(|n| n.as_pane().is_some_and(Pane::is_selected))
            .count();
        assert!(selected <= 1, "{selected} panes selected");
    }
}
