// ABOUTME: Structural edits of the pane tree: splitting and closing panes.
// ABOUTME: Rebuilds containers, places dividers, collapses empty levels and refreshes paths.

use pp_core::Orientation;

use crate::pressure;
use crate::tree::{NodeKind, PanePath, PaneTree};
use crate::{LayoutError, NodeId, Pane, PaneFactory};

impl PaneTree {
    /// Split `pane`, which must be a direct child of `container`, and
    /// select the new pane. Room must already have been checked.
    ///
    /// # Panics
    /// When `pane`'s parent is not `container`.
    pub fn split_pane(
        &mut self,
        container: NodeId,
        pane: NodeId,
        orientation: Orientation,
        factory: &mut dyn PaneFactory,
    ) -> NodeId {
        let parent = self.parent(pane);
        if parent != Some(container) || self.pane(pane).is_none() {
            panic!(
                "pane {pane:?} has parent {parent:?}, cannot be split by container {container:?}"
            );
        }

        let own_orientation = self.container(container).map(|c| c.orientation());
        let new_pane = if own_orientation == Some(orientation) {
            self.extend(container, pane, factory)
        } else {
            self.subdivide(container, pane, orientation, factory)
        };

        self.apply_paths(PanePath::root());
        self.select_pane(Some(new_pane));
        tracing::info!(
            "Split pane {} along {}, total panes: {}",
            self.pane(pane).map(|p| p.path().to_string()).unwrap_or_default(),
            orientation.label(),
            self.pane_count()
        );
        new_pane
    }

    /// Same orientation: a fresh container replaces `container`, holding its
    /// children plus a new pane right after `pane`, all equally sized.
    fn extend(&mut self, container: NodeId, pane: NodeId, factory: &mut dyn PaneFactory) -> NodeId {
        let frame = self.nodes[container].frame();
        let thickness = self.divider_thickness();
        let Some(old) = self.container_mut(container) else {
            unreachable!("split target is a container");
        };
        let orientation = old.orientation();
        let mut children = old.take_children();
        let index = children.iter().position(|c| *c == pane).unwrap_or(children.len() - 1);

        let new_pane = self.insert(NodeKind::Pane(factory.new_pane()), frame, None);
        children.insert(index + 1, new_pane);

        let mut fresh = factory.new_container(orientation);
        fresh.set_orientation(orientation);
        let dividers =
            pressure::even_dividers(frame.extent(orientation), children.len(), thickness);
        fresh.set_children(children.clone(), dividers);
        let fresh_id = self.insert(NodeKind::Container(fresh), frame, None);

        for child in children {
            self.set_parent(child, Some(fresh_id));
        }
        self.replace_in_parent(container, fresh_id);
        self.nodes.remove(container);
        self.layout_node(fresh_id, frame);
        new_pane
    }

    /// Opposite orientation: `pane` and a new pane move into a perpendicular
    /// container that takes `pane`'s slot, divided at the middle.
    fn subdivide(
        &mut self,
        container: NodeId,
        pane: NodeId,
        orientation: Orientation,
        factory: &mut dyn PaneFactory,
    ) -> NodeId {
        let frame = self.nodes[pane].frame();
        let thickness = self.divider_thickness();

        let new_pane = self.insert(NodeKind::Pane(factory.new_pane()), frame, None);
        let mut sub = factory.new_container(orientation);
        sub.set_orientation(orientation);
        let middle = ((frame.extent(orientation) - thickness) / 2.0).max(0.0);
        sub.set_children(vec![pane, new_pane], vec![middle]);
        let sub_id = self.insert(NodeKind::Container(sub), frame, Some(container));

        if let Some(outer) = self.container_mut(container) {
            if let Some(index) = outer.position_of(pane) {
                outer.children_mut()[index] = sub_id;
            }
        }
        self.set_parent(pane, Some(sub_id));
        self.set_parent(new_pane, Some(sub_id));
        self.layout_node(sub_id, frame);
        new_pane
    }

    /// Remove a pane, collapsing containers left with fewer than two
    /// children. Returns the removed pane.
    pub fn remove_pane(&mut self, pane: NodeId) -> Result<Pane, LayoutError> {
        self.expect_pane(pane)?;
        let parent = self.parent(pane);

        let removed = match self.nodes.remove(pane).map(|node| node.kind().clone()) {
            Some(NodeKind::Pane(removed)) => removed,
            _ => return Err(LayoutError::NotAPane(pane)),
        };
        if let Some(parent) = parent {
            if let Some(container) = self.container_mut(parent) {
                container.detach(pane);
            }
            self.collapse(parent);
        }

        self.layout();
        self.apply_paths(PanePath::root());
        self.revalidate_selection();
        tracing::info!(
            "Closed pane {}, remaining panes: {}",
            removed.path(),
            self.pane_count()
        );
        Ok(removed)
    }

    /// Walk up from `container` removing empty containers and replacing
    /// single-child ones by their child.
    fn collapse(&mut self, mut container: NodeId) {
        loop {
            let Some(inner) = self.container(container) else {
                return;
            };
            let parent = self.parent(container);
            match (inner.children().len(), parent) {
                (0, Some(parent)) => {
                    if let Some(outer) = self.container_mut(parent) {
                        outer.detach(container);
                    }
                    self.nodes.remove(container);
                    container = parent;
                }
                (0, None) => {
                    self.nodes.remove(container);
                    self.root = None;
                    return;
                }
                (1, Some(_)) => {
                    let only = inner.children()[0];
                    self.replace_in_parent(container, only);
                    self.nodes.remove(container);
                    return;
                }
                (1, None) => {
                    let only = inner.children()[0];
                    if self.container(only).is_some() {
                        // Root must stay a container; promote the nested one.
                        let frame = self.nodes[container].frame();
                        self.replace_in_parent(container, only);
                        self.nodes.remove(container);
                        self.layout_node(only, frame);
                    }
                    return;
                }
                _ => return,
            }
        }
    }
}
