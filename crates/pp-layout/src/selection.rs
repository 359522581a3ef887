// ABOUTME: Tracks the single active pane across the whole tree.
// ABOUTME: Also derives per-pane chrome hints from selection and modifier state.

use pp_core::Orientation;

use crate::tree::{NodeKind, PaneTree};
use crate::{LayoutError, NodeId};

impl PaneTree {
    /// Currently selected pane. A handle to a pane that no longer exists
    /// reads as no selection.
    pub fn selected_pane(&self) -> Option<NodeId> {
        self.selected.filter(|id| self.pane(*id).is_some())
    }

    /// Select `pane`, or clear the selection with `None`
    pub fn select(&mut self, pane: Option<NodeId>) -> Result<(), LayoutError> {
        if let Some(id) = pane {
            self.expect_pane(id)?;
        }
        self.select_pane(pane);
        Ok(())
    }

    /// Deselect everything first so at most one pane is ever selected
    pub(crate) fn select_pane(&mut self, pane: Option<NodeId>) {
        for node in self.nodes.values_mut() {
            if let NodeKind::Pane(p) = node.kind_mut() {
                p.set_selected(false);
            }
        }
        self.selected = pane.filter(|id| self.pane(*id).is_some());
        if let Some(id) = self.selected {
            if let Some(p) = self.pane_mut(id) {
                p.set_selected(true);
            }
        }
    }

    /// Drop a selection that points at a destroyed pane
    pub(crate) fn revalidate_selection(&mut self) {
        if self.selected.is_some() && self.selected_pane().is_none() {
            tracing::debug!("Selected pane is gone, clearing selection");
            self.select_pane(None);
        }
    }
}

/// Orientation a split produces; the alternate modifier flips the default
pub fn resolve_split(default_split: Orientation, alternate: bool) -> Orientation {
    if alternate {
        default_split.perpendicular()
    } else {
        default_split
    }
}

/// How a pane's chrome should look right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneChrome {
    pub highlighted: bool,
    /// Orientation the split button would produce
    pub split_icon: Orientation,
}

pub fn pane_chrome(selected: bool, default_split: Orientation, alternate: bool) -> PaneChrome {
    PaneChrome {
        highlighted: selected,
        split_icon: resolve_split(default_split, alternate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Pane, PaneFactory};
    use pp_core::Size;

    struct Blank;

    impl PaneFactory for Blank {
        fn new_pane(&mut self) -> Pane {
            Pane::default()
        }
    }

    fn tree_with_two() -> (PaneTree, NodeId, NodeId) {
        let mut tree = PaneTree::new(
            Orientation::Row,
            Size::new(800.0, 600.0),
            1.0,
            Pane::default(),
        );
        let first = tree.panes()[0];
        let root = tree.root().unwrap();
        let second = tree.split_pane(root, first, Orientation::Row, &mut Blank);
        (tree, first, second)
    }

    #[test]
    fn split_selects_new_pane() {
        let (tree, first, second) = tree_with_two();
        assert_eq!(tree.selected_pane(), Some(second));
        assert!(!tree.pane(first).unwrap().is_selected());
    }

    #[test]
    fn select_is_exclusive() {
        let (mut tree, first, second) = tree_with_two();
        tree.select(Some(first)).unwrap();
        assert!(tree.pane(first).unwrap().is_selected());
        assert!(!tree.pane(second).unwrap().is_selected());
        tree.assert_invariants();
    }

    #[test]
    fn select_none_clears() {
        let (mut tree, _, second) = tree_with_two();
        tree.select(None).unwrap();
        assert_eq!(tree.selected_pane(), None);
        assert!(!tree.pane(second).unwrap().is_selected());
    }

    #[test]
    fn select_rejects_containers() {
        let (mut tree, _, second) = tree_with_two();
        let root = tree.root().unwrap();
        assert_eq!(tree.select(Some(root)), Err(LayoutError::NotAPane(root)));
        assert_eq!(tree.selected_pane(), Some(second));
    }

    #[test]
    fn closing_selected_pane_clears_selection() {
        let (mut tree, first, second) = tree_with_two();
        tree.remove_pane(second).unwrap();
        assert_eq!(tree.selected_pane(), None);
        assert!(!tree.pane(first).unwrap().is_selected());
    }

    #[test]
    fn alternate_flips_split() {
        assert_eq!(resolve_split(Orientation::Column, false), Orientation::Column);
        assert_eq!(resolve_split(Orientation::Column, true), Orientation::Row);
    }

    #[test]
    fn chrome_follows_inputs() {
        let chrome = pane_chrome(true, Orientation::Row, true);
        assert!(chrome.highlighted);
        assert_eq!(chrome.split_icon, Orientation::Column);
        assert!(!pane_chrome(false, Orientation::Row, false).highlighted);
    }
}
