// ABOUTME: The split-pane view: routes split, close and selection requests.
// ABOUTME: Checks room, negotiates window growth, prompts before closing the last pane.

use std::fmt;

use pp_core::{Config, Orientation, Point, PreferenceStore, Size};

use crate::negotiator::{FitRequest, FitStep, PendingSplit, RoomWarning, WarningResponse};
use crate::pressure;
use crate::selection::{pane_chrome, resolve_split, PaneChrome};
use crate::tree::{PanePath, PaneTree};
use crate::{
    ConfigDelegate, DialogHost, FitNegotiator, LayoutError, NodeId, Pane, PaneFactory,
    PanesDelegate, WindowHost, WindowPresentation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The tree changed; this is the new, selected pane
    Split(NodeId),
    /// A room warning is showing
    AwaitingUser,
    /// The window is growing; the split lands in `window_frame_settled`
    AwaitingWindow,
    /// The user chose not to split
    Abandoned,
    /// The split is impossible right now; the host signalled failure
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The delegate refused
    Vetoed,
    /// Last pane: a confirmation prompt is showing
    AwaitingConfirmation,
    Declined,
}

/// Inputs of the room check for one split
#[derive(Debug, Clone, Copy)]
struct Room {
    orientation: Orientation,
    current: f32,
    pressure: usize,
    minimum: f32,
}

impl Room {
    fn fits(&self) -> bool {
        pressure::can_add_pane(self.current, self.pressure, self.minimum)
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} points along {}, pressure {}, minimum {}",
            self.current,
            self.orientation.label(),
            self.pressure,
            self.minimum
        )
    }
}

pub struct PanesView<H> {
    tree: PaneTree,
    host: H,
    factory: Option<Box<dyn PaneFactory>>,
    delegate: Option<Box<dyn PanesDelegate>>,
    negotiator: FitNegotiator,
    default_split: Orientation,
    alternate: bool,
    pending_close: Option<NodeId>,
}

impl<H: WindowHost + DialogHost> PanesView<H> {
    /// View filling the host's content area with `first` as its only pane.
    /// Size limits come from `config` until another delegate is set.
    pub fn new(config: &Config, host: H, prefs: Box<dyn PreferenceStore>, first: Pane) -> Self {
        let tree = PaneTree::new(
            config.root_orientation,
            host.content_size(),
            config.divider_thickness,
            first,
        );
        Self {
            tree,
            host,
            factory: None,
            delegate: Some(Box::new(ConfigDelegate::from(config))),
            negotiator: FitNegotiator::new(prefs),
            default_split: config.default_split,
            alternate: false,
            pending_close: None,
        }
    }

    pub fn tree(&self) -> &PaneTree {
        &self.tree
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn negotiator(&self) -> &FitNegotiator {
        &self.negotiator
    }

    pub fn set_factory(&mut self, factory: Box<dyn PaneFactory>) {
        self.factory = Some(factory);
    }

    /// `None` falls back to a minimum extent of one point
    pub fn set_delegate(&mut self, delegate: Option<Box<dyn PanesDelegate>>) {
        self.delegate = delegate;
    }

    /// The view is on screen: refresh paths and make sure a pane is active
    pub fn attach(&mut self) {
        if self.factory.is_none() {
            tracing::warn!("Split view has no pane factory; the next split will fail");
        }
        self.tree.apply_paths(PanePath::root());
        if self.tree.selected_pane().is_none() {
            let last = self.tree.panes().last().copied();
            self.tree.select_pane(last);
        }
    }

    pub fn resize(&mut self, size: Size) {
        self.tree.resize(size);
    }

    /// Track the alternate modifier, which flips the split orientation
    pub fn set_alternate(&mut self, alternate: bool) {
        self.alternate = alternate;
    }

    pub fn split_orientation(&self) -> Orientation {
        resolve_split(self.default_split, self.alternate)
    }

    pub fn chrome(&self, pane: NodeId) -> Option<PaneChrome> {
        let pane = self.tree.pane(pane)?;
        Some(pane_chrome(
            pane.is_selected(),
            self.default_split,
            self.alternate,
        ))
    }

    pub fn select(&mut self, pane: Option<NodeId>) -> Result<(), LayoutError> {
        self.tree.select(pane)
    }

    /// Select the pane under `point`
    pub fn click(&mut self, point: Point) -> Option<NodeId> {
        let hit = self.tree.pane_at(point)?;
        self.tree.select_pane(Some(hit));
        Some(hit)
    }

    fn ensure_idle(&self) -> Result<(), LayoutError> {
        if self.pending_close.is_some() || !self.negotiator.is_idle() {
            return Err(LayoutError::Busy);
        }
        Ok(())
    }

    /// Split `pane` in the orientation the modifier state selects
    pub fn split(&mut self, pane: NodeId) -> Result<SplitOutcome, LayoutError> {
        self.split_with(pane, self.split_orientation())
    }

    pub fn split_with(
        &mut self,
        pane: NodeId,
        orientation: Orientation,
    ) -> Result<SplitOutcome, LayoutError> {
        self.ensure_idle()?;
        self.tree.expect_pane(pane)?;

        if self.host.presentation() != WindowPresentation::Windowed {
            tracing::debug!("Refusing to split while the window fills the screen");
            self.host.reject();
            return Ok(SplitOutcome::Rejected);
        }

        let container = self.tree.parent(pane).ok_or(LayoutError::UnknownNode(pane))?;
        self.split_in(container, pane, orientation)
    }

    /// Split executed by `container` on behalf of its child `pane`
    fn split_in(
        &mut self,
        container: NodeId,
        pane: NodeId,
        orientation: Orientation,
    ) -> Result<SplitOutcome, LayoutError> {
        let room = self.room(container, orientation)?;
        if room.fits() {
            let new_pane = self.perform_split(container, pane, orientation);
            return Ok(SplitOutcome::Split(new_pane));
        }

        tracing::info!("Not enough room to split: {}", room);

        let additional = pressure::expansion_needed(
            &self.tree,
            container,
            orientation,
            room.pressure,
            room.minimum,
        );
        let root_extent = self.tree.bounds().extent(orientation);
        let maximum = pressure::maximum_extent(self.host.screen_content_size(), orientation)
            .unwrap_or(root_extent);

        let warning = RoomWarning {
            orientation,
            additional_extent: additional,
            current_extent: root_extent,
            maximum_extent: maximum,
        };
        let request = FitRequest {
            split: PendingSplit { pane, orientation },
            warning,
            expanded_frame: self.host.frame().grow_centered(orientation, additional),
        };

        match self.negotiator.begin(request) {
            FitStep::ShowWarning(warning) => {
                self.host.warn_insufficient_room(&warning);
                Ok(SplitOutcome::AwaitingUser)
            }
            FitStep::Expand(_) | FitStep::Abort => {
                self.host.reject();
                Ok(SplitOutcome::Rejected)
            }
        }
    }

    fn room(&self, container: NodeId, orientation: Orientation) -> Result<Room, LayoutError> {
        let inner = self.tree.expect_container(container)?;
        Ok(Room {
            orientation,
            current: self
                .tree
                .frame(container)
                .map(|f| f.extent(orientation))
                .unwrap_or_default(),
            pressure: pressure::pressure(inner.orientation(), inner.children().len(), orientation),
            minimum: pressure::minimum_extent(self.delegate.as_deref(), orientation),
        })
    }

    fn perform_split(
        &mut self,
        container: NodeId,
        pane: NodeId,
        orientation: Orientation,
    ) -> NodeId {
        let Some(factory) = self.factory.as_deref_mut() else {
            panic!("Split view needs a pane factory before the first split");
        };
        self.tree.split_pane(container, pane, orientation, factory)
    }

    /// The user answered the room warning
    pub fn answer_room_warning(&mut self, response: WarningResponse) -> SplitOutcome {
        match self.negotiator.answer(response) {
            FitStep::Expand(frame) => {
                tracing::info!("Growing window to {:?} to make room", frame);
                self.host.animate_frame(frame);
                SplitOutcome::AwaitingWindow
            }
            FitStep::ShowWarning(_) | FitStep::Abort => SplitOutcome::Abandoned,
        }
    }

    /// The window finished the resize started for a pending split.
    /// Call `resize` with the new content size first. When the window ended
    /// up smaller than asked for, the split is dropped with a rejection.
    pub fn window_frame_settled(&mut self) -> Option<NodeId> {
        let split = self.negotiator.expansion_finished()?;
        let Some(container) = self.tree.parent(split.pane) else {
            tracing::warn!("Pane {:?} vanished while the window was growing", split.pane);
            return None;
        };
        match self.room(container, split.orientation) {
            Ok(room) if room.fits() => {
                Some(self.perform_split(container, split.pane, split.orientation))
            }
            Ok(room) => {
                tracing::info!("Window did not grow enough to split: {}", room);
                self.host.reject();
                None
            }
            Err(e) => {
                tracing::warn!("Cannot retry split: {}", e);
                None
            }
        }
    }

    /// Close `pane`, asking first when it is the last one in the tree
    pub fn close(&mut self, pane: NodeId) -> Result<CloseOutcome, LayoutError> {
        self.ensure_idle()?;
        let target = self.tree.expect_pane(pane)?;

        if let Some(delegate) = self.delegate.as_deref_mut() {
            if !delegate.should_remove(pane, target) {
                tracing::debug!("Delegate vetoed closing {}", target.path());
                return Ok(CloseOutcome::Vetoed);
            }
        }

        if self.tree.pane_count() == 1 {
            self.pending_close = Some(pane);
            self.host.confirm_last_pane_close(pane);
            return Ok(CloseOutcome::AwaitingConfirmation);
        }

        self.remove(pane)?;
        Ok(CloseOutcome::Closed)
    }

    /// The user answered the last-pane confirmation
    pub fn answer_last_pane_close(&mut self, confirmed: bool) -> Result<CloseOutcome, LayoutError> {
        let Some(pane) = self.pending_close.take() else {
            tracing::warn!("Close confirmation answered but none is pending");
            return Ok(CloseOutcome::Declined);
        };
        if !confirmed {
            return Ok(CloseOutcome::Declined);
        }
        self.remove(pane)?;
        Ok(CloseOutcome::Closed)
    }

    fn remove(&mut self, pane: NodeId) -> Result<(), LayoutError> {
        let target = self.tree.expect_pane(pane)?;
        if let Some(delegate) = self.delegate.as_deref_mut() {
            delegate.will_remove(pane, target);
        }
        let removed = self.tree.remove_pane(pane)?;
        if let Some(delegate) = self.delegate.as_deref_mut() {
            delegate.did_remove(pane, &removed);
        }
        Ok(())
    }

    /// Drag divider `index` of `container` towards `position`, measured from
    /// the container's origin. Returns where the divider ended up.
    pub fn move_divider(
        &mut self,
        container: NodeId,
        index: usize,
        position: f32,
    ) -> Result<f32, LayoutError> {
        let inner = self.tree.expect_container(container)?;
        let dividers = inner.dividers();
        if index >= dividers.len() {
            return Err(LayoutError::DividerOutOfRange { container, index });
        }

        let orientation = inner.orientation();
        let frame = self.tree.frame(container).unwrap_or_default();
        let thickness = self.tree.divider_thickness();
        let lower = if index == 0 { 0.0 } else { dividers[index - 1] + thickness };
        let upper = dividers
            .get(index + 1)
            .copied()
            .unwrap_or_else(|| frame.extent(orientation));

        let delegate = self.delegate.as_deref();
        let minimum = pressure::minimum_extent(delegate, orientation);
        let can_collapse = delegate.is_some_and(|d| d.can_collapse());
        let position =
            pressure::constrain_divider(position, lower, upper, thickness, minimum, can_collapse);

        if let Some(inner) = self.tree.container_mut(container) {
            inner.dividers_mut()[index] = position;
        }
        self.tree.layout_node(container, frame);
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeKind, WarningChoice, WarningResponse};
    use pp_core::{MemoryPreferences, Rect, SPLIT_SIZE_WARNING_SHOW_AGAIN};
    use std::cell::RefCell;
    use std::rc::Rc;

    const CHROME: f32 = 28.0;

    #[derive(Default)]
    struct FakeHost {
        content: Size,
        presentation: WindowPresentation,
        animations: Vec<Rect>,
        rejections: usize,
        confirmations: Vec<NodeId>,
        warnings: Vec<RoomWarning>,
        /// The platform ignores resize requests
        frozen: bool,
    }

    impl FakeHost {
        fn new(width: f32, height: f32) -> Self {
            Self {
                content: Size::new(width, height),
                ..Self::default()
            }
        }
    }

    impl WindowHost for FakeHost {
        fn frame(&self) -> Rect {
            Rect::new(100.0, 100.0, self.content.width, self.content.height + CHROME)
        }

        fn content_size(&self) -> Size {
            self.content
        }

        fn screen_content_size(&self) -> Option<Size> {
            Some(Size::new(1440.0, 900.0 - CHROME))
        }

        fn presentation(&self) -> WindowPresentation {
            self.presentation
        }

        fn animate_frame(&mut self, frame: Rect) {
            self.animations.push(frame);
            if !self.frozen {
                self.content = Size::new(frame.width, frame.height - CHROME);
            }
        }

        fn reject(&mut self) {
            self.rejections += 1;
        }
    }

    impl DialogHost for FakeHost {
        fn confirm_last_pane_close(&mut self, pane: NodeId) {
            self.confirmations.push(pane);
        }

        fn warn_insufficient_room(&mut self, warning: &RoomWarning) {
            self.warnings.push(*warning);
        }
    }

    struct Numbered(usize);

    impl PaneFactory for Numbered {
        fn new_pane(&mut self) -> Pane {
            self.0 += 1;
            Pane::new(format!("pane {}", self.0))
        }
    }

    #[derive(Default)]
    struct Recorder {
        veto: bool,
        events: Rc<RefCell<Vec<String>>>,
    }

    impl PanesDelegate for Recorder {
        fn minimum_width(&self) -> f32 {
            100.0
        }

        fn minimum_height(&self) -> f32 {
            100.0
        }

        fn should_remove(&mut self, _id: NodeId, pane: &Pane) -> bool {
            self.events.borrow_mut().push(format!("should {}", pane.title));
            !self.veto
        }

        fn will_remove(&mut self, _id: NodeId, pane: &Pane) {
            self.events.borrow_mut().push(format!("will {}", pane.title));
        }

        fn did_remove(&mut self, _id: NodeId, pane: &Pane) {
            self.events.borrow_mut().push(format!("did {}", pane.title));
        }
    }

    fn view(width: f32, height: f32) -> (PanesView<FakeHost>, NodeId) {
        let mut view = PanesView::new(
            &Config::default(),
            FakeHost::new(width, height),
            Box::new(MemoryPreferences::new()),
            Pane::new("pane 0"),
        );
        view.set_factory(Box::new(Numbered(0)));
        view.attach();
        let first = view.tree().panes()[0];
        (view, first)
    }

    fn path(view: &PanesView<FakeHost>, pane: NodeId) -> String {
        view.tree().pane(pane).unwrap().path().to_string()
    }

    /// Every node with its frame, dividers and path, plus the selection
    type Snapshot = (Vec<(NodeId, Rect, Vec<f32>, String)>, Option<NodeId>);

    fn snapshot(view: &PanesView<FakeHost>) -> Snapshot {
        let tree = view.tree();
        let mut ids = tree.containers();
        ids.extend(tree.panes());
        let nodes = ids
            .into_iter()
            .map(|id| {
                let node = tree.node(id).unwrap();
                let (dividers, path) = match node.kind() {
                    NodeKind::Pane(p) => (Vec::new(), p.path().to_string()),
                    NodeKind::Container(c) => (c.dividers().to_vec(), c.path().to_string()),
                };
                (id, node.frame(), dividers, path)
            })
            .collect();
        (nodes, tree.selected_pane())
    }

    fn adjust_window() -> WarningResponse {
        WarningResponse {
            choice: WarningChoice::AdjustWindow,
            suppress: false,
        }
    }

    fn split_ok(
        view: &mut PanesView<FakeHost>,
        pane: NodeId,
        orientation: Orientation,
    ) -> NodeId {
        match view.split_with(pane, orientation).unwrap() {
            SplitOutcome::Split(id) => id,
            other => panic!("expected a split, got {other:?}"),
        }
    }

    #[test]
    fn attach_selects_last_pane() {
        let (view, first) = view(800.0, 600.0);
        assert_eq!(view.tree().selected_pane(), Some(first));
        assert_eq!(view.chrome(first).map(|c| c.highlighted), Some(true));
    }

    #[test]
    fn split_scenario_same_then_opposite() {
        let (mut view, p0) = view(800.0, 600.0);

        let p1 = split_ok(&mut view, p0, Orientation::Row);
        let root = view.tree().root().unwrap();
        assert_eq!(view.tree().container(root).unwrap().children(), &[p0, p1]);
        assert_eq!(view.tree().container(root).unwrap().dividers(), &[399.5]);
        assert_eq!(path(&view, p0), "0.0");
        assert_eq!(path(&view, p1), "0.1");

        let p0_extent = view.tree().frame(p0).unwrap().height;
        let p2 = split_ok(&mut view, p0, Orientation::Column);
        let sub = view.tree().parent(p0).unwrap();
        let inner = view.tree().container(sub).unwrap();
        assert_eq!(inner.children(), &[p0, p2]);
        assert_eq!(inner.dividers(), &[(p0_extent - 1.0) / 2.0]);
        assert_eq!(path(&view, p0), "0.0.0");
        assert_eq!(path(&view, p2), "0.0.1");
        assert_eq!(view.tree().selected_pane(), Some(p2));
    }

    #[test]
    fn split_uses_modifier_orientation() {
        let (mut view, p0) = view(800.0, 600.0);
        assert_eq!(view.split_orientation(), Orientation::Column);
        view.set_alternate(true);
        assert_eq!(view.split_orientation(), Orientation::Row);
        assert_eq!(view.chrome(p0).unwrap().split_icon, Orientation::Row);

        let p1 = match view.split(p0).unwrap() {
            SplitOutcome::Split(id) => id,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(view.tree().parent(p1), view.tree().root());
    }

    #[test]
    fn screen_filling_windows_reject_split() {
        for presentation in [
            WindowPresentation::FullScreen,
            WindowPresentation::BorderlessMaximized,
        ] {
            let (mut view, p0) = view(800.0, 600.0);
            view.host_mut().presentation = presentation;
            let before = snapshot(&view);

            assert_eq!(
                view.split_with(p0, Orientation::Row),
                Ok(SplitOutcome::Rejected),
                "{presentation:?}"
            );
            assert_eq!(view.host().rejections, 1);
            assert_eq!(snapshot(&view), before);
        }
    }

    #[test]
    fn insufficient_room_warns_instead_of_splitting() {
        let (mut view, p0) = view(250.0, 600.0);
        split_ok(&mut view, p0, Orientation::Row);

        let outcome = view.split_with(p0, Orientation::Row).unwrap();
        assert_eq!(outcome, SplitOutcome::AwaitingUser);
        assert_eq!(view.tree().pane_count(), 2);

        let warning = view.host().warnings[0];
        assert_eq!(warning.orientation, Orientation::Row);
        assert_eq!(warning.current_extent, 250.0);
        assert_eq!(warning.additional_extent, 50.0);
        assert_eq!(warning.maximum_extent, 1440.0);
        assert!(warning.can_expand());

        assert_eq!(view.split_with(p0, Orientation::Row), Err(LayoutError::Busy));
        assert_eq!(view.close(p0), Err(LayoutError::Busy));
    }

    #[test]
    fn declined_warning_leaves_tree_alone() {
        let (mut view, p0) = view(250.0, 600.0);
        split_ok(&mut view, p0, Orientation::Row);
        split_ok(&mut view, p0, Orientation::Column);
        view.select(Some(p0)).unwrap();
        let before = snapshot(&view);
        assert_eq!(
            view.split_with(p0, Orientation::Row),
            Ok(SplitOutcome::AwaitingUser)
        );

        let outcome = view.answer_room_warning(WarningResponse {
            choice: WarningChoice::DoNothing,
            suppress: false,
        });
        assert_eq!(outcome, SplitOutcome::Abandoned);
        assert_eq!(snapshot(&view), before);
        assert!(view.host().animations.is_empty());
        assert!(view.negotiator().is_idle());
    }

    #[test]
    fn column_split_grows_window_height() {
        let (mut view, p0) = view(800.0, 250.0);
        let p1 = split_ok(&mut view, p0, Orientation::Column);
        let sub = view.tree().parent(p0).unwrap();
        assert_eq!(view.tree().container(sub).unwrap().children(), &[p0, p1]);

        assert_eq!(
            view.split_with(p0, Orientation::Column),
            Ok(SplitOutcome::AwaitingUser)
        );
        let warning = view.host().warnings[0];
        assert_eq!(warning.orientation, Orientation::Column);
        assert_eq!(warning.current_extent, 250.0);
        assert_eq!(warning.additional_extent, 50.0);
        assert_eq!(warning.maximum_extent, 900.0 - CHROME);
        assert!(warning.informative_text().contains("vertically"));

        assert_eq!(
            view.answer_room_warning(adjust_window()),
            SplitOutcome::AwaitingWindow
        );
        assert_eq!(
            view.host().animations,
            vec![Rect::new(100.0, 75.0, 800.0, 300.0 + CHROME)]
        );

        let content = view.host().content_size();
        view.resize(content);
        let new_pane = view.window_frame_settled().unwrap();

        let column = view.tree().parent(new_pane).unwrap();
        let inner = view.tree().container(column).unwrap();
        assert_eq!(inner.orientation(), Orientation::Column);
        assert_eq!(inner.children(), &[p0, new_pane, p1]);
        let total: f32 = inner
            .children()
            .iter()
            .map(|c| view.tree().frame(*c).unwrap().height)
            .sum();
        assert!((total + 2.0 - 300.0).abs() < 0.01);
    }

    #[test]
    fn window_that_did_not_grow_rejects_retry() {
        let (mut view, p0) = view(250.0, 600.0);
        split_ok(&mut view, p0, Orientation::Row);
        view.split_with(p0, Orientation::Row).unwrap();
        view.host_mut().frozen = true;
        let before = snapshot(&view);

        assert_eq!(
            view.answer_room_warning(adjust_window()),
            SplitOutcome::AwaitingWindow
        );
        let content = view.host().content_size();
        view.resize(content);

        assert_eq!(view.window_frame_settled(), None);
        assert_eq!(view.host().rejections, 1);
        assert_eq!(snapshot(&view), before);
        assert!(view.negotiator().is_idle());
        assert!(matches!(
            view.split_with(p0, Orientation::Column),
            Ok(SplitOutcome::Split(_))
        ));
    }

    #[test]
    fn accepted_warning_grows_window_then_splits() {
        let (mut view, p0) = view(250.0, 600.0);
        split_ok(&mut view, p0, Orientation::Row);
        view.split_with(p0, Orientation::Row).unwrap();

        let outcome = view.answer_room_warning(WarningResponse {
            choice: WarningChoice::AdjustWindow,
            suppress: false,
        });
        assert_eq!(outcome, SplitOutcome::AwaitingWindow);
        assert_eq!(
            view.host().animations,
            vec![Rect::new(75.0, 100.0, 300.0, 600.0 + CHROME)]
        );

        let content = view.host().content_size();
        view.resize(content);
        let new_pane = view.window_frame_settled().unwrap();

        let root = view.tree().root().unwrap();
        assert_eq!(view.tree().container(root).unwrap().children().len(), 3);
        assert_eq!(view.tree().container(root).unwrap().children()[1], new_pane);
        assert_eq!(view.tree().selected_pane(), Some(new_pane));
        assert!(view.negotiator().is_idle());
    }

    #[test]
    fn nested_expansion_accounts_for_siblings() {
        let (mut view, p0) = view(800.0, 600.0);
        split_ok(&mut view, p0, Orientation::Row);
        split_ok(&mut view, p0, Orientation::Row);
        split_ok(&mut view, p0, Orientation::Row);
        split_ok(&mut view, p0, Orientation::Column);
        let sub = view.tree().parent(p0).unwrap();
        assert!((view.tree().frame(sub).unwrap().width - 199.25).abs() < 0.01);

        assert_eq!(
            view.split_with(p0, Orientation::Row),
            Ok(SplitOutcome::AwaitingUser)
        );
        // Four equal columns share the growth, so 3 points lift the sub
        // container to 200; one more point may be needed for rounding.
        let additional = view.host().warnings[0].additional_extent;
        assert!((3.0..=4.0).contains(&additional), "grew by {additional}");

        view.answer_room_warning(adjust_window());
        let content = view.host().content_size();
        view.resize(content);
        let width = view.tree().frame(sub).unwrap().width;
        assert!(pressure::can_add_pane(width, 1, 100.0), "sub is {width} wide");

        let new_pane = view.window_frame_settled().unwrap();
        let wrapper = view.tree().parent(new_pane).unwrap();
        assert_eq!(view.tree().parent(wrapper), Some(sub));
        assert_eq!(view.tree().container(wrapper).unwrap().children(), &[p0, new_pane]);
    }

    #[test]
    fn suppressed_warning_rejects() {
        let mut prefs = MemoryPreferences::new();
        prefs.set_bool(SPLIT_SIZE_WARNING_SHOW_AGAIN, false).unwrap();
        let mut view = PanesView::new(
            &Config::default(),
            FakeHost::new(150.0, 600.0),
            Box::new(prefs),
            Pane::new("pane 0"),
        );
        view.set_factory(Box::new(Numbered(0)));
        let p0 = view.tree().panes()[0];

        assert_eq!(view.split_with(p0, Orientation::Row), Ok(SplitOutcome::Rejected));
        assert_eq!(view.host().rejections, 1);
        assert!(view.host().warnings.is_empty());
    }

    #[test]
    fn close_last_pane_needs_confirmation() {
        let (mut view, p0) = view(800.0, 600.0);
        let before = snapshot(&view);

        assert_eq!(view.close(p0), Ok(CloseOutcome::AwaitingConfirmation));
        assert_eq!(view.host().confirmations, vec![p0]);
        assert_eq!(view.answer_last_pane_close(false), Ok(CloseOutcome::Declined));
        assert_eq!(snapshot(&view), before);
        assert_eq!(view.tree().panes(), vec![p0]);
        assert_eq!(path(&view, p0), "0.0");
        assert!(view.tree().pane(p0).unwrap().is_selected());

        view.close(p0).unwrap();
        assert_eq!(view.answer_last_pane_close(true), Ok(CloseOutcome::Closed));
        assert!(view.tree().is_empty());
    }

    #[test]
    fn close_notifies_delegate_in_order() {
        let (mut view, p0) = view(800.0, 600.0);
        let p1 = split_ok(&mut view, p0, Orientation::Row);
        let events = Rc::new(RefCell::new(Vec::new()));
        view.set_delegate(Some(Box::new(Recorder {
            veto: false,
            events: Rc::clone(&events),
        })));

        assert_eq!(view.close(p1), Ok(CloseOutcome::Closed));
        assert_eq!(
            *events.borrow(),
            vec!["should pane 1", "will pane 1", "did pane 1"]
        );
        assert_eq!(view.tree().panes(), vec![p0]);
    }

    #[test]
    fn delegate_can_veto_close() {
        let (mut view, p0) = view(800.0, 600.0);
        let p1 = split_ok(&mut view, p0, Orientation::Row);
        view.set_delegate(Some(Box::new(Recorder {
            veto: true,
            ..Recorder::default()
        })));

        assert_eq!(view.close(p1), Ok(CloseOutcome::Vetoed));
        assert_eq!(view.tree().pane_count(), 2);
    }

    #[test]
    fn click_selects_pane_under_pointer() {
        let (mut view, p0) = view(800.0, 600.0);
        let p1 = split_ok(&mut view, p0, Orientation::Row);
        assert_eq!(view.tree().selected_pane(), Some(p1));

        assert_eq!(view.click(Point::new(10.0, 10.0)), Some(p0));
        assert_eq!(view.tree().selected_pane(), Some(p0));
        assert_eq!(view.click(Point::new(5000.0, 10.0)), None);
        assert_eq!(view.tree().selected_pane(), Some(p0));
    }

    #[test]
    fn move_divider_respects_minimum() {
        let (mut view, p0) = view(800.0, 600.0);
        let p1 = split_ok(&mut view, p0, Orientation::Row);
        let root = view.tree().root().unwrap();

        assert_eq!(view.move_divider(root, 0, 250.0), Ok(250.0));
        assert_eq!(view.tree().frame(p0).unwrap().width, 250.0);
        assert_eq!(view.tree().frame(p1).unwrap().width, 549.0);

        assert_eq!(view.move_divider(root, 0, 20.0), Ok(100.0));
        assert_eq!(view.move_divider(root, 0, 790.0), Ok(699.0));
        assert_eq!(
            view.move_divider(root, 1, 10.0),
            Err(LayoutError::DividerOutOfRange {
                container: root,
                index: 1
            })
        );
        assert_eq!(path(&view, p1), "0.1");
    }

    #[test]
    #[should_panic(expected = "pane factory")]
    fn split_without_factory_panics() {
        let mut view = PanesView::new(
            &Config::default(),
            FakeHost::new(800.0, 600.0),
            Box::new(MemoryPreferences::new()),
            Pane::default(),
        );
        view.attach();
        let p0 = view.tree().panes()[0];
        let _ = view.split_with(p0, Orientation::Row);
    }

    #[test]
    fn missing_delegate_falls_back_to_one_point() {
        let (mut view, p0) = view(150.0, 600.0);
        view.set_delegate(None);
        assert!(matches!(
            view.split_with(p0, Orientation::Row),
            Ok(SplitOutcome::Split(_))
        ));
    }

    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn grown_window_fits_retried_split(
                splits in prop::collection::vec((any::<usize>(), any::<bool>()), 1..16),
            ) {
                let (mut view, _) = view(400.0, 300.0);
                for (pick, row) in splits {
                    let panes = view.tree().panes();
                    let pane = panes[pick % panes.len()];
                    let orientation = if row { Orientation::Row } else { Orientation::Column };

                    match view.split_with(pane, orientation).unwrap() {
                        SplitOutcome::Split(_) => continue,
                        SplitOutcome::AwaitingUser => {}
                        other => prop_assert!(false, "unexpected {:?}", other),
                    }
                    if view.answer_room_warning(adjust_window()) == SplitOutcome::Abandoned {
                        // No screen space left to grow into
                        prop_assert!(view.negotiator().is_idle());
                        continue;
                    }

                    let content = view.host().content_size();
                    view.resize(content);
                    let container = view.tree().parent(pane).unwrap();
                    let inner = view.tree().container(container).unwrap();
                    let extent = view.tree().frame(container).unwrap().extent(orientation);
                    let pressure = pressure::pressure(
                        inner.orientation(),
                        inner.children().len(),
                        orientation,
                    );
                    prop_assert!(
                        pressure::can_add_pane(extent, pressure, 100.0),
                        "{} along {:?} with pressure {}",
                        extent,
                        orientation,
                        pressure
                    );
                    prop_assert!(view.window_frame_settled().is_some());
                    prop_assert_eq!(view.host().rejections, 0);
                    view.tree().assert_invariants();
                }
            }
        }
    }
}
