// ABOUTME: Pane layout management for pressure-panes.
// ABOUTME: Recursive split tree with pressure-gated splits, collapsing closes and window fitting.

mod error;
mod host;
mod mutator;
mod negotiator;
mod pressure;
mod selection;
mod tree;
mod view;

pub use error::LayoutError;
pub use host::{
    ConfigDelegate, DialogHost, PaneFactory, PanesDelegate, WindowHost, WindowPresentation,
};
pub use negotiator::{
    FitNegotiator, FitRequest, FitState, FitStep, PendingSplit, RoomWarning, WarningChoice,
    WarningResponse,
};
pub use pressure::{can_add_pane, pressure, FALLBACK_MINIMUM_EXTENT};
pub use selection::{pane_chrome, resolve_split, PaneChrome};
pub use tree::{Container, Node, NodeId, NodeKind, Pane, PanePath, PaneTree};
pub use view::{CloseOutcome, PanesView, SplitOutcome};
