// ABOUTME: Decides what happens when a split does not fit in the window.
// ABOUTME: Warn, remember "don't show again", or grow the window and retry.

use std::fmt;

use pp_core::{Orientation, PreferenceStore, Rect, SPLIT_SIZE_WARNING_SHOW_AGAIN};

use crate::NodeId;

/// A split waiting on the user or on the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSplit {
    pub pane: NodeId,
    pub orientation: Orientation,
}

/// What the "not enough room" dialog needs to explain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomWarning {
    pub orientation: Orientation,
    /// How much the window has to grow along the split axis
    pub additional_extent: f32,
    pub current_extent: f32,
    /// Largest extent the window can reach on its screen, chrome excluded
    pub maximum_extent: f32,
}

impl RoomWarning {
    /// Whether growing the window can make room at all
    pub fn can_expand(&self) -> bool {
        self.current_extent + self.additional_extent < self.maximum_extent
    }

    pub fn message(&self) -> &'static str {
        "Not enough room to split internally"
    }

    pub fn informative_text(&self) -> String {
        let direction = match self.orientation {
            Orientation::Row => "horizontally",
            Orientation::Column => "vertically",
        };
        let mut text = format!(
            "A new pane requires a minimum of {} additional points {}.",
            self.additional_extent, direction
        );
        if self.can_expand() {
            text.push_str(&format!(
                " Window resize is possible: there are {} points available in this direction \
                 on this screen (accounting for window borders).",
                self.maximum_extent - self.current_extent
            ));
        }
        text
    }
}

impl fmt::Display for RoomWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.message(), self.informative_text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningChoice {
    DoNothing,
    AdjustWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarningResponse {
    pub choice: WarningChoice,
    /// "Don't show this again" was ticked
    pub suppress: bool,
}

/// Everything needed to negotiate one split that does not fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRequest {
    pub split: PendingSplit,
    pub warning: RoomWarning,
    /// Window frame that makes the split fit
    pub expanded_frame: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitState {
    Idle,
    WarningPending {
        split: PendingSplit,
        expanded_frame: Option<Rect>,
    },
    ExpandingWindow {
        split: PendingSplit,
    },
}

/// What the caller should do next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitStep {
    ShowWarning(RoomWarning),
    Expand(Rect),
    Abort,
}

pub struct FitNegotiator {
    state: FitState,
    prefs: Box<dyn PreferenceStore>,
}

impl FitNegotiator {
    pub fn new(prefs: Box<dyn PreferenceStore>) -> Self {
        Self {
            state: FitState::Idle,
            prefs,
        }
    }

    pub fn state(&self) -> &FitState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == FitState::Idle
    }

    /// Whether the warning is shown; unset means yes
    pub fn shows_warning(&self) -> bool {
        self.prefs.bool(SPLIT_SIZE_WARNING_SHOW_AGAIN).unwrap_or(true)
    }

    pub fn begin(&mut self, request: FitRequest) -> FitStep {
        if !self.is_idle() {
            tracing::warn!("Split negotiation already in progress: {:?}", self.state);
            return FitStep::Abort;
        }
        if !self.shows_warning() {
            tracing::debug!("Room warning suppressed, dropping split");
            return FitStep::Abort;
        }

        let expanded_frame = request
            .warning
            .can_expand()
            .then_some(request.expanded_frame);
        self.state = FitState::WarningPending {
            split: request.split,
            expanded_frame,
        };
        FitStep::ShowWarning(request.warning)
    }

    pub fn answer(&mut self, response: WarningResponse) -> FitStep {
        let FitState::WarningPending {
            split,
            expanded_frame,
        } = self.state
        else {
            tracing::warn!("Room warning answered but none is pending");
            return FitStep::Abort;
        };

        if response.suppress {
            if let Err(e) = self.prefs.set_bool(SPLIT_SIZE_WARNING_SHOW_AGAIN, false) {
                tracing::warn!("Failed to store warning preference: {}", e);
            }
        }

        match (response.choice, expanded_frame) {
            (WarningChoice::AdjustWindow, Some(frame)) => {
                self.state = FitState::ExpandingWindow { split };
                FitStep::Expand(frame)
            }
            _ => {
                self.state = FitState::Idle;
                FitStep::Abort
            }
        }
    }

    /// The window finished growing; hand back the split to perform
    pub fn expansion_finished(&mut self) -> Option<PendingSplit> {
        match self.state {
            FitState::ExpandingWindow { split } => {
                self.state = FitState::Idle;
                Some(split)
            }
            _ => None,
        }
    }
}

impl fmt::Debug for FitNegotiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FitNegotiator")
            .field("state", &self.state)
            .field("shows_warning", &self.shows_warning())
            .finish()
    }
}
