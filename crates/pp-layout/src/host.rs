// ABOUTME: Capabilities the engine calls into: factory, delegate, window and dialogs.
// ABOUTME: The toolkit adapter implements these; the engine never draws or blocks.

use pp_core::{Config, Orientation, Rect, Size};

use crate::{Container, NodeId, Pane, RoomWarning};

/// Builds the nodes a split inserts
pub trait PaneFactory {
    fn new_pane(&mut self) -> Pane;

    /// Container wrapping the panes of a split. The engine sets its
    /// orientation and children afterwards.
    fn new_container(&mut self, orientation: Orientation) -> Container {
        Container::new(orientation)
    }
}

/// Size constraints plus hooks around removing a pane
pub trait PanesDelegate {
    fn minimum_width(&self) -> f32;
    fn minimum_height(&self) -> f32;

    fn can_collapse(&self) -> bool {
        false
    }

    /// Returning false vetoes the close
    fn should_remove(&mut self, _id: NodeId, _pane: &Pane) -> bool {
        true
    }

    fn will_remove(&mut self, _id: NodeId, _pane: &Pane) {}

    /// Called once the pane is gone from the tree
    fn did_remove(&mut self, _id: NodeId, _pane: &Pane) {}
}

/// Delegate backed by the user's config file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfigDelegate {
    pub minimum_width: f32,
    pub minimum_height: f32,
    pub can_collapse: bool,
}

impl From<&Config> for ConfigDelegate {
    fn from(config: &Config) -> Self {
        Self {
            minimum_width: config.minimum_width,
            minimum_height: config.minimum_height,
            can_collapse: config.can_collapse,
        }
    }
}

impl PanesDelegate for ConfigDelegate {
    fn minimum_width(&self) -> f32 {
        self.minimum_width
    }

    fn minimum_height(&self) -> f32 {
        self.minimum_height
    }

    fn can_collapse(&self) -> bool {
        self.can_collapse
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPresentation {
    #[default]
    Windowed,
    FullScreen,
    BorderlessMaximized,
}

pub trait WindowHost {
    /// Outer frame of the window, chrome included
    fn frame(&self) -> Rect;

    /// Size of the area the root container fills
    fn content_size(&self) -> Size;

    /// Largest content area the window can reach on its current screen
    fn screen_content_size(&self) -> Option<Size>;

    fn presentation(&self) -> WindowPresentation;

    /// Start an animated move/resize to `frame`. The host reports the end
    /// of the animation through `PanesView::window_frame_settled`.
    fn animate_frame(&mut self, frame: Rect);

    /// Audible or visual "that did not work"
    fn reject(&mut self);
}

/// Modal prompts. Answers come back through `PanesView`.
pub trait DialogHost {
    /// Ask whether the last pane of the tree may be closed
    fn confirm_last_pane_close(&mut self, pane: NodeId);

    /// Explain that a split does not fit, optionally offering to grow the window
    fn warn_insufficient_room(&mut self, warning: &RoomWarning);
}
