// ABOUTME: Window and dialog capabilities backed by a winit window.
// ABOUTME: Prompts are shown in the title bar and answered from the keyboard.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pp_core::{Rect, Size};
use pp_layout::{DialogHost, NodeId, RoomWarning, WindowHost, WindowPresentation};
use winit::dpi::{LogicalPosition, LogicalSize};
use winit::window::{Fullscreen, UserAttentionType, Window};

pub const TITLE: &str = "pressure-panes";

/// Question currently waiting for a key press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prompt {
    ClosePane(NodeId),
    Room(RoomWarning),
}

/// Progress of a window resize started to make room for a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expansion {
    #[default]
    Idle,
    /// Waiting for the resize event
    Requested { since: Instant },
    /// The platform applied the size synchronously, or the window already
    /// has it; no resize event follows
    Applied,
}

impl Expansion {
    /// When a requested resize stops being waited for
    pub fn deadline(&self, timeout: Duration) -> Option<Instant> {
        match self {
            Expansion::Requested { since } => Some(*since + timeout),
            _ => None,
        }
    }

    /// A requested resize produced no event in time
    pub fn is_overdue(&self, now: Instant, timeout: Duration) -> bool {
        self.deadline(timeout).is_some_and(|deadline| now >= deadline)
    }
}

pub struct WinitHost {
    window: Arc<Window>,
    prompt: Option<Prompt>,
    expansion: Expansion,
}

impl WinitHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            prompt: None,
            expansion: Expansion::Idle,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn prompt(&self) -> Option<Prompt> {
        self.prompt
    }

    pub fn clear_prompt(&mut self) {
        self.prompt = None;
        self.window.set_title(TITLE);
    }

    pub fn expansion(&self) -> Expansion {
        self.expansion
    }

    pub fn finish_expansion(&mut self) {
        self.expansion = Expansion::Idle;
    }

    fn scale(&self) -> f64 {
        self.window.scale_factor()
    }

    /// Outer minus inner size: title bar and borders
    fn chrome(&self) -> Size {
        let scale = self.scale();
        let outer = self.window.outer_size().to_logical::<f32>(scale);
        let inner = self.window.inner_size().to_logical::<f32>(scale);
        Size::new(
            (outer.width - inner.width).max(0.0),
            (outer.height - inner.height).max(0.0),
        )
    }

    fn show(&mut self, prompt: Prompt, question: &str) {
        self.prompt = Some(prompt);
        self.window.set_title(&format!("{TITLE}: {question}"));
    }
}

impl WindowHost for WinitHost {
    fn frame(&self) -> Rect {
        let scale = self.scale();
        let position = self
            .window
            .outer_position()
            .map(|p| p.to_logical::<f32>(scale))
            .unwrap_or(LogicalPosition::new(0.0, 0.0));
        let size = self.window.outer_size().to_logical::<f32>(scale);
        Rect::new(position.x, position.y, size.width, size.height)
    }

    fn content_size(&self) -> Size {
        let size = self.window.inner_size().to_logical::<f32>(self.scale());
        Size::new(size.width, size.height)
    }

    fn screen_content_size(&self) -> Option<Size> {
        let monitor = self.window.current_monitor()?;
        let screen = monitor.size().to_logical::<f32>(monitor.scale_factor());
        let chrome = self.chrome();
        Some(Size::new(
            screen.width - chrome.width,
            screen.height - chrome.height,
        ))
    }

    fn presentation(&self) -> WindowPresentation {
        match self.window.fullscreen() {
            Some(Fullscreen::Exclusive(_)) => WindowPresentation::FullScreen,
            Some(Fullscreen::Borderless(_)) => WindowPresentation::BorderlessMaximized,
            None => WindowPresentation::Windowed,
        }
    }

    fn animate_frame(&mut self, frame: Rect) {
        let chrome = self.chrome();
        let content = Size::new(frame.width - chrome.width, frame.height - chrome.height);
        let unchanged = self.content_size() == content;
        self.window
            .set_outer_position(LogicalPosition::new(frame.x, frame.y));
        let applied = self
            .window
            .request_inner_size(LogicalSize::new(content.width, content.height));
        self.expansion = if applied.is_some() || unchanged {
            Expansion::Applied
        } else {
            Expansion::Requested {
                since: Instant::now(),
            }
        };
    }

    fn reject(&mut self) {
        tracing::info!("Request refused");
        self.window
            .request_user_attention(Some(UserAttentionType::Informational));
    }
}

impl DialogHost for WinitHost {
    fn confirm_last_pane_close(&mut self, pane: NodeId) {
        tracing::warn!("Closing the last pane, press y to confirm or n to keep it");
        self.show(Prompt::ClosePane(pane), "close the last pane? [y/n]");
    }

    fn warn_insufficient_room(&mut self, warning: &RoomWarning) {
        tracing::warn!("{}", warning);
        let options = if warning.can_expand() {
            "[a]djust window or [d]o nothing"
        } else {
            "[d]ismiss"
        };
        self.show(
            Prompt::Room(*warning),
            &format!(
                "{}. {} (hold shift to stop asking)",
                warning.message(),
                options
            ),
        );
    }
}
