// ABOUTME: Demo application entry point.
// ABOUTME: Opens a window and drives a split pane view from keyboard and mouse input.

mod host;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use pp_core::{Config, FilePreferences, MemoryPreferences, Orientation, Point, PreferenceStore};
use pp_layout::{
    CloseOutcome, NodeId, Pane, PaneFactory, PanesView, SplitOutcome, WarningChoice,
    WarningResponse, WindowHost as _,
};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{WindowAttributes, WindowId};

use host::{Expansion, Prompt, WinitHost, TITLE};

/// Points a divider moves per key press
const DIVIDER_STEP: f32 = 10.0;

/// How long a requested resize may go without a resize event before the
/// window is taken as it is
const RESIZE_SETTLE_TIMEOUT: Duration = Duration::from_millis(750);

/// Hands out "pane 1", "pane 2", ...
#[derive(Default)]
struct Numbered {
    next: usize,
}

impl PaneFactory for Numbered {
    fn new_pane(&mut self) -> Pane {
        self.next += 1;
        Pane::new(format!("pane {}", self.next))
    }
}

struct App {
    config: Config,
    prefs: Option<Box<dyn PreferenceStore>>,
    view: Option<PanesView<WinitHost>>,
    modifiers: ModifiersState,
    cursor: Point,
}

impl App {
    fn new() -> Self {
        let config = Config::load_or_default();
        tracing::info!(
            "Loaded config: minimum {}x{}, default split {}",
            config.minimum_width,
            config.minimum_height,
            config.default_split.label()
        );

        let prefs: Box<dyn PreferenceStore> = match FilePreferences::open_default() {
            Ok(prefs) => Box::new(prefs),
            Err(e) => {
                tracing::warn!("Preferences unavailable, keeping them in memory: {}", e);
                Box::new(MemoryPreferences::new())
            }
        };

        Self {
            config,
            prefs: Some(prefs),
            view: None,
            modifiers: ModifiersState::empty(),
            cursor: Point::default(),
        }
    }

    /// Selected pane, or the last one when nothing is selected
    fn active_pane(view: &PanesView<WinitHost>) -> Option<NodeId> {
        let tree = view.tree();
        tree.selected_pane().or_else(|| tree.panes().last().copied())
    }

    fn split(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let Some(pane) = Self::active_pane(view) else {
            return;
        };
        match view.split(pane) {
            Ok(SplitOutcome::Split(new_pane)) => {
                tracing::debug!("Split produced {:?}", new_pane);
            }
            Ok(outcome) => tracing::debug!("Split did not happen yet: {:?}", outcome),
            Err(e) => tracing::warn!("Split failed: {}", e),
        }
        self.log_layout();
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let Some(pane) = Self::active_pane(view) else {
            return;
        };
        match view.close(pane) {
            Ok(outcome) => tracing::debug!("Close: {:?}", outcome),
            Err(e) => tracing::warn!("Close failed: {}", e),
        }
        self.after_close(event_loop);
    }

    fn after_close(&mut self, event_loop: &ActiveEventLoop) {
        if self.view.as_ref().is_some_and(|v| v.tree().is_empty()) {
            tracing::info!("All panes closed, exiting");
            event_loop.exit();
            return;
        }
        self.log_layout();
    }

    /// Nudge the divider after the selected pane along `orientation`
    fn nudge_divider(&mut self, orientation: Orientation, delta: f32) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let Some(pane) = Self::active_pane(view) else {
            return;
        };

        // Climb to the first ancestor laid out along the requested axis
        let tree = view.tree();
        let mut child = pane;
        let mut target = None;
        while let Some(parent) = tree.parent(child) {
            let Some(container) = tree.container(parent) else {
                break;
            };
            if container.orientation() == orientation && container.children().len() > 1 {
                let index = container
                    .children()
                    .iter()
                    .position(|c| *c == child)
                    .unwrap_or(0);
                let index = index.min(container.dividers().len() - 1);
                target = Some((parent, index, container.dividers()[index]));
                break;
            }
            child = parent;
        }

        let Some((container, index, position)) = target else {
            tracing::debug!("No {} divider next to the selected pane", orientation.label());
            return;
        };
        match view.move_divider(container, index, position + delta) {
            Ok(placed) => tracing::debug!("Divider {} moved to {}", index, placed),
            Err(e) => tracing::warn!("Divider move failed: {}", e),
        }
        self.log_layout();
    }

    /// Route a key press to the prompt waiting for it. Returns false when
    /// no prompt is showing.
    fn answer_prompt(&mut self, event_loop: &ActiveEventLoop, key: &Key) -> bool {
        let Some(view) = self.view.as_mut() else {
            return false;
        };
        let Some(prompt) = view.host().prompt() else {
            return false;
        };

        let letter = match key {
            Key::Character(s) => s.to_lowercase(),
            Key::Named(NamedKey::Enter) => "a".to_string(),
            Key::Named(NamedKey::Escape) => "n".to_string(),
            _ => return true,
        };

        match prompt {
            Prompt::ClosePane(_) => {
                let confirmed = match letter.as_str() {
                    "y" => true,
                    "n" => false,
                    _ => return true,
                };
                view.host_mut().clear_prompt();
                match view.answer_last_pane_close(confirmed) {
                    Ok(CloseOutcome::Closed) => self.after_close(event_loop),
                    Ok(outcome) => tracing::debug!("Close: {:?}", outcome),
                    Err(e) => tracing::warn!("Close failed: {}", e),
                }
            }
            Prompt::Room(_) => {
                let choice = match letter.as_str() {
                    "a" => WarningChoice::AdjustWindow,
                    "d" | "n" => WarningChoice::DoNothing,
                    _ => return true,
                };
                let response = WarningResponse {
                    choice,
                    suppress: self.modifiers.shift_key(),
                };
                view.host_mut().clear_prompt();
                if view.answer_room_warning(response) == SplitOutcome::AwaitingWindow
                    && view.host().expansion() == Expansion::Applied
                {
                    self.settle();
                }
            }
        }
        true
    }

    /// The window reached its new size: relayout and finish a pending split
    fn settle(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let size = view.host().content_size();
        view.resize(size);
        if view.host().expansion() != Expansion::Idle {
            view.host_mut().finish_expansion();
            if let Some(new_pane) = view.window_frame_settled() {
                tracing::info!("Window grown, split produced {:?}", new_pane);
            }
        }
        self.log_layout();
    }

    fn log_layout(&self) {
        let Some(view) = self.view.as_ref() else {
            return;
        };
        let tree = view.tree();
        for pane in tree.panes() {
            let (Some(p), Some(frame)) = (tree.pane(pane), tree.frame(pane)) else {
                continue;
            };
            tracing::debug!(
                "{:>8} {:<10} {:>7.1},{:>7.1} {:>7.1}x{:<7.1}{}",
                p.path().to_string(),
                p.title,
                frame.x,
                frame.y,
                frame.width,
                frame.height,
                if p.is_selected() { " *" } else { "" }
            );
        }

        if view.host().prompt().is_none() {
            let selected = tree
                .selected_pane()
                .and_then(|id| tree.pane(id))
                .map(|p| p.path().to_string())
                .unwrap_or_else(|| "-".to_string());
            view.host().window().set_title(&format!(
                "{TITLE}: {selected} of {} panes, splits {}",
                tree.pane_count(),
                view.split_orientation().label()
            ));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.view.is_some() {
            return;
        }

        let window_attrs = WindowAttributes::default()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let scale_factor = window.scale_factor();
        let physical_size = window.inner_size();
        tracing::info!(
            "Window created: {}x{} physical pixels, scale factor: {}",
            physical_size.width,
            physical_size.height,
            scale_factor
        );

        let prefs = self
            .prefs
            .take()
            .unwrap_or_else(|| Box::new(MemoryPreferences::new()));
        let mut view = PanesView::new(
            &self.config,
            WinitHost::new(window),
            prefs,
            Pane::new("pane 0"),
        );
        view.set_factory(Box::new(Numbered::default()));
        view.attach();
        self.view = Some(view);
        self.log_layout();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(_) => {
                self.settle();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
                if let Some(view) = self.view.as_mut() {
                    view.set_alternate(self.modifiers.alt_key());
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(view) = &self.view {
                    let logical = position.to_logical::<f32>(view.host().window().scale_factor());
                    self.cursor = Point::new(logical.x, logical.y);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(view) = self.view.as_mut() {
                    if let Some(pane) = view.click(self.cursor) {
                        tracing::info!("Selected pane {:?}", pane);
                    }
                }
                self.log_layout();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                if self.answer_prompt(event_loop, &event.logical_key) {
                    return;
                }

                let ctrl = self.modifiers.control_key();
                if !ctrl {
                    return;
                }
                match &event.logical_key {
                    Key::Character(s) if s.eq_ignore_ascii_case("d") => self.split(),
                    Key::Character(s) if s.eq_ignore_ascii_case("w") => self.close(event_loop),
                    Key::Named(NamedKey::ArrowLeft) => {
                        self.nudge_divider(Orientation::Row, -DIVIDER_STEP)
                    }
                    Key::Named(NamedKey::ArrowRight) => {
                        self.nudge_divider(Orientation::Row, DIVIDER_STEP)
                    }
                    Key::Named(NamedKey::ArrowUp) => {
                        self.nudge_divider(Orientation::Column, -DIVIDER_STEP)
                    }
                    Key::Named(NamedKey::ArrowDown) => {
                        self.nudge_divider(Orientation::Column, DIVIDER_STEP)
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(expansion) = self.view.as_ref().map(|v| v.host().expansion()) else {
            return;
        };
        // Some platforms never report a resize they ignored or clamped
        if expansion.is_overdue(Instant::now(), RESIZE_SETTLE_TIMEOUT) {
            tracing::debug!("No resize event after growing the window, settling anyway");
            self.settle();
        }
        let control_flow = match self
            .view
            .as_ref()
            .and_then(|v| v.host().expansion().deadline(RESIZE_SETTLE_TIMEOUT))
        {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        };
        event_loop.set_control_flow(control_flow);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting pressure-panes");

    let event_loop = EventLoop::new()?;
    let mut app = App::new();

    event_loop.run_app(&mut app)?;

    Ok(())
}
