use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pointer-relevant subset of window events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved { x: f32, y: f32 },
    /// New drawable size in physical pixels
    Resized { width: u32, height: u32 },
    Left,
}

/// Adapter that bridges winit window events to pointer events
#[derive(Debug, Clone, Default)]
pub struct WinitPointerAdapter {
    /// Last cursor position in window pixels
    position: Option<(f32, f32)>,
}

impl WinitPointerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a window event, updating the tracked cursor position
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.position = Some((x, y));
                Some(PointerEvent::Moved { x, y })
            }
            WindowEvent::CursorLeft { .. } => {
                self.position = None;
                Some(PointerEvent::Left)
            }
            WindowEvent::Resized(size) => Some(PointerEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            _ => None,
        }
    }

    /// Current cursor position, if the cursor is inside the window
    pub fn position(&self) -> Option<(f32, f32)> {
        self.position
    }

    /// Whether the event is an Escape key press
    pub fn is_exit_key(event: &WindowEvent) -> bool {
        matches!(
            event,
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
        )
    }
}
