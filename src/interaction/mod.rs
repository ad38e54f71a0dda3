mod events;
mod input;
mod pointer;

pub use events::{forward_pointer, pointer_payload, SceneEventSink, MOUSE_POSITION};
pub use input::{PointerEvent, WinitPointerAdapter};
pub use pointer::{ContainerBounds, NormalizedPointer, PointerCoupler, PointerSample};
