use serde_json::{json, Value};

use super::pointer::PointerSample;

/// Event name carrying unit pointer coordinates
pub const MOUSE_POSITION: &str = "mousePosition";

/// Receiver of named scene events
pub trait SceneEventSink {
    fn emit_event(&mut self, name: &str, payload: &Value);
}

/// Send a published pointer sample to the scene as a `mousePosition` event
pub fn forward_pointer<S: SceneEventSink + ?Sized>(sink: &mut S, sample: &PointerSample) {
    let payload = json!({ "x": sample.unit[0], "y": sample.unit[1] });
    sink.emit_event(MOUSE_POSITION, &payload);
}

/// Read `{ x, y }` back out of a `mousePosition` payload
pub fn pointer_payload(payload: &Value) -> Option<[f32; 2]> {
    let x = payload.get("x")?.as_f64()?;
    let y = payload.get("y")?.as_f64()?;
    Some([x as f32, y as f32])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::NormalizedPointer;

    #[derive(Default)]
    struct Recorder {
        events: Vec<(String, Value)>,
    }

    impl SceneEventSink for Recorder {
        fn emit_event(&mut self, name: &str, payload: &Value) {
            self.events.push((name.to_string(), payload.clone()));
        }
    }

    #[test]
    fn forwards_unit_coordinates() {
        let normalized = NormalizedPointer::new(0.5, -1.0);
        let sample = PointerSample {
            raw: [600.0, 0.0],
            normalized,
            unit: normalized.to_unit(),
        };
        let mut recorder = Recorder::default();

        forward_pointer(&mut recorder, &sample);

        assert_eq!(recorder.events.len(), 1);
        let (name, payload) = &recorder.events[0];
        assert_eq!(name, MOUSE_POSITION);
        assert_eq!(pointer_payload(payload), Some([0.75, 0.0]));
    }

    #[test]
    fn malformed_payload() {
        assert_eq!(pointer_payload(&json!({ "x": 0.5 })), None);
        assert_eq!(pointer_payload(&json!("left")), None);
    }
}
