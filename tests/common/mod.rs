#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tech_grid::core::{
    BackendError, ManualClock, Releasable, ResourceKind, ResourceLifecycle, SceneBackend,
    SceneUpdate,
};
use tech_grid::frame::FrameIterator;
use tech_grid::scene::BuiltScene;
use tech_grid::{FieldConfig, FieldSettings, GridField};

/// Shared log of released handles
pub type ReleaseLog = Rc<RefCell<Vec<ResourceKind>>>;

pub struct MockHandle {
    kind: ResourceKind,
    log: ReleaseLog,
}

impl Releasable for MockHandle {
    fn release(self) {
        self.log.borrow_mut().push(self.kind);
    }
}

/// Backend that records what the field asks of it
#[derive(Default)]
pub struct MockBackend {
    pub releases: ReleaseLog,
    pub fail: bool,
    pub creates: usize,
    pub syncs: usize,
    pub last_dirty: Option<std::ops::Range<usize>>,
    pub last_rotation: glam::Vec3,
    pub size: (u32, u32),
}

impl MockBackend {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl SceneBackend for MockBackend {
    type Handle = MockHandle;

    fn create(
        &mut self,
        _scene: &BuiltScene,
    ) -> Result<Vec<(ResourceKind, MockHandle)>, BackendError> {
        self.creates += 1;
        if self.fail {
            return Err(BackendError::OutOfMemory);
        }
        Ok(ResourceKind::ALL
            .iter()
            .map(|&kind| {
                (
                    kind,
                    MockHandle {
                        kind,
                        log: self.releases.clone(),
                    },
                )
            })
            .collect())
    }

    fn sync(&mut self, _resources: &ResourceLifecycle<MockHandle>, update: SceneUpdate<'_>) {
        self.syncs += 1;
        self.last_dirty = update.dirty;
        self.last_rotation = update.rotation;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}

pub fn settings(seed: u64) -> FieldSettings {
    let config = FieldConfig {
        seed: Some(seed),
        ..FieldConfig::default()
    };
    config.field_settings().unwrap()
}

/// Field on a mock backend with a 1000x500 window container
pub fn mock_field(seed: u64) -> (GridField<MockBackend>, ReleaseLog) {
    let backend = MockBackend::default();
    let releases = backend.releases.clone();
    let mut field = GridField::new(backend, settings(seed));
    field.resize(1000, 500);
    (field, releases)
}

pub fn manual_frames() -> (ManualClock, FrameIterator<ManualClock>) {
    let clock = ManualClock::new();
    let frames = FrameIterator::with_clock(clock.clone());
    (clock, frames)
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
