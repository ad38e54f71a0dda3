mod common;

use common::{manual_frames, mock_field, ms, settings, MockBackend};
use tech_grid::core::ResourceKind;
use tech_grid::{GridField, Phase, TickOutcome};

// ============================================================================
// Mount / Unmount
// ============================================================================

#[test]
fn test_mount_creates_all_resources() {
    let (mut field, releases) = mock_field(7);
    assert_eq!(field.phase(), Phase::Unmounted);

    assert!(field.mount());

    assert_eq!(field.phase(), Phase::Active);
    assert_eq!(field.resources().len(), ResourceKind::ALL.len());
    assert_eq!(field.backend().creates, 1);
    assert!(releases.borrow().is_empty());
}

#[test]
fn test_mount_twice_builds_once() {
    let (mut field, _) = mock_field(7);
    assert!(field.mount());
    assert!(field.mount());

    assert_eq!(field.builds(), 1);
    assert_eq!(field.backend().creates, 1);
}

#[test]
fn test_unmount_releases_each_handle_once() {
    let (mut field, releases) = mock_field(7);
    let (clock, mut frames) = manual_frames();
    field.mount();

    for _ in 0..5 {
        let frame = frames.next().unwrap();
        field.frame(&frame);
        clock.advance(ms(40));
    }
    assert_eq!(field.ticks(), 5);

    assert_eq!(field.unmount(), 7);
    assert_eq!(field.phase(), Phase::Unmounted);

    let mut released = releases.borrow().clone();
    released.sort_by_key(|kind| kind.label());
    let mut expected = ResourceKind::ALL.to_vec();
    expected.sort_by_key(|kind| kind.label());
    assert_eq!(released, expected);

    // Second unmount is a no-op
    assert_eq!(field.unmount(), 0);
    assert_eq!(releases.borrow().len(), 7);
}

#[test]
fn test_ticks_then_unmount_then_frame_is_noop() {
    let (mut field, releases) = mock_field(7);
    let (clock, mut frames) = manual_frames();
    field.mount();

    for _ in 0..5 {
        assert!(field.frame(&frames.next().unwrap()).tick.is_update());
        clock.advance(ms(40));
    }
    let syncs = field.backend().syncs;
    assert_eq!(syncs, 5);

    assert_eq!(field.unmount(), 7);
    assert_eq!(releases.borrow().len(), 7);

    clock.advance(ms(40));
    let report = field.frame(&frames.next().unwrap());
    assert_eq!(report.tick, TickOutcome::Skipped);
    assert!(report.published.is_none());
    assert_eq!(field.backend().syncs, syncs);
    assert_eq!(field.ticks(), 0);
    assert_eq!(releases.borrow().len(), 7);
}

#[test]
fn test_frames_after_unmount_do_nothing() {
    let (mut field, _) = mock_field(7);
    let (clock, mut frames) = manual_frames();
    field.mount();
    field.unmount();

    let syncs = field.backend().syncs;
    for _ in 0..3 {
        clock.advance(ms(100));
        let report = field.frame(&frames.next().unwrap());
        assert_eq!(report.tick, TickOutcome::Skipped);
        assert!(report.published.is_none());
    }
    assert_eq!(field.backend().syncs, syncs);
    assert!(field.scene().is_none());
    assert!(!field.pointer_moved(10.0, 10.0, ms(500)));
}

#[test]
fn test_remount_rebuilds_scene() {
    let (mut field, releases) = mock_field(7);
    field.mount();
    field.unmount();
    assert!(field.mount());

    assert_eq!(field.builds(), 2);
    assert_eq!(field.resources().len(), 7);
    assert_eq!(releases.borrow().len(), 7);
}

#[test]
fn test_drop_releases_resources() {
    let (mut field, releases) = mock_field(7);
    field.mount();
    drop(field);

    assert_eq!(releases.borrow().len(), 7);
}

#[test]
fn test_drop_unmounted_releases_nothing() {
    let (field, releases) = mock_field(7);
    drop(field);
    assert!(releases.borrow().is_empty());
}

// ============================================================================
// Backend failure
// ============================================================================

#[test]
fn test_failed_backend_leaves_field_unmounted() {
    let mut field = GridField::new(MockBackend::failing(), settings(3));
    field.resize(800, 600);

    assert!(!field.mount());
    assert_eq!(field.phase(), Phase::Unmounted);
    assert!(field.resources().is_empty());
    assert!(field.scene().is_none());

    let (_, mut frames) = manual_frames();
    let report = field.frame(&frames.next().unwrap());
    assert_eq!(report.tick, TickOutcome::Skipped);
    assert_eq!(field.backend().syncs, 0);
}

#[test]
fn test_render_with_only_when_active() {
    let (mut field, _) = mock_field(7);
    assert!(field.render_with(|_, resources| resources.len()).is_none());

    field.mount();
    assert_eq!(field.render_with(|_, resources| resources.len()), Some(7));

    field.unmount();
    assert!(field.render_with(|_, resources| resources.len()).is_none());
}

// ============================================================================
// Scene construction
// ============================================================================

#[test]
fn test_mounted_scene_matches_params() {
    let (mut field, _) = mock_field(11);
    field.mount();

    let scene = field.scene().unwrap();
    assert_eq!(scene.particles.len(), 150);
    assert_eq!(scene.glow.len(), 5);
    assert_eq!(scene.grid.segment_count(), 2 * 13);
}

#[test]
fn test_same_seed_same_scene() {
    let (mut a, _) = mock_field(42);
    let (mut b, _) = mock_field(42);
    a.mount();
    b.mount();

    let (a, b) = (a.scene().unwrap(), b.scene().unwrap());
    assert_eq!(a.particles.attributes(), b.particles.attributes());
    assert_eq!(a.glow, b.glow);
}

#[test]
fn test_different_seeds_same_counts() {
    let (mut a, _) = mock_field(1);
    let (mut b, _) = mock_field(2);
    let mut c = GridField::new(
        MockBackend::default(),
        tech_grid::FieldSettings {
            seed: None,
            ..settings(0)
        },
    );
    a.mount();
    b.mount();
    c.mount();

    let scenes = [a.scene().unwrap(), b.scene().unwrap(), c.scene().unwrap()];
    for scene in &scenes[1..] {
        assert_eq!(scene.grid.vertex_count(), scenes[0].grid.vertex_count());
        assert_eq!(scene.particles.len(), scenes[0].particles.len());
        assert_eq!(scene.glow.len(), scenes[0].glow.len());
    }
    assert_ne!(scenes[0].particles.attributes(), scenes[1].particles.attributes());
}
