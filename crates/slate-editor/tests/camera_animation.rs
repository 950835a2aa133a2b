//! Integration tests: camera flights driven by animation frames.

use pretty_assertions::assert_eq;
use slate_core::{NodeKind, Point, Size, Vec2, ViewTransform};
use slate_editor::animation::CameraAnimator;
use slate_editor::input::{InputEvent, Modifiers};
use slate_editor::workspace::Workspace;
use slate_render::surface::MemorySurface;
use slate_render::target::PointerTarget;
use std::cell::Cell;
use std::rc::Rc;

fn workspace() -> (Workspace, MemorySurface) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ws = Workspace::default();
    ws.resize(Size::new(800.0, 600.0));
    (ws, MemorySurface::new())
}

/// A workspace whose flight clock the test moves by hand.
fn clocked_workspace() -> (Workspace, MemorySurface, Rc<Cell<f64>>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let now = Rc::new(Cell::new(0.0));
    let source = now.clone();
    let mut ws = Workspace::default().with_clock(move || source.get());
    ws.resize(Size::new(800.0, 600.0));
    (ws, MemorySurface::new(), now)
}

#[test]
fn flight_samples_between_endpoints_then_lands_exactly() {
    let (mut ws, mut surface, now) = clocked_workspace();
    now.set(5_000.0);
    ws.animate_to(2.0, Vec2::new(-50.0, -50.0), Some(100.0));

    // The first frame arrives one refresh after the call and already moves.
    assert!(ws.tick(5_016.0, &mut surface));
    assert!(ws.store().scale() > 1.0);

    ws.tick(5_050.0, &mut surface);
    let mid = ws.store().scale();
    assert!(mid > 1.0 && mid < 2.0, "mid-flight scale {mid}");
    assert_eq!(surface.transform, ws.store().transform_css());

    ws.tick(5_100.0, &mut surface);
    assert_eq!(
        ws.store().view(),
        ViewTransform::new(Vec2::new(-50.0, -50.0), 2.0)
    );
    assert!(!ws.is_animating());
    assert!(ws.take_persist_request());
}

#[test]
fn each_frame_notifies_subscribers_once() {
    let (mut ws, mut surface) = workspace();
    let calls = Rc::new(Cell::new(0));
    let seen = calls.clone();
    ws.store_mut().subscribe(
        &[slate_core::Topic::Pan, slate_core::Topic::Scale],
        move |_, _| seen.set(seen.get() + 1),
    );

    ws.animate_to(3.0, Vec2::new(10.0, 10.0), Some(100.0));
    ws.tick(0.0, &mut surface);
    assert_eq!(calls.get(), 0);
    ws.tick(40.0, &mut surface);
    assert_eq!(calls.get(), 1);
    ws.tick(100.0, &mut surface);
    assert_eq!(calls.get(), 2);
}

#[test]
fn wheel_cancels_flight_and_keeps_intermediate_view() {
    let (mut ws, mut surface) = workspace();
    ws.animate_to(4.0, Vec2::ZERO, Some(100.0));
    ws.tick(0.0, &mut surface);
    ws.tick(30.0, &mut surface);
    let frozen_scale = ws.store().scale();

    ws.handle(
        InputEvent::Wheel {
            x: 0.0,
            y: 0.0,
            dx: 0.0,
            dy: 10.0,
            modifiers: Modifiers::NONE,
            target: PointerTarget::Background,
        },
        &mut surface,
    );
    assert!(!ws.is_animating());
    assert!(!ws.tick(200.0, &mut surface));
    assert_eq!(ws.store().scale(), frozen_scale);
    assert_eq!(ws.store().pan().y, -10.0);
}

#[test]
fn touch_cancels_flight() {
    let (mut ws, mut surface) = workspace();
    ws.animate_to(0.5, Vec2::ZERO, Some(100.0));
    ws.handle(
        InputEvent::TouchStart {
            touches: [Point::new(1.0, 1.0)].into_iter().collect(),
            target: PointerTarget::Background,
        },
        &mut surface,
    );
    assert!(!ws.is_animating());
}

#[test]
fn keyboard_zoom_steps_animate() {
    let (mut ws, mut surface, now) = clocked_workspace();
    ws.handle(InputEvent::key("=", Modifiers::CTRL), &mut surface);
    assert!(ws.is_animating());
    ws.tick(1000.0, &mut surface);
    assert!((ws.store().scale() - 1.2).abs() < 1e-12);

    now.set(2000.0);
    ws.handle(InputEvent::key("0", Modifiers::CTRL), &mut surface);
    assert!(ws.tick(2016.0, &mut surface));
    ws.tick(3000.0, &mut surface);
    assert_eq!(ws.store().view(), ViewTransform::IDENTITY);
}

#[test]
fn zoom_to_fit_frames_all_nodes() {
    let (mut ws, mut surface) = workspace();
    let a = ws.create_node(NodeKind::Image, Point::new(0.0, 0.0));
    let b = ws.create_node(NodeKind::Image, Point::new(1000.0, 0.0));
    surface.set_rendered_size(a, Size::new(300.0, 200.0));
    surface.set_rendered_size(b, Size::new(300.0, 200.0));

    ws.handle(InputEvent::key("!", Modifiers::SHIFT), &mut surface);
    ws.tick(0.0, &mut surface);
    ws.tick(1000.0, &mut surface);

    let view = ws.store().view();
    let left = view.world_to_screen(Point::new(0.0, 0.0));
    let right = view.world_to_screen(Point::new(1300.0, 200.0));
    assert!(left.x >= 40.0 - 1e-9 && right.x <= 760.0 + 1e-9);
    assert!(view.scale < 1.0);
}

#[test]
fn without_easing_views_apply_instantly() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ws = Workspace::default().with_animator(CameraAnimator::without_easing());
    ws.animate_to(2.0, Vec2::new(5.0, 5.0), None);
    assert!(!ws.is_animating());
    assert_eq!(ws.store().scale(), 2.0);
    assert!(ws.take_persist_request());
}
