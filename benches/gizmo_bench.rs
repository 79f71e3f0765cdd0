use std::f32::consts::TAU;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{Vec2, Vec3};
use vantage::camera::Camera;
use vantage::gizmo::{GizmoAxis, GizmoNavigator, GizmoState};
use vantage::options::GizmoOptions;
use vantage::render::{region_for, ScreenRect};

fn camera() -> Camera {
    let mut camera = Camera::new(60.0, 1.5, 0.1, 100.0);
    camera.position = Vec3::new(3.0, 4.0, 10.0);
    camera.look_at(Vec3::ZERO);
    camera
}

fn swing_benchmark(c: &mut Criterion) {
    let start = camera();
    c.bench_function("gizmo_full_swing", |b| {
        b.iter(|| {
            let mut camera = start.clone();
            let mut state = GizmoState::begin(GizmoAxis::NegX, &camera, Vec3::ZERO);
            while state.is_animating() {
                let (next, transform) = state.update(1.0 / 60.0, TAU, camera.orientation);
                if let Some(transform) = transform {
                    transform.apply(&mut camera);
                }
                state = next;
            }
            black_box(camera.position)
        })
    });
}

fn pick_benchmark(c: &mut Criterion) {
    let mut navigator = GizmoNavigator::new(&GizmoOptions::default());
    let camera = camera();
    c.bench_function("gizmo_pick", |b| {
        b.iter(|| black_box(navigator.pick(black_box(Vec2::new(96.0, 64.0)), &camera)))
    });
}

fn region_benchmark(c: &mut Criterion) {
    let surface = ScreenRect::new(0.0, 0.0, 1920.0, 1080.0);
    let elements = [
        ScreenRect::new(0.0, 0.0, 960.0, 540.0),
        ScreenRect::new(1792.0, 952.0, 128.0, 128.0),
        ScreenRect::new(-50.0, 1000.0, 400.0, 400.0),
    ];
    c.bench_function("region_for", |b| {
        b.iter(|| {
            for element in &elements {
                black_box(region_for(black_box(*element), surface));
            }
        })
    });
}

criterion_group!(benches, swing_benchmark, pick_benchmark, region_benchmark);
criterion_main!(benches);
