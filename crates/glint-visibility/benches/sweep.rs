//! Benchmarks for the visibility pipeline and orbit sweep.
//!
//! Run with: cargo bench -p glint-visibility

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glint_mesh::uv_sphere;
use glint_visibility::{CameraConfig, Scene, SunConfig, SweepSettings};

fn base_camera() -> CameraConfig {
    CameraConfig {
        fov_x_deg: 10.0,
        fov_y_deg: 10.0,
        ..Default::default()
    }
}

fn bench_single_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_run");
    for &(n_lat, n_lon) in &[(16, 32), (64, 128), (128, 256)] {
        let scene = Scene::new(uv_sphere(50.0, n_lat, n_lon).unwrap());
        let faces = scene.mesh().num_faces();
        let camera = CameraConfig {
            position: [600.0, 0.0, 0.0],
            ..base_camera()
        };
        let sun = SunConfig::from_azimuth(30.0);

        group.throughput(Throughput::Elements(faces as u64));
        group.bench_with_input(BenchmarkId::from_parameter(faces), &scene, |b, scene| {
            b.iter(|| scene.analyze(black_box(&camera), black_box(&sun)))
        });
    }
    group.finish();
}

fn bench_orbit_sweep(c: &mut Criterion) {
    let scene = Scene::new(uv_sphere(50.0, 64, 128).unwrap());
    let cameras = SweepSettings::default().cameras(&base_camera());
    let sun = SunConfig::from_azimuth(0.0);

    c.bench_function("orbit_sweep_37", |b| {
        b.iter(|| scene.sweep(black_box(&cameras), black_box(&sun)))
    });
}

fn bench_bvh_build(c: &mut Criterion) {
    let mesh = uv_sphere(50.0, 128, 256).unwrap();
    c.bench_function("scene_build_65k", |b| {
        b.iter(|| Scene::new(black_box(mesh.clone())))
    });
}

criterion_group!(benches, bench_single_run, bench_orbit_sweep, bench_bvh_build);
criterion_main!(benches);
