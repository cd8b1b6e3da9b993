//! Property-based tests for pipeline invariants using the `proptest` crate.

use proptest::prelude::*;

use glint_math::{Dir3, Point3, Tolerance, Vec3};
use glint_mesh::{extract_patches, uv_sphere, SurfaceMesh, NORMAL_EPSILON};
use glint_visibility::{
    cull_fov, filter_camera_occluded, filter_sun_occluded, CameraConfig, CoverageAccumulator,
    Scene, ShadowParams, SunConfig, SunOcclusionMode, VisibilityMask,
};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_coord() -> impl Strategy<Value = f64> {
    -100.0f64..100.0
}

fn arb_point() -> impl Strategy<Value = Point3> {
    (arb_coord(), arb_coord(), arb_coord()).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

/// Camera on a sphere of radius 5..20 around the origin, away from the poles.
fn arb_camera_position() -> impl Strategy<Value = [f64; 3]> {
    (5.0f64..20.0, 0.0f64..360.0, -60.0f64..60.0).prop_map(|(r, az, el)| {
        let (a, e) = (az.to_radians(), el.to_radians());
        [r * e.cos() * a.cos(), r * e.cos() * a.sin(), r * e.sin()]
    })
}

fn arb_sun() -> impl Strategy<Value = [f64; 3]> {
    (0.0f64..360.0, -80.0f64..80.0).prop_map(|(az, el)| {
        let (a, e) = (az.to_radians(), el.to_radians());
        [e.cos() * a.cos(), e.cos() * a.sin(), e.sin()]
    })
}

/// Face count of [`two_body_scene`].
const TWO_BODY_FACES: usize = 2 * 12 * 7 + 2 * 8 * 5;

/// Two spheres, one partly behind the other, so occlusion is non-trivial.
fn two_body_scene() -> Scene {
    let a = uv_sphere(1.0, 8, 12).unwrap();
    let b = uv_sphere(0.5, 6, 8).unwrap();
    let mut vertices = a.vertices().to_vec();
    let mut faces = a.faces().to_vec();
    let base = vertices.len() as u32;
    vertices.extend(b.vertices().iter().map(|p| Point3::new(p.x + 1.8, p.y, p.z)));
    faces.extend(b.faces().iter().map(|f| [f[0] + base, f[1] + base, f[2] + base]));
    Scene::new(SurfaceMesh::new(vertices, faces).unwrap())
}

fn camera(position: [f64; 3], max_viewing_angle_deg: f64) -> CameraConfig {
    CameraConfig {
        position,
        target: None,
        fov_x_deg: 40.0,
        fov_y_deg: 40.0,
        max_viewing_angle_deg,
    }
}

// ---------------------------------------------------------------------------
// 1. Patch normals are unit length unless the face is degenerate
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn patch_normals_are_unit(a in arb_point(), b in arb_point(), c in arb_point()) {
        let patches = extract_patches(&[[a, b, c]]);
        let n = patches.normals[0];
        let cross = (b - a).cross(&(c - a)).norm();
        prop_assert!(n.norm() <= 1.0 + 1e-9);
        if cross > NORMAL_EPSILON {
            prop_assert!((n.norm() - 1.0).abs() < 1e-9, "|n| = {}", n.norm());
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Widening the viewing angle never removes a patch
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fov_cull_monotonic_in_viewing_angle(
        pos in arb_camera_position(),
        narrow in 0.0f64..90.0,
        extra in 0.0f64..90.0,
    ) {
        let scene = two_body_scene();
        let tight = cull_fov(scene.patches(), &camera(pos, narrow)).unwrap();
        let loose = cull_fov(scene.patches(), &camera(pos, narrow + extra)).unwrap();
        prop_assert!(tight.is_subset_of(&loose));
    }
}

// ---------------------------------------------------------------------------
// 3. Occlusion testers only ever remove candidates
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn camera_occlusion_is_subset(
        pos in arb_camera_position(),
        flags in prop::collection::vec(any::<bool>(), TWO_BODY_FACES),
    ) {
        let scene = two_body_scene();
        assert_eq!(scene.patches().len(), TWO_BODY_FACES);
        let candidates = VisibilityMask::from(flags);
        let out = filter_camera_occluded(
            scene.bvh(),
            &scene.patches().positions,
            &Point3::from(pos),
            &candidates,
            &Tolerance::DEFAULT,
        )
        .unwrap();
        prop_assert!(out.is_subset_of(&candidates));
    }

    #[test]
    fn sun_occlusion_is_subset(
        sun in arb_sun(),
        flags in prop::collection::vec(any::<bool>(), TWO_BODY_FACES),
        near_surface in any::<bool>(),
    ) {
        let scene = two_body_scene();
        assert_eq!(scene.patches().len(), TWO_BODY_FACES);
        let candidates = VisibilityMask::from(flags);
        let params = ShadowParams {
            mode: if near_surface {
                SunOcclusionMode::NearSurface
            } else {
                SunOcclusionMode::AnyBlocker
            },
            surface_offset: 1e-2,
            tolerance: Tolerance::DEFAULT,
        };
        let out = filter_sun_occluded(
            scene.bvh(),
            &scene.patches().positions,
            &candidates,
            &Dir3::new_normalize(Vec3::from(sun)),
            &params,
        )
        .unwrap();
        prop_assert!(out.is_subset_of(&candidates));
    }
}

// ---------------------------------------------------------------------------
// 4. Pipeline runs are deterministic and the final mask narrows each stage
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn pipeline_is_idempotent(pos in arb_camera_position(), sun in arb_sun()) {
        let scene = two_body_scene();
        let camera = camera(pos, 70.0);
        let sun = SunConfig { direction: sun, ..Default::default() };

        let first = scene.analyze(&camera, &sun).unwrap();
        let second = scene.analyze(&camera, &sun).unwrap();
        prop_assert_eq!(&first, &second);

        let stats = &first.stats;
        prop_assert!(stats.camera_unoccluded <= stats.geometric_visible);
        prop_assert!(stats.final_visible <= stats.sun_illuminated.min(stats.reflection_ok));
        prop_assert!(stats.final_visible <= stats.sun_unoccluded);
        prop_assert_eq!(stats.final_visible, first.mask.count());
        prop_assert!(stats.visible_area <= stats.total_area + 1e-12);
    }
}

// ---------------------------------------------------------------------------
// 5. Coverage grows with the sweep and stays in [0, 1]
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn coverage_monotonic_and_bounded(
        positions in prop::collection::vec(arb_camera_position(), 1..6),
        sun in arb_sun(),
    ) {
        let scene = two_body_scene();
        let sun = SunConfig {
            direction: sun,
            min_reflection_angle_deg: 180.0,
            ..Default::default()
        };
        let cameras: Vec<_> = positions.iter().map(|&p| camera(p, 80.0)).collect();
        let outcome = scene.sweep(&cameras, &sun).unwrap();

        let mut acc = CoverageAccumulator::new(scene.patches().len());
        let mut previous = (0usize, 0.0f64);
        for run in &outcome.runs {
            acc.add(&run.mask).unwrap();
            let cov = acc.finalize(scene.mesh());
            prop_assert!(cov.visible_patches >= previous.0);
            prop_assert!(cov.visible_area >= previous.1);
            prop_assert!((0.0..=1.0).contains(&cov.count_fraction));
            prop_assert!((0.0..=1.0).contains(&cov.area_fraction));
            previous = (cov.visible_patches, cov.visible_area);
        }
        prop_assert_eq!(acc.union(), &outcome.coverage.mask);
    }
}
