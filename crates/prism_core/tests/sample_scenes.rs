//! The scenes shipped in the repository must keep loading.

use std::path::PathBuf;

use prism_core::{load_scene, Shape};

fn scene_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../scenes")
        .join(name)
}

#[test]
fn spheres_scene_loads() {
    let scene = load_scene(scene_path("spheres.json")).unwrap();

    assert_eq!(scene.name, "spheres");
    assert_eq!(scene.fov, 60.0);
    assert_eq!(scene.planes().len(), 1);
    assert_eq!(scene.bounded().len(), 4);
    assert_eq!(scene.lighting.points.len(), 1);
    assert_eq!(scene.lighting.directionals.len(), 1);
}

#[test]
fn csg_scene_loads() {
    let scene = load_scene(scene_path("csg.json")).unwrap();

    let labels: Vec<&str> = scene.bounded().iter().map(|&id| scene.shape(id).label()).collect();
    assert_eq!(
        labels,
        ["intersection", "union", "difference", "triangle", "triangle"]
    );
    assert!(scene
        .shapes()
        .iter()
        .any(|shape| matches!(shape, Shape::Composite(_))));

    // 2 x 2 units at 0.1 spacing
    assert_eq!(scene.lighting.points.len(), 21 * 21);
    assert_eq!(scene.lighting.spots.len(), 1);
}
