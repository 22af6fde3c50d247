//! End-to-end: JSON scene through the loader, the tracer and the renderer.

use prism_core::load_scene_from_str;
use prism_renderer::{
    closest_hit, generate_buckets, render, render_bucket, render_pixel, Color, ImageBuffer, Ray,
    RenderConfig, Vec3, World,
};

const SCENE: &str = r#"{
    "camera": { "field": 50, "background": [0.05, 0.05, 0.2] },
    "lights": [
        { "type": "ambient", "color": [0.1, 0.1, 0.1] },
        { "type": "point", "color": [0.8, 0.8, 0.8], "position": [2, 4, 0] },
        { "type": "area", "color": [0.5, 0.5, 0.5], "start": [-0.5, 3, -4], "end": [0.5, 3, -5] },
        { "type": "spot", "color": [0.4, 0.4, 0.4], "position": [0, 3, -3],
          "direction": [0, -1, -1], "cutoff": 30 }
    ],
    "objects": [
        { "type": "plane", "position": [0, -1, 0], "normal": [0, 1, 0],
          "material": { "diffuse": [0.6, 0.6, 0.6], "reflective": [0.2, 0.2, 0.2] } },
        { "type": "sphere", "position": [-1.2, 0, -5], "radius": 0.8,
          "material": { "diffuse": [0.9, 0.2, 0.2], "specular": [0.5, 0.5, 0.5],
                        "shininess": 30, "roughness": 0.3 } },
        { "type": "sphere", "position": [1.2, 0, -5], "radius": 0.8,
          "material": { "transmissive": [0.9, 0.9, 0.9], "refraction": 1.5 } },
        { "type": "difference", "objects": [
            { "type": "sphere", "position": [0, 1.4, -6], "radius": 0.7,
              "material": { "diffuse": [0.2, 0.8, 0.2], "reflective": [0.5, 0.5, 0.5] } },
            { "type": "sphere", "position": [0.4, 1.4, -5.6], "radius": 0.5 }
        ] },
        { "type": "mesh", "material": { "diffuse": [0.2, 0.2, 0.9] },
          "triangles": [ [[-0.5, -1, -3.5], [0.5, -1, -3.5], [0, 0, -3.5]] ],
          "transformation": { "rotation": 20, "axisOfrotation": 2,
                              "scale": [1, 1, 1], "translation": [0, 0, -0.5] } }
    ]
}"#;

fn world() -> World {
    World::new(load_scene_from_str(SCENE, "showcase").unwrap())
}

#[test]
fn parallel_render_matches_serial() {
    let world = world();
    for antialias in [false, true] {
        let config = RenderConfig {
            width: 48,
            height: 32,
            antialias,
            bucket_size: 10,
            ..Default::default()
        };
        let parallel = render(&world, &config);

        let camera = config.camera(world.scene().fov);
        let mut serial = ImageBuffer::new(config.width, config.height);
        for row in 0..config.height {
            for x in 0..config.width {
                serial.set(x, row, render_pixel(&world, &camera, x, row, &config));
            }
        }

        assert_eq!(parallel, serial, "antialias: {antialias}");
    }
}

#[test]
fn buckets_render_their_own_pixels() {
    let world = world();
    let config = RenderConfig {
        width: 20,
        height: 12,
        bucket_size: 8,
        ..Default::default()
    };
    let camera = config.camera(world.scene().fov);

    for bucket in generate_buckets(config.width, config.height, config.bucket_size) {
        let pixels = render_bucket(&bucket, &world, &camera, &config);
        assert_eq!(pixels.len(), bucket.pixel_count() as usize);
        assert_eq!(
            pixels[0],
            render_pixel(&world, &camera, bucket.x, bucket.y, &config)
        );
    }
}

#[test]
fn misses_return_background() {
    let world = world();
    let background = world.scene().background;

    // Upwards over the scene: nothing is there, and the floor is behind
    for i in 0..20 {
        let target = Vec3::new(i as f32 * 0.3 - 3.0, 5.0, -2.0);
        let ray = Ray::through(Vec3::ZERO, target);
        assert!(closest_hit(&ray, world.scene().shapes()).is_none());

        let sample = world.evaluate(Vec3::ZERO, target);
        assert!(!sample.hit);
        assert_eq!(sample.color, background);
    }
}

#[test]
fn every_pixel_is_finite() {
    let world = world();
    let config = RenderConfig {
        width: 40,
        height: 30,
        antialias: true,
        ..Default::default()
    };
    let image = render(&world, &config);

    assert!(image.pixels.iter().all(|c: &Color| c.is_finite()));
    // The floor and the spheres show up, so not everything is background
    let background = world.scene().background;
    assert!(image.pixels.iter().any(|&c| c != background));
}

#[test]
fn rays_are_counted() {
    let world = world();
    let before = world.stats().snapshot();
    world.evaluate(Vec3::ZERO, Vec3::new(-0.24, 0.0, -1.0));
    let counts = world.stats().snapshot().since(&before);

    assert_eq!(counts.primary, 1);
    assert!(counts.hit_tests >= 1);
    assert!(counts.shadow_tests >= 1);
}
