/*
 * Renderer Module
 *
 * This module draws the scene with nannou's 2D Draw API by projecting every
 * triangle through the flock camera. Faces are flat shaded against a single
 * point light and drawn back to front, so no depth buffer is needed.
 *
 * Scene contents:
 * - A checkered ground plane clipped at the near plane
 * - The tower cone at the origin and the spherical obstacles
 * - One bird model per visible boid with beating wings and a red beak
 * - Flat shadows of every boid squashed onto the ground
 * - Optional exponential fog blending distant faces into the sky
 */

use nannou::prelude::*;
use std::f32::consts::TAU;

use crate::app::Model;
use crate::boid::Boid;
use crate::culling::{self, Projection};
use crate::flock::Obstacle;
use crate::math::{self, VectorExt};

const SKY: [f32; 3] = [0.5, 0.7, 1.0];
const GROUND: [f32; 3] = [0.3, 0.6, 0.3];
const TOWER: [f32; 3] = [0.6, 0.4, 0.2];
const OBSTACLE: [f32; 3] = [0.8, 0.2, 0.2];
const BEAK: [f32; 3] = [0.8, 0.1, 0.1];

const FOG_DENSITY: f32 = 0.015;
const AMBIENT: f32 = 0.35;
const DIFFUSE: f32 = 0.65;

const GROUND_EXTENT: f32 = 500.0;
const GROUND_CELL: f32 = 50.0;
const SHADOW_HEIGHT: f32 = 0.1;
const SHADOW_ALPHA: f32 = 0.5;

const MODEL_SCALE: f32 = 0.5;
const TOWER_RADIUS: f32 = 3.0;
const TOWER_HEIGHT: f32 = 20.0;
const TOWER_SEGMENTS: usize = 20;

fn light_position() -> Vec3 {
    vec3(10.0, 100.0, 50.0)
}

// A projected, shaded primitive waiting to be painted
enum Shape {
    Triangle([Vec2; 3]),
    Disc { center: Vec2, radius: f32 },
}

struct Item {
    depth: f32,
    shape: Shape,
    color: [f32; 4],
}

// Draw the scene
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();
    let flock = &model.flock;
    let projection = Projection::new(flock.camera(), window_rect);
    let fog = flock.fog_enabled();

    draw.background().color(rgb(SKY[0], SKY[1], SKY[2]));

    draw_ground(&draw, &projection, fog);

    // Shadows lie flat on the ground, under everything else
    for boid in flock.boids() {
        draw_shadow(&draw, &projection, boid);
    }

    let mut items = Vec::new();
    push_tower(&mut items, &projection, fog);
    for obstacle in flock.obstacles() {
        push_obstacle(&mut items, &projection, obstacle, fog);
    }

    let visible = culling::visible_boids(flock, &projection);
    model.debug_info.record_visibility(visible.len(), flock.len());
    for boid in visible.into_iter().filter_map(|id| flock.get(id)) {
        push_bird(&mut items, &projection, boid, fog);
    }

    // Painter's algorithm: farthest first
    items.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    for item in &items {
        paint(&draw, item);
    }

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}

fn paint(draw: &Draw, item: &Item) {
    let [r, g, b, a] = item.color;
    match item.shape {
        Shape::Triangle([p0, p1, p2]) => {
            draw.tri().points(p0, p1, p2).color(rgba(r, g, b, a));
        }
        Shape::Disc { center, radius } => {
            draw.ellipse().xy(center).radius(radius).color(rgba(r, g, b, a));
        }
    }
}

fn draw_ground(draw: &Draw, projection: &Projection, fog: bool) {
    let cells = (2.0 * GROUND_EXTENT / GROUND_CELL) as i32;
    for i in 0..cells {
        for j in 0..cells {
            let x0 = -GROUND_EXTENT + i as f32 * GROUND_CELL;
            let z0 = -GROUND_EXTENT + j as f32 * GROUND_CELL;
            let corners = [
                vec3(x0, 0.0, z0),
                vec3(x0, 0.0, z0 + GROUND_CELL),
                vec3(x0 + GROUND_CELL, 0.0, z0 + GROUND_CELL),
                vec3(x0 + GROUND_CELL, 0.0, z0),
            ];

            let clipped = projection.clip_to_near(&corners);
            if clipped.len() < 3 {
                continue;
            }
            let points: Vec<Vec2> = clipped.iter().filter_map(|&p| projection.project(p)).collect();
            if points.len() < 3 {
                continue;
            }

            // Alternate shades so the ground shows motion
            let shade = if (i + j) % 2 == 0 { 1.0 } else { 0.9 };
            let base = [GROUND[0] * shade, GROUND[1] * shade, GROUND[2] * shade];
            let center = vec3(x0 + GROUND_CELL * 0.5, 0.0, z0 + GROUND_CELL * 0.5);
            let [r, g, b] = apply_fog(base, projection.depth(center), fog);

            draw.polygon().points(points).color(rgb(r, g, b));
        }
    }
}

fn push_tower(items: &mut Vec<Item>, projection: &Projection, fog: bool) {
    let apex = vec3(0.0, TOWER_HEIGHT, 0.0);
    for k in 0..TOWER_SEGMENTS {
        let a0 = k as f32 / TOWER_SEGMENTS as f32 * TAU;
        let a1 = (k + 1) as f32 / TOWER_SEGMENTS as f32 * TAU;
        let p0 = vec3(a0.cos() * TOWER_RADIUS, 0.0, a0.sin() * TOWER_RADIUS);
        let p1 = vec3(a1.cos() * TOWER_RADIUS, 0.0, a1.sin() * TOWER_RADIUS);
        push_face(items, projection, [p0, apex, p1], TOWER, fog);
    }
}

fn push_obstacle(items: &mut Vec<Item>, projection: &Projection, obstacle: &Obstacle, fog: bool) {
    if !projection.is_visible(obstacle.center, obstacle.radius) {
        return;
    }
    let Some(center) = projection.project(obstacle.center) else {
        return;
    };

    let depth = projection.depth(obstacle.center);
    let toward_light = (light_position() - obstacle.center).safe_normalize_or(Vec3::Y);
    let toward_eye = (projection.eye() - obstacle.center).safe_normalize_or(Vec3::Y);
    let lit = shade(OBSTACLE, toward_light.dot(toward_eye).max(0.0));
    let [r, g, b] = apply_fog(lit, depth, fog);

    items.push(Item {
        depth,
        shape: Shape::Disc {
            center,
            radius: projection.projected_size(obstacle.radius, depth),
        },
        color: [r, g, b, 1.0],
    });
}

// Model-space triangles of the bird with colors, wing tips raised by `wing`
fn bird_triangles(wing: f32, body: [f32; 3]) -> [([Vec3; 3], [f32; 3]); 14] {
    let s = MODEL_SCALE;
    let tip = vec3(0.0, 0.0, 2.5 * s);
    let beak_base = vec3(0.0, 0.3 * s, 1.5 * s);
    let neck = vec3(0.0, 0.5 * s, 0.5 * s);
    let tail = vec3(0.0, 0.2 * s, -1.5 * s);
    let belly = vec3(0.0, -0.3 * s, 0.0);
    let side_r = vec3(0.4 * s, 0.0, 0.5 * s);
    let side_l = vec3(-0.4 * s, 0.0, 0.5 * s);
    let wing_r = vec3(2.5 * s, 0.2 * s + wing, -0.5 * s);
    let wing_l = vec3(-2.5 * s, 0.2 * s + wing, -0.5 * s);

    [
        ([tip, side_r, beak_base], BEAK),
        ([tip, beak_base, side_l], BEAK),
        ([tip, belly, side_r], BEAK),
        ([tip, side_l, belly], BEAK),
        ([neck, side_r, tail], body),
        ([neck, tail, side_l], body),
        ([beak_base, neck, side_r], body),
        ([beak_base, side_l, neck], body),
        ([belly, tail, side_r], body),
        ([belly, side_l, tail], body),
        ([side_r, wing_r, neck], body),
        ([side_r, belly, wing_r], body),
        ([side_l, neck, wing_l], body),
        ([side_l, wing_l, belly], body),
    ]
}

fn body_color(boid: &Boid) -> [f32; 3] {
    [
        boid.color.red as f32 / 255.0,
        boid.color.green as f32 / 255.0,
        boid.color.blue as f32 / 255.0,
    ]
}

fn to_world(boid: &Boid, v: Vec3) -> Vec3 {
    boid.position + math::rotate_model(v, boid.yaw, boid.pitch, boid.roll)
}

fn push_bird(items: &mut Vec<Item>, projection: &Projection, boid: &Boid, fog: bool) {
    for (triangle, color) in bird_triangles(boid.wing_offset(), body_color(boid)) {
        let world = triangle.map(|v| to_world(boid, v));
        push_face(items, projection, world, color, fog);
    }
}

fn draw_shadow(draw: &Draw, projection: &Projection, boid: &Boid) {
    for (triangle, _) in bird_triangles(boid.wing_offset(), body_color(boid)) {
        let flat = triangle.map(|v| {
            let world = to_world(boid, v);
            vec3(world.x, SHADOW_HEIGHT, world.z)
        });
        if let [Some(p0), Some(p1), Some(p2)] = flat.map(|p| projection.project(p)) {
            draw.tri().points(p0, p1, p2).color(rgba(0.0, 0.0, 0.0, SHADOW_ALPHA));
        }
    }
}

// Shade a world-space triangle and queue it; faces crossing the near plane are skipped
fn push_face(items: &mut Vec<Item>, projection: &Projection, world: [Vec3; 3], color: [f32; 3], fog: bool) {
    let [Some(p0), Some(p1), Some(p2)] = world.map(|p| projection.project(p)) else {
        return;
    };

    let centroid = (world[0] + world[1] + world[2]) / 3.0;
    let normal = math::triangle_normal(world[0], world[1], world[2]);
    let toward_light = (light_position() - centroid).safe_normalize_or(Vec3::Y);
    // Two sided lighting
    let lit = shade(color, normal.dot(toward_light).abs());

    let depth = projection.depth(centroid);
    let [r, g, b] = apply_fog(lit, depth, fog);
    items.push(Item {
        depth,
        shape: Shape::Triangle([p0, p1, p2]),
        color: [r, g, b, 1.0],
    });
}

fn shade(color: [f32; 3], intensity: f32) -> [f32; 3] {
    let k = AMBIENT + DIFFUSE * intensity.clamp(0.0, 1.0);
    color.map(|c| (c * k).min(1.0))
}

// Exponential squared fog toward the sky color
fn apply_fog(color: [f32; 3], depth: f32, enabled: bool) -> [f32; 3] {
    if !enabled {
        return color;
    }
    let visibility = fog_visibility(depth);
    [
        SKY[0] + (color[0] - SKY[0]) * visibility,
        SKY[1] + (color[1] - SKY[1]) * visibility,
        SKY[2] + (color[2] - SKY[2]) * visibility,
    ]
}

fn fog_visibility(depth: f32) -> f32 {
    let d = FOG_DENSITY * depth.max(0.0);
    (-(d * d)).exp()
}
