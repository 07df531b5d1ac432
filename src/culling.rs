/*
 * Culling Module
 *
 * This module maps the 3D scene onto the window and decides which boids are
 * worth drawing. The projection is a look-at perspective built from the
 * flock camera's eye and look-at point; boids behind the near plane, past
 * the far plane or outside the window are culled.
 *
 * Screen coordinates follow nannou: origin at the window centre, y up.
 */

use nannou::prelude::*;

use crate::camera::FlockCamera;
use crate::flock::{BoidId, Flock};
use crate::math::VectorExt;
use crate::BOID_RADIUS;

pub const FIELD_OF_VIEW: f32 = 60.0;
pub const NEAR_PLANE: f32 = 1.0;
pub const FAR_PLANE: f32 = 500.0;

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    eye: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    focal: f32,
    half_extent: Vec2,
}

impl Projection {
    pub fn new(camera: &FlockCamera, window_rect: Rect) -> Self {
        Self::look_at(camera.eye, camera.at, window_rect.wh())
    }

    pub fn look_at(eye: Vec3, at: Vec3, viewport: Vec2) -> Self {
        let forward = (at - eye).safe_normalize_or(-Vec3::Z);
        // Looking straight up or down has no horizontal right vector
        let right = forward.cross(Vec3::Y).safe_normalize_or(Vec3::X);
        let up = right.cross(forward);
        let half_extent = viewport * 0.5;
        let focal = half_extent.y / (FIELD_OF_VIEW.to_radians() * 0.5).tan();

        Self {
            eye,
            forward,
            right,
            up,
            focal,
            half_extent,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Distance along the view direction.
    pub fn depth(&self, point: Vec3) -> f32 {
        (point - self.eye).dot(self.forward)
    }

    /// Screen position of a point in front of the near plane.
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let relative = point - self.eye;
        let depth = relative.dot(self.forward);
        if depth < NEAR_PLANE {
            return None;
        }
        let scale = self.focal / depth;
        Some(vec2(relative.dot(self.right) * scale, relative.dot(self.up) * scale))
    }

    /// Size on screen of a world-space length seen at `depth`.
    pub fn projected_size(&self, size: f32, depth: f32) -> f32 {
        size * self.focal / depth.max(NEAR_PLANE)
    }

    /// True when a sphere overlaps the view volume.
    pub fn is_visible(&self, center: Vec3, radius: f32) -> bool {
        let depth = self.depth(center);
        if depth + radius < NEAR_PLANE || depth - radius > FAR_PLANE {
            return false;
        }

        let relative = center - self.eye;
        let depth = depth.max(NEAR_PLANE);
        let scale = self.focal / depth;
        let screen = vec2(relative.dot(self.right), relative.dot(self.up)) * scale;
        let margin = radius * scale;

        screen.x.abs() <= self.half_extent.x + margin && screen.y.abs() <= self.half_extent.y + margin
    }

    /// Cut a convex polygon at the near plane, keeping the visible part.
    pub fn clip_to_near(&self, polygon: &[Vec3]) -> Vec<Vec3> {
        let mut clipped = Vec::with_capacity(polygon.len() + 1);
        for (i, &current) in polygon.iter().enumerate() {
            let next = polygon[(i + 1) % polygon.len()];
            let current_depth = self.depth(current);
            let next_depth = self.depth(next);

            if current_depth >= NEAR_PLANE {
                clipped.push(current);
            }
            // Edge crosses the plane, keep the crossing point
            if (current_depth >= NEAR_PLANE) != (next_depth >= NEAR_PLANE) {
                let t = (NEAR_PLANE - current_depth) / (next_depth - current_depth);
                clipped.push(current + (next - current) * t);
            }
        }
        clipped
    }
}

// Boids whose bounding sphere overlaps the view, in draw order
pub fn visible_boids(flock: &Flock, projection: &Projection) -> Vec<BoidId> {
    flock
        .iter()
        .filter(|(_, boid)| projection.is_visible(boid.position, BOID_RADIUS))
        .map(|(id, _)| id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boid::Boid;
    use crate::params::SimulationParams;
    use approx::assert_relative_eq;

    fn projection() -> Projection {
        Projection::look_at(vec3(0.0, 0.0, 10.0), Vec3::ZERO, vec2(800.0, 600.0))
    }

    #[test]
    fn look_at_point_lands_in_the_centre() {
        let screen = projection().project(Vec3::ZERO).unwrap();
        assert_eq!(screen, Vec2::ZERO);
    }

    #[test]
    fn axes_map_to_screen_directions() {
        let p = projection();
        let right = p.project(vec3(1.0, 0.0, 0.0)).unwrap();
        let up = p.project(vec3(0.0, 1.0, 0.0)).unwrap();
        assert!(right.x > 0.0);
        assert_relative_eq!(right.y, 0.0, epsilon = 1e-4);
        assert!(up.y > 0.0);
        assert_relative_eq!(up.x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let p = projection();
        assert!(p.project(vec3(0.0, 0.0, 20.0)).is_none());
        assert!(!p.is_visible(vec3(0.0, 0.0, 20.0), 1.0));
        assert!(!p.is_visible(vec3(0.0, 0.0, -600.0), 1.0));
        assert!(!p.is_visible(vec3(500.0, 0.0, 0.0), 1.0));
        assert!(p.is_visible(vec3(2.0, 1.0, 0.0), 1.0));
    }

    #[test]
    fn near_clipping_keeps_the_front_part() {
        let p = projection();
        // A ground quad running from behind the camera to in front of it
        let quad = [
            vec3(-1.0, -1.0, 20.0),
            vec3(1.0, -1.0, 20.0),
            vec3(1.0, -1.0, 0.0),
            vec3(-1.0, -1.0, 0.0),
        ];
        let clipped = p.clip_to_near(&quad);
        assert_eq!(clipped.len(), 4);
        for point in clipped {
            assert!(p.depth(point) >= NEAR_PLANE - 1e-4);
        }

        let behind = [vec3(0.0, 0.0, 30.0), vec3(1.0, 0.0, 30.0), vec3(0.0, 1.0, 30.0)];
        assert!(p.clip_to_near(&behind).is_empty());
    }

    #[test]
    fn only_boids_in_view_are_listed() {
        let mut flock = Flock::with_seed(SimulationParams::default(), 3);
        let seen = flock.add_boid(Boid::new(Vec3::ZERO));
        flock.add_boid(Boid::new(vec3(0.0, 0.0, 50.0)));

        assert_eq!(visible_boids(&flock, &projection()), vec![seen]);
    }
}
