use cgmath::{MetricSpace, Vector2};

use crate::graphics::{self, Vertex};

/// Ratios of the current radius used for the concentric bullseye rings,
/// outermost first. Rings alternate red/white starting with red.
const RING_RATIOS: [f32; 5] = [1.0, 0.8, 0.6, 0.4, 0.2];

/// An animated clickable circle. It spawns at radius zero, grows until it
/// would reach its maximum radius, then shrinks back down. Reaching zero
/// while shrinking counts as a miss.
pub struct Target {
    position: Vector2<f32>,
    radius: f32,
    max_radius: f32,
    growth_rate: f32,
    growing: bool,
}

impl Target {
    pub fn new(x: f32, y: f32, max_radius: f32, growth_rate: f32) -> Self {
        Self {
            position: Vector2::new(x, y),
            radius: 0.0,
            max_radius,
            growth_rate,
            growing: true,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn position(&self) -> Vector2<f32> {
        self.position
    }

    /// Advances the animation by one tick. The phase flips to shrinking
    /// before the radius update, so the radius never grows past the point
    /// where `radius + growth_rate` meets the maximum. There is no clamping
    /// beyond the flip: the radius may end a tick slightly above the maximum
    /// or at/below zero when the shrink completes.
    pub fn update(&mut self) {
        if self.radius + self.growth_rate >= self.max_radius {
            self.growing = false;
        }

        if self.growing {
            self.radius += self.growth_rate;
        } else {
            self.radius -= self.growth_rate;
        }
    }

    /// True while the shrink phase has run the radius down to nothing.
    pub fn decayed(&self) -> bool {
        self.radius <= 0.0 && !self.growing
    }

    /// Whether the point (px, py) lands on the target. Boundary inclusive:
    /// a point exactly on the rim counts as a hit.
    pub fn collide(&self, px: f32, py: f32) -> bool {
        self.position.distance(Vector2::new(px, py)) <= self.radius
    }

    /// Tessellates the bullseye into `verts` as colored triangles.
    pub fn tessellate(&self, verts: &mut Vec<Vertex>) {
        for (i, ratio) in RING_RATIOS.iter().enumerate() {
            let color = if i % 2 == 0 {
                graphics::RED
            } else {
                graphics::WHITE
            };
            graphics::push_circle(verts, self.position, self.radius * ratio, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn grows_by_growth_rate_each_tick() {
        let mut target = Target::new(100.0, 100.0, 40.0, 0.2);
        target.update();
        assert!((target.radius() - 0.2).abs() < 1e-6);
        target.update();
        assert!((target.radius() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn phase_flips_before_radius_reaches_max() {
        let mut target = Target::new(0.0, 0.0, 1.0, 0.4);
        target.update(); // 0.4
        target.update(); // 0.8, 0.8 + 0.4 >= 1.0 next tick
        target.update(); // flips, shrinks to 0.4
        assert!(!target.growing);
        assert!((target.radius() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn phase_never_flips_back_to_growing() {
        let mut target = Target::new(0.0, 0.0, 1.0, 0.6);
        for _ in 0..10 {
            target.update();
        }
        assert!(!target.growing);
        assert!(target.decayed());
    }

    #[test]
    fn collide_is_boundary_inclusive() {
        let mut target = Target::new(100.0, 100.0, 40.0, 10.0);
        target.update(); // radius 10
        assert!(target.collide(110.0, 100.0)); // distance == radius
        assert!(target.collide(100.0, 100.0));
        assert!(!target.collide(110.1, 100.0));
    }

    #[test]
    fn fresh_target_only_hittable_at_center() {
        let target = Target::new(50.0, 50.0, 40.0, 0.2);
        assert!(target.collide(50.0, 50.0)); // distance 0 <= radius 0
        assert!(!target.collide(50.1, 50.0));
    }

    #[test]
    fn tessellation_produces_five_rings() {
        let mut target = Target::new(400.0, 300.0, 40.0, 10.0);
        target.update();
        let mut verts = Vec::new();
        target.tessellate(&mut verts);
        assert_eq!(verts.len(), 5 * crate::graphics::CIRCLE_SEGMENTS * 3);
    }

    proptest! {
        #[test]
        fn update_adds_growth_until_flip(r in 0.0f32..39.0, g in 0.05f32..2.0) {
            let mut target = Target::new(0.0, 0.0, 40.0, g);
            target.radius = r;
            target.update();
            if r + g >= 40.0 {
                prop_assert!(!target.growing);
                prop_assert!((target.radius - (r - g)).abs() < 1e-4);
            } else {
                prop_assert!(target.growing);
                prop_assert!((target.radius - (r + g)).abs() < 1e-4);
            }
        }

        #[test]
        fn radius_never_exceeds_max_plus_one_step(g in 0.05f32..2.0) {
            let mut target = Target::new(0.0, 0.0, 25.0, g);
            for _ in 0..2000 {
                target.update();
                prop_assert!(target.radius < 25.0 + g);
                if target.decayed() {
                    break;
                }
            }
            prop_assert!(target.decayed());
        }
    }
}
