use glam::{DAffine3, DMat3, DVec3};
use std::time::{Duration, Instant};

/// Translation that brings `point` to the middle of a `width` x `height` frame.
///
/// The linear part of `transform` is kept; the returned vector replaces its
/// translation. Depth is pulled back to the current slice. The middle is the
/// whole-pixel half of the frame size.
pub fn centering_translation(transform: &DAffine3, point: DVec3, width: i32, height: i32) -> DVec3 {
    let projected = transform.matrix3 * point;
    let (cx, cy) = (f64::from(width / 2), f64::from(height / 2));
    DVec3::new(cx - projected.x, cy - projected.y, -projected.z)
}

/// Interpolates a viewer transform toward a target pose over a fixed duration.
///
/// Every matrix entry moves linearly with elapsed time. Centering only changes
/// the translation, so the linear part stays fixed in that case.
#[derive(Debug, Clone)]
pub struct TransformAnimator {
    start: DAffine3,
    target: DAffine3,
    started_at: Instant,
    duration: Duration,
}

impl TransformAnimator {
    pub fn new(start: DAffine3, target: DAffine3, started_at: Instant, duration: Duration) -> Self {
        Self { start, target, started_at, duration }
    }

    /// Animation that keeps the linear part of `start` and moves its translation to `target`.
    pub fn translation(start: DAffine3, target: DVec3, started_at: Instant, duration: Duration) -> Self {
        Self::new(start, DAffine3 { matrix3: start.matrix3, translation: target }, started_at, duration)
    }

    pub fn start(&self) -> &DAffine3 {
        &self.start
    }

    pub fn target(&self) -> &DAffine3 {
        &self.target
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Fraction of the animation elapsed at `now`, in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at).min(self.duration);
        elapsed.as_secs_f64() / self.duration.as_secs_f64()
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }

    pub fn sample(&self, now: Instant) -> DAffine3 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.target;
        }
        let lerp = |a: DVec3, b: DVec3| a + (b - a) * t;
        let (from, to) = (&self.start.matrix3, &self.target.matrix3);
        DAffine3 {
            matrix3: DMat3::from_cols(
                lerp(from.x_axis, to.x_axis),
                lerp(from.y_axis, to.y_axis),
                lerp(from.z_axis, to.z_axis),
            ),
            translation: lerp(self.start.translation, self.target.translation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DQuat;

    fn approx(a: DVec3, b: DVec3) -> bool {
        (a - b).length_squared() <= 1e-12
    }

    #[test]
    fn point_at_center_needs_no_planar_shift() {
        let target = centering_translation(&DAffine3::IDENTITY, DVec3::new(400.0, 300.0, 12.0), 800, 600);
        assert!(approx(target, DVec3::new(0.0, 0.0, -12.0)));
    }

    #[test]
    fn odd_frame_sizes_center_on_whole_pixels() {
        let target = centering_translation(&DAffine3::IDENTITY, DVec3::ZERO, 801, 601);
        assert_eq!(target, DVec3::new(400.0, 300.0, 0.0));
    }

    #[test]
    fn centering_applies_rotation_and_scale() {
        let transform = DAffine3::from_scale_rotation_translation(
            DVec3::splat(2.0),
            DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2),
            DVec3::new(5.0, 5.0, 5.0),
        );
        let point = DVec3::new(10.0, 0.0, 1.0);
        let target = centering_translation(&transform, point, 100, 50);
        let centered = DAffine3 { matrix3: transform.matrix3, translation: target };
        let on_screen = centered.transform_point3(point);
        assert!(approx(on_screen, DVec3::new(50.0, 25.0, 0.0)));
    }

    #[test]
    fn sample_interpolates_linearly_and_clamps() {
        let start = DAffine3::from_translation(DVec3::new(0.0, 10.0, 0.0));
        let t0 = Instant::now();
        let animator =
            TransformAnimator::translation(start, DVec3::new(100.0, 0.0, -4.0), t0, Duration::from_millis(300));
        assert!(approx(animator.sample(t0).translation, start.translation));
        let mid = animator.sample(t0 + Duration::from_millis(150)).translation;
        assert!(approx(mid, DVec3::new(50.0, 5.0, -2.0)));
        assert!(!animator.is_complete(t0 + Duration::from_millis(299)));
        assert!(animator.is_complete(t0 + Duration::from_millis(300)));
        let late = animator.sample(t0 + Duration::from_secs(5));
        assert_eq!(late, *animator.target());
        assert_eq!(late.matrix3, start.matrix3);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let t0 = Instant::now();
        let animator = TransformAnimator::translation(DAffine3::IDENTITY, DVec3::X, t0, Duration::ZERO);
        assert!(animator.is_complete(t0));
        assert_eq!(animator.sample(t0).translation, DVec3::X);
    }

    #[test]
    fn full_pose_interpolates_linear_part() {
        let t0 = Instant::now();
        let target = DAffine3::from_scale(DVec3::splat(3.0));
        let animator = TransformAnimator::new(DAffine3::IDENTITY, target, t0, Duration::from_millis(100));
        let half = animator.sample(t0 + Duration::from_millis(50));
        assert!(approx(half.matrix3.x_axis, DVec3::new(2.0, 0.0, 0.0)));
        assert!(approx(half.translation, DVec3::ZERO));
    }
}
