//! Star field animation state management.

use nightsky_core::{Clock, FieldTuning, RandomSource, SurfaceSize, Viewport};
use tracing::{debug, trace};

use crate::animations::spawn::SpawnGate;
use crate::animations::stars::{AmbientStar, generate_population};
use crate::animations::streaks::StreakEvent;
use crate::color::Palette;
use crate::surface::DrawSurface;

/// Lifecycle of a [`FieldAnimator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorPhase {
    /// Mounted but no nonzero surface size seen yet.
    Idle,
    /// Surface sized; frames draw.
    Running,
}

/// Ambient stars plus shooting-star streaks, advanced by elapsed time.
///
/// Time and randomness are injected so the whole field can be driven
/// deterministically. The animator does not own a timer: the caller
/// invokes [`FieldAnimator::frame`] once per display frame while
/// [`FieldAnimator::is_scheduled`] is true.
#[derive(Debug)]
pub struct FieldAnimator<C: Clock, R: RandomSource> {
    tuning: FieldTuning,
    palette: Palette,
    clock: C,
    rng: R,
    phase: AnimatorPhase,
    surface: SurfaceSize,
    stars: Vec<AmbientStar>,
    streaks: Vec<StreakEvent>,
    spawn: SpawnGate,
    /// Clock time of the previous frame since the last start.
    last_frame_ms: Option<f64>,
    /// Whether another frame is wanted.
    scheduled: bool,
}

impl<C: Clock, R: RandomSource> FieldAnimator<C, R> {
    /// Create an idle, unscheduled animator.
    pub fn new(tuning: FieldTuning, palette: Palette, clock: C, rng: R) -> Self {
        Self {
            tuning,
            palette,
            clock,
            rng,
            phase: AnimatorPhase::Idle,
            surface: SurfaceSize::default(),
            stars: Vec::new(),
            streaks: Vec::new(),
            spawn: SpawnGate::new(),
            last_frame_ms: None,
            scheduled: false,
        }
    }

    /// Request frames. The first frame after a start moves nothing.
    pub fn start(&mut self) {
        self.scheduled = true;
        self.last_frame_ms = None;
    }

    /// Stop requesting frames; later calls to [`Self::frame`] do nothing.
    pub fn stop(&mut self) {
        self.scheduled = false;
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub fn phase(&self) -> AnimatorPhase {
        self.phase
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn stars(&self) -> &[AmbientStar] {
        &self.stars
    }

    pub fn streaks(&self) -> &[StreakEvent] {
        &self.streaks
    }

    pub fn last_spawn_ms(&self) -> Option<f64> {
        self.spawn.last_spawn_ms()
    }

    /// Resize the surface to cover three viewports and regenerate the stars.
    ///
    /// A zero-area viewport leaves the surface and stars as they were.
    /// Returns whether the surface changed.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let surface = viewport.surface();
        if surface.is_empty() {
            debug!(
                width = viewport.width,
                height = viewport.height,
                "ignoring empty resize"
            );
            return false;
        }

        self.surface = surface;
        self.stars = generate_population(surface, &self.tuning, &mut self.rng);
        if self.phase == AnimatorPhase::Idle {
            self.phase = AnimatorPhase::Running;
        }
        debug!(
            width = surface.width,
            height = surface.height,
            stars = self.stars.len(),
            "surface resized"
        );
        true
    }

    /// Advance by the time since the previous frame and draw onto `target`.
    ///
    /// Returns whether anything was drawn; nothing happens while stopped or idle.
    pub fn frame(&mut self, target: &mut impl DrawSurface) -> bool {
        if !self.scheduled || self.phase == AnimatorPhase::Idle {
            return false;
        }

        let now = self.clock.now_ms();
        let delta_secs = self
            .last_frame_ms
            .map(|last| ((now - last) / 1000.0).max(0.0))
            .unwrap_or(0.0);
        self.last_frame_ms = Some(now);

        target.clear();

        if let Some(count) = self.spawn.try_spawn(now, &self.tuning, &mut self.rng) {
            for i in 0..count {
                let scheduled_at = now + i as f64 * self.tuning.stagger_ms;
                self.streaks.push(StreakEvent::random(
                    self.surface,
                    scheduled_at,
                    &self.palette,
                    &mut self.rng,
                ));
            }
            trace!(count, at = now, "spawned streak batch");
        }

        let surface = self.surface;
        for streak in self
            .streaks
            .iter_mut()
            .filter(|s| s.active && s.is_due(now))
        {
            streak.advance(delta_secs, surface);
        }
        self.streaks.retain(|s| s.active);

        self.draw_scene(target, now);
        true
    }

    /// Draw the field as it stands at the last frame, without advancing.
    ///
    /// Works while stopped, so a surface resized during a pause is not left
    /// blank. Returns false until the first valid resize.
    pub fn redraw(&self, target: &mut impl DrawSurface) -> bool {
        if self.phase == AnimatorPhase::Idle {
            return false;
        }
        let now = self.last_frame_ms.unwrap_or_else(|| self.clock.now_ms());
        target.clear();
        self.draw_scene(target, now);
        true
    }

    /// Stars first, then every due streak on top.
    fn draw_scene(&self, target: &mut impl DrawSurface, now: f64) {
        let time_secs = now / 1000.0;
        for star in &self.stars {
            star.draw(target, time_secs, self.palette.star);
        }
        for streak in self.streaks.iter().filter(|s| s.is_due(now)) {
            streak.draw(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{DrawCall, RecordingSurface};
    use nightsky_core::{FastRandom, ManualClock, Rgb, ScriptedRandom};

    /// Spawning disabled so tests control every streak.
    fn quiet_tuning() -> FieldTuning {
        FieldTuning {
            spawn_probability: 0.0,
            ..Default::default()
        }
    }

    fn animator(
        tuning: FieldTuning,
        seed: u64,
    ) -> (FieldAnimator<ManualClock, FastRandom>, ManualClock) {
        let clock = ManualClock::new(0.0);
        let animator = FieldAnimator::new(
            tuning,
            Palette::default(),
            clock.clone(),
            FastRandom::with_seed(seed),
        );
        (animator, clock)
    }

    fn streak_at(x: f64, y: f64, scheduled_at: f64) -> StreakEvent {
        StreakEvent {
            x,
            y,
            length: 50.0,
            speed: 100.0,
            line_width: 1.0,
            opacity: 1.0,
            color: Rgb::WHITE,
            active: true,
            scheduled_at,
        }
    }

    #[test]
    fn test_idle_until_first_valid_resize() {
        let (mut anim, _clock) = animator(quiet_tuning(), 1);
        let mut surface = RecordingSurface::default();
        anim.start();

        assert_eq!(anim.phase(), AnimatorPhase::Idle);
        assert!(!anim.frame(&mut surface));
        assert!(surface.calls.is_empty());

        assert!(!anim.resize(Viewport::new(0.0, 600.0)));
        assert_eq!(anim.phase(), AnimatorPhase::Idle);

        assert!(anim.resize(Viewport::new(800.0, 600.0)));
        assert_eq!(anim.phase(), AnimatorPhase::Running);
        assert_eq!(anim.surface(), SurfaceSize::new(800.0, 1800.0));
        assert_eq!(anim.stars().len(), 41);
        assert!(anim.frame(&mut surface));
    }

    #[test]
    fn test_empty_resize_keeps_stars() {
        let (mut anim, _clock) = animator(quiet_tuning(), 2);
        anim.resize(Viewport::new(1024.0, 768.0));
        let before = anim.stars().to_vec();
        assert!(!before.is_empty());

        assert!(!anim.resize(Viewport::new(0.0, 768.0)));
        assert!(!anim.resize(Viewport::new(1024.0, 0.0)));
        assert_eq!(anim.stars(), before.as_slice());
        assert_eq!(anim.surface(), SurfaceSize::new(1024.0, 2304.0));
        assert_eq!(anim.phase(), AnimatorPhase::Running);
    }

    #[test]
    fn test_valid_resize_regenerates() {
        let (mut anim, _clock) = animator(quiet_tuning(), 3);
        anim.resize(Viewport::new(1024.0, 768.0));
        let before = anim.stars().to_vec();
        anim.resize(Viewport::new(1920.0, 1080.0));
        assert_ne!(anim.stars(), before.as_slice());
        assert_eq!(anim.stars().len(), (1920.0 * 3240.0 / 35_000.0_f64) as usize);
    }

    #[test]
    fn test_stopped_animator_draws_nothing() {
        let (mut anim, clock) = animator(quiet_tuning(), 4);
        let mut surface = RecordingSurface::default();
        anim.resize(Viewport::new(400.0, 300.0));

        assert!(!anim.frame(&mut surface));
        anim.start();
        assert!(anim.frame(&mut surface));
        anim.stop();
        clock.advance(16.0);
        assert!(!anim.frame(&mut surface));
        assert!(!anim.is_scheduled());
    }

    #[test]
    fn test_first_frame_after_start_has_no_motion() {
        let (mut anim, clock) = animator(quiet_tuning(), 5);
        let mut surface = RecordingSurface::default();
        anim.resize(Viewport::new(1000.0, 1000.0));
        anim.streaks.push(streak_at(100.0, 100.0, 0.0));
        clock.set(5000.0);

        anim.start();
        anim.frame(&mut surface);
        assert_eq!(anim.streaks()[0].x, 100.0);

        clock.advance(500.0);
        anim.frame(&mut surface);
        assert_eq!(anim.streaks()[0].x, 150.0);

        // Resuming after a pause restarts the delta.
        anim.stop();
        clock.advance(10_000.0);
        anim.start();
        anim.frame(&mut surface);
        assert_eq!(anim.streaks()[0].x, 150.0);
    }

    #[test]
    fn test_scheduled_streak_waits() {
        let (mut anim, clock) = animator(quiet_tuning(), 6);
        let mut surface = RecordingSurface::default();
        anim.resize(Viewport::new(1000.0, 1000.0));
        anim.streaks.push(streak_at(100.0, 100.0, 1000.0));
        anim.start();

        for _ in 0..62 {
            anim.frame(&mut surface);
            assert_eq!(anim.streaks()[0].x, 100.0);
            assert!(surface.lines().is_empty());
            clock.advance(16.0);
        }

        clock.set(1000.0);
        anim.frame(&mut surface);
        let s = &anim.streaks()[0];
        assert!(s.x > 100.0);
        assert_eq!(s.x, s.y);
        assert_eq!(surface.lines().len(), 1);
    }

    #[test]
    fn test_streak_leaves_surface_and_is_removed() {
        let (mut anim, clock) = animator(quiet_tuning(), 7);
        let mut surface = RecordingSurface::default();
        anim.resize(Viewport::new(200.0, 100.0));
        // Surface is 200 x 300.
        anim.streaks.push(streak_at(150.0, 20.0, 0.0));
        anim.start();
        anim.frame(&mut surface);

        let mut last_x = 150.0;
        let mut frames = 0;
        while !anim.streaks().is_empty() {
            clock.advance(100.0);
            anim.frame(&mut surface);
            frames += 1;
            if let Some(s) = anim.streaks().first() {
                assert!(s.x > last_x);
                assert!(s.x <= 250.0);
                assert_eq!(surface.lines().len(), 1);
                last_x = s.x;
            } else {
                // Left on this frame: not drawn.
                assert!(surface.lines().is_empty());
            }
            assert!(frames < 100);
        }
        // 150 -> 250 is the last on-screen position, 260 is past it.
        assert_eq!(last_x, 250.0);
        assert_eq!(frames, 11);
    }

    #[test]
    fn test_blinking_star_half_opacity_at_time_zero() {
        let (mut anim, _clock) = animator(quiet_tuning(), 8);
        let mut surface = RecordingSurface::default();
        anim.resize(Viewport::new(100.0, 100.0));
        anim.stars = vec![AmbientStar {
            x: 5.0,
            y: 5.0,
            size: 1.0,
            opacity: 0.6,
            blinking: true,
            blink_period: 3.0,
        }];
        anim.start();
        anim.frame(&mut surface);

        match surface.last_frame() {
            [
                DrawCall::Circle {
                    radius, alpha, ..
                },
            ] => {
                assert_eq!(*radius, 1.0);
                assert!((alpha - 0.3).abs() < 1e-12);
            }
            other => panic!("unexpected draw calls: {other:?}"),
        }
    }

    #[test]
    fn test_spawned_batches_are_staggered_and_gated() {
        let clock = ManualClock::new(0.0);
        let mut anim = FieldAnimator::new(
            FieldTuning::default(),
            Palette::default(),
            clock.clone(),
            FastRandom::with_seed(21),
        );
        let mut surface = RecordingSurface::default();
        anim.resize(Viewport::new(1280.0, 720.0));
        anim.start();

        let mut batches: Vec<f64> = Vec::new();
        for _ in 0..1000 {
            let before = anim.last_spawn_ms();
            anim.frame(&mut surface);
            if anim.last_spawn_ms() != before
                && let Some(at) = anim.last_spawn_ms()
            {
                let batch: Vec<_> = anim
                    .streaks()
                    .iter()
                    .filter(|s| s.scheduled_at >= at)
                    .collect();
                assert!((1..=3).contains(&batch.len()));
                for (i, s) in batch.iter().enumerate() {
                    assert_eq!(s.scheduled_at, at + i as f64 * 100.0);
                    // Upper third, plus at most one frame of motion.
                    assert!(s.y < 2160.0 / 3.0 + 10.0);
                }
                batches.push(at);
            }
            clock.advance(16.0);
        }

        assert!(batches.len() >= 2);
        for pair in batches.windows(2) {
            assert!(pair[1] - pair[0] >= 1500.0);
        }
    }

    #[test]
    fn test_scripted_spawn_produces_three_streaks() {
        let clock = ManualClock::new(0.0);
        // 0.99 passes the gate and asks for the largest batch.
        let mut anim = FieldAnimator::new(
            FieldTuning::default(),
            Palette::default(),
            clock,
            ScriptedRandom::constant(0.99),
        );
        let mut surface = RecordingSurface::default();
        anim.resize(Viewport::new(100.0, 100.0));
        anim.start();
        anim.frame(&mut surface);

        let scheduled: Vec<f64> = anim.streaks().iter().map(|s| s.scheduled_at).collect();
        assert_eq!(scheduled, vec![0.0, 100.0, 200.0]);
        // Only the first is due at t = 0 and it has not moved yet.
        assert_eq!(surface.lines().len(), 1);
    }

    #[test]
    fn test_redraw_while_stopped_does_not_advance() {
        let (mut anim, clock) = animator(quiet_tuning(), 9);
        let mut surface = RecordingSurface::default();
        assert!(!anim.redraw(&mut surface));

        anim.resize(Viewport::new(400.0, 300.0));
        anim.streaks.push(streak_at(100.0, 100.0, 0.0));
        anim.start();
        clock.set(200.0);
        anim.frame(&mut surface);
        anim.stop();

        clock.advance(5000.0);
        assert!(anim.resize(Viewport::new(600.0, 400.0)));
        assert!(!anim.frame(&mut surface));
        assert!(anim.redraw(&mut surface));

        let circles = surface
            .last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCall::Circle { .. }))
            .count();
        // One disc per star plus the streak head.
        assert_eq!(circles, anim.stars().len() + 1);
        assert_eq!(surface.lines().len(), 1);
        assert_eq!(anim.streaks()[0].x, 100.0);
    }
}
