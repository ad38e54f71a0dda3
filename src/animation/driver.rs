use std::ops::Range;
use std::time::Duration;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::RateLimiter;
use crate::interaction::NormalizedPointer;
use crate::math::lerp;
use crate::scene::ParticleSet;

// Idle sway around the x axis
const SWAY_BASE: f32 = -0.2;
const SWAY_AMPLITUDE: f32 = 0.05;
const SWAY_SPEED: f32 = 0.2;

const YAW_GAIN: f32 = 0.2;
const ROLL_GAIN: f32 = 0.05;

const HEIGHT_SPEED: f32 = 0.2;
const HEIGHT_PHASE: f32 = 0.1;
const HEIGHT_AMPLITUDE: f32 = 0.5;
const SIZE_SPEED: f32 = 0.5;

/// Tunables for the per-frame driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverSettings {
    pub update_hz: f32,
    /// Fraction of the remaining distance covered per tick
    pub lerp_factor: f32,
    /// Particles perturbed per tick
    pub particle_window: usize,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            update_hz: 30.0,
            lerp_factor: 0.05,
            particle_window: 30,
        }
    }
}

/// Elapsed time plus throttle bookkeeping
#[derive(Debug, Clone, Copy)]
pub struct AnimationState {
    elapsed_time: f32,
    limiter: RateLimiter,
}

impl AnimationState {
    pub fn new(update_interval: Duration) -> Self {
        Self {
            elapsed_time: 0.0,
            limiter: RateLimiter::new(update_interval),
        }
    }

    /// Animation time of the last active tick, seconds
    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    pub fn last_update(&self) -> Option<Duration> {
        self.limiter.last_fired()
    }

    pub fn update_interval(&self) -> Duration {
        self.limiter.interval()
    }
}

/// Result of one driver invocation
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Throttled, nothing mutated
    Skipped,
    /// Rotation eased and `window` particles rewritten
    Updated { window: Range<usize> },
}

impl TickOutcome {
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Throttled per-frame animation of group rotation and particle attributes
pub struct AnimationDriver {
    settings: DriverSettings,
    state: AnimationState,
    rotation: Vec3,
    rng: StdRng,
    ticks: u64,
}

impl AnimationDriver {
    pub fn new(settings: DriverSettings, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = AnimationState::new(RateLimiter::from_hz(settings.update_hz).interval());
        Self {
            settings,
            state,
            rotation: Vec3::ZERO,
            rng,
            ticks: 0,
        }
    }

    /// Run one frame: `elapsed` is animation time in seconds, `now` the
    /// wall-clock timestamp used for throttling
    pub fn tick(
        &mut self,
        elapsed: f32,
        now: Duration,
        pointer: NormalizedPointer,
        particles: &mut ParticleSet,
    ) -> TickOutcome {
        if !self.state.limiter.try_fire(now) {
            return TickOutcome::Skipped;
        }
        self.state.elapsed_time = elapsed;
        self.ticks += 1;

        let target = Self::rotation_target(elapsed, pointer);
        let factor = self.settings.lerp_factor;
        self.rotation = Vec3::new(
            lerp(self.rotation.x, target.x, factor),
            lerp(self.rotation.y, target.y, factor),
            lerp(self.rotation.z, target.z, factor),
        );

        let window = particles.random_window(self.settings.particle_window, &mut self.rng);
        for i in window.clone() {
            let phase = i as f32;
            let height = particles.base_height(i)
                + (elapsed * HEIGHT_SPEED + phase * HEIGHT_PHASE).sin() * HEIGHT_AMPLITUDE;
            let size = ((elapsed * SIZE_SPEED + phase).sin() * 0.1 + 0.5) * particles.base_size(i);
            particles.set(i, height, size);
        }
        particles.mark_dirty(window.clone());

        TickOutcome::Updated { window }
    }

    /// Rotation each axis eases toward at animation time `t`
    pub fn rotation_target(t: f32, pointer: NormalizedPointer) -> Vec3 {
        Vec3::new(
            SWAY_BASE + (t * SWAY_SPEED).sin() * SWAY_AMPLITUDE,
            pointer.x * YAW_GAIN,
            // screen y grows downwards
            -pointer.y * ROLL_GAIN,
        )
    }

    /// Current group rotation, Euler XYZ radians
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    /// Active ticks so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Back to the initial pose; the next tick fires immediately
    pub fn reset(&mut self) {
        self.rotation = Vec3::ZERO;
        self.state.limiter.reset();
        self.state.elapsed_time = 0.0;
        self.ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ParticleAttributes;
    use approx::assert_relative_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn particles(count: usize) -> ParticleSet {
        let attributes = (0..count)
            .map(|i| ParticleAttributes::new([i as f32, 1.0 + i as f32 * 0.01, 0.0], 0.4))
            .collect();
        ParticleSet::from_attributes(attributes)
    }

    #[test]
    fn throttles_to_interval() {
        let mut driver = AnimationDriver::new(DriverSettings::default(), Some(1));
        let mut set = particles(150);

        let fired: Vec<bool> = [0, 10, 20, 30, 40]
            .iter()
            .map(|&t| {
                driver
                    .tick(t as f32 / 1000.0, ms(t), NormalizedPointer::CENTER, &mut set)
                    .is_update()
            })
            .collect();

        assert_eq!(fired, vec![true, false, false, false, true]);
        assert_eq!(driver.ticks(), 2);
        assert_eq!(driver.state().last_update(), Some(ms(40)));
    }

    #[test]
    fn skipped_tick_mutates_nothing() {
        let mut driver = AnimationDriver::new(DriverSettings::default(), Some(1));
        let mut set = particles(150);

        driver.tick(0.0, ms(0), NormalizedPointer::CENTER, &mut set);
        set.take_dirty();
        let rotation = driver.rotation();
        let before = set.attributes().to_vec();

        let outcome = driver.tick(1.0, ms(5), NormalizedPointer::new(1.0, 1.0), &mut set);

        assert_eq!(outcome, TickOutcome::Skipped);
        assert_eq!(driver.rotation(), rotation);
        assert_eq!(set.attributes(), before.as_slice());
        assert_eq!(set.dirty(), None);
    }

    #[test]
    fn rotation_eases_toward_target() {
        let mut driver = AnimationDriver::new(DriverSettings::default(), Some(1));
        let mut set = particles(10);
        let pointer = NormalizedPointer::new(1.0, -1.0);

        driver.tick(0.0, ms(0), pointer, &mut set);

        let target = AnimationDriver::rotation_target(0.0, pointer);
        assert_relative_eq!(target.x, -0.2);
        assert_relative_eq!(target.y, 0.2);
        assert_relative_eq!(target.z, 0.05);
        assert_relative_eq!(driver.rotation().x, -0.2 * 0.05);
        assert_relative_eq!(driver.rotation().y, 0.2 * 0.05);
        assert_relative_eq!(driver.rotation().z, 0.05 * 0.05);
    }

    #[test]
    fn particles_oscillate_around_base() {
        let mut driver = AnimationDriver::new(DriverSettings::default(), Some(4));
        let mut set = particles(150);
        let t = 3.0;

        let TickOutcome::Updated { window } =
            driver.tick(t, ms(0), NormalizedPointer::CENTER, &mut set)
        else {
            panic!("first tick must fire");
        };

        assert_eq!(window.len(), 30);
        assert_eq!(set.dirty(), Some(window.clone()));
        for i in window {
            let p = set.attributes()[i];
            let phase = i as f32;
            assert_relative_eq!(
                p.position[1],
                set.base_height(i) + (t * 0.2 + phase * 0.1).sin() * 0.5,
                epsilon = 1e-5
            );
            assert_relative_eq!(
                p.size,
                ((t * 0.5 + phase).sin() * 0.1 + 0.5) * set.base_size(i),
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn repeated_ticks_do_not_drift() {
        let mut driver = AnimationDriver::new(DriverSettings::default(), Some(2));
        let mut set = particles(20);

        for frame in 0..200u64 {
            driver.tick(1.0, ms(frame * 40), NormalizedPointer::CENTER, &mut set);
        }

        for (i, p) in set.attributes().iter().enumerate() {
            assert!((p.position[1] - set.base_height(i)).abs() <= 0.5 + 1e-5);
            assert!(p.size <= set.base_size(i) * 0.6 + 1e-5);
        }
    }

    #[test]
    fn empty_particle_set() {
        let mut driver = AnimationDriver::new(DriverSettings::default(), Some(2));
        let mut set = ParticleSet::from_attributes(Vec::new());

        let outcome = driver.tick(0.0, ms(0), NormalizedPointer::CENTER, &mut set);
        assert_eq!(outcome, TickOutcome::Updated { window: 0..0 });
        assert_eq!(set.dirty(), None);
    }

    #[test]
    fn reset_restores_initial_pose() {
        let mut driver = AnimationDriver::new(DriverSettings::default(), Some(2));
        let mut set = particles(10);
        driver.tick(0.0, ms(0), NormalizedPointer::new(1.0, 0.0), &mut set);

        driver.reset();

        assert_eq!(driver.rotation(), Vec3::ZERO);
        assert_eq!(driver.ticks(), 0);
        assert!(driver
            .tick(0.0, ms(1), NormalizedPointer::CENTER, &mut set)
            .is_update());
    }
}
