//! Spinning wheel geometry and animation.
//!
//! The wheel has one equal slice per active food, in list order, with slice
//! 0 starting at the top (where the pointer sits) and slices running
//! clockwise. Rotation is measured in degrees, clockwise, and only ever
//! grows: each spin starts from the rotation the previous one ended on.
//!
//! [`SpinAnimator`] is a small state machine driven by an external clock.
//! The owner calls [`SpinAnimator::advance`] from its frame callback with the
//! current time and gets back the angles to draw plus any ticks and the
//! completion.

use log::{debug, info};
use rand::Rng;
use shared::FoodItem;

use crate::backend::domain::easing::{ease_in_quad, ease_out_cubic, ease_out_quad, CubicBezier};
use crate::config::SpinTuning;

pub const FULL_TURN: f64 = 360.0;

/// Pointer bounce: quick rise, then a spring back to rest
const BOUNCE_RISE_MS: f64 = 55.0;
const BOUNCE_SPRING_TENSION: f64 = 180.0;
const BOUNCE_SPRING_FRICTION: f64 = 7.0;

/// Wheel catch: short step back against the spin, then recover
const CATCH_DEPTH: f64 = -0.35;
const CATCH_BRAKE_MS: f64 = 18.0;
const CATCH_RECOVER_MS: f64 = 55.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpinError {
    #[error("Cannot spin a wheel with no active foods")]
    EmptyWheel,
    #[error("Winner index {index} is out of range for {len} slices")]
    WinnerOutOfRange { index: usize, len: usize },
}

/// Slice layout of a wheel with `slice_count` equal slices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    slice_count: usize,
}

impl WheelGeometry {
    pub fn new(slice_count: usize) -> Result<Self, SpinError> {
        if slice_count == 0 {
            return Err(SpinError::EmptyWheel);
        }
        Ok(Self { slice_count })
    }

    pub fn slice_count(&self) -> usize {
        self.slice_count
    }

    pub fn slice_angle(&self) -> f64 {
        FULL_TURN / self.slice_count as f64
    }

    /// `[start, end)` of a slice in wheel degrees
    pub fn slice_bounds(&self, index: usize) -> (f64, f64) {
        let slice = self.slice_angle();
        (index as f64 * slice, (index + 1) as f64 * slice)
    }

    /// Index of the slice under the pointer when the wheel is at `rotation`
    pub fn slice_at_pointer(&self, rotation: f64) -> usize {
        let wheel_angle = (FULL_TURN - rotation.rem_euclid(FULL_TURN)).rem_euclid(FULL_TURN);
        let index = (wheel_angle / self.slice_angle()).floor() as usize;
        index.min(self.slice_count - 1)
    }

    /// Boundary counter used for tick detection: how many slice boundaries
    /// a rotation has passed since rotation 0
    pub fn boundary_index(&self, rotation: f64) -> i64 {
        (rotation / self.slice_angle()).floor() as i64
    }
}

/// Everything decided up front for one spin
#[derive(Debug, Clone, PartialEq)]
pub struct SpinPlan {
    pub winner_index: usize,
    pub slice_count: usize,
    pub slice_angle: f64,
    /// Landing spot measured from the start of the winner's slice
    pub landing_offset: f64,
    /// Landing spot in wheel degrees: `winner_index * slice_angle + landing_offset`
    pub target_slice_angle: f64,
    pub start_rotation: f64,
    pub total_rotation: f64,
    pub target_rotation: f64,
    pub duration_ms: f64,
}

/// Uniformly pick a winner among `len` slices
pub fn pick_winner<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(rng.gen_range(0..len))
}

/// Plan a spin that starts at `start_rotation` and stops with the pointer
/// inside the winner's slice, away from its edges.
///
/// The wheel makes `full_turns` whole turns plus whatever is needed to bring
/// the landing spot under the pointer. From a rest position of 0 that extra
/// is `360 - target_slice_angle`; from any other rest position the part of
/// the previous spin past a whole turn is taken off, so the landing is
/// correct on every spin.
pub fn plan_spin<R: Rng + ?Sized>(
    slice_count: usize,
    winner_index: usize,
    start_rotation: f64,
    tuning: &SpinTuning,
    rng: &mut R,
) -> Result<SpinPlan, SpinError> {
    let geometry = WheelGeometry::new(slice_count)?;
    if winner_index >= slice_count {
        return Err(SpinError::WinnerOutOfRange {
            index: winner_index,
            len: slice_count,
        });
    }

    let slice = geometry.slice_angle();
    let margin = slice * tuning.safety_margin;
    let landing_offset = margin + rng.gen::<f64>() * (slice - 2.0 * margin);
    let target_slice_angle = winner_index as f64 * slice + landing_offset;

    let resting = start_rotation.rem_euclid(FULL_TURN);
    let mut remainder = (FULL_TURN - target_slice_angle - resting).rem_euclid(FULL_TURN);
    if remainder <= 0.0 {
        remainder += FULL_TURN;
    }
    let total_rotation = tuning.full_turns as f64 * FULL_TURN + remainder;

    let jitter = tuning.duration_jitter;
    let duration_ms = tuning.base_duration_ms * (1.0 - jitter + rng.gen::<f64>() * 2.0 * jitter);

    Ok(SpinPlan {
        winner_index,
        slice_count,
        slice_angle: slice,
        landing_offset,
        target_slice_angle,
        start_rotation,
        total_rotation,
        target_rotation: start_rotation + total_rotation,
        duration_ms,
    })
}

/// The winner of a finished spin
#[derive(Debug, Clone, PartialEq)]
pub struct SpinOutcome {
    pub food: FoodItem,
    pub final_rotation: f64,
}

/// A slice boundary passing the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct TickEvent {
    /// Boundary counter after the crossing (strictly increasing within a spin)
    pub boundary: i64,
    /// Fraction of this spin's rotation covered when the tick fired
    pub progress: f64,
    /// Peak pointer deflection for this tick, in degrees
    pub bounce_intensity: f64,
}

/// What to draw for one frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameUpdate {
    /// Primary wheel rotation, unaffected by the cosmetic pulses
    pub rotation: f64,
    /// Wheel catch offset to add on top of `rotation`
    pub wheel_offset: f64,
    /// Pointer deflection in degrees
    pub pointer_angle: f64,
    pub ticks: Vec<TickEvent>,
    /// Set on exactly one frame per spin
    pub completed: Option<SpinOutcome>,
}

impl FrameUpdate {
    pub fn display_rotation(&self) -> f64 {
        self.rotation + self.wheel_offset
    }
}

#[derive(Debug, Clone, Copy)]
enum PulseSegment {
    Timed {
        to: f64,
        duration_ms: f64,
        easing: fn(f64) -> f64,
    },
    /// Damped spring towards `to`, starting at rest
    Spring { to: f64, tension: f64, friction: f64 },
}

const SPRING_REST_THRESHOLD: f64 = 0.001;

impl PulseSegment {
    fn spring_coefficients(tension: f64, friction: f64) -> (f64, f64) {
        // Origami tension/friction to stiffness/damping, unit mass
        let stiffness = (tension - 30.0) * 3.62 + 194.0;
        let damping = (friction - 8.0) * 3.0 + 25.0;
        (stiffness, damping)
    }

    fn duration_ms(&self, from: f64) -> f64 {
        match *self {
            PulseSegment::Timed { duration_ms, .. } => duration_ms,
            PulseSegment::Spring { to, tension, friction } => {
                let displacement = (from - to).abs();
                if displacement <= SPRING_REST_THRESHOLD {
                    return 0.0;
                }
                let (stiffness, damping) = Self::spring_coefficients(tension, friction);
                let omega = stiffness.sqrt();
                let zeta = damping / (2.0 * omega);
                let decay = zeta.min(1.0) * omega;
                let envelope = if zeta < 1.0 {
                    displacement / (1.0 - zeta * zeta).sqrt()
                } else {
                    displacement * 2.0
                };
                (envelope / SPRING_REST_THRESHOLD).ln() / decay * 1000.0
            }
        }
    }

    fn value_at(&self, from: f64, elapsed_ms: f64) -> f64 {
        match *self {
            PulseSegment::Timed { to, duration_ms, easing } => {
                let progress = if duration_ms > 0.0 { elapsed_ms / duration_ms } else { 1.0 };
                from + (to - from) * easing(progress)
            }
            PulseSegment::Spring { to, tension, friction } => {
                let (stiffness, damping) = Self::spring_coefficients(tension, friction);
                let omega = stiffness.sqrt();
                let zeta = damping / (2.0 * omega);
                let x0 = from - to;
                let t = elapsed_ms / 1000.0;
                let offset = if zeta < 1.0 {
                    let damped = omega * (1.0 - zeta * zeta).sqrt();
                    (-zeta * omega * t).exp()
                        * (x0 * (damped * t).cos() + (zeta * omega * x0 / damped) * (damped * t).sin())
                } else {
                    x0 * (-omega * t).exp() * (1.0 + omega * t)
                };
                to + offset
            }
        }
    }

    fn end_value(&self) -> f64 {
        match *self {
            PulseSegment::Timed { to, .. } | PulseSegment::Spring { to, .. } => to,
        }
    }
}

/// A fire-and-forget sequence of segments on one animated value
#[derive(Debug, Clone)]
struct PulseTrack {
    started_at_ms: f64,
    from: f64,
    segments: Vec<PulseSegment>,
}

impl PulseTrack {
    fn pointer_bounce(now_ms: f64, from: f64, intensity: f64) -> Self {
        Self {
            started_at_ms: now_ms,
            from,
            segments: vec![
                PulseSegment::Timed {
                    to: intensity,
                    duration_ms: BOUNCE_RISE_MS,
                    easing: ease_out_quad,
                },
                PulseSegment::Spring {
                    to: 0.0,
                    tension: BOUNCE_SPRING_TENSION,
                    friction: BOUNCE_SPRING_FRICTION,
                },
            ],
        }
    }

    fn wheel_catch(now_ms: f64, from: f64) -> Self {
        Self {
            started_at_ms: now_ms,
            from,
            segments: vec![
                PulseSegment::Timed {
                    to: CATCH_DEPTH,
                    duration_ms: CATCH_BRAKE_MS,
                    easing: ease_in_quad,
                },
                PulseSegment::Timed {
                    to: 0.0,
                    duration_ms: CATCH_RECOVER_MS,
                    easing: ease_out_cubic,
                },
            ],
        }
    }

    /// Value at `now_ms`, `None` once every segment has finished
    fn value_at(&self, now_ms: f64) -> Option<f64> {
        let mut elapsed = (now_ms - self.started_at_ms).max(0.0);
        let mut from = self.from;

        for segment in &self.segments {
            let duration = segment.duration_ms(from);
            if elapsed < duration {
                return Some(segment.value_at(from, elapsed));
            }
            elapsed -= duration;
            from = segment.end_value();
        }

        None
    }
}

/// Pointer bounce grows linearly over the final phase of the spin
fn bounce_intensity(tuning: &SpinTuning, rotation_progress: f64) -> f64 {
    let phase_start = tuning.final_phase_start;
    let final_phase = ((rotation_progress - phase_start) / (1.0 - phase_start)).clamp(0.0, 1.0);
    tuning.base_bounce + (tuning.final_bounce - tuning.base_bounce) * final_phase
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSpin {
    pub plan: SpinPlan,
    pub winner: FoodItem,
    pub started_at_ms: f64,
    last_boundary: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpinState {
    Idle,
    Spinning(ActiveSpin),
    Completed(SpinOutcome),
}

/// Clock-driven spin animation
#[derive(Debug, Clone)]
pub struct SpinAnimator {
    tuning: SpinTuning,
    easing: CubicBezier,
    baseline_rotation: f64,
    state: SpinState,
    pointer_bounce: Option<PulseTrack>,
    wheel_catch: Option<PulseTrack>,
}

impl Default for SpinAnimator {
    fn default() -> Self {
        Self::new(SpinTuning::default())
    }
}

impl SpinAnimator {
    pub fn new(tuning: SpinTuning) -> Self {
        Self {
            tuning,
            easing: CubicBezier::decelerate(),
            baseline_rotation: 0.0,
            state: SpinState::Idle,
            pointer_bounce: None,
            wheel_catch: None,
        }
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state, SpinState::Spinning(_))
    }

    /// Rotation the next spin starts from
    pub fn baseline_rotation(&self) -> f64 {
        self.baseline_rotation
    }

    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        match &self.state {
            SpinState::Completed(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Start spinning towards `foods[winner_index]`.
    ///
    /// Returns `Ok(None)` without changing anything when a spin is already
    /// in flight; requests are never queued.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        foods: &[FoodItem],
        winner_index: usize,
        now_ms: f64,
        rng: &mut R,
    ) -> Result<Option<SpinPlan>, SpinError> {
        if self.is_spinning() {
            debug!("Spin requested while spinning, ignoring");
            return Ok(None);
        }

        let plan = plan_spin(foods.len(), winner_index, self.baseline_rotation, &self.tuning, rng)?;
        let geometry = WheelGeometry::new(plan.slice_count)?;
        let winner = foods[winner_index].clone();

        info!(
            "Spinning to '{}' (slice {}/{}): {:.1}° over {:.0}ms",
            winner.name,
            winner_index + 1,
            plan.slice_count,
            plan.total_rotation,
            plan.duration_ms
        );

        self.wheel_catch = None;
        self.state = SpinState::Spinning(ActiveSpin {
            last_boundary: geometry.boundary_index(self.baseline_rotation),
            plan: plan.clone(),
            winner,
            started_at_ms: now_ms,
        });

        Ok(Some(plan))
    }

    /// Advance the animation to `now_ms`
    pub fn advance(&mut self, now_ms: f64) -> FrameUpdate {
        let mut update = FrameUpdate {
            rotation: self.baseline_rotation,
            ..FrameUpdate::default()
        };

        let mut finished = None;
        if let SpinState::Spinning(active) = &mut self.state {
            let plan = &active.plan;
            let elapsed = (now_ms - active.started_at_ms).max(0.0);
            let progress = (elapsed / plan.duration_ms).min(1.0);

            let rotation = if progress >= 1.0 {
                plan.target_rotation
            } else {
                plan.start_rotation + plan.total_rotation * self.easing.ease(progress)
            };
            update.rotation = rotation;

            let slice = plan.slice_angle;
            let boundary = (rotation / slice).floor() as i64;
            if boundary > active.last_boundary {
                let rotation_progress = (rotation - plan.start_rotation) / plan.total_rotation;
                let intensity = bounce_intensity(&self.tuning, rotation_progress);

                for crossed in (active.last_boundary + 1)..=boundary {
                    update.ticks.push(TickEvent {
                        boundary: crossed,
                        progress: rotation_progress,
                        bounce_intensity: intensity,
                    });
                }
                active.last_boundary = boundary;
            }

            if progress >= 1.0 {
                finished = Some(SpinOutcome {
                    food: active.winner.clone(),
                    final_rotation: plan.target_rotation,
                });
            }
        }

        if let Some(tick) = update.ticks.last() {
            let pointer_from = self.pointer_bounce.as_ref().and_then(|t| t.value_at(now_ms)).unwrap_or(0.0);
            let catch_from = self.wheel_catch.as_ref().and_then(|t| t.value_at(now_ms)).unwrap_or(0.0);
            self.pointer_bounce = Some(PulseTrack::pointer_bounce(now_ms, pointer_from, tick.bounce_intensity));
            self.wheel_catch = Some(PulseTrack::wheel_catch(now_ms, catch_from));
        }

        if let Some(outcome) = finished {
            info!("Spin finished on '{}'", outcome.food.name);
            self.baseline_rotation = outcome.final_rotation;
            self.state = SpinState::Completed(outcome.clone());
            update.completed = Some(outcome);
        }

        update.pointer_angle = Self::sample(&mut self.pointer_bounce, now_ms);
        update.wheel_offset = Self::sample(&mut self.wheel_catch, now_ms);
        update
    }

    fn sample(track: &mut Option<PulseTrack>, now_ms: f64) -> f64 {
        match track.as_ref().and_then(|t| t.value_at(now_ms)) {
            Some(value) => value,
            None => {
                *track = None;
                0.0
            }
        }
    }

    /// Drop an in-flight spin, e.g. when the owning view goes away.
    /// The baseline stays where the last finished spin left it.
    pub fn cancel(&mut self) -> bool {
        self.pointer_bounce = None;
        self.wheel_catch = None;

        if self.is_spinning() {
            info!("Spin cancelled");
            self.state = SpinState::Idle;
            return true;
        }
        false
    }
}
