//! Helicopter: multi-part model, flight-state update, rotor animation.
//!
//! The helicopter is a two-level rig: one global transform (position +
//! Euler orientation) and a fixed set of rigid parts, each with a local
//! transform composed on the right. Only the two rotors ever get a
//! non-identity local transform.

use engine_core::{compose_transform, rotate_about_pivot, yaw_pitch_roll, Mat4, Vec3};
use input::{Control, Controls};
use renderer::{load_parts, Model, ModelError, PartData};
use std::f32::consts::{FRAC_PI_4, PI};
use std::path::Path;
use thiserror::Error;

/// The fixed set of helicopter parts, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Part {
    Body,
    Rotor,
    TailRotor,
    Slides,
    Spotlight,
    Strobelight,
    PositionLights,
}

/// Number of parts.
pub const PART_COUNT: usize = 7;

impl Part {
    pub const ALL: [Part; PART_COUNT] = [
        Part::Body,
        Part::Rotor,
        Part::TailRotor,
        Part::Slides,
        Part::Spotlight,
        Part::Strobelight,
        Part::PositionLights,
    ];

    /// Sub-model name this part matches in the asset (exact, case-sensitive).
    pub fn name(self) -> &'static str {
        match self {
            Part::Body => "body",
            Part::Rotor => "rotor",
            Part::TailRotor => "tail_rotor",
            Part::Slides => "slides",
            Part::Spotlight => "spotlight",
            Part::Strobelight => "strobelight",
            Part::PositionLights => "positionlight",
        }
    }

    pub fn from_name(name: &str) -> Option<Part> {
        Part::ALL.into_iter().find(|p| p.name() == name)
    }
}

#[derive(Debug, Error)]
pub enum HelicopterError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("helicopter model has {found} parts, expected {PART_COUNT}")]
    PartCount { found: usize },
    #[error("unknown helicopter part name: {0:?}")]
    UnknownPart(String),
    #[error("duplicate helicopter part name: {0:?}")]
    DuplicatePart(String),
}

/// Main rotor hub in model space; the rotor spins about local Y here.
pub const MAIN_ROTOR_PIVOT: Vec3 = Vec3::new(0.0, 3.1597, -0.17219);
/// Tail rotor hub in model space; the tail rotor spins about local X here.
pub const TAIL_ROTOR_PIVOT: Vec3 = Vec3::new(0.263874, 2.87729, -6.52368);

/// Rotor angular rate, rad/s (four revolutions per second).
const ROTOR_RATE: f32 = 8.0 * PI;
/// Spawn height above the ground.
const SPAWN_HEIGHT: f32 = 5.5;
/// Divisor of the pitch/roll return-to-level term. Smaller = snappier.
const LEVELING_DIVISOR: f32 = FRAC_PI_4;
/// Vertical thrust gain.
const LIFT_GAIN: f32 = 4.0;
/// Horizontal translation gain (bank-to-turn feel).
const VELOCITY_GAIN: f32 = 6.0;

/// Flight state: everything the per-frame update mutates. Kept separate
/// from the GPU meshes so the integration is testable headless.
#[derive(Debug, Clone)]
pub struct FlightState {
    /// World-space translation.
    pub position: Vec3,
    /// Accumulated Euler angles: x = pitch, y = yaw, z = roll. Yaw is
    /// unbounded; pitch and roll decay back toward level.
    pub angles: Vec3,
    /// Orientation, derived from `angles` each step.
    pub rotation: Mat4,
    /// Global transform = translation * rotation, derived each step.
    pub transformation: Mat4,
    /// Unbounded rotor spin accumulator, independent of flight input.
    pub rotor_rotation: f32,
    /// Vertical thrust gain (fixed per instance).
    pub lift: f32,
    /// Horizontal translation gain (fixed per instance).
    pub velocity: f32,
    /// Per-part local transforms; identity except the two rotors.
    part_transforms: [Mat4; PART_COUNT],
}

impl FlightState {
    pub fn new(lift: f32, velocity: f32) -> Self {
        let position = Vec3::new(0.0, SPAWN_HEIGHT, 0.0);
        Self {
            position,
            angles: Vec3::ZERO,
            rotation: Mat4::IDENTITY,
            transformation: Mat4::from_translation(position),
            rotor_rotation: 0.0,
            lift,
            velocity,
            part_transforms: [Mat4::IDENTITY; PART_COUNT],
        }
    }

    /// Advance the flight state by one step of `dt` seconds.
    ///
    /// Total over its input domain: conflicting control pairs cancel to a
    /// zero signal, and any non-negative `dt` is valid (large steps jump
    /// proportionally far; there is no sub-stepping).
    pub fn update(&mut self, controls: &Controls, dt: f32) {
        let throttle = controls.signal(Control::ThrottleUp, Control::ThrottleDown);
        let yaw = controls.signal(Control::YawLeft, Control::YawRight);
        let pitch = controls.signal(Control::PitchDown, Control::PitchUp);
        let tilt = controls.signal(Control::RollRight, Control::RollLeft);

        // the craft's current up axis: rotated local Y
        let up = self.rotation.y_axis.truncate();
        let lift = up.normalize_or_zero() * (throttle * self.lift);

        // lift along the tilted up axis; horizontal drift from the
        // horizontal component of that axis, which is what makes banking
        // translate the craft instead of just leaning it
        self.position += dt * lift + dt * Vec3::new(up.x, 0.0, up.z) * self.velocity;

        // pitch/roll integrate input and decay toward level; yaw is free
        self.angles.x += dt * pitch - dt * self.angles.x / LEVELING_DIVISOR;
        self.angles.y += dt * yaw;
        self.angles.z += dt * tilt - dt * self.angles.z / LEVELING_DIVISOR;

        self.rotation = yaw_pitch_roll(self.angles);
        self.transformation = compose_transform(self.position, self.rotation);

        self.rotor_rotation += dt * ROTOR_RATE;
        self.part_transforms[Part::Rotor as usize] = rotate_about_pivot(
            MAIN_ROTOR_PIVOT,
            Mat4::from_rotation_y(self.rotor_rotation),
        );
        self.part_transforms[Part::TailRotor as usize] = rotate_about_pivot(
            TAIL_ROTOR_PIVOT,
            Mat4::from_rotation_x(self.rotor_rotation),
        );
    }

    /// Local transform of a part relative to the helicopter root.
    pub fn part_transform(&self, part: Part) -> Mat4 {
        self.part_transforms[part as usize]
    }

    /// World model matrix for a part: global composed on the left with
    /// the part's local transform.
    pub fn model_matrix(&self, part: Part) -> Mat4 {
        self.transformation * self.part_transforms[part as usize]
    }
}

/// Map sub-model names onto part slots. Count is checked before names;
/// matching is exact and order-independent.
fn part_slots(names: &[&str]) -> Result<[usize; PART_COUNT], HelicopterError> {
    if names.len() != PART_COUNT {
        return Err(HelicopterError::PartCount { found: names.len() });
    }
    let mut slots = [usize::MAX; PART_COUNT];
    for (index, name) in names.iter().enumerate() {
        let part = Part::from_name(name)
            .ok_or_else(|| HelicopterError::UnknownPart(name.to_string()))?;
        if slots[part as usize] != usize::MAX {
            return Err(HelicopterError::DuplicatePart(name.to_string()));
        }
        slots[part as usize] = index;
    }
    Ok(slots)
}

/// The helicopter: one GPU model per part plus the flight state.
pub struct Helicopter {
    parts: Vec<Model>,
    pub flight: FlightState,
}

impl Helicopter {
    /// Load the helicopter model and assemble parts into enum order.
    ///
    /// Fails hard on part-count mismatch or an unrecognized sub-model
    /// name; the demo aborts startup rather than flying half a machine.
    pub fn load(device: &wgpu::Device, path: &Path) -> Result<Self, HelicopterError> {
        let data: Vec<PartData> = load_parts(path)?;
        let names: Vec<&str> = data.iter().map(|p| p.name.as_str()).collect();
        let slots = part_slots(&names)?;

        let parts = slots.iter().map(|&i| data[i].upload(device)).collect();
        log::info!("Loaded helicopter ({PART_COUNT} parts) from {}", path.display());
        Ok(Self {
            parts,
            flight: FlightState::new(LIFT_GAIN, VELOCITY_GAIN),
        })
    }

    /// Advance the flight state by one step.
    pub fn update(&mut self, controls: &Controls, dt: f32) {
        self.flight.update(controls, dt);
    }

    /// Parts with their models, in enum order.
    pub fn parts(&self) -> impl Iterator<Item = (Part, &Model)> {
        Part::ALL.into_iter().zip(self.parts.iter())
    }

    /// Free all part GPU resources. Safe to call on an already-released
    /// helicopter (no-op); the helicopter must not be drawn afterwards.
    pub fn release(&mut self) {
        for model in self.parts.drain(..) {
            model.mesh.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn held(controls: &[Control]) -> Controls {
        let mut c = Controls::new();
        for &control in controls {
            c.set(control, true);
        }
        c
    }

    #[test]
    fn conflicting_inputs_are_a_no_op_on_motion() {
        let mut state = FlightState::new(1.0, 1.0);
        let controls = held(&[
            Control::ThrottleUp,
            Control::ThrottleDown,
            Control::YawLeft,
            Control::YawRight,
            Control::PitchUp,
            Control::PitchDown,
            Control::RollLeft,
            Control::RollRight,
        ]);
        state.update(&controls, 0.5);
        assert_eq!(state.position, Vec3::new(0.0, SPAWN_HEIGHT, 0.0));
        assert_eq!(state.angles, Vec3::ZERO);
    }

    #[test]
    fn zero_dt_step_changes_nothing_but_recomputes_derived_state() {
        let mut state = FlightState::new(1.0, 1.0);
        state.angles = Vec3::new(0.2, 1.0, -0.1);
        let before_pos = state.position;
        let before_angles = state.angles;
        let before_rotor = state.rotor_rotation;

        state.update(&held(&[Control::ThrottleUp]), 0.0);
        assert_eq!(state.position, before_pos);
        assert_eq!(state.angles, before_angles);
        assert_eq!(state.rotor_rotation, before_rotor);
        // derived matrices are rebuilt deterministically from the angles
        let expected = yaw_pitch_roll(before_angles);
        assert_eq!(state.rotation, expected);
        assert_eq!(state.transformation, compose_transform(before_pos, expected));
    }

    #[test]
    fn pitch_and_roll_decay_toward_level_with_no_input() {
        let mut state = FlightState::new(1.0, 1.0);
        state.angles = Vec3::new(0.4, 2.0, -0.3);
        let controls = Controls::new();
        let mut last = state.angles;
        for _ in 0..200 {
            state.update(&controls, 0.016);
            assert!(state.angles.x.abs() <= last.x.abs());
            assert!(state.angles.z.abs() <= last.z.abs());
            assert_eq!(state.angles.y, last.y);
            last = state.angles;
        }
        assert!(state.angles.x.abs() < 0.01);
        assert!(state.angles.z.abs() < 0.01);
    }

    #[test]
    fn rotor_spin_accumulates_at_fixed_rate_regardless_of_input() {
        let mut a = FlightState::new(1.0, 1.0);
        let mut b = FlightState::new(1.0, 1.0);
        let dt = 0.01;
        let steps = 50;
        for _ in 0..steps {
            a.update(&Controls::new(), dt);
            b.update(&held(&[Control::ThrottleUp, Control::RollRight]), dt);
        }
        let expected = 8.0 * PI * steps as f32 * dt;
        assert_relative_eq!(a.rotor_rotation, expected, epsilon = 1e-4);
        assert_relative_eq!(b.rotor_rotation, expected, epsilon = 1e-4);
    }

    #[test]
    fn throttle_up_from_level_climbs_by_exactly_the_lift_gain() {
        let mut state = FlightState::new(1.0, 1.0);
        state.update(&held(&[Control::ThrottleUp]), 1.0);
        // up axis starts as exactly (0,1,0) so the horizontal term is zero
        assert_relative_eq!(state.position.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(state.position.y, SPAWN_HEIGHT + 1.0, epsilon = 1e-6);
        assert_relative_eq!(state.position.z, 0.0, epsilon = 1e-6);
        assert_eq!(state.angles, Vec3::ZERO);
    }

    #[test]
    fn banking_translates_horizontally() {
        let mut state = FlightState::new(1.0, 1.0);
        // roll right for a while, then let the horizontal term act
        for _ in 0..30 {
            state.update(&held(&[Control::RollRight]), 0.016);
        }
        assert!(state.angles.z > 0.0);
        assert!(
            state.position.x.abs() > 0.0,
            "tilted up-vector must produce horizontal drift"
        );
    }

    #[test]
    fn yaw_integrates_without_decay() {
        let mut state = FlightState::new(1.0, 1.0);
        for _ in 0..100 {
            state.update(&held(&[Control::YawLeft]), 0.01);
        }
        assert_relative_eq!(state.angles.y, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn rotor_transforms_spin_about_their_pivots() {
        let mut state = FlightState::new(1.0, 1.0);
        state.update(&Controls::new(), 0.137);
        for (part, pivot) in [
            (Part::Rotor, MAIN_ROTOR_PIVOT),
            (Part::TailRotor, TAIL_ROTOR_PIVOT),
        ] {
            let moved = state.part_transform(part).transform_point3(pivot);
            assert_relative_eq!(moved.x, pivot.x, epsilon = 1e-4);
            assert_relative_eq!(moved.y, pivot.y, epsilon = 1e-4);
            assert_relative_eq!(moved.z, pivot.z, epsilon = 1e-4);
        }
        // other parts stay at identity
        assert_eq!(state.part_transform(Part::Body), Mat4::IDENTITY);
        assert_eq!(state.part_transform(Part::Slides), Mat4::IDENTITY);
    }

    #[test]
    fn model_matrix_composes_global_then_local() {
        let mut state = FlightState::new(1.0, 1.0);
        state.update(&held(&[Control::ThrottleUp]), 0.25);
        let expected = state.transformation * state.part_transform(Part::Rotor);
        assert_eq!(state.model_matrix(Part::Rotor), expected);
    }

    #[test]
    fn slot_assignment_is_order_independent() {
        let names = [
            "strobelight",
            "tail_rotor",
            "body",
            "positionlight",
            "rotor",
            "spotlight",
            "slides",
        ];
        let slots = part_slots(&names).unwrap();
        assert_eq!(slots[Part::Body as usize], 2);
        assert_eq!(slots[Part::TailRotor as usize], 1);
        assert_eq!(slots[Part::PositionLights as usize], 3);
    }

    #[test]
    fn six_parts_fail_on_count_before_names() {
        // deliberately includes a bogus name: count must win
        let names = ["body", "rotor", "slides", "spotlight", "strobelight", "bogus"];
        match part_slots(&names) {
            Err(HelicopterError::PartCount { found }) => assert_eq!(found, 6),
            other => panic!("expected count mismatch, got {other:?}"),
        }
    }

    #[test]
    fn missing_tail_rotor_name_is_unrecognized() {
        let names = [
            "body",
            "rotor",
            "tailrotor", // wrong: expected "tail_rotor"
            "slides",
            "spotlight",
            "strobelight",
            "positionlight",
        ];
        match part_slots(&names) {
            Err(HelicopterError::UnknownPart(name)) => assert_eq!(name, "tailrotor"),
            other => panic!("expected unknown part, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_part_name_is_rejected() {
        let names = [
            "body", "rotor", "rotor", "slides", "spotlight", "strobelight", "positionlight",
        ];
        assert!(matches!(
            part_slots(&names),
            Err(HelicopterError::DuplicatePart(_))
        ));
    }

    #[test]
    fn part_names_match_case_sensitively() {
        assert_eq!(Part::from_name("tail_rotor"), Some(Part::TailRotor));
        assert_eq!(Part::from_name("Tail_Rotor"), None);
        assert_eq!(Part::from_name(""), None);
    }
}
