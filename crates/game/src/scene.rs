//! Scene lighting rig: one directional light plus four spotlights
//! mounted around the pad, with day/night and strobe toggles.

use bytemuck::Zeroable;
use engine_core::{Vec3, Vec4};
use renderer::{LightsUniform, SpotLight, SpotLightUniform, SPOT_LIGHT_COUNT};

/// Sky clear color, a daylight blue.
pub const SKY_COLOR: wgpu::Color = wgpu::Color {
    r: 135.0 / 255.0,
    g: 206.0 / 255.0,
    b: 235.0 / 255.0,
    a: 1.0,
};

/// Sky clear color after dark.
pub const NIGHT_SKY_COLOR: wgpu::Color = wgpu::Color {
    r: 0.01,
    g: 0.01,
    b: 0.03,
    a: 1.0,
};

const DAY_DIR_COLOR: Vec4 = Vec4::new(0.4, 0.4, 0.3, 1.0);
const NIGHT_DIR_COLOR: Vec4 = Vec4::new(0.05, 0.05, 0.07, 1.0);
const AMBIENT: f32 = 0.1;
const DIR_LIGHT_DIRECTION: Vec3 = Vec3::new(0.0, -1.0, -1.0);

/// Strobe blink period in seconds (half on, half off).
const STROBE_PERIOD: f32 = 2.0;

/// The four fixed spotlights: three white pad floods and one red strobe.
#[derive(Debug, Clone)]
pub struct SceneLights {
    spot_lights: [SpotLight; SPOT_LIGHT_COUNT],
    pub is_day: bool,
    pub white_lights_on: bool,
    strobe_lit: bool,
}

impl SceneLights {
    pub fn new() -> Self {
        let white = Vec4::ONE;
        let flood = |position, direction, constant, phi_degrees: f32| SpotLight {
            position,
            direction,
            color: white,
            constant,
            linear: 0.09,
            quadratic: 0.032,
            phi: phi_degrees.to_radians(),
        };
        let spot_lights = [
            flood(Vec3::new(-1.0, 5.0, -2.0), Vec3::X, 0.4, 30.0),
            flood(Vec3::new(1.0, 5.0, -2.0), Vec3::NEG_X, 0.4, 30.0),
            // the forward flood attenuates harder than the side pair
            flood(Vec3::new(0.0, 5.0, 0.0), Vec3::Z, 0.6, 50.0),
            SpotLight {
                position: Vec3::new(0.0, 2.0, -5.0),
                direction: Vec3::Y,
                color: Vec4::new(1.0, 0.2, 0.2, 1.0),
                constant: 0.6,
                linear: 0.09,
                quadratic: 0.032,
                phi: (-60.0f32).to_radians(),
            },
        ];
        Self {
            spot_lights,
            // launch after dark so the spotlight rig reads immediately
            is_day: false,
            white_lights_on: true,
            strobe_lit: false,
        }
    }

    /// Drive the strobe from elapsed time: lit during the first half of
    /// each period, dark during the second.
    pub fn update_strobe(&mut self, elapsed: f32) {
        self.strobe_lit = (elapsed / (STROBE_PERIOD / 2.0)) as u64 % 2 == 0;
    }

    pub fn strobe_lit(&self) -> bool {
        self.strobe_lit
    }

    /// Clear color for the current time of day.
    pub fn sky_color(&self) -> wgpu::Color {
        if self.is_day { SKY_COLOR } else { NIGHT_SKY_COLOR }
    }

    /// Pack the rig into the shader uniform for the current frame.
    pub fn uniform(&self) -> LightsUniform {
        let mut spot_lights = [SpotLightUniform::zeroed(); SPOT_LIGHT_COUNT];
        for (i, light) in self.spot_lights.iter().enumerate() {
            // the last slot is the red strobe, gated by its blink phase
            let on = if i == SPOT_LIGHT_COUNT - 1 {
                self.strobe_lit
            } else {
                self.white_lights_on
            };
            spot_lights[i] = SpotLightUniform::pack(light, on);
        }
        let dir_color = if self.is_day { DAY_DIR_COLOR } else { NIGHT_DIR_COLOR };
        LightsUniform {
            dir_light_direction: [
                DIR_LIGHT_DIRECTION.x,
                DIR_LIGHT_DIRECTION.y,
                DIR_LIGHT_DIRECTION.z,
                0.0,
            ],
            dir_light_color: dir_color.to_array(),
            ambient: [AMBIENT, 0.0, 0.0, 0.0],
            spot_lights,
        }
    }
}

impl Default for SceneLights {
    fn default() -> Self {
        Self::new()
    }
}
