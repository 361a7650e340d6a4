//! Light types and the scene lighting uniform.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// Number of spotlight slots in the shader. Fixed: three white + one red.
pub const SPOT_LIGHT_COUNT: usize = 4;

/// A spotlight: cone light with distance attenuation.
#[derive(Debug, Clone, Copy)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec4,
    /// Constant attenuation coefficient.
    pub constant: f32,
    /// Linear attenuation coefficient.
    pub linear: f32,
    /// Quadratic attenuation coefficient.
    pub quadratic: f32,
    /// Cone half-angle, radians.
    pub phi: f32,
}

/// One spotlight slot in GPU layout (vec4-aligned like WGSL expects).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SpotLightUniform {
    /// xyz = position, w unused.
    pub position: [f32; 4],
    /// xyz = direction, w unused.
    pub direction: [f32; 4],
    pub color: [f32; 4],
    /// x = constant, y = linear, z = quadratic, w = cos(phi).
    pub params: [f32; 4],
}

impl SpotLightUniform {
    /// Pack a spotlight. A disabled light packs with black color so the
    /// shader contribution is zero without a branch on the CPU side.
    pub fn pack(light: &SpotLight, on: bool) -> Self {
        let color = if on { light.color } else { Vec4::new(0.0, 0.0, 0.0, 1.0) };
        Self {
            position: [light.position.x, light.position.y, light.position.z, 0.0],
            direction: [light.direction.x, light.direction.y, light.direction.z, 0.0],
            color: color.to_array(),
            params: [light.constant, light.linear, light.quadratic, light.phi.cos()],
        }
    }
}

/// Scene lighting uniform (must match shader.wgsl Lights).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightsUniform {
    /// xyz = direction of the directional light, w unused.
    pub dir_light_direction: [f32; 4],
    pub dir_light_color: [f32; 4],
    /// x = ambient factor, yzw unused.
    pub ambient: [f32; 4],
    pub spot_lights: [SpotLightUniform; SPOT_LIGHT_COUNT],
}

impl Default for LightsUniform {
    fn default() -> Self {
        Self {
            dir_light_direction: [0.0, -1.0, -1.0, 0.0],
            dir_light_color: [0.05, 0.05, 0.07, 1.0],
            ambient: [0.1, 0.0, 0.0, 0.0],
            spot_lights: [SpotLightUniform::zeroed(); SPOT_LIGHT_COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> SpotLight {
        SpotLight {
            position: Vec3::new(0.0, 5.0, 0.0),
            direction: Vec3::Z,
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            constant: 0.6,
            linear: 0.09,
            quadratic: 0.032,
            phi: 50f32.to_radians(),
        }
    }

    #[test]
    fn disabled_light_packs_black() {
        let packed = SpotLightUniform::pack(&light(), false);
        assert_eq!(packed.color, [0.0, 0.0, 0.0, 1.0]);
        // geometry and attenuation survive the toggle
        assert_eq!(packed.position[1], 5.0);
        assert_eq!(packed.params[0], 0.6);
    }

    #[test]
    fn phi_is_stored_as_cosine() {
        let packed = SpotLightUniform::pack(&light(), true);
        assert!((packed.params[3] - 50f32.to_radians().cos()).abs() < 1e-6);
    }

    #[test]
    fn negative_phi_cosine_matches_positive() {
        // the authored red strobe uses phi = -60 degrees; cos is even
        let mut l = light();
        l.phi = (-60f32).to_radians();
        let packed = SpotLightUniform::pack(&l, true);
        assert!((packed.params[3] - 60f32.to_radians().cos()).abs() < 1e-6);
    }
}
