//! Scene lighting: one point light plus user-adjustable Phong term weights

use cgmath::Vector3;

/// The single point light of the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub color: Vector3<f32>,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vector3::new(5.0, 10.0, 5.0),
            color: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Which Phong term a lighting adjustment applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingTerm {
    Ambient,
    Diffuse,
    Specular,
}

/// Global multipliers for the ambient, diffuse and specular terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingStrengths {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
}

impl LightingStrengths {
    pub const STEP: f32 = 0.1;

    /// Adds `delta` to one term, never going below zero
    pub fn adjust(&mut self, term: LightingTerm, delta: f32) -> f32 {
        let value = match term {
            LightingTerm::Ambient => &mut self.ambient,
            LightingTerm::Diffuse => &mut self.diffuse,
            LightingTerm::Specular => &mut self.specular,
        };
        *value = (*value + delta).max(0.0);
        *value
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.ambient, self.diffuse, self.specular, 0.0]
    }
}

impl Default for LightingStrengths {
    fn default() -> Self {
        Self {
            ambient: 1.0,
            diffuse: 1.0,
            specular: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strengths_never_go_negative() {
        let mut strengths = LightingStrengths::default();
        for _ in 0..15 {
            strengths.adjust(LightingTerm::Diffuse, -LightingStrengths::STEP);
        }
        assert_eq!(strengths.diffuse, 0.0);
        assert_eq!(strengths.ambient, 1.0);

        let specular = strengths.adjust(LightingTerm::Specular, 0.5);
        assert!((specular - 1.5).abs() < 1e-6);
    }
}
