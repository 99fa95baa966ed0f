//! Material presets for rendering and export.

use serde::{Deserialize, Serialize};

/// Surface material of a part, used by the glTF exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    /// Lacquered oak, the default cabinet wood.
    #[default]
    Oak,
    /// Darker walnut, used for pedals and the bench.
    Walnut,
    /// Near-black ebony for sharps.
    Ebony,
    /// Ivory-colored key tops.
    Bone,
    /// Red felt for the keyboard bed.
    Felt,
}

impl Material {
    /// Lowercase material name, used for glTF material labels.
    pub fn name(&self) -> &'static str {
        match self {
            Material::Oak => "oak",
            Material::Walnut => "walnut",
            Material::Ebony => "ebony",
            Material::Bone => "bone",
            Material::Felt => "felt",
        }
    }

    /// Linear-space RGBA base color factor.
    pub fn base_color(&self) -> [f32; 4] {
        match self {
            Material::Oak => [0.55, 0.35, 0.17, 1.0],
            Material::Walnut => [0.33, 0.20, 0.11, 1.0],
            Material::Ebony => [0.04, 0.04, 0.05, 1.0],
            Material::Bone => [0.93, 0.91, 0.83, 1.0],
            Material::Felt => [0.58, 0.05, 0.08, 1.0],
        }
    }

    /// Metallic factor (woods and textiles are dielectric).
    pub fn metallic(&self) -> f32 {
        0.0
    }

    /// Roughness factor.
    pub fn roughness(&self) -> f32 {
        match self {
            Material::Oak | Material::Walnut => 0.55,
            Material::Ebony => 0.35,
            Material::Bone => 0.4,
            Material::Felt => 0.95,
        }
    }

    /// Whether the surface carries a lacquer clearcoat layer.
    pub fn clearcoat(&self) -> bool {
        matches!(self, Material::Oak | Material::Walnut | Material::Ebony)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_woods_have_clearcoat() {
        assert!(Material::Oak.clearcoat());
        assert!(Material::Walnut.clearcoat());
        assert!(!Material::Bone.clearcoat());
        assert!(!Material::Felt.clearcoat());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Material::Ebony).unwrap();
        assert_eq!(json, "\"ebony\"");
        let back: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Material::Ebony);
    }
}
