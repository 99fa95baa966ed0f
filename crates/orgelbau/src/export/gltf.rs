//! glTF 2.0 writer.
//!
//! The document is built by hand as a `serde_json` tree: one mesh and
//! one node per part, deduplicated PBR materials, the whole geometry
//! buffer embedded as a base64 data URI. Lacquered woods carry a
//! `KHR_materials_clearcoat` layer and the scene ships a small
//! `KHR_lights_punctual` rig so viewers without their own lighting show
//! something sensible.

use std::fs;
use std::path::Path;

use base64::Engine as _;
use serde_json::{json, Value};

use crate::assembly::Assembly;
use crate::export::ExportError;
use crate::materials::Material;

const GL_ARRAY_BUFFER: u32 = 34962;
const GL_ELEMENT_ARRAY_BUFFER: u32 = 34963;
const GL_FLOAT: u32 = 5126;
const GL_UNSIGNED_INT: u32 = 5125;

// Rotation about X by -90 degrees, mapping the Z-up model frame onto
// the Y-up glTF frame (and aiming a light's -Z axis straight down).
const Z_UP_TO_Y_UP: [f64; 4] = [-std::f64::consts::FRAC_1_SQRT_2, 0.0, 0.0, std::f64::consts::FRAC_1_SQRT_2];

struct BufferBuilder {
    bytes: Vec<u8>,
    views: Vec<Value>,
}

impl BufferBuilder {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            views: Vec::new(),
        }
    }

    fn push_view(&mut self, data: &[u8], target: u32) -> usize {
        let offset = self.bytes.len();
        self.bytes.extend_from_slice(data);
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": data.len(),
            "target": target,
        }));
        self.views.len() - 1
    }
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn u32_bytes(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn position_min_max(vertices: &[f32]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    for chunk in vertices.chunks_exact(3) {
        for axis in 0..3 {
            min[axis] = min[axis].min(chunk[axis]);
            max[axis] = max[axis].max(chunk[axis]);
        }
    }
    (min, max)
}

fn material_json(material: Material) -> Value {
    let mut doc = json!({
        "name": material.name(),
        "pbrMetallicRoughness": {
            "baseColorFactor": material.base_color(),
            "metallicFactor": material.metallic(),
            "roughnessFactor": material.roughness(),
        },
    });
    if material.clearcoat() {
        doc["extensions"] = json!({
            "KHR_materials_clearcoat": {
                "clearcoatFactor": 0.8,
                "clearcoatRoughnessFactor": 0.1,
            },
        });
    }
    doc
}

/// Three-light rig: one warm directional and two spots above the
/// console, all defined in the Y-up scene frame.
fn lights_json() -> (Vec<Value>, Vec<Value>) {
    let lights = vec![
        json!({
            "type": "directional",
            "name": "nave",
            "color": [1.0, 0.95, 0.8],
            "intensity": 4.0,
        }),
        json!({
            "type": "spot",
            "name": "console left",
            "color": [1.0, 0.9, 0.75],
            "intensity": 800_000.0,
            "spot": { "innerConeAngle": 0.4, "outerConeAngle": 0.9 },
        }),
        json!({
            "type": "spot",
            "name": "console right",
            "color": [1.0, 0.9, 0.75],
            "intensity": 800_000.0,
            "spot": { "innerConeAngle": 0.4, "outerConeAngle": 0.9 },
        }),
    ];
    let nodes = vec![
        json!({
            "name": "nave light",
            "rotation": Z_UP_TO_Y_UP,
            "extensions": { "KHR_lights_punctual": { "light": 0 } },
        }),
        json!({
            "name": "spot left",
            "translation": [-1200.0, 2200.0, 800.0],
            "rotation": Z_UP_TO_Y_UP,
            "extensions": { "KHR_lights_punctual": { "light": 1 } },
        }),
        json!({
            "name": "spot right",
            "translation": [1200.0, 2200.0, 800.0],
            "rotation": Z_UP_TO_Y_UP,
            "extensions": { "KHR_lights_punctual": { "light": 2 } },
        }),
    ];
    (lights, nodes)
}

/// Build the glTF document for an assembly.
pub fn gltf_document(assembly: &Assembly) -> Result<Value, ExportError> {
    let mut buffer = BufferBuilder::new();
    let mut accessors: Vec<Value> = Vec::new();
    let mut meshes: Vec<Value> = Vec::new();
    let mut nodes: Vec<Value> = Vec::new();
    let mut materials: Vec<Value> = Vec::new();
    let mut material_index: Vec<Material> = Vec::new();

    for part in &assembly.parts {
        let mesh = &part.mesh;

        let mat = match material_index.iter().position(|m| *m == part.material) {
            Some(i) => i,
            None => {
                material_index.push(part.material);
                materials.push(material_json(part.material));
                materials.len() - 1
            }
        };

        let pos_view = buffer.push_view(&f32_bytes(&mesh.vertices), GL_ARRAY_BUFFER);
        let nrm_view = buffer.push_view(&f32_bytes(&mesh.normals), GL_ARRAY_BUFFER);
        let idx_view = buffer.push_view(&u32_bytes(&mesh.indices), GL_ELEMENT_ARRAY_BUFFER);

        let (min, max) = position_min_max(&mesh.vertices);
        let pos_accessor = accessors.len();
        accessors.push(json!({
            "bufferView": pos_view,
            "componentType": GL_FLOAT,
            "count": mesh.num_vertices(),
            "type": "VEC3",
            "min": min,
            "max": max,
        }));
        accessors.push(json!({
            "bufferView": nrm_view,
            "componentType": GL_FLOAT,
            "count": mesh.num_vertices(),
            "type": "VEC3",
        }));
        accessors.push(json!({
            "bufferView": idx_view,
            "componentType": GL_UNSIGNED_INT,
            "count": mesh.indices.len(),
            "type": "SCALAR",
        }));

        meshes.push(json!({
            "name": part.name,
            "primitives": [{
                "attributes": {
                    "POSITION": pos_accessor,
                    "NORMAL": pos_accessor + 1,
                },
                "indices": pos_accessor + 2,
                "material": mat,
            }],
        }));
        nodes.push(json!({
            "name": part.name,
            "mesh": meshes.len() - 1,
        }));
    }

    let part_nodes: Vec<usize> = (0..nodes.len()).collect();
    let root = nodes.len();
    nodes.push(json!({
        "name": assembly.name,
        "rotation": Z_UP_TO_Y_UP,
        "children": part_nodes,
    }));

    let (lights, light_nodes) = lights_json();
    let mut scene_roots = vec![root];
    for node in light_nodes {
        scene_roots.push(nodes.len());
        nodes.push(node);
    }

    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&buffer.bytes)
    );

    let mut extensions_used = vec!["KHR_lights_punctual"];
    if material_index.iter().any(|m| m.clearcoat()) {
        extensions_used.push("KHR_materials_clearcoat");
    }

    Ok(json!({
        "asset": { "version": "2.0", "generator": "orgelbau" },
        "extensionsUsed": extensions_used,
        "extensions": { "KHR_lights_punctual": { "lights": lights } },
        "scene": 0,
        "scenes": [{ "name": assembly.name, "nodes": scene_roots }],
        "nodes": nodes,
        "meshes": meshes,
        "materials": materials,
        "accessors": accessors,
        "bufferViews": buffer.views,
        "buffers": [{ "byteLength": buffer.bytes.len(), "uri": uri }],
    }))
}

/// Write the assembly as a self-contained `.gltf` file.
pub fn write_gltf(assembly: &Assembly, path: &Path) -> Result<(), ExportError> {
    let doc = gltf_document(assembly)?;
    fs::write(path, serde_json::to_string_pretty(&doc)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::small_assembly;

    #[test]
    fn test_one_mesh_and_node_per_part() {
        let assembly = small_assembly();
        let doc = gltf_document(&assembly).unwrap();
        assert_eq!(doc["meshes"].as_array().unwrap().len(), 2);
        // Two part nodes, the root, three light nodes.
        assert_eq!(doc["nodes"].as_array().unwrap().len(), 6);
        assert_eq!(doc["meshes"][0]["name"], "Panel");
        assert_eq!(doc["nodes"][0]["name"], "Panel");
    }

    #[test]
    fn test_materials_are_deduplicated() {
        let assembly = small_assembly();
        let doc = gltf_document(&assembly).unwrap();
        // Both boards are oak.
        assert_eq!(doc["materials"].as_array().unwrap().len(), 1);
        assert_eq!(doc["materials"][0]["name"], "oak");
        assert_eq!(
            doc["materials"][0]["extensions"]["KHR_materials_clearcoat"]["clearcoatFactor"],
            0.8
        );
    }

    #[test]
    fn test_buffer_is_embedded() {
        let doc = gltf_document(&small_assembly()).unwrap();
        let uri = doc["buffers"][0]["uri"].as_str().unwrap();
        assert!(uri.starts_with("data:application/octet-stream;base64,"));
    }

    #[test]
    fn test_light_rig_present() {
        let doc = gltf_document(&small_assembly()).unwrap();
        let lights = doc["extensions"]["KHR_lights_punctual"]["lights"]
            .as_array()
            .unwrap();
        assert_eq!(lights.len(), 3);
        assert_eq!(lights[0]["type"], "directional");
        assert_eq!(lights[0]["intensity"], 4.0);
    }

    #[test]
    fn test_written_file_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gltf");
        write_gltf(&small_assembly(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["asset"]["version"], "2.0");
    }
}
