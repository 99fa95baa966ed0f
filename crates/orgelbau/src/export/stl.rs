//! Binary STL writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::assembly::Assembly;
use crate::export::ExportError;

/// Write the merged assembly mesh as little-endian binary STL.
pub fn write_stl(assembly: &Assembly, path: &Path) -> Result<(), ExportError> {
    let mesh = assembly.merged_mesh();
    let mut out = BufWriter::new(File::create(path)?);

    let mut header = [0u8; 80];
    let label = format!("orgelbau {}", assembly.name);
    let n = label.len().min(80);
    header[..n].copy_from_slice(&label.as_bytes()[..n]);
    out.write_all(&header)?;
    out.write_all(&(mesh.num_triangles() as u32).to_le_bytes())?;

    for t in 0..mesh.num_triangles() {
        let [a, b, c] = mesh.triangle(t);
        let normal = (b - a).cross(&(c - a));
        let normal = if normal.norm() > 1e-12 {
            normal.normalize()
        } else {
            normal
        };
        for v in [normal.x, normal.y, normal.z] {
            out.write_all(&(v as f32).to_le_bytes())?;
        }
        for p in [a, b, c] {
            for v in [p.x, p.y, p.z] {
                out.write_all(&(v as f32).to_le_bytes())?;
            }
        }
        out.write_all(&0u16.to_le_bytes())?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::small_assembly;

    #[test]
    fn test_file_size_matches_triangle_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.stl");
        let assembly = small_assembly();
        write_stl(&assembly, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap()) as usize;
        assert_eq!(count, assembly.merged_mesh().num_triangles());
        assert_eq!(bytes.len(), 84 + count * 50);
    }

    #[test]
    fn test_header_carries_assembly_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.stl");
        write_stl(&small_assembly(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes[..80].starts_with(b"orgelbau test"));
    }
}
