//! Faceted B-rep STEP (AP203) writer.
//!
//! The merged assembly mesh is written triangle by triangle: each
//! triangle becomes a planar `FACE_SURFACE` bounded by a `POLY_LOOP`,
//! all faces close into one `FACETED_BREP`. Coordinates are millimeters.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use orgelbau_math::{Point3, Vec3};

use crate::assembly::Assembly;
use crate::export::ExportError;

struct StepWriter<W: Write> {
    out: W,
    next_id: usize,
}

impl<W: Write> StepWriter<W> {
    fn new(out: W) -> Self {
        Self { out, next_id: 1 }
    }

    /// Write one entity and return its id.
    fn entity(&mut self, body: &str) -> Result<usize, ExportError> {
        let id = self.next_id;
        self.next_id += 1;
        writeln!(self.out, "#{id} = {body};")?;
        Ok(id)
    }

    fn point(&mut self, p: &Point3) -> Result<usize, ExportError> {
        self.entity(&format!(
            "CARTESIAN_POINT ( 'NONE', ( {:.6}, {:.6}, {:.6} ) )",
            p.x, p.y, p.z
        ))
    }

    fn direction(&mut self, v: &Vec3) -> Result<usize, ExportError> {
        self.entity(&format!(
            "DIRECTION ( 'NONE', ( {:.9}, {:.9}, {:.9} ) )",
            v.x, v.y, v.z
        ))
    }
}

fn id_list(ids: &[usize]) -> String {
    ids.iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A vector not parallel to `normal`, for the plane's reference axis.
fn reference_axis(normal: &Vec3) -> Vec3 {
    let candidate = if normal.x.abs() < 0.9 {
        Vec3::new(1.0, 0.0, 0.0)
    } else {
        Vec3::new(0.0, 1.0, 0.0)
    };
    let projected = candidate - normal * candidate.dot(normal);
    projected.normalize()
}

/// Write the assembly as an ISO-10303-21 file.
pub fn write_step(assembly: &Assembly, path: &Path) -> Result<(), ExportError> {
    let mesh = assembly.merged_mesh();
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "ISO-10303-21;")?;
    writeln!(out, "HEADER;")?;
    writeln!(
        out,
        "FILE_DESCRIPTION ( ( 'organ console {}' ), '2;1' );",
        assembly.name
    )?;
    writeln!(
        out,
        "FILE_NAME ( '{}.step', '', ( '' ), ( '' ), 'orgelbau', '', '' );",
        assembly.name
    )?;
    writeln!(out, "FILE_SCHEMA ( ( 'CONFIG_CONTROL_DESIGN' ) );")?;
    writeln!(out, "ENDSEC;")?;
    writeln!(out, "DATA;")?;

    let mut w = StepWriter::new(out);

    let app = w.entity("APPLICATION_CONTEXT ( 'configuration controlled 3d designs of mechanical parts and assemblies' )")?;
    w.entity(&format!(
        "APPLICATION_PROTOCOL_DEFINITION ( 'international standard', 'config_control_design', 1994, #{app} )"
    ))?;
    let product_context = w.entity(&format!(
        "MECHANICAL_CONTEXT ( 'NONE', #{app}, 'mechanical' )"
    ))?;
    let product = w.entity(&format!(
        "PRODUCT ( '{0}', '{0}', '', ( #{product_context} ) )",
        assembly.name
    ))?;
    let formation = w.entity(&format!(
        "PRODUCT_DEFINITION_FORMATION_WITH_SPECIFIED_SOURCE ( 'ANY', '', #{product}, .NOT_KNOWN. )"
    ))?;
    let def_context = w.entity(&format!(
        "PRODUCT_DEFINITION_CONTEXT ( 'detailed design', #{app}, 'design' )"
    ))?;
    let definition = w.entity(&format!(
        "PRODUCT_DEFINITION ( 'UNKNOWN', '', #{formation}, #{def_context} )"
    ))?;
    let shape = w.entity(&format!(
        "PRODUCT_DEFINITION_SHAPE ( 'NONE', 'NONE', #{definition} )"
    ))?;

    // Units: millimeters, radians, steradians, with a sewing tolerance.
    let length_unit =
        w.entity("( LENGTH_UNIT ( ) NAMED_UNIT ( * ) SI_UNIT ( .MILLI., .METRE. ) )")?;
    let angle_unit =
        w.entity("( NAMED_UNIT ( * ) PLANE_ANGLE_UNIT ( ) SI_UNIT ( $, .RADIAN. ) )")?;
    let solid_angle_unit =
        w.entity("( NAMED_UNIT ( * ) SI_UNIT ( $, .STERADIAN. ) SOLID_ANGLE_UNIT ( ) )")?;
    let uncertainty = w.entity(&format!(
        "UNCERTAINTY_MEASURE_WITH_UNIT ( LENGTH_MEASURE ( 1.0E-05 ), #{length_unit}, 'distance_accuracy_value', 'NONE' )"
    ))?;
    let geom_context = w.entity(&format!(
        "( GEOMETRIC_REPRESENTATION_CONTEXT ( 3 ) GLOBAL_UNCERTAINTY_ASSIGNED_CONTEXT ( ( #{uncertainty} ) ) GLOBAL_UNIT_ASSIGNED_CONTEXT ( ( #{length_unit}, #{angle_unit}, #{solid_angle_unit} ) ) REPRESENTATION_CONTEXT ( 'NONE', 'WORKSPACE' ) )"
    ))?;

    let mut faces = Vec::with_capacity(mesh.num_triangles());
    for t in 0..mesh.num_triangles() {
        let [a, b, c] = mesh.triangle(t);
        let n = (b - a).cross(&(c - a));
        if n.norm() < 1e-12 {
            continue;
        }
        let n = n.normalize();

        let pa = w.point(&a)?;
        let pb = w.point(&b)?;
        let pc = w.point(&c)?;
        let loop_id = w.entity(&format!(
            "POLY_LOOP ( 'NONE', ( {} ) )",
            id_list(&[pa, pb, pc])
        ))?;
        let bound = w.entity(&format!("FACE_OUTER_BOUND ( 'NONE', #{loop_id}, .T. )"))?;

        let origin = w.point(&a)?;
        let axis = w.direction(&n)?;
        let ref_dir = w.direction(&reference_axis(&n))?;
        let placement = w.entity(&format!(
            "AXIS2_PLACEMENT_3D ( 'NONE', #{origin}, #{axis}, #{ref_dir} )"
        ))?;
        let plane = w.entity(&format!("PLANE ( 'NONE', #{placement} )"))?;
        let face = w.entity(&format!(
            "FACE_SURFACE ( 'NONE', ( #{bound} ), #{plane}, .T. )"
        ))?;
        faces.push(face);
    }

    let shell = w.entity(&format!("CLOSED_SHELL ( 'NONE', ( {} ) )", id_list(&faces)))?;
    let brep = w.entity(&format!("FACETED_BREP ( 'NONE', #{shell} )"))?;
    let representation = w.entity(&format!(
        "FACETED_BREP_SHAPE_REPRESENTATION ( '{}', ( #{brep} ), #{geom_context} )",
        assembly.name
    ))?;
    w.entity(&format!(
        "SHAPE_DEFINITION_REPRESENTATION ( #{shape}, #{representation} )"
    ))?;

    let mut out = w.out;
    writeln!(out, "ENDSEC;")?;
    writeln!(out, "END-ISO-10303-21;")?;
    out.flush()?;
    Ok(())
}
