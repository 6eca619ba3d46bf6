// crates/turbdiag-core/src/cubes/mod.rs

pub mod partition;
pub mod sequence;

use ndarray::s;

use crate::error::Result;
use crate::field::GridField;
use crate::validate::validate_cubes_per_side;

pub use partition::CubePartition;
pub use sequence::RmsSequence;

/// Root-mean-square of `field` inside each of `cubes_per_side`^3 sub-cubes.
///
/// The field must be cubic. It is cropped symmetrically to the largest
/// cube-divisible region; cubes with no cells (more cubes than cells per
/// side) yield NaN. Values keep the field's unit.
pub fn compute_rms_in_cubes(field: &GridField, cubes_per_side: usize) -> Result<RmsSequence> {
    validate_cubes_per_side(cubes_per_side)?;
    let edge = field.edge_length()?;
    let part = CubePartition::new(edge, cubes_per_side);
    tracing::debug!(
        edge,
        cubes_per_side,
        cube_dim = part.cube_dim,
        start = part.start,
        "partitioned grid"
    );

    let values = field.values();
    let mut out = Vec::with_capacity(part.cube_count());
    for (i, j, k) in part.cubes() {
        let cube = values.slice(s![part.axis_range(i), part.axis_range(j), part.axis_range(k)]);
        let rms = if cube.is_empty() {
            f64::NAN
        } else {
            let mean_sq = cube.iter().map(|v| v * v).sum::<f64>() / cube.len() as f64;
            mean_sq.sqrt()
        };
        out.push(rms);
    }

    if part.cube_dim == 0 {
        tracing::warn!(edge, cubes_per_side, "more cubes than cells per side, every cube is NaN");
    }
    Ok(RmsSequence::new(out, field.unit().clone(), cubes_per_side))
}
