// crates/turbdiag-cli/src/io/grid_file.rs

use std::io::Cursor;

use anyhow::{Context, Result};
use turbdiag_core::format::grid as grid_format;
use turbdiag_core::GridField;

const ZSTD_LEVEL: i32 = 3;

fn is_zst(path: &str) -> bool {
    path.ends_with(".zst")
}

/// Load a .tdg grid, inflating it first when the name ends in `.zst`.
pub fn load_grid(path: &str) -> Result<GridField> {
    let raw = std::fs::read(path).with_context(|| format!("read grid {path}"))?;
    let bytes = if is_zst(path) {
        zstd::stream::decode_all(Cursor::new(raw)).with_context(|| format!("zstd decode {path}"))?
    } else {
        raw
    };
    let field = grid_format::decode(&bytes).with_context(|| format!("decode grid {path}"))?;
    Ok(field)
}

/// Save a grid as .tdg (zstd-compressed when the name ends in `.zst`).
pub fn save_grid(path: &str, field: &GridField) -> Result<()> {
    let mut bytes = grid_format::encode(field).with_context(|| format!("encode grid {path}"))?;
    if is_zst(path) {
        bytes = zstd::stream::encode_all(Cursor::new(bytes), ZSTD_LEVEL)
            .with_context(|| format!("zstd encode {path}"))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write grid {path}"))?;
    Ok(())
}
