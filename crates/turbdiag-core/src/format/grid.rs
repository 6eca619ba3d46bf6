// crates/turbdiag-core/src/format/grid.rs

use crate::error::{DiagError, Result};
use crate::field::GridField;
use crate::format::checksum;
use crate::units::{Quantity, Unit};

const MAGIC: &[u8; 4] = b"TDG1";
const VERSION: u16 = 1;

/// Binary grid container (owned).
/// Layout (little-endian):
/// MAGIC[4]
/// version:u16
/// nx1:u32 nx2:u32 nx3:u32
/// unit_len:u16 unit:[u8; unit_len]   (UTF-8 unit symbol)
/// has_dx:u8
/// [has_dx] dx:f64 dx_unit_len:u16 dx_unit:[u8]
/// values: nx1*nx2*nx3 f64, row-major (x3 fastest)
/// crc32:u32          (over everything before crc32)
/// blake3_16:[16]     (over everything before blake3)
///
/// The trailer is checked before any header field is trusted. Extents past
/// u32 and strings past u16 are rejected rather than truncated.
pub fn encode(field: &GridField) -> Result<Vec<u8>> {
    let [n1, n2, n3] = field.shape();
    let mut b = Vec::with_capacity(64 + field.len() * 8);
    b.extend_from_slice(MAGIC);
    b.extend_from_slice(&VERSION.to_le_bytes());

    for n in [n1, n2, n3] {
        let n = u32::try_from(n)
            .map_err(|_| DiagError::GridFormat(format!("extent {n} does not fit u32")))?;
        b.extend_from_slice(&n.to_le_bytes());
    }
    write_str(&mut b, &field.unit().symbol())?;

    match field.spacing() {
        Some(dx) => {
            b.push(1);
            b.extend_from_slice(&dx.value.to_le_bytes());
            write_str(&mut b, &dx.unit.symbol())?;
        }
        None => b.push(0),
    }

    for v in field.values().iter() {
        b.extend_from_slice(&v.to_le_bytes());
    }

    checksum::seal(&mut b);
    Ok(b)
}

pub fn decode(bytes: &[u8]) -> Result<GridField> {
    if bytes.len() < 4 || &bytes[0..4] != MAGIC {
        return Err(DiagError::GridFormat("bad magic".into()));
    }
    let (bytes, _) = checksum::verify(bytes)?;
    let mut i = 4usize;

    let version = read_u16(bytes, &mut i)?;
    if version != VERSION {
        return Err(DiagError::GridFormat(format!("unsupported version {version}")));
    }

    let shape = [
        read_u32(bytes, &mut i)? as usize,
        read_u32(bytes, &mut i)? as usize,
        read_u32(bytes, &mut i)? as usize,
    ];
    let unit = Unit::parse(&read_str(bytes, &mut i)?)?;

    let has_dx = read_u8(bytes, &mut i)?;
    let dx = match has_dx {
        0 => None,
        1 => {
            let value = read_f64(bytes, &mut i)?;
            let u = Unit::parse(&read_str(bytes, &mut i)?)?;
            Some(Quantity::new(value, u))
        }
        _ => return Err(DiagError::GridFormat("bad dx flag".into())),
    };

    let total = shape[0]
        .checked_mul(shape[1])
        .and_then(|x| x.checked_mul(shape[2]))
        .ok_or_else(|| DiagError::GridFormat("shape overflows".into()))?;
    need(bytes, i, total.saturating_mul(8))?;
    let mut data = Vec::with_capacity(total);
    for _ in 0..total {
        data.push(read_f64(bytes, &mut i)?);
    }

    if i != bytes.len() {
        return Err(DiagError::GridFormat(format!(
            "{} bytes after values",
            bytes.len() - i
        )));
    }

    let field = GridField::from_shape_vec(shape, data, unit)?;
    match dx {
        Some(dx) => field.with_spacing(dx),
        None => Ok(field),
    }
}

/// Content id of an encoded grid: hex of its trailing blake3_16.
pub fn grid_id_hex(field: &GridField) -> Result<String> {
    let enc = encode(field)?;
    let mut id = [0u8; 16];
    id.copy_from_slice(&enc[enc.len() - 16..]);
    Ok(hex16(&id))
}

fn hex16(id: &[u8; 16]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut s = String::with_capacity(32);
    for &b in id {
        s.push(HEX[(b >> 4) as usize] as char);
        s.push(HEX[(b & 0x0F) as usize] as char);
    }
    s
}

fn write_str(b: &mut Vec<u8>, s: &str) -> Result<()> {
    let len = u16::try_from(s.len())
        .map_err(|_| DiagError::GridFormat(format!("string of {} bytes does not fit u16", s.len())))?;
    b.extend_from_slice(&len.to_le_bytes());
    b.extend_from_slice(s.as_bytes());
    Ok(())
}

fn need(bytes: &[u8], i: usize, n: usize) -> Result<()> {
    if bytes.len() < i.saturating_add(n) {
        return Err(DiagError::GridFormat("unexpected eof".into()));
    }
    Ok(())
}

fn take<const N: usize>(bytes: &[u8], i: &mut usize) -> Result<[u8; N]> {
    need(bytes, *i, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[*i..*i + N]);
    *i += N;
    Ok(out)
}

fn read_u8(bytes: &[u8], i: &mut usize) -> Result<u8> {
    Ok(take::<1>(bytes, i)?[0])
}

fn read_u16(bytes: &[u8], i: &mut usize) -> Result<u16> {
    Ok(u16::from_le_bytes(take(bytes, i)?))
}

fn read_u32(bytes: &[u8], i: &mut usize) -> Result<u32> {
    Ok(u32::from_le_bytes(take(bytes, i)?))
}

fn read_f64(bytes: &[u8], i: &mut usize) -> Result<f64> {
    Ok(f64::from_le_bytes(take(bytes, i)?))
}

fn read_str(bytes: &[u8], i: &mut usize) -> Result<String> {
    let len = read_u16(bytes, i)? as usize;
    need(bytes, *i, len)?;
    let s = std::str::from_utf8(&bytes[*i..*i + len])
        .map_err(|_| DiagError::GridFormat("unit is not utf-8".into()))?
        .to_string();
    *i += len;
    Ok(s)
}
