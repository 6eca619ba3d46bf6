// crates/turbdiag-core/src/units/parse.rs

use crate::error::{DiagError, Result};
use crate::units::dimension::Dimension;
use crate::units::table;
use crate::units::unit::Unit;

/// Parse a unit expression.
///
/// Grammar: factors separated by whitespace or `*`, each `name`, `name**e`,
/// `name^e` or `namee` (astropy's `cm3`, `s-1`). A `/` divides by every factor that follows it, so `a/b/c` reads as
/// `a / (b c)`. `1` is accepted as an empty numerator (`1/s`). The empty string
/// and `dimensionless` both yield the dimensionless unit.
pub fn parse_unit(s: &str) -> Result<Unit> {
    let s = s.trim();
    if s.is_empty() || s == "dimensionless" {
        return Ok(Unit::dimensionless());
    }
    if s.contains('(') || s.contains(')') {
        return Err(DiagError::Unit(format!(
            "parentheses are not supported in unit '{s}'"
        )));
    }

    let normalized = s.replace("**", "^");
    let mut factors = Vec::new();
    let mut scale = 1.0f64;
    let mut dim = Dimension::NONE;

    for (seg_idx, segment) in normalized.split('/').enumerate() {
        let sign: i8 = if seg_idx == 0 { 1 } else { -1 };
        let mut saw_any = false;
        for token in segment.split(|c: char| c == '*' || c.is_whitespace()) {
            if token.is_empty() {
                continue;
            }
            saw_any = true;
            if token == "1" {
                continue;
            }
            let (name, exp) = split_exponent(token, s)?;
            let named = table::lookup(name)
                .ok_or_else(|| DiagError::Unit(format!("unknown unit '{name}' in '{s}'")))?;
            let e = exp.checked_mul(sign).ok_or_else(|| bad_exponent(s))?;
            scale *= named.scale.powi(e as i32);
            dim = named
                .dim
                .checked_powi(e)
                .and_then(|d| dim.checked_mul(d))
                .ok_or_else(|| bad_exponent(s))?;
            factors.push((named.symbol.to_string(), e));
        }
        if !saw_any {
            return Err(DiagError::Unit(format!("empty factor in unit '{s}'")));
        }
    }

    Unit::from_parts(factors, scale, dim)
}

fn split_exponent<'a>(token: &'a str, whole: &str) -> Result<(&'a str, i8)> {
    if let Some((name, exp)) = token.split_once('^') {
        let e = exp.parse::<i8>().map_err(|_| bad_exponent(whole))?;
        if name.is_empty() {
            return Err(DiagError::Unit(format!("missing unit name in '{whole}'")));
        }
        return Ok((name, e));
    }
    // astropy's generic output glues the exponent on: `cm3`, `s-1`
    let tail = token
        .char_indices()
        .find(|&(_, c)| c.is_ascii_digit() || c == '-' || c == '+')
        .map(|(i, _)| i);
    match tail {
        Some(i) if i > 0 => {
            let e = token[i..].parse::<i8>().map_err(|_| bad_exponent(whole))?;
            Ok((&token[..i], e))
        }
        _ => Ok((token, 1)),
    }
}

fn bad_exponent(whole: &str) -> DiagError {
    DiagError::Unit(format!("bad exponent in unit '{whole}'"))
}
