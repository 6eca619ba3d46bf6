// crates/turbdiag-core/src/engine/script.rs

use crate::engine::EngineError;

/// Bundled decomposition of the plain velocity field.
pub const DECOMPOSE_VELOCITY: &str = include_str!("../../scripts/decompose_velocity.script");

/// Bundled decomposition of sqrt(rho) * v.
pub const DECOMPOSE_VELOCITY_WEIGHTED: &str =
    include_str!("../../scripts/decompose_velocity_weighted.script");

/// Input variable names, in the order the decomposer sets them.
pub const INPUT_VARIABLES: [&str; 10] =
    ["vx1", "vx2", "vx3", "rho", "nx1", "nx2", "nx3", "dx1", "dx2", "dx3"];

pub const COMPRESSIVE_OUTPUTS: [&str; 3] = ["vx1c", "vx2c", "vx3c"];
pub const SOLENOIDAL_OUTPUTS: [&str; 3] = ["vx1i", "vx2i", "vx3i"];

pub const SYS_POISSON_ITERATIONS: &str = "!poisson_iterations";
pub const SYS_POISSON_RESIDUAL: &str = "!poisson_residual";

#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Var(String),
    Number(f64),
}

/// One command: `[target =] op(arg, ...)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub target: Option<String>,
    pub op: String,
    pub args: Vec<Arg>,
}

/// Non-empty, non-comment lines of a script.
pub fn command_lines(script: &str) -> impl Iterator<Item = (usize, &str)> {
    script
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, strip_comment(l).trim()))
        .filter(|(_, l)| !l.is_empty())
}

fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse one script line. Blank and comment-only lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Statement>, EngineError> {
    let line = strip_comment(line).trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (target, call) = match line.split_once('=') {
        Some((t, c)) => {
            let t = t.trim();
            if !is_identifier(t) {
                return Err(EngineError::Syntax(format!("bad assignment target '{t}'")));
            }
            (Some(t.to_string()), c.trim())
        }
        None => (None, line),
    };

    let open = call
        .find('(')
        .ok_or_else(|| EngineError::Syntax(format!("expected '(' in '{line}'")))?;
    if !call.ends_with(')') {
        return Err(EngineError::Syntax(format!("expected ')' at end of '{line}'")));
    }
    let op = call[..open].trim();
    if !is_identifier(op) {
        return Err(EngineError::Syntax(format!("bad command name '{op}'")));
    }

    let inner = call[open + 1..call.len() - 1].trim();
    let mut args = Vec::new();
    if !inner.is_empty() {
        for raw in inner.split(',') {
            args.push(parse_arg(raw.trim(), line)?);
        }
    }

    Ok(Some(Statement {
        target,
        op: op.to_string(),
        args,
    }))
}

fn parse_arg(raw: &str, line: &str) -> Result<Arg, EngineError> {
    if raw.is_empty() {
        return Err(EngineError::Syntax(format!("empty argument in '{line}'")));
    }
    if is_identifier(raw) {
        return Ok(Arg::Var(raw.to_string()));
    }
    raw.parse::<f64>()
        .map(Arg::Number)
        .map_err(|_| EngineError::Syntax(format!("bad argument '{raw}' in '{line}'")))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '!' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
