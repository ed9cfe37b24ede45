//! Export of a [`Formulation`] in CPLEX LP format.
//!
//! Variables are written as `v{index}` and constraints as `c{index}`, so
//! solver output maps straight back onto [`VarId`] positions. The readable
//! names appear in comments.

use std::io::{self, Write};

use depotflow_core::{Formulation, LinearTerm, VarId, VariableKind};

/// Terms written per line inside long expressions.
const TERMS_PER_LINE: usize = 8;

/// LP name of a variable.
#[must_use]
pub fn variable_name(var: VarId) -> String {
    format!("v{}", var.index())
}

/// Parse an LP variable name back into its position.
#[must_use]
pub fn parse_variable_name(name: &str) -> Option<usize> {
    name.strip_prefix('v')?.parse().ok()
}

/// Write `formulation` to `out`.
///
/// Constraints without terms are written against `0 v0` so the file stays
/// well-formed; the model must therefore have at least one variable.
///
/// # Errors
///
/// Returns [`io::ErrorKind::InvalidInput`] when the formulation has no
/// variables, and propagates write failures.
pub fn write_lp<W: Write>(formulation: &Formulation, out: &mut W) -> io::Result<()> {
    if formulation.variables().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "formulation has no variables",
        ));
    }
    writeln!(
        out,
        "\\ {} variables, {} constraints",
        formulation.variables().len(),
        formulation.constraints().len()
    )?;
    for variable in formulation.variables() {
        writeln!(out, "\\ {} = {}", variable_name(variable.id), variable.name)?;
    }

    writeln!(out, "Minimize")?;
    let objective: Vec<LinearTerm> = formulation
        .variables()
        .iter()
        .map(|variable| LinearTerm {
            var: variable.id,
            coefficient: variable.objective,
        })
        .collect();
    writeln!(out, " obj: {}", expression(&objective))?;

    writeln!(out, "Subject To")?;
    for (index, constraint) in formulation.constraints().iter().enumerate() {
        writeln!(out, " \\ {}", constraint.name)?;
        writeln!(
            out,
            " c{index}: {} {} {}",
            expression(&constraint.terms),
            constraint.sense,
            number(constraint.rhs)
        )?;
    }

    writeln!(out, "Bounds")?;
    for variable in formulation.variables() {
        let name = variable_name(variable.id);
        if variable.upper.is_finite() {
            writeln!(
                out,
                " {} <= {name} <= {}",
                number(variable.lower),
                number(variable.upper)
            )?;
        } else {
            writeln!(out, " {name} >= {}", number(variable.lower))?;
        }
    }

    let binaries: Vec<String> = formulation
        .variables()
        .iter()
        .filter(|variable| variable.kind == VariableKind::Binary)
        .map(|variable| variable_name(variable.id))
        .collect();
    if !binaries.is_empty() {
        writeln!(out, "Binaries")?;
        for chunk in binaries.chunks(TERMS_PER_LINE) {
            writeln!(out, " {}", chunk.join(" "))?;
        }
    }
    writeln!(out, "End")
}

/// Render `formulation` as an LP string.
///
/// # Errors
///
/// See [`write_lp`].
pub fn to_lp_string(formulation: &Formulation) -> io::Result<String> {
    let mut buffer = Vec::new();
    write_lp(formulation, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

fn expression(terms: &[LinearTerm]) -> String {
    if terms.is_empty() {
        return "0 v0".to_owned();
    }
    let mut rendered = String::new();
    for (line, chunk) in terms.chunks(TERMS_PER_LINE).enumerate() {
        if line > 0 {
            rendered.push_str("\n   ");
        }
        for term in chunk {
            let magnitude = number(term.coefficient.abs());
            let name = variable_name(term.var);
            let sign = if term.coefficient < 0.0 { "-" } else { "+" };
            let piece = if rendered.is_empty() && sign == "+" {
                format!("{magnitude} {name}")
            } else if rendered.is_empty() {
                format!("- {magnitude} {name}")
            } else {
                format!(" {sign} {magnitude} {name}")
            };
            rendered.push_str(&piece);
        }
    }
    rendered
}

/// Plain decimal rendering; negative zero is normalised to `0`.
fn number(value: f64) -> String {
    format!("{}", value + 0.0)
}
