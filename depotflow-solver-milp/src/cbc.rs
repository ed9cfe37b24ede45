//! Backend driving the COIN-OR CBC command-line solver.
//!
//! The model is written to a temporary directory in LP format, `cbc` is run
//! on it with a time limit matching the remaining budget, and the solution
//! file it writes is parsed back into an [`Assignment`].

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use depotflow_core::{Assignment, Formulation};
use tempfile::TempDir;

use crate::backend::{BackendError, BackendSolution, BackendStatus, Deadline, MilpBackend};
use crate::lp_format::{parse_variable_name, write_lp};

/// Interval between checks on the running engine.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Log lines kept when reporting an engine failure.
const LOG_TAIL: usize = 5;

/// [`MilpBackend`] running an external `cbc` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CbcBackend {
    binary: PathBuf,
}

impl Default for CbcBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CbcBackend {
    /// Use `cbc` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_binary("cbc")
    }

    /// Use the executable at `binary`.
    #[must_use]
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Path of the executable.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn run(&self, workdir: &Path, deadline: &Deadline) -> Result<(), BackendError> {
        let log = File::create(workdir.join("cbc.log"))
            .map_err(|err| BackendError::io("creating engine log", err))?;
        let seconds = deadline.remaining().as_secs().max(1);
        let child = Command::new(&self.binary)
            .current_dir(workdir)
            .arg("model.lp")
            .args(["sec", &seconds.to_string()])
            .args(["solve", "solu", "solution.txt"])
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| BackendError::io("launching cbc", err))?;
        wait_within(child, deadline, &workdir.join("cbc.log"))
    }
}

fn wait_within(mut child: Child, deadline: &Deadline, log: &Path) -> Result<(), BackendError> {
    loop {
        let finished = child
            .try_wait()
            .map_err(|err| BackendError::io("waiting for cbc", err))?;
        if let Some(status) = finished {
            if status.success() {
                return Ok(());
            }
            return Err(BackendError::Exited {
                status: status.to_string(),
                detail: log_tail(log),
            });
        }
        if deadline.is_expired() {
            // The engine may exit on its own between the check and the kill.
            let _killed = child.kill();
            let _reaped = child.wait();
            return Err(BackendError::DeadlineExceeded {
                elapsed: deadline.elapsed(),
            });
        }
        thread::sleep(POLL_INTERVAL.min(deadline.remaining()));
    }
}

fn log_tail(log: &Path) -> String {
    let content = fs::read_to_string(log).unwrap_or_default();
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(LOG_TAIL);
    lines.get(start..).unwrap_or_default().join(" | ")
}

/// Parse a CBC solution file into a status, objective and values for
/// `variables` formulation variables.
///
/// Variables CBC omits are zero.
///
/// # Errors
///
/// Returns [`BackendError::MalformedOutput`] for unreadable lines and
/// [`BackendError::UnknownVariable`] for names outside the model.
pub fn parse_solution(content: &str, variables: usize) -> Result<BackendSolution, BackendError> {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());
    let header = lines.next().ok_or_else(|| BackendError::MalformedOutput {
        line: String::new(),
    })?;
    let status = parse_status(header)?;
    let objective = header
        .rsplit_once("objective value")
        .and_then(|(_, value)| value.trim().parse::<f64>().ok());

    let mut values = vec![0.0; variables];
    for line in lines {
        let malformed = || BackendError::MalformedOutput {
            line: line.to_owned(),
        };
        let mut fields = line.split_whitespace().filter(|field| *field != "**");
        let (Some(_row), Some(name), Some(raw)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed());
        };
        let value: f64 = raw.parse().map_err(|_| malformed())?;
        let slot = parse_variable_name(name)
            .and_then(|index| values.get_mut(index))
            .ok_or_else(|| BackendError::UnknownVariable {
                name: name.to_owned(),
            })?;
        *slot = value;
    }
    Ok(BackendSolution {
        status,
        objective,
        values: Assignment::from_values(values),
    })
}

fn parse_status(header: &str) -> Result<BackendStatus, BackendError> {
    let lowered = header.trim().to_lowercase();
    if lowered.starts_with("optimal") {
        Ok(BackendStatus::Optimal)
    } else if lowered.contains("infeasible") {
        Ok(BackendStatus::Infeasible)
    } else if lowered.starts_with("stopped on time") {
        Ok(BackendStatus::TimeLimit)
    } else {
        Err(BackendError::MalformedOutput {
            line: header.to_owned(),
        })
    }
}

impl MilpBackend for CbcBackend {
    fn name(&self) -> &'static str {
        "cbc"
    }

    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-quit")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    fn optimise(
        &self,
        formulation: &Formulation,
        deadline: &Deadline,
    ) -> Result<BackendSolution, BackendError> {
        if formulation.variables().is_empty() {
            return Err(BackendError::Unsupported {
                reason: "formulation has no variables".to_owned(),
            });
        }
        let workdir = TempDir::new().map_err(|err| BackendError::io("creating workdir", err))?;
        let mut model = File::create(workdir.path().join("model.lp"))
            .map_err(|err| BackendError::io("creating model file", err))?;
        write_lp(formulation, &mut model).map_err(|err| BackendError::io("writing model", err))?;
        drop(model);

        log::debug!(
            "running {} on {} variables and {} constraints with {:?} left",
            self.binary.display(),
            formulation.variables().len(),
            formulation.constraints().len(),
            deadline.remaining()
        );
        self.run(workdir.path(), deadline)?;

        let content = fs::read_to_string(workdir.path().join("solution.txt"))
            .map_err(|err| BackendError::io("reading solution file", err))?;
        parse_solution(&content, formulation.variables().len())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn optimal_solution_is_parsed() {
        let content = "Optimal - objective value 66.20000000\n\
                       \x20     0 v0                      1                       3.2\n\
                       \x20     4 v4                     80                         0\n";
        let solution = parse_solution(content, 6).expect("parsable");
        assert_eq!(solution.status, BackendStatus::Optimal);
        assert_eq!(solution.objective, Some(66.2));
        assert_eq!(solution.values.values(), [1.0, 0.0, 0.0, 0.0, 80.0, 0.0]);
    }

    #[rstest]
    #[case("Infeasible - objective value 0.00000000", BackendStatus::Infeasible)]
    #[case("Integer infeasible - objective value 1e+50", BackendStatus::Infeasible)]
    #[case("Stopped on time - objective value 70.1", BackendStatus::TimeLimit)]
    fn status_lines_are_recognised(#[case] header: &str, #[case] expected: BackendStatus) {
        let solution = parse_solution(header, 1).expect("parsable");
        assert_eq!(solution.status, expected);
    }

    #[rstest]
    fn infeasibility_markers_are_skipped() {
        let content = "Infeasible - objective value 12\n** 2 v2 0.5 0\n";
        let solution = parse_solution(content, 3).expect("parsable");
        assert_eq!(solution.values.values(), [0.0, 0.0, 0.5]);
    }

    #[rstest]
    fn unknown_variables_are_rejected() {
        let content = "Optimal - objective value 1\n 0 v7 1 0\n";
        assert!(matches!(
            parse_solution(content, 3),
            Err(BackendError::UnknownVariable { .. })
        ));
    }

    #[rstest]
    #[case("")]
    #[case("Unbounded - objective value 0")]
    #[case("Optimal - objective value 1\n 0 v0\n")]
    fn malformed_output_is_rejected(#[case] content: &str) {
        assert!(matches!(
            parse_solution(content, 1),
            Err(BackendError::MalformedOutput { .. })
        ));
    }

    #[rstest]
    fn missing_binary_is_unavailable() {
        let backend = CbcBackend::with_binary("/nonexistent/depotflow-cbc");
        assert!(!backend.is_available());
        assert_eq!(backend.binary(), Path::new("/nonexistent/depotflow-cbc"));
    }
}
