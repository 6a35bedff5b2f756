#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

//! Statistic logging is configured once per process, so it gets a test binary of its own.

mod helpers;

use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;

use cobra_core::analysis::analyze;
use cobra_core::analysis::strategy::MinMaxModels;
use cobra_core::analysis::AnalysisOptions;
use cobra_core::solvers::SolverBackend;
use cobra_core::statistics::configure_statistic_logging;
use helpers::init_logging;
use helpers::mastermind;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().expect("no writer panicked").clone();
        String::from_utf8(bytes)
            .expect("statistics are utf-8")
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("no writer panicked").write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// The value logged under `name`, which must appear exactly once.
fn value_of<'a>(lines: &'a [String], name: &str) -> &'a str {
    let key = format!("%% {name}=");
    let values = lines
        .iter()
        .filter_map(|line| line.strip_prefix(&key))
        .collect::<Vec<_>>();
    assert_eq!(values.len(), 1, "{name} in {lines:#?}");
    values[0]
}

#[test]
fn analysis_writes_solver_and_canonizer_statistics() {
    init_logging();
    let buffer = SharedBuffer::default();
    configure_statistic_logging("%%", Some(Box::new(buffer.clone())));

    let game = mastermind(2, 3);
    let options = AnalysisOptions {
        backend: SolverBackend::Oracle,
        symmetry_breaking: true,
    };
    let mut solver = game.solver(options.backend);
    let _ = analyze(&game, solver.as_mut(), &mut MinMaxModels, &options)
        .expect("every code can be found");

    let lines = buffer.lines();
    assert!(!lines.is_empty());
    assert!(lines.iter().all(|line| line.starts_with("%% ")), "{lines:#?}");

    let satisfiable_calls: usize = value_of(&lines, "solver_satisfiable_calls")
        .parse()
        .expect("a count");
    assert!(satisfiable_calls > 0);
    let seconds: f64 = value_of(&lines, "solver_num_of_models_seconds")
        .parse()
        .expect("a duration in seconds");
    assert!(seconds >= 0.0);

    let canonizations: usize = value_of(&lines, "canonizer_canonizations_calls")
        .parse()
        .expect("a count");
    assert!(canonizations > 0);
    let _ = value_of(&lines, "canonizer_num_automorphisms");
}
