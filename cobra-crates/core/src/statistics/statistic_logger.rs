use std::fmt::Display;

use super::statistic_logging::log_statistic;

/// Logs statistics under a hierarchical name, e.g. `oracle_solver_satisfiable_calls`.
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    name_prefix: String,
}

impl StatisticLogger {
    pub fn new(name_prefix: impl Display) -> Self {
        Self {
            name_prefix: name_prefix.to_string(),
        }
    }

    pub fn attach_to_prefix(&self, addition_to_prefix: impl Display) -> Self {
        Self {
            name_prefix: if self.name_prefix.is_empty() {
                addition_to_prefix.to_string()
            } else {
                format!("{}_{}", self.name_prefix, addition_to_prefix)
            },
        }
    }

    /// Writes `value` as a single line under the current name.
    pub fn log_value(&self, value: impl Display) {
        log_statistic(&self.name_prefix, value);
    }
}

