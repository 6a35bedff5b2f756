//! Statistics gathered by the solvers, the canonizer and the parameter generator, and the means
//! to write them out.
mod statistic_logger;
mod statistic_logging;

use std::fmt::Display;
use std::time::Duration;
use std::time::Instant;

pub use statistic_logger::StatisticLogger;
pub use statistic_logging::configure_statistic_logging;
pub use statistic_logging::log_statistic;
pub use statistic_logging::should_log_statistics;

/// A value which can be written out through a [`StatisticLogger`].
///
/// See [`create_statistics_struct!`] for creating a statistic struct automatically.
pub trait Statistic {
    fn log(&self, statistic_logger: StatisticLogger);
}

impl<Value: Display> Statistic for Value {
    fn log(&self, statistic_logger: StatisticLogger) {
        statistic_logger.log_value(self);
    }
}

/// Generates a struct of statistics which logs each field under its own name.
///
/// # Example
/// ```rust
/// # use cobra_core::create_statistics_struct;
/// create_statistics_struct!(Statistics {
///     number_of_calls: usize
/// });
///
/// let statistics = Statistics::default();
///
/// assert_eq!(statistics.number_of_calls, 0);
/// ```
#[macro_export]
macro_rules! create_statistics_struct {
    ($(#[$struct_documentation:meta])* $name:ident { $($(#[$variable_documentation:meta])* $field:ident : $type:ident),+ $(,)? }) => {
        $(#[$struct_documentation])*
        #[derive(Default, Debug, Copy, Clone)]
        pub struct $name {
            $($(#[$variable_documentation])* pub $field: $type),+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, statistic_logger: $crate::statistics::StatisticLogger) {
                $($crate::statistics::Statistic::log(
                    &self.$field,
                    statistic_logger.attach_to_prefix(stringify!($field)),
                ));+
            }
        }
    };
}

/// The number of times a query was answered and the total time spent answering it.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct QueryStatistic {
    pub calls: usize,
    pub time: Duration,
}

impl QueryStatistic {
    /// Counts one call which started at `start` and ends now.
    pub fn record(&mut self, start: Instant) {
        self.calls += 1;
        self.time += start.elapsed();
    }
}

impl Statistic for QueryStatistic {
    fn log(&self, statistic_logger: StatisticLogger) {
        self.calls.log(statistic_logger.attach_to_prefix("calls"));
        Statistic::log(
            &self.time.as_secs_f64(),
            statistic_logger.attach_to_prefix("seconds"),
        );
    }
}
