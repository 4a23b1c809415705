//! Verbosity-gated logging macros for the simulation engines.
//!
//! Nothing is formatted when the level is below the threshold, so a silent
//! run pays only for an integer comparison. Output goes to stderr so that the
//! report printed on stdout stays machine-readable.
//!
//! - 0: SILENT (nothing)
//! - 1: CHANGES (dispatches, completions, preemptions, idle jumps)
//! - 2: CHECKS (ready-set scans, admissions to the ready queue)
//! - 3: DEBUG (per-tick internals, prediction updates)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_CHANGES);
        assert!(VERBOSITY_CHANGES < VERBOSITY_CHECKS);
        assert!(VERBOSITY_CHECKS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_silent_macros_do_not_evaluate_arguments() {
        fn side_effect(counter: &mut u32) -> u32 {
            *counter += 1;
            *counter
        }

        let mut counter = 0;
        let verbosity = VERBOSITY_SILENT;
        log_changes!(verbosity, "clock {}", side_effect(&mut counter));
        log_checks!(verbosity, "clock {}", side_effect(&mut counter));
        log_debug!(verbosity, "clock {}", side_effect(&mut counter));
        assert_eq!(counter, 0);
    }
}
