//! Shared command-line helpers of the Tagprep tools.

use stderrlog::Timestamp;

/// Logging setup arg group.
#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Silence log messages.
    #[arg(short, long)]
    pub quiet: bool,

    /// Turn debugging information on (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Enable timestamped logging.
    #[arg(long)]
    pub ts: bool,
}

impl LogArgs {
    /// Installs the stderr logger.
    ///
    /// `default` is the level used when no `-v` is given: 0 is off, 3 is info, 5 is trace.
    pub fn setup_logging(&self, default: u8) -> Result<(), Box<dyn std::error::Error>> {
        let level = if self.verbose > 0 {
            self.verbose.saturating_add(default)
        } else {
            default
        };

        let log_level = match level {
            0 => stderrlog::LogLevelNum::Off,
            1 => stderrlog::LogLevelNum::Error,
            2 => stderrlog::LogLevelNum::Warn,
            3 => stderrlog::LogLevelNum::Info,
            4 => stderrlog::LogLevelNum::Debug,
            _ => stderrlog::LogLevelNum::Trace,
        };

        stderrlog::new()
            .quiet(self.quiet)
            .verbosity(log_level)
            .timestamp(if self.ts {
                Timestamp::Second
            } else {
                Timestamp::Off
            })
            .init()?;

        log::debug!("log level: {level}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Args {
        #[command(flatten)]
        log: LogArgs,
    }

    #[test]
    fn test_parse_log_args() {
        let args = Args::parse_from(["prog", "-vv", "--ts"]);

        assert_eq!(2, args.log.verbose);
        assert!(args.log.ts);
        assert!(!args.log.quiet);
    }
}
