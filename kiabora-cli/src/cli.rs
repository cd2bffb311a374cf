//! Contains structures and functionality for the binary
use std::path::PathBuf;

use kiabora::{analyser::ALL_PROPERTIES, dependency::DependencyStrategy, property::Property};

/// Input path denoting the standard input
pub(crate) const STDIN: &str = "-";

/// Environment variable overriding the default log level
const LOG_ENVIRONMENT_VARIABLE: &str = "KIABORA_LOG";

/// Cli Arguments related to logging
#[derive(clap::Args, Debug)]
pub(crate) struct LoggingArgs {
    /// Increase log verbosity (multiple uses increase verbosity further)
    #[arg(short, long, action = clap::builder::ArgAction::Count, group = "verbosity")]
    verbose: u8,
    /// Reduce log verbosity to show only errors (equivalent to --log error)
    #[arg(short, long, group = "verbosity")]
    quiet: bool,
    /// Set log verbosity (default is "warn")
    #[arg(long = "log", value_parser=clap::builder::PossibleValuesParser::new(["error", "warn", "info", "debug", "trace"]), group = "verbosity")]
    log_level: Option<String>,
}

impl LoggingArgs {
    /// Initialising Logging
    ///
    /// Sets the logging verbosity to the given log-level in the following order:
    ///  * `Info`, `Debug`, `Trace`; depending on the count of `-v`
    ///  * `Error` when `-q` is used
    ///  * The `KIABORA_LOG` environment variable value
    ///  * `Warn` otherwise
    pub(crate) fn initialize_logging(&self) {
        let mut builder = env_logger::Builder::new();

        // Default log level
        builder.filter_level(log::LevelFilter::Warn);

        builder.parse_env(LOG_ENVIRONMENT_VARIABLE);
        if let Some(ref level) = self.log_level {
            builder.parse_filters(level);
        } else if self.quiet {
            builder.filter_level(log::LevelFilter::Error);
        } else if self.verbose > 0 {
            builder.filter_level(match self.verbose {
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                3 => log::LevelFilter::Trace,
                _ => log::LevelFilter::Warn,
            });
        }
        builder.init();
    }
}

/// Cli arguments selecting what is printed
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub(crate) struct PrintArgs {
    /// Print the rule set (can be useful if some rules were not labelled in the input file)
    #[arg(short = 'r', long = "rule-set")]
    pub(crate) rule_set: bool,
    /// Print the graph of rule dependencies
    #[arg(short = 'g', long = "grd")]
    pub(crate) grd: bool,
    /// Print the strongly connected components of the graph of rule dependencies
    #[arg(short = 's', long = "scc")]
    pub(crate) scc: bool,
    /// Print the graph of the strongly connected components
    #[arg(short = 'G', long = "scc-graph")]
    pub(crate) scc_graph: bool,
    /// Print the predicate position graph
    #[arg(long = "ppg-graph")]
    pub(crate) position_graph: bool,
    /// Print the properties of each rule
    #[arg(short = 'P', long = "rule-properties")]
    pub(crate) rule_properties: bool,
    /// Print the properties of the whole rule set
    #[arg(short = 'R', long = "ruleset-properties")]
    pub(crate) rule_set_properties: bool,
    /// Print the properties of each strongly connected component
    #[arg(short = 'S', long = "scc-properties")]
    pub(crate) scc_properties: bool,
    /// Combine the strongly connected components in an attempt to find a decidable combination
    /// while maximizing forward chaining (chase)
    #[arg(short = 'c', long = "combine-fes")]
    pub(crate) combine_fes: bool,
    /// Combine the strongly connected components in an attempt to find a decidable combination
    /// while maximizing backward chaining (query rewriting)
    #[arg(short = 'b', long = "combine-fus")]
    pub(crate) combine_fus: bool,
}

/// Kiabora, an analyser of existential rule sets
#[derive(clap::Parser, Debug)]
#[command(author, version, about)]
pub struct CliApp {
    /// Rule set input file in DLGP format (use '-' for stdin)
    #[arg(short = 'f', long = "input-file", default_value = STDIN)]
    pub(crate) input_file: PathBuf,
    /// Select the properties to check (example: 'lin,agrd,s,fus' or '*' to select all);
    /// see --list-properties for the available properties
    #[arg(short = 'p', long = "properties", num_args = 1.., value_delimiter = ',')]
    pub(crate) properties: Option<Vec<String>>,
    /// Print the available rule set properties and exit
    #[arg(short = 'l', long = "list-properties")]
    pub(crate) list_properties: bool,
    /// Arguments related to output
    #[command(flatten)]
    pub(crate) print: PrintArgs,
    /// Compute all unifiers between rules in order to print them in the graph of rule dependencies
    #[arg(short = 'u', long = "unifiers")]
    pub(crate) unifiers: bool,
    /// Drop the dependencies that are not productive for the restricted chase
    #[arg(long = "restricted-grd")]
    pub(crate) restricted_grd: bool,
    /// Alias for -c -b -g -p '*' -P -r -R -s -G -S -u
    #[arg(short = 'a')]
    pub(crate) all: bool,
    /// Print the analysis as JSON instead of text
    #[arg(long = "json")]
    pub(crate) json: bool,
    /// Arguments related to logging
    #[command(flatten)]
    pub(crate) logging: LoggingArgs,
}

impl CliApp {
    /// Turn on everything `-a` stands for.
    pub(crate) fn expand_alias(&mut self) {
        if !self.all {
            return;
        }

        self.print = PrintArgs {
            position_graph: self.print.position_graph,
            rule_set: true,
            grd: true,
            scc: true,
            scc_graph: true,
            rule_properties: true,
            rule_set_properties: true,
            scc_properties: true,
            combine_fes: true,
            combine_fus: true,
        };
        self.properties = Some(vec![ALL_PROPERTIES.to_string()]);
        self.unifiers = true;
    }

    /// Return the active dependency strategy.
    pub(crate) fn strategy(&self) -> DependencyStrategy {
        if self.restricted_grd {
            DependencyStrategy::RestrictedProductivity
        } else {
            DependencyStrategy::Productivity
        }
    }

    /// Return the requested property labels, dropping unknown ones with a warning.
    pub(crate) fn known_properties(&self) -> Option<Vec<String>> {
        let labels = self.properties.as_ref()?;

        Some(
            labels
                .iter()
                .filter(|label| {
                    let known =
                        label.as_str() == ALL_PROPERTIES || Property::from_label(label).is_some();
                    if !known {
                        log::warn!("requesting unknown property: {label}");
                    }
                    known
                })
                .cloned()
                .collect(),
        )
    }
}
