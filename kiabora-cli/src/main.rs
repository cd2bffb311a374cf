/*!
  Binary for the CLI of kiabora, an analyser of existential rule sets
*/

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts
)]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    variant_size_differences
)]

pub mod cli;
pub mod error;
mod render;

use std::io::{read_to_string, stdin};

use clap::Parser;
use cli::{CliApp, STDIN};
use colored::Colorize;
use error::CliError;
use kiabora::{error::Error, io::parse_rules, rule_model::RuleSet, Analyser, AnalyserConfig};

/// Print `body` under a banner, followed by an empty line.
fn section(title: &str, body: String) {
    println!("{title}");
    print!("{body}");
    println!();
}

fn read_input(cli: &CliApp) -> Result<String, CliError> {
    if cli.input_file.as_os_str() == STDIN {
        log::info!("reading rules from stdin");
        return Ok(read_to_string(stdin())?);
    }

    std::fs::read_to_string(&cli.input_file).map_err(|error| CliError::InputFile {
        filename: cli.input_file.display().to_string(),
        error,
    })
}

fn run(mut cli: CliApp) -> Result<(), CliError> {
    if cli.list_properties {
        print!("{}", render::property_list());
        return Ok(());
    }

    cli.expand_alias();

    log::info!("Parsing rules ...");
    let input = read_input(&cli)?;
    let rules = parse_rules(&input).map_err(Error::from)?;
    let rules = RuleSet::new(rules).map_err(Error::from)?;
    log::info!("Parsed {} rules", rules.len());

    let mut config = AnalyserConfig::default()
        .strategy(cli.strategy())
        .with_unifiers(cli.unifiers);
    if let Some(labels) = cli.known_properties() {
        config = config.properties(labels);
    }

    let analyser = Analyser::new(rules, config).map_err(Error::from)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analyser.report())?);
        return Ok(());
    }

    let print = cli.print;
    if print.rule_set {
        section("====== RULE SET ======", render::rule_set(&analyser));
    }
    if print.grd {
        section("======== GRD =========", render::grd(&analyser));
    }
    if print.scc {
        section("======== SCC =========", render::scc(&analyser));
    }
    if print.scc_graph {
        section("===== SCC GRAPH ======", render::scc_graph(&analyser));
    }
    if print.position_graph {
        section("===== PP GRAPH ======", render::position_graph(&analyser));
    }
    if print.rule_properties {
        section("== RULE PROPERTIES ===", render::rule_properties(&analyser));
    }
    if print.rule_set_properties {
        section("===== PROPERTIES =====", render::rule_set_properties(&analyser));
    }
    if print.scc_properties {
        section("=== SCC PROPERTIES ===", render::scc_properties(&analyser));
    }

    println!("{}", render::verdict(&analyser));

    if print.combine_fes {
        section(
            "=== COMBINE (FES) ====",
            render::combination(analyser.combine_fes().as_deref()),
        );
    }
    if print.combine_fus {
        section(
            "=== COMBINE (FUS) ====",
            render::combination(analyser.combine_fus().as_deref()),
        );
    }

    Ok(())
}

fn main() {
    let cli = CliApp::parse();

    cli.logging.initialize_logging();
    log::info!("Version: {}", clap::crate_version!());
    log::debug!("Input file: {:?}", cli.input_file);

    run(cli).unwrap_or_else(|err| {
        log::error!("{} {err}", "error:".red().bold());
        std::process::exit(1)
    })
}
