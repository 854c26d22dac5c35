mod candidates;
mod classify;
mod config;
mod genes;
mod quantify;
mod settings;
mod tables;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "nbhd";
    pub const BIN_NAME: &str = "nbhd";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Quantify epigenomic signal over candidate regulatory regions and classify them by genomic context.")
        .subcommand_required(true)
        .subcommand(quantify::cli::create_quantify_cli())
        .subcommand(classify::cli::create_classify_cli())
        .subcommand(candidates::cli::create_candidates_cli())
        .subcommand(genes::cli::create_genes_cli())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // QUANTIFY
        //
        Some((quantify::cli::QUANTIFY_CMD, matches)) => {
            quantify::handlers::run_quantify(matches)?;
        }

        //
        // CLASSIFY
        //
        Some((classify::cli::CLASSIFY_CMD, matches)) => {
            classify::handlers::run_classify(matches)?;
        }

        //
        // CANDIDATE ELEMENTS
        //
        Some((candidates::cli::CANDIDATES_CMD, matches)) => {
            candidates::handlers::run_candidates(matches)?;
        }

        //
        // GENES
        //
        Some((genes::cli::GENES_CMD, matches)) => {
            genes::handlers::run_genes(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
