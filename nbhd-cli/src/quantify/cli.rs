use clap::{Command, arg};

use crate::settings::{chromosome_args, quant_args};

pub const QUANTIFY_CMD: &str = "quantify";

pub fn create_quantify_cli() -> Command {
    Command::new(QUANTIFY_CMD)
        .about("Count features over an interval file and add RPM, RPKM and quantile columns.")
        .arg_required_else_help(true)
        .arg(arg!(--regions <regions> "Interval file to quantify").required(true))
        .arg(arg!(-o --output <output> "Output table (default: <outdir>/<regions>.Features.tsv)"))
        .args(chromosome_args())
        .args(quant_args())
}
