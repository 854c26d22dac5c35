use clap::{Command, arg, value_parser};

use crate::settings::chromosome_args;

pub const CLASSIFY_CMD: &str = "classify";

pub fn create_classify_cli() -> Command {
    Command::new(CLASSIFY_CMD)
        .about("Label regions as promoter, genic or intergenic against a gene table.")
        .arg_required_else_help(true)
        .arg(arg!(--regions <regions> "Interval file to classify").required(true))
        .arg(arg!(--genes <genes> "Gene intervals with name and strand columns").required(true))
        .arg(
            arg!(--"half-width" <half_width> "Promoter window half-width around each TSS")
                .value_parser(value_parser!(u32)),
        )
        .arg(arg!(--outdir <outdir> "Output directory"))
        .arg(arg!(-o --output <output> "Output table (default: <outdir>/<regions>.Classified.tsv)"))
        .args(chromosome_args())
}
