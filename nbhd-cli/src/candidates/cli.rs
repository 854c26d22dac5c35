use clap::{Command, arg, value_parser};

use crate::settings::{chromosome_args, quant_args};

pub const CANDIDATES_CMD: &str = "candidates";

pub fn create_candidates_cli() -> Command {
    Command::new(CANDIDATES_CMD)
        .about(
            "Build the candidate element list: filter, quantify every feature, classify, and write EnhancerList.txt and EnhancerList.bed.",
        )
        .arg_required_else_help(true)
        .arg(arg!(--regions <regions> "Candidate regions").required(true))
        .arg(arg!(--genes <genes> "Gene intervals with name and strand columns").required(true))
        .arg(arg!(--exclude <exclude> "Drop candidates whose chromosome matches this regex"))
        .arg(
            arg!(--"half-width" <half_width> "Promoter window half-width around each TSS")
                .value_parser(value_parser!(u32)),
        )
        .args(chromosome_args())
        .args(quant_args())
}
