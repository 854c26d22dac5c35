use clap::{Command, arg, value_parser};

use crate::settings::{chromosome_args, quant_args};

pub const GENES_CMD: &str = "genes";

pub fn create_genes_cli() -> Command {
    Command::new(GENES_CMD)
        .about(
            "Quantify features over gene bodies and TSS windows, and rank promoter activity. Writes GeneList.txt and GeneList.TSS1kb.txt.",
        )
        .arg_required_else_help(true)
        .arg(arg!(--genes <genes> "Gene intervals with name and strand columns").required(true))
        .arg(
            arg!(--"half-width" <half_width> "TSS window half-width")
                .value_parser(value_parser!(u32)),
        )
        .args(chromosome_args())
        .args(quant_args())
}
