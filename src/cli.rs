use crate::constants::{DEFAULT_STORE_PATH, STORE_PATH_ENV};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLIの定義
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "This tool manages local SLURM BGPsec filters and applies them to validated router keys."
)]
pub struct Cli {
    #[arg(
        short = 's',
        long = "store",
        env = STORE_PATH_ENV,
        default_value = DEFAULT_STORE_PATH,
        help = "Path of the local SLURM filter store (JSON)."
    )]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a BGPsec filter. At least one of --asn / --ski is required.
    Add(AddArgs),

    /// Remove a BGPsec filter by id. Unknown ids are ignored.
    Remove {
        #[arg(help = "Filter id printed by 'add' or 'list'.")]
        id: u64,
    },

    /// List BGPsec filters in insertion order.
    List {
        #[arg(
            short = 'f',
            long = "format",
            default_value = "txt",
            hide_default_value = true,
            help = "Select output format: 'txt' or 'json'.\ndefault: txt"
        )]
        output_format: String,
    },

    /// Remove every BGPsec filter.
    Clear,

    /// Apply the filters to router keys and write the survivors.
    Apply(ApplyArgs),

    /// Export the filters as a SLURM (RFC 8416) file.
    Export {
        #[arg(
            short = 'o',
            long = "output",
            default_value = "-",
            help = "Output file, '-' for stdout."
        )]
        output: PathBuf,
    },

    /// Replace the filters with the bgpsecFilters of a SLURM file.
    Import {
        #[arg(help = "SLURM (RFC 8416) JSON file.")]
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(
        short = 'a',
        long = "asn",
        help = "AS number to filter.\nExample: AS64500, 64500, 0.64500"
    )]
    pub asn: Option<String>,

    #[arg(
        short = 'k',
        long = "ski",
        help = "Subject Key Identifier to filter (hex, case-insensitive)."
    )]
    pub ski: Option<String>,

    #[arg(short = 'c', long = "comment", help = "Free text comment.")]
    pub comment: Option<String>,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[arg(
        short = 'i',
        long = "input",
        required_unless_present = "routinator",
        conflicts_with = "routinator",
        help = "Router keys JSON file in Routinator format."
    )]
    pub input: Option<PathBuf>,

    #[arg(
        short = 'r',
        long = "routinator",
        help = "Run routinator to obtain the validated router keys."
    )]
    pub routinator: bool,

    #[arg(
        short = 'o',
        long = "output",
        default_value = "-",
        help = "Output file, '-' for stdout."
    )]
    pub output: PathBuf,

    #[arg(
        short = 'f',
        long = "format",
        default_value = "json",
        hide_default_value = true,
        help = "Select output format: 'json' or 'txt'.\ndefault: json"
    )]
    pub output_format: String,
}
