use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use dxf2png::{
    check_fonts,
    convert::{self, ConversionJob, FontConfig},
};
use log::{LevelFilter, error};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

#[derive(Parser)]
#[clap(version, about = "Convert DXF files to PNG with Japanese text support")]
struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// Input DXF file or directory.
    input: PathBuf,

    /// Output PNG file, or output directory when the input is a directory.
    ///
    /// Defaults to the input path with a `.png` extension, or to a directory
    /// named `output` in batch mode.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,

    /// Output resolution in DPI.
    #[clap(long, short = 'd', default_value = "300", value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// Check available Japanese fonts and exit without converting.
    #[clap(long)]
    check_fonts: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    TermLogger::init(
        cli.log_level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .unwrap();

    if cli.check_fonts {
        check_fonts::cli();
        return ExitCode::SUCCESS;
    }

    if cli.input.is_file() && convert::has_dxf_extension(&cli.input) {
        let fonts = FontConfig::resolve();
        let output = cli
            .output
            .unwrap_or_else(|| cli.input.with_extension("png"));
        let job = ConversionJob {
            input: cli.input,
            output,
            dpi: cli.dpi,
        };
        convert::convert_file(&job, &fonts);
        ExitCode::SUCCESS
    } else if cli.input.is_dir() {
        let fonts = FontConfig::resolve();
        let output = cli.output.unwrap_or_else(|| PathBuf::from("output"));
        match convert::convert_directory(&cli.input, &output, cli.dpi, &fonts) {
            Ok(_) => ExitCode::SUCCESS,
            Err(error) => {
                error!("{error:#}");
                ExitCode::from(1)
            }
        }
    } else {
        error!(
            "Input path {:?} is neither a DXF file nor a directory",
            cli.input
        );
        ExitCode::from(1)
    }
}
