use std::process;

use clap::Parser;
use colored::Colorize;
use topkmer::{cli::Args, config::Config, logging, reader::Input, run};

fn main() {
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);

    let config = Config::from_args(&args).unwrap_or_else(|e| {
        eprintln!();
        eprintln!(
            "{}\n {}",
            "Problem parsing arguments:".blue().bold(),
            e.to_string().blue()
        );
        eprintln!();
        eprintln!(
            "{}\n {}",
            "Help menu:".blue().bold(),
            "$ topkmer --help".bold()
        );
        eprintln!();
        process::exit(1);
    });

    let input = Input::from_path(&args.path);

    if !args.quiet {
        eprintln!("{}: {}", "k-length".bold(), config.k.to_string().blue().bold());
        eprintln!(
            "{}: {}",
            "data".bold(),
            input.to_string().underline().bold().blue()
        );
        eprintln!("{}: {}", "top".bold(), config.top.get().to_string().blue().bold());
        eprintln!(
            "{}: {}",
            "representation".bold(),
            if config.k.is_encodable() {
                "2-bit packed"
            } else {
                "raw bytes"
            }
            .blue()
            .bold()
        );
        eprintln!();
    }

    if let Err(e) = run::run_with_options(&input, &config, args.format, args.output.as_deref()) {
        eprintln!(
            "{}\n {}",
            "Application error:".blue().bold(),
            e.to_string().blue()
        );
        process::exit(1);
    }
}
