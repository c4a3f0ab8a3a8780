use clap::Parser;
use colored::*;
use curve_parser::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    match commands::run(&args) {
        Ok(stats) if stats.files_failed > 0 => process::exit(2),
        Ok(_) => process::exit(0),
        Err(error) => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), error);
            process::exit(1);
        }
    }
}
