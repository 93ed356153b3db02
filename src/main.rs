use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use clap::Parser;

use transit_service::error::Result;
use transit_service::service;

/// Batch transit information service: reads a JSON network description with
/// queries, writes the JSON answers.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to the input document; standard input when omitted.
    #[clap(long)]
    input: Option<String>,

    /// Path for the output document; standard output when omitted.
    #[clap(long)]
    output: Option<String>,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let input: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    service::process(input, output)
}
