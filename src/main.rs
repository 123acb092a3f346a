//! CLI entry point for the seam-matching tile rearrangement tool

use clap::Parser;
use seamtile::io::cli::{Cli, FileProcessor};

fn main() -> seamtile::Result<()> {
    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
