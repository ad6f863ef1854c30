//! CLI entry point for crack stencil synthesis and patch compositing

use clap::Parser;
use crackmask::io::cli::Cli;

fn main() -> crackmask::Result<()> {
    Cli::parse().run()
}
