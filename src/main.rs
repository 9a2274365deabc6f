use clap::Parser;

mod app;
mod cli;
mod ui;

fn main() {
    cli::Cli::parse().run();
}
