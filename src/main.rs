#[macro_use] extern crate prettytable;

use anyhow::Result;
use chrono::Local;
use structopt::StructOpt;

mod cli;
mod interface;
mod model;
mod scheduler;

use cli::CommandLineArgs;
use scheduler::Scheduler;

fn main() -> Result<()> {
    // Get the command-line arguments.
    let CommandLineArgs { date } = CommandLineArgs::from_args();

    // The working date starts on today unless the user asked otherwise.
    let start_date = date.unwrap_or_else(|| Local::now().date_naive());

    // A single scheduler instance owns every task for the lifetime of the
    // process. Nothing is persisted; the collection dies with the shell.
    let mut scheduler = Scheduler::new();
    interface::run(&mut scheduler, start_date)
}
