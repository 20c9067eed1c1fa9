use chrono::NaiveDate;
use structopt::clap::AppSettings;
use structopt::StructOpt;

/// Parse a calendar date in the format the planner displays.
pub fn parse_day(text: &str) -> chrono::ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(text, "%d.%m.%Y")
}

/// One line of shell input.
#[derive(Debug, StructOpt)]
#[structopt(setting = AppSettings::NoBinaryName)]
pub enum Command {
    /// Select the working date.
    Day {
        /// The date to select (DD.MM.YYYY).
        #[structopt(parse(try_from_str = parse_day))]
        date: NaiveDate,
    },
    /// List the selected date's tasks.
    List,
    /// Add a task to the selected date (prompts for each field).
    Add,
    /// Edit the task at a position in the listing.
    Edit {
        #[structopt()]
        position: usize,
    },
    /// Remove the task at a position in the listing.
    Rm {
        #[structopt()]
        position: usize,
    },
    /// Exit the planner.
    Quit,
}

#[derive(Debug, StructOpt)]
#[structopt(name = "Dayplan", about = "A minimalistic calendar task planner.")]
pub struct CommandLineArgs {
    /// Start with this date selected instead of today (DD.MM.YYYY).
    #[structopt(short, long, parse(try_from_str = parse_day))]
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_accepts_the_display_format() {
        let date = parse_day("01.03.2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn parse_day_rejects_other_formats() {
        assert!(parse_day("2024-03-01").is_err());
        assert!(parse_day("32.03.2024").is_err());
    }
}
