use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveTime, Timelike};
use humantime::format_duration;
use prettytable::Table;
use std::io::{self, BufRead, Write};
use structopt::StructOpt;

use crate::cli::Command;
use crate::model::Task;
use crate::scheduler::Scheduler;

type Input<'a> = io::Lines<io::StdinLock<'a>>;

/// Run the interactive shell until `quit` or end of input. The scheduler is
/// borrowed for the whole session; the shell itself owns only the selected
/// date.
pub fn run(scheduler: &mut Scheduler, start_date: NaiveDate) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock().lines();
    let mut selected = start_date;

    list(scheduler, selected)?;

    loop {
        print!("{}> ", selected.format("%d.%m.%Y"));
        io::stdout().flush().context("Failed to flush stdout.")?;

        let line = match input.next() {
            Some(line) => line.context("Failed to read from stdin.")?,
            None => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::from_iter_safe(line.split_whitespace()) {
            Ok(command) => command,
            Err(error) => {
                println!("{}", error.message);
                continue;
            }
        };

        match command {
            Command::Day { date } => {
                selected = date;
                list(scheduler, selected)?;
            }
            Command::List => list(scheduler, selected)?,
            Command::Add => add(scheduler, selected, &mut input)?,
            Command::Edit { position } => edit(scheduler, selected, position, &mut input)?,
            Command::Rm { position } => remove(scheduler, selected, position)?,
            Command::Quit => break,
        }
    }

    if !scheduler.is_empty() {
        println!("Dropping {} task(s); nothing is saved.", scheduler.len());
    }
    Ok(())
}

/// Render the date's tasks sorted by start time.
fn list(scheduler: &Scheduler, date: NaiveDate) -> Result<()> {
    let mut tasks = scheduler.get_tasks_for_date(date);
    if tasks.is_empty() {
        println!("No tasks for {}.", date.format("%d.%m.%Y"));
        return Ok(());
    }
    tasks.sort_by(|a, b| a.cmp_by_start(b));

    let mut table = Table::new();
    table.add_row(row![
        "#",
        "task",
        "description",
        "estimated",
        "start",
        "end",
        "priority",
        "status"
    ]);
    for (index, task) in tasks.iter().enumerate() {
        table.add_row(row![
            index + 1,
            task.title,
            textwrap::fill(&task.description, 40),
            format_duration(task.estimated_duration().to_std()?),
            task.start_time.format("%d.%m.%Y %H:%M"),
            task.end_time.format("%d.%m.%Y %H:%M"),
            task.priority,
            task.status
        ]);
    }
    table.printstd();
    Ok(())
}

/// The add-task dialog: one prompt per field, all validation done here
/// before the scheduler is touched. A bad field aborts the whole dialog.
fn add(scheduler: &mut Scheduler, selected: NaiveDate, input: &mut Input) -> Result<()> {
    let title = prompt(input, "Title")?;
    let description = prompt(input, "Description")?;

    let estimated_text = prompt(input, "Estimated time (hours)")?;
    let estimated_time: f64 = match estimated_text.parse() {
        Ok(value) => value,
        Err(_) => {
            println!("Invalid input: {:?} is not a number of hours.", estimated_text);
            return Ok(());
        }
    };

    let priority_text = prompt(input, "Priority")?;
    let priority: i32 = match priority_text.parse() {
        Ok(value) => value,
        Err(_) => {
            println!("Invalid input: {:?} is not a number.", priority_text);
            return Ok(());
        }
    };

    let hour_text = prompt(input, "Start hour (0-23)")?;
    let start_time = match parse_start_hour(&hour_text) {
        Some(time) => selected.and_time(time),
        None => {
            println!("Invalid time. Hours must be between 0 and 23.");
            return Ok(());
        }
    };

    match Task::new(title, description, estimated_time, start_time, priority) {
        Ok(task) => {
            scheduler.add_task(task);
            list(scheduler, selected)?;
        }
        Err(error) => println!("{}", error),
    }
    Ok(())
}

/// The edit dialog: every field prompts with its current value as the
/// default, empty input keeps it. The edited task is replaced through its
/// key, never looked up again by date.
fn edit(
    scheduler: &mut Scheduler,
    selected: NaiveDate,
    position: usize,
    input: &mut Input,
) -> Result<()> {
    let current = match task_at(scheduler, selected, position) {
        Some(task) => task,
        None => {
            println!("No task at position {}.", position);
            return Ok(());
        }
    };
    let key = current.key();

    let title = prompt_default(input, "Title", &current.title)?;
    let description = prompt_default(input, "Description", &current.description)?;

    let estimated_text = prompt_default(
        input,
        "Estimated time (hours)",
        &current.estimated_time.to_string(),
    )?;
    let estimated_time: f64 = match estimated_text.parse() {
        Ok(value) => value,
        Err(_) => {
            println!("Invalid input: {:?} is not a number of hours.", estimated_text);
            return Ok(());
        }
    };

    let priority_text = prompt_default(input, "Priority", &current.priority.to_string())?;
    let priority: i32 = match priority_text.parse() {
        Ok(value) => value,
        Err(_) => {
            println!("Invalid input: {:?} is not a number.", priority_text);
            return Ok(());
        }
    };

    let hour_text = prompt_default(
        input,
        "Start hour (0-23)",
        &current.start_time.hour().to_string(),
    )?;
    let start_time = match parse_start_hour(&hour_text) {
        Some(time) => selected.and_time(time),
        None => {
            println!("Invalid time. Hours must be between 0 and 23.");
            return Ok(());
        }
    };

    let replacement = match Task::new(title, description, estimated_time, start_time, priority) {
        Ok(task) => task,
        Err(error) => {
            println!("{}", error);
            return Ok(());
        }
    };

    match scheduler.update_task(&key, replacement) {
        Ok(()) => list(scheduler, selected)?,
        Err(error) => println!("{}", error),
    }
    Ok(())
}

fn remove(scheduler: &mut Scheduler, selected: NaiveDate, position: usize) -> Result<()> {
    let key = match task_at(scheduler, selected, position) {
        Some(task) => task.key(),
        None => {
            println!("No task at position {}.", position);
            return Ok(());
        }
    };

    match scheduler.delete_task(&key) {
        Ok(task) => {
            println!("Removed {:?}.", task.title);
            list(scheduler, selected)?;
        }
        Err(error) => println!("{}", error),
    }
    Ok(())
}

/// Resolve a 1-based position in the date's sorted listing to a task.
fn task_at(scheduler: &Scheduler, date: NaiveDate, position: usize) -> Option<Task> {
    let mut tasks = scheduler.get_tasks_for_date(date);
    tasks.sort_by(|a, b| a.cmp_by_start(b));
    position
        .checked_sub(1)
        .and_then(|index| tasks.get(index))
        .map(|task| (*task).clone())
}

/// A whole start hour on the selected date, as the original dialogs took it.
fn parse_start_hour(text: &str) -> Option<NaiveTime> {
    let hour: u32 = text.parse().ok()?;
    NaiveTime::from_hms_opt(hour, 0, 0)
}

fn prompt(input: &mut Input, label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().context("Failed to flush stdout.")?;
    match input.next() {
        Some(line) => Ok(line.context("Failed to read from stdin.")?.trim().to_string()),
        None => Err(anyhow!("Input closed during a dialog.")),
    }
}

fn prompt_default(input: &mut Input, label: &str, default: &str) -> Result<String> {
    let text = prompt(input, &format!("{} [{}]", label, default))?;
    if text.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn start_hours_outside_the_day_are_rejected() {
        assert!(parse_start_hour("0").is_some());
        assert!(parse_start_hour("23").is_some());
        assert!(parse_start_hour("24").is_none());
        assert!(parse_start_hour("-1").is_none());
        assert!(parse_start_hour("nine").is_none());
    }

    #[test]
    fn positions_index_the_sorted_listing() {
        let mut scheduler = Scheduler::new();
        let afternoon = Task::new("B".to_string(), String::new(), 1.0, at(1, 14), 1).unwrap();
        let morning = Task::new("A".to_string(), String::new(), 1.0, at(1, 9), 1).unwrap();
        scheduler.add_task(afternoon);
        scheduler.add_task(morning);

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(task_at(&scheduler, date, 1).unwrap().title, "A");
        assert_eq!(task_at(&scheduler, date, 2).unwrap().title, "B");
        assert!(task_at(&scheduler, date, 0).is_none());
        assert!(task_at(&scheduler, date, 3).is_none());
    }
}
