use crate::components::WeekCalendarHandle;
use crate::error::{CalendarResult, Error};
use rust_i18n::t;
use std::str::FromStr;

// Export submodules
pub mod calendar;

/// Commands understood by the interactive console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Today,
    Previous,
    Next,
    Show,
    Agenda,
    Json,
    Cell { day: usize, hour: u32, half: u32 },
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.split_whitespace();
        let Some(name) = parts.next() else {
            return Ok(ConsoleCommand::Show);
        };

        let command = match name.to_lowercase().as_str() {
            "today" | "t" | "hoje" => ConsoleCommand::Today,
            "prev" | "p" | "previous" => ConsoleCommand::Previous,
            "next" | "n" => ConsoleCommand::Next,
            "show" | "s" | "grid" => ConsoleCommand::Show,
            "agenda" | "a" | "list" => ConsoleCommand::Agenda,
            "json" => ConsoleCommand::Json,
            "help" | "h" | "?" => ConsoleCommand::Help,
            "quit" | "q" | "exit" => ConsoleCommand::Quit,
            "cell" | "c" => {
                let args: Vec<&str> = parts.by_ref().collect();
                return parse_cell(&args);
            }
            other => return Err(t!("console.unknown", command = other).to_string()),
        };

        if parts.next().is_some() {
            return Err(t!("console.unexpected_arguments", command = name).to_string());
        }
        Ok(command)
    }
}

fn parse_cell(args: &[&str]) -> Result<ConsoleCommand, String> {
    let usage = || t!("console.cell_usage").to_string();

    let [day, hour, half] = args else {
        return Err(usage());
    };
    let day = day.parse::<usize>().map_err(|_| usage())?;
    let hour = hour.parse::<u32>().map_err(|_| usage())?;
    let half = half.parse::<u32>().map_err(|_| usage())?;

    if day > 6 || hour > 23 || !(half == 0 || half == 30) {
        return Err(usage());
    }
    Ok(ConsoleCommand::Cell { day, hour, half })
}

/// Help text listing every console command
pub fn help_text() -> String {
    t!("console.help").to_string()
}

/// Run one console command. Returns `None` when the console should exit.
pub async fn execute(
    handle: &WeekCalendarHandle,
    command: ConsoleCommand,
) -> CalendarResult<Option<String>> {
    let output = match command {
        ConsoleCommand::Today => {
            handle.go_to_today().await?;
            calendar::render_grid(&handle.settled().await?)
        }
        ConsoleCommand::Previous => {
            handle.previous_week().await?;
            calendar::render_grid(&handle.settled().await?)
        }
        ConsoleCommand::Next => {
            handle.next_week().await?;
            calendar::render_grid(&handle.settled().await?)
        }
        ConsoleCommand::Show => calendar::render_grid(&handle.view().await?),
        ConsoleCommand::Agenda => calendar::render_agenda(&handle.view().await?),
        ConsoleCommand::Json => {
            let view = handle.view().await?;
            serde_json::to_string_pretty(&view).map_err(Error::from)?
        }
        ConsoleCommand::Cell { day, hour, half } => {
            calendar::render_cell(&handle.events_for_cell(day, hour, half).await?)
        }
        ConsoleCommand::Help => help_text(),
        ConsoleCommand::Quit => return Ok(None),
    };

    Ok(Some(output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("today".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Today));
        assert_eq!(" P ".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Previous));
        assert_eq!("next".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Next));
        assert_eq!("".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Show));
        assert_eq!("agenda".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Agenda));
        assert_eq!("json".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Json));
        assert_eq!("?".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Help));
        assert_eq!("q".parse::<ConsoleCommand>(), Ok(ConsoleCommand::Quit));
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(
            "cell 2 10 30".parse::<ConsoleCommand>(),
            Ok(ConsoleCommand::Cell {
                day: 2,
                hour: 10,
                half: 30
            })
        );
        assert!("cell 2 10".parse::<ConsoleCommand>().is_err());
        assert!("cell 7 10 0".parse::<ConsoleCommand>().is_err());
        assert!("cell 2 10 15".parse::<ConsoleCommand>().is_err());
        assert!("cell two 10 0".parse::<ConsoleCommand>().is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_and_extra_arguments() {
        assert!("dance".parse::<ConsoleCommand>().is_err());
        assert!("next 3".parse::<ConsoleCommand>().is_err());
    }
}
