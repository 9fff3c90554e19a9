//! Line-oriented terminal front-end for the voucher form.

use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;

use crate::voucher::format::current_display_date;
use crate::voucher::{
    FormField, FormState, RegenerateOutcome, SeatPosition, SubmitOutcome, VoucherForm,
    VoucherSnapshot,
};

pub const HELP: &str = "\
Commands:
  name <text>        crew name
  id <text>          crew ID
  flight <text>      flight number, e.g. GA102
  date <text>        flight date, DD-MM-YY
  today              use today's date
  aircraft <label>   ATR | Airbus 320 | Boeing 737 Max
  submit             generate vouchers
  regen <1|2|3>      regenerate one seat of an existing voucher
  show               print the form
  reset              clear the form
  help               this text
  quit               exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(FormField, String),
    Today,
    Submit,
    Regenerate(SeatPosition),
    Show,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0} (type `help`)")]
    Unknown(String),
    #[error("seat position must be 1, 2, or 3")]
    SeatPosition,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let edit = |field: FormField| -> Result<Command, CommandError> {
            Ok(Command::Edit(field, rest.to_string()))
        };
        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "name" => edit(FormField::CrewName),
            "id" => edit(FormField::CrewId),
            "flight" => edit(FormField::FlightNumber),
            "date" => edit(FormField::FlightDate),
            "aircraft" => edit(FormField::Aircraft),
            "today" => Ok(Command::Today),
            "submit" => Ok(Command::Submit),
            "regen" => rest
                .parse::<u8>()
                .ok()
                .and_then(|n| SeatPosition::try_from(n).ok())
                .map(Command::Regenerate)
                .ok_or(CommandError::SeatPosition),
            "show" => Ok(Command::Show),
            "reset" => Ok(Command::Reset),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Human-readable dump of the form state.
pub fn render(state: &FormState) -> String {
    let mut out = String::new();
    let input = &state.input;
    let fields = [
        (FormField::CrewName, input.crew_name.as_str()),
        (FormField::CrewId, input.crew_id.as_str()),
        (FormField::FlightNumber, input.flight_number.as_str()),
        (FormField::FlightDate, input.flight_date.as_str()),
        (FormField::Aircraft, input.aircraft.label()),
    ];

    for (field, value) in fields {
        let _ = write!(out, "{:<14} {}", field.label(), value);
        if let Some(error) = state.errors.get(field) {
            let _ = write!(out, "  <- {}", error);
        }
        out.push('\n');
    }

    if state.is_submitting {
        out.push_str("Generating...\n");
    }
    if state.is_regenerating {
        out.push_str("Regenerating...\n");
    }
    if let Some(text) = state.error_message() {
        let _ = writeln!(out, "Error: {}", text);
    }
    if let Some(text) = state.success_message() {
        let _ = writeln!(out, "{}", text);
    }
    if !state.seats.is_empty() {
        let _ = writeln!(out, "Seats: {}", state.seats.join("  "));
    }
    out
}

async fn execute(form: &VoucherForm, command: Command) -> bool {
    match command {
        Command::Edit(field, value) => form.edit_field(field, &value),
        Command::Today => form.edit_field(FormField::FlightDate, &current_display_date()),
        Command::Submit => match form.submit().await {
            SubmitOutcome::Invalid => println!("Please fix the highlighted fields."),
            SubmitOutcome::Busy => println!("A submission is already running."),
            _ => {}
        },
        Command::Regenerate(position) => match form.regenerate_seat(position).await {
            RegenerateOutcome::NoVoucher => println!("No existing voucher to regenerate."),
            RegenerateOutcome::Busy => println!("A regeneration is already running."),
            _ => {}
        },
        Command::Show => {}
        Command::Reset => form.reset(),
        Command::Help => {
            println!("{}", HELP);
            return true;
        }
        Command::Quit => return false,
    }
    print!("{}", render(&form.state()));
    true
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run_terminal(form: VoucherForm) -> anyhow::Result<()> {
    // Announce lookups that land between commands.
    let mut updates = form.updates();
    let watcher = tokio::spawn(async move {
        let mut announced: Option<VoucherSnapshot> = None;
        while let Some(state) = updates.next().await {
            let current = state.existing_voucher().cloned();
            if current.is_some() && current != announced {
                if let Some(snapshot) = &current {
                    println!("Existing voucher for {}: {}", snapshot.key, snapshot.seats);
                }
            }
            announced = current;
        }
    });

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.parse::<Command>() {
            Ok(command) => {
                if !execute(&form, command).await {
                    break;
                }
            }
            Err(CommandError::Empty) => {}
            Err(e) => println!("{}", e),
        }
    }

    watcher.abort();
    Ok(())
}
