//! Line-oriented interactive session.
//!
//! Each menu entry is a [`Screen`]; `dispatch_table` maps screens to handlers. Menu
//! keys and labels are only used for display and input lookup.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tally_core::{Category, TransactionId, TransactionUpdate};

use crate::dashboard::{render_summary, render_table};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Add,
    Import,
    History,
    Edit,
    Delete,
    Quit,
}

impl Screen {
    pub const MENU: [Screen; 7] = [
        Screen::Dashboard,
        Screen::Add,
        Screen::Import,
        Screen::History,
        Screen::Edit,
        Screen::Delete,
        Screen::Quit,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Screen::Dashboard => "d",
            Screen::Add => "a",
            Screen::Import => "i",
            Screen::History => "h",
            Screen::Edit => "e",
            Screen::Delete => "x",
            Screen::Quit => "q",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Add => "Add transaction",
            Screen::Import => "Import CSV",
            Screen::History => "History",
            Screen::Edit => "Edit transaction",
            Screen::Delete => "Delete transaction",
            Screen::Quit => "Quit",
        }
    }

    pub fn from_key(input: &str) -> Option<Screen> {
        let input = input.trim();
        Self::MENU
            .into_iter()
            .find(|s| s.key().eq_ignore_ascii_case(input))
    }
}

/// What the loop does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

type Handler<R, W> = fn(&mut Session, &mut Console<R, W>) -> Result<Flow>;

/// Input and output for the shell; stdin/stdout in the binary, buffers in tests.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Prompt and read one trimmed line; `None` at end of input.
    fn ask(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        let mut s = String::new();
        if self.input.read_line(&mut s)? == 0 {
            return Ok(None);
        }
        Ok(Some(s.trim().to_string()))
    }

    fn say(&mut self, msg: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{msg}")?;
        Ok(())
    }
}

fn dispatch_table<R: BufRead, W: Write>() -> [(Screen, Handler<R, W>); 7] {
    [
        (Screen::Dashboard, show_dashboard::<R, W>),
        (Screen::Add, add_transaction::<R, W>),
        (Screen::Import, import_csv::<R, W>),
        (Screen::History, show_history::<R, W>),
        (Screen::Edit, edit_transaction::<R, W>),
        (Screen::Delete, delete_transaction::<R, W>),
        (Screen::Quit, quit::<R, W>),
    ]
}

pub fn run<R: BufRead, W: Write>(session: &mut Session, console: &mut Console<R, W>) -> Result<()> {
    let table = dispatch_table::<R, W>();
    loop {
        console.say("")?;
        for screen in Screen::MENU {
            writeln!(console.output, "  [{}] {}", screen.key(), screen.label())?;
        }
        let Some(choice) = console.ask("Choose")? else {
            return Ok(());
        };
        let Some(screen) = Screen::from_key(&choice) else {
            console.say(format!("Unknown option {choice:?}"))?;
            continue;
        };
        let Some((_, handler)) = table.iter().find(|(s, _)| *s == screen) else {
            continue;
        };

        match handler(session, console) {
            Ok(Flow::Exit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(e) => {
                tracing::debug!(?screen, error = %format!("{e:#}"), "screen failed");
                console.say(format!("Error: {e:#}"))?;
            }
        }
    }
}

fn quit<R: BufRead, W: Write>(_: &mut Session, _: &mut Console<R, W>) -> Result<Flow> {
    Ok(Flow::Exit)
}

fn show_dashboard<R: BufRead, W: Write>(s: &mut Session, c: &mut Console<R, W>) -> Result<Flow> {
    render_summary(&mut c.output, &s.summary())?;
    Ok(Flow::Continue)
}

fn add_transaction<R: BufRead, W: Write>(s: &mut Session, c: &mut Console<R, W>) -> Result<Flow> {
    let Some(description) = c.ask("Description")? else {
        return Ok(Flow::Exit);
    };
    let Some(amount) = c.ask("Amount")? else {
        return Ok(Flow::Exit);
    };
    let amount: f64 = amount
        .replace(',', ".")
        .parse()
        .with_context(|| format!("amount {amount:?} is not a number"))?;
    let Some(date) = c.ask("Date [YYYY-MM-DD, blank = today]")? else {
        return Ok(Flow::Exit);
    };
    let date = parse_date_or_today(&date)?;
    let Some(category) = c.ask("Category [blank = automatic]")? else {
        return Ok(Flow::Exit);
    };
    let category = parse_optional_category(&category)?;

    let t = s.add(date, &description, amount, category)?;
    let msg = format!(
        "Added #{}: {} - {:.2} ({})",
        t.id, t.description, t.amount, t.category
    );
    c.say(msg)?;
    Ok(Flow::Continue)
}

fn import_csv<R: BufRead, W: Write>(s: &mut Session, c: &mut Console<R, W>) -> Result<Flow> {
    c.say("Format: date,description,amount (no header), e.g. 2024-11-13,Biedronka,150.50")?;
    let Some(path) = c.ask("CSV path")? else {
        return Ok(Flow::Exit);
    };
    let ids = s.import_csv(&PathBuf::from(path))?;
    c.say(format!("Imported {} transactions", ids.len()))?;
    Ok(Flow::Continue)
}

fn show_history<R: BufRead, W: Write>(s: &mut Session, c: &mut Console<R, W>) -> Result<Flow> {
    let Some(filter) = c.ask("Filter by category [blank = all]")? else {
        return Ok(Flow::Exit);
    };
    let filter = parse_optional_category(&filter)?;
    render_table(&mut c.output, s.history(filter))?;
    Ok(Flow::Continue)
}

fn edit_transaction<R: BufRead, W: Write>(s: &mut Session, c: &mut Console<R, W>) -> Result<Flow> {
    let Some(id) = ask_id(c)? else {
        return Ok(Flow::Exit);
    };
    let current = s.get(id)?.clone();
    c.say(format!(
        "Editing #{}: {} - {:.2} ({})  [blank keeps the current value]",
        current.id, current.description, current.amount, current.category
    ))?;

    let Some(description) = c.ask("Description")? else {
        return Ok(Flow::Exit);
    };
    let Some(amount) = c.ask("Amount")? else {
        return Ok(Flow::Exit);
    };
    let Some(category) = c.ask("Category")? else {
        return Ok(Flow::Exit);
    };

    let update = TransactionUpdate {
        description: (!description.is_empty()).then_some(description),
        amount: if amount.is_empty() {
            None
        } else {
            Some(
                amount
                    .replace(',', ".")
                    .parse()
                    .with_context(|| format!("amount {amount:?} is not a number"))?,
            )
        },
        category: parse_optional_category(&category)?,
    };
    if update.is_empty() {
        c.say("Nothing changed")?;
        return Ok(Flow::Continue);
    }
    s.update(id, update)?;
    c.say(format!("Updated #{id}"))?;
    Ok(Flow::Continue)
}

fn delete_transaction<R: BufRead, W: Write>(s: &mut Session, c: &mut Console<R, W>) -> Result<Flow> {
    let Some(id) = ask_id(c)? else {
        return Ok(Flow::Exit);
    };
    let removed = s.delete(id)?;
    c.say(format!("Deleted #{}: {}", removed.id, removed.description))?;
    Ok(Flow::Continue)
}

fn ask_id<R: BufRead, W: Write>(c: &mut Console<R, W>) -> Result<Option<TransactionId>> {
    let Some(raw) = c.ask("Transaction id")? else {
        return Ok(None);
    };
    let n: u64 = raw
        .trim_start_matches('#')
        .parse()
        .with_context(|| format!("{raw:?} is not a transaction id"))?;
    Ok(Some(TransactionId(n)))
}

fn parse_date_or_today(s: &str) -> Result<NaiveDate> {
    if s.is_empty() {
        return Ok(chrono::Local::now().date_naive());
    }
    tally_ingest::parse_date(s).with_context(|| format!("unrecognized date {s:?}"))
}

fn parse_optional_category(s: &str) -> Result<Option<Category>> {
    if s.is_empty() {
        return Ok(None);
    }
    Ok(Some(s.parse()?))
}
