use clap::Parser;

use std::io::{self, BufRead, Write};

use crate::cmd::{audit, check, Session};
use crate::config::Config;
use crate::entity::account::Account;
use crate::entity::quote::Quote;
use crate::CliResult;

static TITLE: &str = concat!(
    "====================================\n",
    "           Wallet Checker\n",
    "====================================\n",
);
static CHOICES: &str = concat!(
    "1. Check balance of a specific wallet\n",
    "2. Check multiple wallets from a file\n",
    "3. Exit\n",
);

#[derive(Parser, Debug)]
pub struct Args {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Main,
    Single,
    Batch,
    AfterBatch,
    Exit,
}

impl State {
    fn prompt(self) -> Option<&'static str> {
        match self {
            State::Main => Some("Enter your choice: "),
            State::Single => Some("Enter wallet address (0 to return to the main menu): "),
            State::AfterBatch => Some("Enter 0 to return to the main menu or any key to exit: "),
            State::Batch | State::Exit => None,
        }
    }

    /// `answer` is `None` once the input is exhausted.
    fn next(self, answer: Option<&str>) -> State {
        match (self, answer) {
            (_, None) | (State::Exit, _) => State::Exit,
            (State::Main, Some("1")) => State::Single,
            (State::Main, Some("2")) => State::Batch,
            (State::Main, Some("3")) => State::Exit,
            (State::Main, Some(_)) => State::Main,
            (State::Single, Some("0")) => State::Main,
            (State::Single, Some(_)) => State::Single,
            (State::Batch, Some(_)) => State::AfterBatch,
            (State::AfterBatch, Some("0")) => State::Main,
            (State::AfterBatch, Some(_)) => State::Exit,
        }
    }
}

pub fn run(_args: Args) -> CliResult<()> {
    let config = Config::new()?;

    let stdin = io::stdin();

    Menu::new(&config).start(&mut stdin.lock(), &mut io::stdout())
}

struct Menu<'a> {
    config: &'a Config,
    session: Option<Session>,
    quote: Option<Quote>,
}

impl<'a> Menu<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            session: None,
            quote: None,
        }
    }

    fn start<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> CliResult<()> {
        let mut state = State::Main;

        loop {
            match state {
                State::Exit => break,
                State::Main => {
                    self.quote = None;
                    write!(out, "{}\n{}\n", TITLE, CHOICES)?;
                }
                State::Batch => {
                    self.batch(out)?;
                    state = state.next(Some(""));
                    continue;
                }
                State::Single | State::AfterBatch => {}
            }

            if let Some(prompt) = state.prompt() {
                write!(out, "{}", prompt)?;
                out.flush()?;
            }

            let answer = read_answer(input)?;
            let answer = answer.as_deref();

            match (state, answer) {
                (State::Main, Some(choice)) if state.next(answer) == State::Main => {
                    writeln!(out, "Invalid choice '{}'. Please try again.", choice)?;
                }
                (State::Single, Some(address)) if address != "0" => {
                    self.single(address, out)?;
                }
                _ => {}
            }

            state = state.next(answer);
        }

        writeln!(out, "Exiting...")?;

        Ok(())
    }

    fn session(&mut self) -> CliResult<&Session> {
        let config = self.config;

        match &mut self.session {
            Some(session) => Ok(&*session),
            slot => Ok(&*slot.insert(Session::new(config)?)),
        }
    }

    /// Failures are reported and the menu carries on.
    fn single<W: Write>(&mut self, address: &str, out: &mut W) -> CliResult<()> {
        let quote = match self.quote {
            Some(quote) => Ok(quote),
            None => self.session().and_then(|session| session.quote()),
        };

        match quote {
            Ok(quote) => {
                self.quote = Some(quote);
                let session = self.session()?;
                let outcome = session.audit().querier().query(&Account::new(address), &quote);
                writeln!(out, "{}", check::describe(&outcome))?;
            }
            Err(err) => writeln!(out, "{}", err)?,
        }

        Ok(())
    }

    fn batch<W: Write>(&mut self, out: &mut W) -> CliResult<()> {
        let (input, output) = (self.config.input(), self.config.output());

        match audit::perform(self.config, &input, &output) {
            Ok(report) => {
                writeln!(
                    out,
                    "Total number of wallets with balance of ${} or less: {}",
                    self.config.threshold,
                    report.below_threshold()
                )?;
                writeln!(
                    out,
                    "Total number of wallets with balance greater than ${}: {}",
                    self.config.threshold,
                    report.ranked().len()
                )?;
            }
            Err(err) => writeln!(out, "{}", err)?,
        }

        Ok(())
    }
}

fn read_answer<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();

    if input.read_line(&mut line)? == 0 {
        Ok(None)
    } else {
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(script: &str) -> String {
        let config = Config::default();
        let mut input = io::Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();

        Menu::new(&config).start(&mut input, &mut out).unwrap();

        String::from_utf8(out).unwrap()
    }

    #[test]
    fn main_menu_choices() {
        assert_eq!(State::Main.next(Some("1")), State::Single);
        assert_eq!(State::Main.next(Some("2")), State::Batch);
        assert_eq!(State::Main.next(Some("3")), State::Exit);
        assert_eq!(State::Main.next(Some("9")), State::Main);
        assert_eq!(State::Main.next(None), State::Exit);
    }

    #[test]
    fn single_check_loops_until_zero() {
        assert_eq!(State::Single.next(Some("abc")), State::Single);
        assert_eq!(State::Single.next(Some("0")), State::Main);
        assert_eq!(State::Single.next(None), State::Exit);
    }

    #[test]
    fn after_batch_returns_or_exits() {
        assert_eq!(State::Batch.next(Some("")), State::AfterBatch);
        assert_eq!(State::AfterBatch.next(Some("0")), State::Main);
        assert_eq!(State::AfterBatch.next(Some("x")), State::Exit);
    }

    #[test]
    fn exit_choice_ends_the_loop() {
        let out = drive("3\n");

        assert!(out.contains("1. Check balance of a specific wallet"));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn invalid_choice_shows_the_menu_again() {
        let out = drive("7\n3\n");

        assert!(out.contains("Invalid choice '7'. Please try again."));
        assert_eq!(out.matches("Enter your choice: ").count(), 2);
    }

    #[test]
    fn end_of_input_exits() {
        let out = drive("");

        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn leaving_single_mode_without_checking() {
        let out = drive("1\n0\n3\n");

        assert!(out.contains("Enter wallet address"));
        assert_eq!(out.matches("Enter your choice: ").count(), 2);
    }
}
