//! Line-oriented operator input.
//!
//! Every helper re-prompts until the input is acceptable, so validation
//! failures never leave this module. The only errors are I/O errors; end of
//! input surfaces as `io::ErrorKind::UnexpectedEof`.

use core_types::validation::{is_valid_name, parse_grade};
use core_types::Scores;
use std::io::{self, BufRead, Write};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints `prompt` and returns the next line without its line ending.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Asks until the answer is a valid name (letters and spaces only).
    pub fn name(&mut self, prompt: &str) -> io::Result<String> {
        loop {
            let name = self.read_line(prompt)?;
            if is_valid_name(&name) {
                return Ok(name);
            }
            writeln!(
                self.output,
                "Please enter a proper name (letters and spaces only)."
            )?;
        }
    }

    /// Like `name`, but a blank answer is accepted and returned as-is.
    pub fn optional_name(&mut self, prompt: &str) -> io::Result<String> {
        loop {
            let name = self.read_line(prompt)?;
            if name.trim().is_empty() || is_valid_name(&name) {
                return Ok(name);
            }
            writeln!(
                self.output,
                "Please enter a proper name (letters and spaces only)."
            )?;
        }
    }

    /// Asks until the answer is a number in `[0, 100]`. Decimals are allowed.
    pub fn grade(&mut self, subject: &str) -> io::Result<f64> {
        let prompt = format!("Enter {subject} Grade (0 - 100, decimals allowed): ");
        loop {
            match parse_grade(subject, &self.read_line(&prompt)?) {
                Ok(grade) => return Ok(grade),
                Err(_) => writeln!(self.output, "Invalid! Grade must be between 0 - 100")?,
            }
        }
    }

    /// Asks for the math, science and english grades in that order.
    pub fn scores(&mut self) -> io::Result<Scores> {
        let math = self.grade("Math")?;
        let science = self.grade("Science")?;
        let english = self.grade("English")?;
        Scores::new(math, science, english).map_err(io::Error::other)
    }

    /// Asks until the answer is a non-negative whole number.
    pub fn whole_number(&mut self, prompt: &str) -> io::Result<u32> {
        loop {
            let input = self.read_line(prompt)?;
            let input = input.trim();
            if input.contains('.') {
                writeln!(
                    self.output,
                    "Invalid! Please enter a whole number (no decimals)."
                )?;
                continue;
            }
            let digits_only = !input.is_empty() && input.chars().all(|c| c.is_ascii_digit());
            match input.parse::<u32>() {
                Ok(value) if digits_only => return Ok(value),
                _ => writeln!(self.output, "Invalid! Please enter a valid number.")?,
            }
        }
    }

    /// A yes/no question; only an answer starting with `y` or `Y` is a yes.
    pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = self.read_line(prompt)?;
        Ok(answer
            .trim_start()
            .chars()
            .next()
            .is_some_and(|c| c.eq_ignore_ascii_case(&'y')))
    }

    pub fn pause(&mut self) -> io::Result<()> {
        self.read_line("\nPress Enter to continue...").map(|_| ())
    }
}
