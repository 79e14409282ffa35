use std::fmt::Display;

use dialoguer::{Confirm, Input, Password};

use crate::{config::Secret, error::InstallerError, ui};

// ── Operator terminal ─────────────────────────────────────────────────────────

/// Line-oriented access to the operator. Every read blocks until a line is entered.
pub trait Console {
    fn read_line(&mut self, prompt: &str) -> Result<String, InstallerError>;
    /// Like `read_line`, without echoing the input.
    fn read_secret(&mut self, prompt: &str) -> Result<String, InstallerError>;
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, InstallerError>;
    /// Shows one entry of a numbered option list.
    fn show_option(&mut self, index: usize, label: &str);
    /// Tells the operator why the last answer was refused.
    fn reject(&mut self, reason: &str);
}

/// The real terminal, through dialoguer.
pub struct Terminal;

impl Console for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<String, InstallerError> {
        Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String, InstallerError> {
        Ok(Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, InstallerError> {
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn show_option(&mut self, index: usize, label: &str) {
        ui::print_option(index, label);
    }

    fn reject(&mut self, reason: &str) {
        ui::print_error(reason);
    }
}

// ── Validated input ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Echo {
    Visible,
    Hidden,
}

/// Reads answers until `validate` accepts one.
///
/// Visible input is trimmed before validation; hidden input is passed as typed.
/// A refusal is shown to the operator and never leaves this loop.
fn ask<T>(
    console: &mut dyn Console,
    prompt: &str,
    echo: Echo,
    validate: impl Fn(&str) -> Result<T, String>,
) -> Result<T, InstallerError> {
    loop {
        let answer = match echo {
            Echo::Visible => console.read_line(prompt)?,
            Echo::Hidden => console.read_secret(prompt)?,
        };
        let answer = match echo {
            Echo::Visible => answer.trim(),
            Echo::Hidden => answer.as_str(),
        };
        match validate(answer) {
            Ok(value) => return Ok(value),
            Err(reason) => console.reject(&reason),
        }
    }
}

/// Free-form text, validated by `validate`.
pub fn text(
    console: &mut dyn Console,
    prompt: &str,
    validate: impl Fn(&str) -> Result<String, String>,
) -> Result<String, InstallerError> {
    ask(console, prompt, Echo::Visible, validate)
}

pub fn non_empty(console: &mut dyn Console, prompt: &str) -> Result<String, InstallerError> {
    text(console, prompt, |s| {
        if s.is_empty() {
            Err("A value is required.".to_string())
        } else {
            Ok(s.to_string())
        }
    })
}

/// Hidden, non-empty input.
pub fn secret(console: &mut dyn Console, prompt: &str) -> Result<Secret, InstallerError> {
    ask(console, prompt, Echo::Hidden, |s| {
        if s.is_empty() {
            Err("The password cannot be empty.".to_string())
        } else {
            Ok(Secret::new(s))
        }
    })
}

pub fn positive_int(console: &mut dyn Console, prompt: &str) -> Result<u32, InstallerError> {
    ask(console, prompt, Echo::Visible, |s| {
        let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("'{}' is not a number.", s));
        }
        if s.starts_with('-') || digits.bytes().all(|b| b == b'0') {
            return Err(format!("{} is too small — enter at least 1.", s));
        }
        digits
            .parse::<u32>()
            .map_err(|_| format!("{} is too large.", s))
    })
}

/// Shows `options` as a numbered list and returns the index picked.
pub fn choice<T: Display>(
    console: &mut dyn Console,
    prompt: &str,
    options: &[T],
) -> Result<usize, InstallerError> {
    pick(console, prompt, options, None)
}

/// Like [`choice`], but an empty answer picks `default`.
pub fn choice_or<T: Display>(
    console: &mut dyn Console,
    prompt: &str,
    options: &[T],
    default: usize,
) -> Result<usize, InstallerError> {
    let prompt = format!("{} [{}]", prompt, default);
    pick(console, &prompt, options, Some(default))
}

fn pick<T: Display>(
    console: &mut dyn Console,
    prompt: &str,
    options: &[T],
    default: Option<usize>,
) -> Result<usize, InstallerError> {
    for (i, option) in options.iter().enumerate() {
        console.show_option(i, &option.to_string());
    }
    let last = options.len().saturating_sub(1);

    ask(console, prompt, Echo::Visible, |s| match (s.parse::<usize>(), default) {
        (_, Some(d)) if s.is_empty() => Ok(d),
        (Err(_), _) => Err(format!("'{}' is not a number — enter 0 to {}.", s, last)),
        (Ok(n), _) if n >= options.len() => {
            Err(format!("{} is out of range — enter 0 to {}.", n, last))
        }
        (Ok(n), _) => Ok(n),
    })
}

// ── Test support ──────────────────────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use super::testing::ScriptedConsole;
    use super::*;

    #[test]
    fn positive_int_reprompts_until_valid() {
        let mut console = ScriptedConsole::new(&["", "four", "-2", "0", " 4 "]);
        assert_eq!(positive_int(&mut console, "Swap size").unwrap(), 4);
        assert_eq!(console.rejections.len(), 4);
        assert!(console.answers.is_empty());
    }

    #[test]
    fn positive_int_distinguishes_non_numeric_from_out_of_range() {
        let mut console = ScriptedConsole::new(&["abc", "0", "1"]);
        positive_int(&mut console, "Swap size").unwrap();
        assert!(console.rejections[0].contains("not a number"));
        assert!(console.rejections[1].contains("too small"));
    }

    #[test]
    fn positive_int_reports_huge_values_as_too_large() {
        let mut console = ScriptedConsole::new(&[
            "99999999999999999999",
            "5000000000",
            "-99999999999999999999",
            "12",
        ]);
        assert_eq!(positive_int(&mut console, "Swap size").unwrap(), 12);
        assert!(console.rejections[0].contains("too large"));
        assert!(console.rejections[1].contains("too large"));
        assert!(console.rejections[2].contains("too small"));
    }

    #[test]
    fn choice_rejects_out_of_range_and_garbage() {
        let options = ["bash", "zsh", "fish"];
        let mut console = ScriptedConsole::new(&["3", "x", "-1", "2"]);
        assert_eq!(choice(&mut console, "Shell", &options).unwrap(), 2);
        assert_eq!(console.options_shown, options);
        assert_eq!(console.rejections.len(), 3);
        assert!(console.rejections[0].contains("out of range"));
        assert!(console.rejections[1].contains("not a number"));
    }

    #[test]
    fn empty_answer_takes_the_default_choice() {
        let options = ["/dev/sda", "/dev/sdb"];
        let mut console = ScriptedConsole::new(&["  "]);
        assert_eq!(choice_or(&mut console, "Target disk", &options, 0).unwrap(), 0);
        assert!(console.rejections.is_empty());
        assert_eq!(console.prompts, ["Target disk [0]"]);

        let mut console = ScriptedConsole::new(&["", "1"]);
        assert_eq!(choice(&mut console, "Target disk", &options).unwrap(), 1);
        assert_eq!(console.rejections.len(), 1);
    }

    #[test]
    fn non_empty_skips_blank_answers() {
        let mut console = ScriptedConsole::new(&["", "   ", "archbox"]);
        assert_eq!(non_empty(&mut console, "Hostname").unwrap(), "archbox");
        assert_eq!(console.rejections.len(), 2);
    }

    #[test]
    fn secret_keeps_surrounding_spaces() {
        let mut console = ScriptedConsole::new(&["", " pa ss "]);
        let pw = secret(&mut console, "Password").unwrap();
        assert_eq!(pw.expose(), " pa ss ");
        assert_eq!(console.rejections.len(), 1);
    }

    #[test]
    fn exhausted_script_is_an_error_not_a_hang() {
        let mut console = ScriptedConsole::new(&["nope"]);
        assert!(positive_int(&mut console, "Swap size").is_err());
    }
}
