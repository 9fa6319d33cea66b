use std::cell::RefCell;
use std::io::{BufRead, Write};
use taskboard_core::error::AppError;
use taskboard_core::notify::Confirm;

/// Line-oriented terminal shared by the command loop and confirmation
/// prompts, so both read from the same buffered input.
pub struct Terminal<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    /// Returns `None` at end of input.
    pub fn read_line(&self) -> Result<Option<String>, AppError> {
        let mut line = String::new();
        let bytes = self.input.borrow_mut().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

impl<R: BufRead, W: Write> Confirm for Terminal<R, W> {
    fn confirm(&self, message: &str) -> bool {
        {
            let mut output = self.output.borrow_mut();
            if write!(output, "{message} [y/N] ")
                .and_then(|_| output.flush())
                .is_err()
            {
                return false;
            }
        }

        match self.read_line() {
            Ok(Some(answer)) => is_affirmative(&answer),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Terminal, is_affirmative};
    use std::io::Cursor;
    use taskboard_core::notify::Confirm;

    #[test]
    fn affirmative_answers() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("nope"));
    }

    #[test]
    fn confirm_prints_prompt_and_reads_answer() {
        let terminal = Terminal::new(Cursor::new("y\nn\n"), Vec::new());

        assert!(terminal.confirm("Delete?"));
        assert!(!terminal.confirm("Delete?"));

        let output = String::from_utf8(terminal.into_output()).unwrap();
        assert_eq!(output, "Delete? [y/N] Delete? [y/N] ");
    }

    #[test]
    fn confirm_declines_at_end_of_input() {
        let terminal = Terminal::new(Cursor::new(""), Vec::new());
        assert!(!terminal.confirm("Delete?"));
    }

    #[test]
    fn read_line_shares_input_with_prompts() {
        let terminal = Terminal::new(Cursor::new("delete 1\ny\nlist\n"), Vec::new());

        assert_eq!(terminal.read_line().unwrap().as_deref(), Some("delete 1\n"));
        assert!(terminal.confirm("Delete?"));
        assert_eq!(terminal.read_line().unwrap().as_deref(), Some("list\n"));
        assert_eq!(terminal.read_line().unwrap(), None);
    }
}
