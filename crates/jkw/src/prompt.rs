//! Line-oriented prompts that drive the parameter form from a terminal.

use jkw_core::{Confirm, ParameterForm, ParameterType};
use std::io::{self, BufRead, Write};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// `None` on end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Walks every parameter once. An empty answer keeps the current value,
    /// `-` restores the default; rejected values are asked again.
    pub fn edit_form(&mut self, form: &mut ParameterForm) -> io::Result<()> {
        let definitions = form.definitions().to_vec();
        for def in &definitions {
            if !def.description.is_empty() {
                writeln!(self.output, "# {}", def.description)?;
            }
            if def.kind == ParameterType::Choice {
                writeln!(self.output, "# choices: {}", def.choices.join(", "))?;
            }
            loop {
                let current = form.value(&def.name).unwrap_or_default().to_string();
                let prompt = format!("{} ({}) [{current}]: ", def.name, def.kind.label());
                let Some(answer) = self.ask(&prompt)? else {
                    return Ok(());
                };
                let result = match answer.as_str() {
                    "" => Ok(()),
                    "-" => form.reset(&def.name),
                    value => form.set_edit(&def.name, value),
                };
                match result {
                    Ok(()) => break,
                    Err(e) => writeln!(self.output, "{e}")?,
                }
            }
        }
        Ok(())
    }

    pub fn print_summary(&mut self, pairs: &[(String, String)]) -> io::Result<()> {
        for (name, value) in pairs {
            writeln!(self.output, "  {name} = {value}")?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Confirm for Prompter<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        match self.ask(&format!("{prompt} [y/N] ")) {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("confirmation prompt failed: {e}");
                false
            }
        }
    }
}
