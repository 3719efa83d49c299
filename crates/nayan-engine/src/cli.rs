use crate::simulator::Simulator;
use nayan_core::store::KeyValueStore;
use std::error::Error;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Clone, Copy)]
pub struct OutputHandlers {
    pub out: fn(&str),
    pub err: fn(&str),
}

pub struct FileOptions {
    pub stop_on_error: bool,
}

pub struct ReplOptions<'a> {
    pub banner_lines: &'a [&'a str],
    pub prompt: &'a str,
    pub exit_commands: &'a [&'a str],
}

fn emit(output: OutputHandlers, text: &str) {
    if !text.is_empty() {
        (output.out)(text);
    }
}

/// Run a script of simulator commands. Blank lines and `#` comments are skipped.
pub async fn run_file<S: KeyValueStore>(
    simulator: &mut Simulator<S>,
    output: OutputHandlers,
    path: &str,
    options: FileOptions,
) -> Result<(), Box<dyn Error>> {
    let content = tokio::fs::read_to_string(path).await?;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        (output.out)(&format!("> {}", trimmed));
        match simulator.execute_line(trimmed).await {
            Ok(result) => emit(output, &result),
            Err(err) => {
                (output.err)(&format!("Error executing line '{}': {}", trimmed, err));
                if options.stop_on_error {
                    return Err(io::Error::other(err.to_string()).into());
                }
            }
        }
    }
    Ok(())
}

enum ReadLineResult {
    Input(String),
    Skip,
    Exit,
    Error(io::Error),
}

fn classify_line(result: Result<Option<String>, io::Error>, exit_commands: &[&str]) -> ReadLineResult {
    match result {
        Ok(Some(input)) => {
            let trimmed = input.trim().to_string();
            if trimmed.is_empty() {
                ReadLineResult::Skip
            } else if exit_commands.contains(&trimmed.as_str()) {
                ReadLineResult::Exit
            } else {
                ReadLineResult::Input(trimmed)
            }
        }
        Ok(None) => ReadLineResult::Exit,
        Err(e) => ReadLineResult::Error(e),
    }
}

pub async fn run_repl<S: KeyValueStore>(
    simulator: &mut Simulator<S>,
    output: OutputHandlers,
    options: ReplOptions<'_>,
) -> Result<(), Box<dyn Error>> {
    for line in options.banner_lines {
        (output.out)(line);
    }

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin).lines();
    let mut stdout = io::stdout();

    loop {
        print!("{}", options.prompt);
        stdout.flush()?;

        match classify_line(reader.next_line().await, options.exit_commands) {
            ReadLineResult::Input(line) => match simulator.execute_line(&line).await {
                Ok(result) => emit(output, &result),
                Err(err) => (output.err)(&format!("Error: {}", err)),
            },
            ReadLineResult::Skip => continue,
            ReadLineResult::Exit => break,
            ReadLineResult::Error(e) => return Err(e.into()),
        }
    }
    Ok(())
}
