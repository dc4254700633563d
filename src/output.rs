use std::io::{self, Write};

use serde::Serialize;

use crate::app::RunResult;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Summary,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_run(result: &RunResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub struct SummaryOutput;

impl SummaryOutput {
    pub fn print_run(result: &RunResult) -> io::Result<()> {
        let mut stdout = io::stdout();
        Self::write_run(&mut stdout, result)
    }

    pub fn write_run<W: Write>(out: &mut W, result: &RunResult) -> io::Result<()> {
        writeln!(out, "GPAD suppliers for {}", result.month)?;
        writeln!(out, "  source:    {}", result.download_link)?;
        for file in &result.input_files {
            writeln!(out, "  input:     {file}")?;
        }
        writeln!(out, "  practices: {}", result.practices)?;
        writeln!(out, "  output:    {}", result.output)?;
        if !result.removed_tmp_files {
            writeln!(
                out,
                "  kept:      {} {}",
                result.archive_path, result.extract_dir
            )?;
        }
        Ok(())
    }
}
