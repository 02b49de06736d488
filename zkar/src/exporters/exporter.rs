use std::io::{stdout, BufWriter, Write};

use crate::app::{error::RuntimeError, runtime::Config};

/// Defines behavior for formatting a decoded stream and writing it out
pub trait Exporter<'a> {
    /// Create a new exporter with references to the decoded data
    fn new(config: &'a Config) -> Self;
    /// Format the decoded stream
    fn format(&mut self) -> String;
    /// Format the decoded stream and write it to standard output
    fn export(&mut self) -> Result<(), RuntimeError> {
        let text = self.format();
        write_to_stdout(&text)
    }
}

fn write_to_stdout(text: &str) -> Result<(), RuntimeError> {
    let mut out = BufWriter::new(stdout().lock());
    writeln!(out, "{text}").map_err(RuntimeError::DiskError)?;
    out.flush().map_err(RuntimeError::DiskError)
}
