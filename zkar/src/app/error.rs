/*!
Errors that can happen during the application's runtime
*/

use std::{
    fmt::{Display, Formatter, Result},
    io::Error as IoError,
    path::PathBuf,
};

use base64::DecodeError;
use serz::error::stream::StreamError;

/// Errors that can happen during the application's runtime
#[derive(Debug)]
pub enum RuntimeError {
    InvalidOptions(String),
    ReadError(IoError, PathBuf),
    Base64Error(DecodeError),
    DecodeError(StreamError),
    DiskError(IoError),
    Unimplemented(&'static str),
}

impl Display for RuntimeError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            RuntimeError::InvalidOptions(why) => write!(fmt, "Invalid options!\n{why}"),
            RuntimeError::ReadError(why, path) => write!(fmt, "{why}: {path:?}"),
            RuntimeError::Base64Error(why) => write!(fmt, "Invalid base64 input: {why}"),
            RuntimeError::DecodeError(why) => write!(fmt, "{why}"),
            RuntimeError::DiskError(why) => write!(fmt, "{why}"),
            RuntimeError::Unimplemented(command) => {
                write!(fmt, "The `{command}` command is not implemented yet")
            }
        }
    }
}
