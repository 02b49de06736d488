use std::fs;

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::info;

use serz::stream::models::serialization::Serialization;

use crate::{
    app::{
        error::RuntimeError,
        options::{Input, Options},
    },
    exporters::{exporter::Exporter, golang::GoStructs, text::Text},
};

/// Stores the application state and handles application lifecycle
pub struct Config {
    /// App configuration options
    pub options: Options,
    /// The decoded stream
    pub serialization: Serialization,
}

impl Config {
    /// Read the input and decode it
    pub fn new(options: Options) -> Result<Config, RuntimeError> {
        let bytes = Self::read_input(&options.input)?;
        info!("Read {} bytes of input", bytes.len());

        let serialization = if options.jdk8u20 {
            Serialization::from_jdk8u20_bytes_with_options(&bytes, options.decode_options)
        } else {
            Serialization::from_bytes_with_options(&bytes, options.decode_options)
        }
        .map_err(RuntimeError::DecodeError)?;
        info!("Decoded {} top-level records", serialization.contents.len());

        Ok(Config {
            options,
            serialization,
        })
    }

    fn read_input(input: &Input) -> Result<Vec<u8>, RuntimeError> {
        match input {
            Input::File(path) => {
                fs::read(path).map_err(|why| RuntimeError::ReadError(why, path.clone()))
            }
            Input::Base64(data) => STANDARD
                .decode(data.trim())
                .map_err(RuntimeError::Base64Error),
        }
    }

    /// Handles exporting the decoded stream in the requested format
    pub fn start(&self) -> Result<(), RuntimeError> {
        if self.options.golang {
            GoStructs::new(self).export()
        } else {
            Text::new(self).export()
        }
    }
}
