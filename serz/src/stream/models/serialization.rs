/*!
 A whole decoded stream.
*/

use crate::{
    error::stream::StreamError,
    stream::{
        models::content::Content,
        node::{GraphNode, Node},
        parser::{DecodeOptions, ObjectStreamReader},
    },
    util::{hex::hexify, printer::Printer},
};

/// The four bytes that start a standard stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub magic: u16,
    pub version: u16,
}

/// The top-level records of a stream, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Serialization {
    /// [`None`] for the header-less jdk8u20 variant
    pub header: Option<StreamHeader>,
    pub contents: Vec<Content>,
}

impl Serialization {
    /// Decode a standard stream, starting with `0xACED 0x0005`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StreamError> {
        Self::from_bytes_with_options(bytes, DecodeOptions::default())
    }

    pub fn from_bytes_with_options(
        bytes: &[u8],
        options: DecodeOptions,
    ) -> Result<Self, StreamError> {
        ObjectStreamReader::with_options(bytes, options).parse()
    }

    /// Decode a stream that was written without a header, as jdk8u20 gadget payloads are
    pub fn from_jdk8u20_bytes(bytes: &[u8]) -> Result<Self, StreamError> {
        Self::from_jdk8u20_bytes_with_options(bytes, DecodeOptions::default())
    }

    pub fn from_jdk8u20_bytes_with_options(
        bytes: &[u8],
        options: DecodeOptions,
    ) -> Result<Self, StreamError> {
        ObjectStreamReader::with_options(bytes, options).parse_jdk8u20()
    }

    /// The first top-level record
    pub fn root(&self) -> Option<&Content> {
        self.contents.first()
    }
}

impl GraphNode for Serialization {
    fn write_bytes(&self, buf: &mut Vec<u8>) {
        if let Some(header) = &self.header {
            buf.extend(header.magic.to_be_bytes());
            buf.extend(header.version.to_be_bytes());
        }
        self.contents
            .iter()
            .for_each(|content| content.write_bytes(buf));
    }

    fn render(&self, printer: &mut Printer) {
        if let Some(header) = &self.header {
            printer.print(format!("@Magic - {}", hexify(&header.magic.to_be_bytes())));
            printer.print(format!(
                "@Version - {}",
                hexify(&header.version.to_be_bytes())
            ));
        }
        printer.print("@Contents");
        printer.increase_indent();
        self.contents
            .iter()
            .for_each(|content| content.render(printer));
        printer.decrease_indent();
    }

    /// Visits the top-level records only through their own nodes; the stream itself is not a node
    fn walk<'a, E, F>(&'a self, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>) -> Result<(), E>,
    {
        for content in &self.contents {
            content.walk(visit)?;
        }
        Ok(())
    }
}
