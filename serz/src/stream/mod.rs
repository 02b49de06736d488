/*!
 Contains logic and data structures used to decode Java object serialization streams into native Rust data structures.

 ## Overview

 `java.io.ObjectOutputStream` writes a stream of tagged records: objects with their class descriptors,
 strings, arrays, enum constants, and raw block data. Every record that can be shared is assigned a
 handle, and later occurrences are written as back-references to that handle.

 ## Features

 - Exact re-serialization of decoded graphs with [`GraphNode::to_bytes()`]
 - Tree rendering of decoded graphs with [`GraphNode::to_display_string()`]
 - Support for header-less jdk8u20 payloads
 - Bounded recursion and allocation for untrusted input
*/

pub mod constants;
pub mod cursor;
pub mod handles;
pub mod models;
pub mod node;
pub mod parser;
mod tests;

use crate::{
    error::stream::StreamError,
    stream::{models::serialization::Serialization, node::GraphNode},
};

/// Decode a standard stream that starts with `0xACED 0x0005`
pub fn decode_standard(bytes: &[u8]) -> Result<Serialization, StreamError> {
    Serialization::from_bytes(bytes)
}

/// Decode a header-less jdk8u20 payload
pub fn decode_legacy_variant(bytes: &[u8]) -> Result<Serialization, StreamError> {
    Serialization::from_jdk8u20_bytes(bytes)
}

/// Render any part of a decoded graph as an indented tree
pub fn to_display_string(node: &impl GraphNode) -> String {
    node.to_display_string()
}
