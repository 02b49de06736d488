#![forbid(unsafe_code)]
/*!
 Parsers and tools to inspect Java object serialization streams.

 The [`stream`] module turns the bytes written by `java.io.ObjectOutputStream` into a typed,
 navigable graph, resolving back-references through a handle table and reproducing the exact
 byte layout on request.
*/

pub mod error;
pub mod stream;
pub mod util;
