/*!
 Errors that can happen when parsing serialization stream data.
*/

use std::{
    error::Error,
    fmt::{Display, Formatter, Result},
};

use crate::{stream::constants::tag_name, util::hex::hexify};

/// Errors that can happen when parsing serialization stream data
///
/// Every variant that can be raised mid-stream carries the offset it was raised at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// A read of `.1` bytes at offset `.0` ran past the end of the stream
    UnexpectedEnd(usize, usize),
    /// A back-reference named a handle that was never assigned
    InvalidReference(u32, usize),
    /// A back-reference named a class descriptor that is still being parsed
    IncompleteClassDesc(u32, usize),
    /// The stream does not start the way the selected variant requires
    MalformedHeader(String),
    /// A null or proxy class descriptor was found where a concrete one is required
    UnsupportedClassPointer(u8, usize),
    /// An array class name does not describe an array type
    InvalidArrayElementType(String, usize),
    /// The byte matches no known record kind
    UnknownRecordTag(u8, usize),
    /// A known record kind appeared where it is not allowed
    UnexpectedRecord(u8, usize, &'static str),
    /// A field or array element type code is not one of `BCDFIJSZL[`
    InvalidTypeCode(u8, usize),
    /// A declared length or count is negative
    InvalidLength(i64, usize),
    /// Records are nested deeper than the configured limit
    DepthLimitExceeded(usize, usize),
    /// An externalizable class wrote its data with the legacy, non block-data protocol
    UnsupportedExternalContents(String, usize),
}

impl Display for StreamError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            StreamError::UnexpectedEnd(idx, wanted) => {
                write!(fmt, "Unexpected end of stream reading {wanted} bytes at index {idx}")
            }
            StreamError::InvalidReference(handle, idx) => {
                write!(fmt, "Handle {handle:#x} referenced on index {idx} was never assigned")
            }
            StreamError::IncompleteClassDesc(handle, idx) => write!(
                fmt,
                "Class descriptor {handle:#x} referenced on index {idx} is not fully parsed yet"
            ),
            StreamError::MalformedHeader(why) => write!(fmt, "Invalid stream header: {why}"),
            StreamError::UnsupportedClassPointer(tag, idx) => write!(
                fmt,
                "{} is not allowed as a class descriptor on index {idx}",
                tag_name(*tag)
            ),
            StreamError::InvalidArrayElementType(name, idx) => {
                write!(fmt, "Array class name {name:?} is invalid on index {idx}")
            }
            StreamError::UnknownRecordTag(tag, idx) => {
                write!(fmt, "Unknown record tag {} on index {idx}", hexify(&[*tag]))
            }
            StreamError::UnexpectedRecord(tag, idx, expected) => write!(
                fmt,
                "Unexpected {} on index {idx}, expected {expected}",
                tag_name(*tag)
            ),
            StreamError::InvalidTypeCode(code, idx) => {
                write!(fmt, "Invalid type code {} on index {idx}", hexify(&[*code]))
            }
            StreamError::InvalidLength(len, idx) => {
                write!(fmt, "Invalid length {len} on index {idx}")
            }
            StreamError::DepthLimitExceeded(depth, idx) => {
                write!(fmt, "Records nested deeper than {depth} levels on index {idx}")
            }
            StreamError::UnsupportedExternalContents(class, idx) => write!(
                fmt,
                "Externalizable class {class} on index {idx} does not use block data"
            ),
        }
    }
}

impl Error for StreamError {}
