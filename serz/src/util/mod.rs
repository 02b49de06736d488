/*!
 This module defines common utilities used by the stream decoder and its renderers.
*/

pub mod hex;
pub mod printer;
