/*!
 Errors that can happen when decoding serialization streams.
*/

pub mod stream;
