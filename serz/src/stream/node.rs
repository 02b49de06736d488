/*!
 The protocol every part of a decoded graph speaks: re-encoding, rendering, and traversal.
*/

use std::borrow::Cow;

use crate::{
    stream::models::{
        class_desc::{ClassPointer, StringRef},
        content::Content,
        value::Value,
    },
    util::printer::Printer,
};

/// A borrowed view of one node, handed to [`GraphNode::walk()`] callbacks
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Content(&'a Content),
    ClassPointer(&'a ClassPointer),
    StringRef(&'a StringRef),
    Value(&'a Value),
}

impl<'a> Node<'a> {
    /// The class name carried directly by this node, if any
    pub fn class_name(&self) -> Option<Cow<'a, str>> {
        match *self {
            Node::Content(Content::Object(object)) => object.class_name().map(Cow::Borrowed),
            Node::Content(Content::Array(array)) => Some(Cow::Borrowed(array.class_name.as_str())),
            Node::Content(Content::ClassDesc(pointer)) | Node::ClassPointer(pointer) => {
                pointer.class_name()
            }
            _ => None,
        }
    }
}

/// Shared behavior of every part of a decoded graph
pub trait GraphNode {
    /// Append the exact stream encoding of this node to `buf`
    fn write_bytes(&self, buf: &mut Vec<u8>);

    /// Append a human-readable tree of this node to `printer`
    fn render(&self, printer: &mut Printer);

    /// Visit this node, then each child it owns in stream order
    ///
    /// Back-references are yielded as nodes and never followed, so traversal of a cyclic
    /// graph terminates. Returning an error from `visit` stops the traversal.
    fn walk<'a, E, F>(&'a self, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>) -> Result<(), E>;

    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![];
        self.write_bytes(&mut buf);
        buf
    }

    fn to_display_string(&self) -> String {
        let mut printer = Printer::new();
        self.render(&mut printer);
        printer.into_string()
    }
}
