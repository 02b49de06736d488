/*!
 The per-class slices of an object's serialized state.
*/

use crate::{
    stream::{
        models::{
            class_desc::{render_annotations, write_annotations},
            content::Content,
            value::Value,
        },
        node::{GraphNode, Node},
    },
    util::printer::Printer,
};

/// A declared field and the value read for it
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub name: String,
    pub value: Value,
}

/// The data one class in an object's hierarchy wrote for the object
#[derive(Debug, Clone, PartialEq)]
pub struct ClassData {
    /// The class that wrote this level
    pub class_name: String,
    /// Values of the declared fields, in declaration order
    pub fields: Vec<FieldValue>,
    /// Records written by `writeObject` or `writeExternal`, without the trailing `TC_ENDBLOCKDATA`,
    /// or [`None`] when the class carries no annotation
    pub annotations: Option<Vec<Content>>,
}

impl ClassData {
    /// Look up a field value by name
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    pub(crate) fn write_bytes(&self, buf: &mut Vec<u8>) {
        self.fields.iter().for_each(|field| field.value.write_bytes(buf));
        if let Some(annotations) = &self.annotations {
            write_annotations(annotations, buf);
        }
    }

    pub(crate) fn render(&self, printer: &mut Printer) {
        printer.print(format!("@ClassName - {}", self.class_name));
        printer.increase_indent();
        printer.print("{}Attributes");
        printer.increase_indent();
        for field in &self.fields {
            printer.print(field.name.as_str());
            printer.increase_indent();
            field.value.render(printer);
            printer.decrease_indent();
        }
        printer.decrease_indent();
        if let Some(annotations) = &self.annotations {
            render_annotations("@ObjectAnnotation", annotations, printer);
        }
        printer.decrease_indent();
    }

    pub(crate) fn walk_children<'a, E, F>(&'a self, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>) -> Result<(), E>,
    {
        for field in &self.fields {
            field.value.walk(visit)?;
        }
        for annotation in self.annotations.iter().flatten() {
            annotation.walk(visit)?;
        }
        Ok(())
    }
}
