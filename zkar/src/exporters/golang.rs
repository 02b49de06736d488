/*!
 Prints Go type declarations that mirror the classes found in a stream.
*/

use std::collections::{HashMap, HashSet};

use serz::stream::{
    models::{
        class_desc::{ClassDesc, ClassPointer, FieldDesc, ProxyClassDesc, StringRef},
        content::Content,
        value::TypeCode,
    },
    node::{GraphNode, Node},
};

use crate::{app::runtime::Config, exporters::exporter::Exporter};

/// The package clause at the top of the output
const PACKAGE: &str = "package main";

/// Emits one Go `struct` per distinct class descriptor in the stream
pub struct GoStructs<'a> {
    /// Data that is setup from the application's runtime
    pub config: &'a Config,
    /// Text of every string seen so far, by handle
    strings: HashMap<u32, String>,
    /// Name of every class descriptor seen so far, by handle
    classes: HashMap<u32, String>,
    /// Classes that already have a declaration
    declared: HashSet<String>,
    declarations: Vec<String>,
}

impl<'a> Exporter<'a> for GoStructs<'a> {
    fn new(config: &'a Config) -> Self {
        GoStructs {
            config,
            strings: HashMap::new(),
            classes: HashMap::new(),
            declared: HashSet::new(),
            declarations: vec![],
        }
    }

    fn format(&mut self) -> String {
        let config = self.config;
        config
            .serialization
            .walk(&mut |node| {
                self.visit(node);
                Ok(())
            })
            .unwrap_or_else(|never: std::convert::Infallible| match never {});

        let mut out = PACKAGE.to_string();
        for declaration in &self.declarations {
            out.push_str("\n\n");
            out.push_str(declaration);
        }
        out
    }
}

impl<'a> GoStructs<'a> {
    fn visit(&mut self, node: Node) {
        match node {
            Node::Content(Content::String(text)) | Node::StringRef(StringRef::Literal(text)) => {
                self.strings
                    .insert(text.handle, text.as_str().into_owned());
            }
            Node::ClassPointer(ClassPointer::ClassDesc(desc)) => {
                if let Some(name) = node.class_name() {
                    self.declare_class(desc, name.into_owned());
                }
            }
            Node::ClassPointer(ClassPointer::Proxy(proxy)) => self.declare_proxy(proxy),
            _ => {}
        }
    }

    fn declare_class(&mut self, desc: &ClassDesc, name: String) {
        // The descriptor is visited before its own field type names
        for field in &desc.fields {
            if let Some(StringRef::Literal(text)) = &field.type_name {
                self.strings
                    .insert(text.handle, text.as_str().into_owned());
            }
        }

        self.classes.insert(desc.handle, name.clone());
        if name.starts_with('[') || !self.declared.insert(name.clone()) {
            return;
        }

        let super_name = match &desc.super_class {
            ClassPointer::ClassDesc(super_desc) => Some(super_desc.class_name().into_owned()),
            ClassPointer::Reference(reference) => self.classes.get(&reference.handle).cloned(),
            ClassPointer::Proxy(_) | ClassPointer::Null => None,
        };

        let mut declaration = format!("type {} struct {{\n", go_identifier(&name));
        if let Some(super_name) = super_name {
            declaration.push_str(&format!("\t{}\n", go_identifier(&super_name)));
        }
        for field in &desc.fields {
            declaration.push_str(&format!(
                "\t{} {} `java:\"{}\"`\n",
                go_field_name(&field.name.as_str()),
                self.go_type(field),
                field.name
            ));
        }
        declaration.push('}');
        self.declarations.push(declaration);
    }

    fn declare_proxy(&mut self, proxy: &ProxyClassDesc) {
        let name = proxy.display_name();
        self.classes.insert(proxy.handle, name.clone());
        if self.declared.insert(name.clone()) {
            self.declarations
                .push(format!("// {name} is a dynamic proxy class"));
        }
    }

    /// The Go type of a declared field
    fn go_type(&self, field: &FieldDesc) -> String {
        if let Some(primitive) = go_primitive(field.type_code) {
            return primitive.to_string();
        }

        let signature = match &field.type_name {
            Some(StringRef::Literal(text)) => Some(text.as_str().into_owned()),
            Some(StringRef::Reference(reference)) => self.strings.get(&reference.handle).cloned(),
            None => None,
        };
        signature
            .map(|signature| go_signature(&signature))
            .unwrap_or_else(|| "interface{}".to_string())
    }
}

fn go_primitive(type_code: TypeCode) -> Option<&'static str> {
    match type_code {
        TypeCode::Byte => Some("int8"),
        TypeCode::Char => Some("uint16"),
        TypeCode::Double => Some("float64"),
        TypeCode::Float => Some("float32"),
        TypeCode::Integer => Some("int32"),
        TypeCode::Long => Some("int64"),
        TypeCode::Short => Some("int16"),
        TypeCode::Boolean => Some("bool"),
        TypeCode::Object | TypeCode::Array => None,
    }
}

/// Map a JVM type signature, i.e. `[Ljava/lang/String;`, to a Go type
fn go_signature(signature: &str) -> String {
    let element = signature.trim_start_matches('[');
    let dimensions = signature.len() - element.len();

    let element_type = match element
        .strip_prefix('L')
        .and_then(|class| class.strip_suffix(';'))
    {
        Some("java/lang/String") => "string".to_string(),
        Some("java/lang/Object") => "interface{}".to_string(),
        Some(class) => format!("*{}", go_identifier(class)),
        None => element
            .bytes()
            .next()
            .filter(|_| element.len() == 1)
            .and_then(TypeCode::from_byte)
            .and_then(go_primitive)
            .unwrap_or("interface{}")
            .to_string(),
    };

    format!("{}{element_type}", "[]".repeat(dimensions))
}

/// Turn a Java class name into an exported Go identifier, i.e. `java.util.HashMap` to `JavaUtilHashMap`
fn go_identifier(class_name: &str) -> String {
    let ident: String = class_name
        .split(['.', '/', '$'])
        .map(capitalize)
        .collect();
    match ident.chars().next() {
        Some(first) if first.is_alphabetic() => ident,
        _ => format!("T{ident}"),
    }
}

/// Turn a Java field name into an exported Go field name
fn go_field_name(name: &str) -> String {
    let field = capitalize(name);
    match field.chars().next() {
        Some(first) if first.is_alphabetic() => field,
        _ => format!("F{field}"),
    }
}

/// Uppercase the first letter and drop characters Go does not allow in identifiers
fn capitalize(part: &str) -> String {
    let mut chars = part
        .chars()
        .filter(|letter| letter.is_alphanumeric() || *letter == '_');
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
