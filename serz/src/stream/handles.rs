/*!
 The table of handles assigned while reading a stream.

 Every class descriptor, object, array, enum constant, class, and string receives the next handle
 in sequence when it begins parsing. Later records refer back to them by handle, so the table is
 an index-addressed arena: back-references are plain numbers and never own what they point at.
*/

use std::rc::Rc;

use crate::{
    error::stream::StreamError,
    stream::{
        constants::{BASE_WIRE_HANDLE, TC_REFERENCE},
        models::{class_desc::ClassDescFlags, value::TypeCode},
    },
};

/// A field as the class data reader needs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub type_code: TypeCode,
    pub name: String,
}

/// What the class data reader needs to know about one class descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLayout {
    /// The class name, or a synthesized name for proxy classes
    pub name: String,
    pub flags: ClassDescFlags,
    pub fields: Vec<FieldLayout>,
    /// Handle of the superclass descriptor, [`None`] at the top of the hierarchy
    pub super_handle: Option<u32>,
    /// Whether the layout was read from a proxy class descriptor
    pub is_proxy: bool,
}

/// The target of a handle
#[derive(Debug, Clone, PartialEq)]
pub enum HandleEntry {
    /// A class descriptor that has been assigned a handle but whose contents are still being read
    PendingClassDesc,
    /// A fully parsed class descriptor
    ClassDesc(Rc<ClassLayout>),
    /// An object instance of the named class
    Object(String),
    /// An array of the named array class
    Array(String),
    /// A class used as a value
    Class,
    /// A string with its decoded text
    String(String),
    /// An enum constant
    Enum,
}

/// A position in the table that can be restored with [`HandleTable::rollback()`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Maps sequential handles, starting at [`BASE_WIRE_HANDLE`], to what they were assigned to
#[derive(Debug, Default)]
pub struct HandleTable {
    entries: Vec<HandleEntry>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return the handle assigned to it
    pub fn add(&mut self, entry: HandleEntry) -> u32 {
        let handle = self.next_handle();
        self.entries.push(entry);
        handle
    }

    /// The handle the next call to [`HandleTable::add()`] will assign
    pub fn next_handle(&self) -> u32 {
        BASE_WIRE_HANDLE.wrapping_add(self.entries.len() as u32)
    }

    /// Look up a handle that was read at `offset` in the stream
    pub fn resolve(&self, handle: u32, offset: usize) -> Result<&HandleEntry, StreamError> {
        handle
            .checked_sub(BASE_WIRE_HANDLE)
            .and_then(|position| self.entries.get(position as usize))
            .ok_or(StreamError::InvalidReference(handle, offset))
    }

    /// Resolve a handle that must point at a completely parsed class descriptor
    pub fn resolve_class(&self, handle: u32, offset: usize) -> Result<Rc<ClassLayout>, StreamError> {
        match self.resolve(handle, offset)? {
            HandleEntry::ClassDesc(layout) => Ok(Rc::clone(layout)),
            HandleEntry::PendingClassDesc => Err(StreamError::IncompleteClassDesc(handle, offset)),
            _ => Err(StreamError::UnexpectedRecord(
                TC_REFERENCE,
                offset,
                "a reference to a class descriptor",
            )),
        }
    }

    /// Overwrite the entry for an already assigned handle; handles dropped by a reset are ignored
    pub fn replace(&mut self, handle: u32, entry: HandleEntry) {
        if let Some(slot) = handle
            .checked_sub(BASE_WIRE_HANDLE)
            .and_then(|position| self.entries.get_mut(position as usize))
        {
            *slot = entry;
        }
    }

    /// Remember the current size of the table
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.entries.len())
    }

    /// Forget every handle assigned since `checkpoint`
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.entries.truncate(checkpoint.0);
    }

    /// Forget every handle, as `TC_RESET` requires
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(handle, entry)` pairs in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &HandleEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (BASE_WIRE_HANDLE.wrapping_add(position as u32), entry))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{
        error::stream::StreamError,
        stream::{
            constants::BASE_WIRE_HANDLE,
            handles::{ClassLayout, HandleEntry, HandleTable},
            models::class_desc::ClassDescFlags,
        },
    };

    fn layout(name: &str) -> ClassLayout {
        ClassLayout {
            name: name.to_string(),
            flags: ClassDescFlags::default(),
            fields: vec![],
            super_handle: None,
            is_proxy: false,
        }
    }

    #[test]
    fn assigns_sequential_handles() {
        let mut table = HandleTable::new();

        assert_eq!(table.add(HandleEntry::Class), BASE_WIRE_HANDLE);
        assert_eq!(table.add(HandleEntry::Enum), BASE_WIRE_HANDLE + 1);
        assert_eq!(table.next_handle(), BASE_WIRE_HANDLE + 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn can_resolve_assigned_handle() {
        let mut table = HandleTable::new();
        table.add(HandleEntry::Class);
        let handle = table.add(HandleEntry::String("abc".to_string()));

        assert_eq!(
            table.resolve(handle, 10),
            Ok(&HandleEntry::String("abc".to_string()))
        );
    }

    #[test]
    fn cant_resolve_unassigned_handle() {
        let mut table = HandleTable::new();
        table.add(HandleEntry::Class);

        assert_eq!(
            table.resolve(BASE_WIRE_HANDLE + 1, 7),
            Err(StreamError::InvalidReference(BASE_WIRE_HANDLE + 1, 7))
        );
        assert_eq!(
            table.resolve(0, 7),
            Err(StreamError::InvalidReference(0, 7))
        );
    }

    #[test]
    fn cant_resolve_pending_class() {
        let mut table = HandleTable::new();
        let handle = table.add(HandleEntry::PendingClassDesc);

        assert_eq!(
            table.resolve_class(handle, 3),
            Err(StreamError::IncompleteClassDesc(handle, 3))
        );

        table.replace(handle, HandleEntry::ClassDesc(Rc::new(layout("demo.Node"))));
        assert_eq!(table.resolve_class(handle, 3).unwrap().name, "demo.Node");
    }

    #[test]
    fn cant_resolve_string_as_class() {
        let mut table = HandleTable::new();
        let handle = table.add(HandleEntry::String("demo.Node".to_string()));

        assert!(matches!(
            table.resolve_class(handle, 0),
            Err(StreamError::UnexpectedRecord(0x71, 0, _))
        ));
    }

    #[test]
    fn can_rollback_to_checkpoint() {
        let mut table = HandleTable::new();
        table.add(HandleEntry::Class);
        let checkpoint = table.checkpoint();
        table.add(HandleEntry::Enum);
        table.add(HandleEntry::Enum);

        table.rollback(checkpoint);

        assert_eq!(table.len(), 1);
        assert_eq!(table.next_handle(), BASE_WIRE_HANDLE + 1);
    }

    #[test]
    fn reset_restarts_at_base() {
        let mut table = HandleTable::new();
        table.add(HandleEntry::Class);
        table.reset();

        assert!(table.is_empty());
        assert_eq!(table.add(HandleEntry::Class), BASE_WIRE_HANDLE);
    }

    #[test]
    fn replace_ignores_dropped_handles() {
        let mut table = HandleTable::new();
        let handle = table.add(HandleEntry::PendingClassDesc);
        table.reset();

        table.replace(handle, HandleEntry::Class);
        assert!(table.is_empty());
    }
}
