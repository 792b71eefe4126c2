use alloc::string::String;
use alloc::vec::Vec;

use mr_utils::hash::HashSet;
use thiserror::Error;

use crate::info::TypeCode;
use crate::registry::{RecordInfo, TypeRegistry};

// -----------------------------------------------------------------------------
// RegistryError

/// A structural problem found by [`TypeRegistry::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A record reaches itself through record or record-array fields.
    ///
    /// `path` lists the record ids of the cycle, e.g. `"A -> B -> A"`.
    #[error("record nests itself: {path}")]
    RecursiveRecord { path: String },
    /// An array field whose elements do not fit into its declared size.
    #[error(
        "array field `{record}.{field}` holds {element_count} elements of {element_size} bytes, \
         more than its {size} bytes"
    )]
    ArrayOverflow {
        record: String,
        field: &'static str,
        element_size: usize,
        element_count: usize,
        size: usize,
    },
}

// -----------------------------------------------------------------------------
// Validation

impl TypeRegistry {
    /// Checks the registered metadata for problems the engine would only
    /// notice while running.
    ///
    /// This is never called implicitly; the engine itself does no cycle
    /// detection. Records are visited in id order, so the first reported
    /// problem is stable across runs.
    ///
    /// # Example
    ///
    /// ```
    /// use mr_record::info::FieldDescriptor;
    /// use mr_record::registry::{RegistryError, TypeRegistry};
    ///
    /// let mut registry = TypeRegistry::new();
    /// registry.register_fields("A", vec![FieldDescriptor::opaque("b").with_nested("B")]);
    /// assert_eq!(registry.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<(), RegistryError> {
        let mut records: Vec<&RecordInfo> = self.iter().collect();
        records.sort_unstable_by(|a, b| a.id().cmp(b.id()));

        for info in &records {
            check_array_layout(info)?;
        }

        let mut finished = HashSet::default();
        let mut stack = Vec::new();
        for info in &records {
            self.visit(info, &mut stack, &mut finished)?;
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        info: &'a RecordInfo,
        stack: &mut Vec<&'a str>,
        finished: &mut HashSet<&'a str>,
    ) -> Result<(), RegistryError> {
        let id = info.id();
        if finished.contains(id) {
            return Ok(());
        }
        if let Some(start) = stack.iter().position(|entry| *entry == id) {
            let mut path = String::new();
            for entry in &stack[start..] {
                path.push_str(entry);
                path.push_str(" -> ");
            }
            path.push_str(id);
            return Err(RegistryError::RecursiveRecord { path });
        }

        stack.push(id);
        for field in info.fields() {
            let nests = match field.type_code() {
                TypeCode::Record => true,
                TypeCode::Array => field.element_type_code() == TypeCode::Record,
                _ => false,
            };
            if let Some(nested) = field.nested_type_id().filter(|_| nests)
                && let Some(nested) = self.lookup(nested)
            {
                self.visit(nested, stack, finished)?;
            }
        }
        stack.pop();

        finished.insert(id);
        Ok(())
    }
}

fn check_array_layout(info: &RecordInfo) -> Result<(), RegistryError> {
    for field in info.fields() {
        if field.type_code() != TypeCode::Array {
            continue;
        }
        let (element_size, element_count, size) =
            (field.element_size(), field.element_count(), field.size());
        if element_size == 0 || element_count == 0 || size == 0 {
            continue;
        }
        let fits = element_size
            .checked_mul(element_count)
            .is_some_and(|total| total <= size);
        if !fits {
            return Err(RegistryError::ArrayOverflow {
                record: info.id().into(),
                field: field.name(),
                element_size,
                element_count,
                size,
            });
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::RegistryError;
    use crate::info::{FieldDescriptor, TypeCode};
    use crate::registry::TypeRegistry;
    use alloc::string::ToString;
    use alloc::vec;

    fn nested(name: &'static str, target: &'static str) -> FieldDescriptor {
        FieldDescriptor::new(name, TypeCode::Record).with_nested(target)
    }

    #[test]
    fn detects_cycles() {
        let mut registry = TypeRegistry::new();
        registry.register_fields("A", vec![nested("b", "B")]);
        registry.register_fields("B", vec![nested("c", "C")]);
        registry.register_fields("C", vec![nested("a", "A")]);

        assert_eq!(
            registry.validate(),
            Err(RegistryError::RecursiveRecord {
                path: "A -> B -> C -> A".into()
            })
        );
    }

    #[test]
    fn detects_cycles_through_arrays() {
        let mut registry = TypeRegistry::new();
        registry.register_fields(
            "Node",
            vec![
                FieldDescriptor::new("children", TypeCode::Array)
                    .with_element_type(TypeCode::Record)
                    .with_nested("Node"),
            ],
        );

        let err = registry.validate().unwrap_err();
        assert_eq!(err.to_string(), "record nests itself: Node -> Node");
    }

    #[test]
    fn shared_dependencies_are_fine() {
        let mut registry = TypeRegistry::new();
        registry.register_fields("Top", vec![nested("left", "Leaf"), nested("right", "Leaf")]);
        registry.register_fields("Leaf", vec![FieldDescriptor::opaque("x")]);
        // unresolved ids degrade at runtime, they are not structural errors
        registry.register_fields("Loose", vec![nested("ghost", "Ghost")]);

        assert_eq!(registry.validate(), Ok(()));
    }

    #[test]
    fn detects_array_overflow() {
        struct Buf {
            data: [u32; 4],
        }

        let mut registry = TypeRegistry::new();
        registry.register_fields(
            "Buf",
            vec![
                FieldDescriptor::array::<Buf, [u32; 4]>("data", |b| &b.data, |b| &mut b.data)
                    .with_size(8),
            ],
        );

        assert_eq!(
            registry.validate(),
            Err(RegistryError::ArrayOverflow {
                record: "Buf".into(),
                field: "data",
                element_size: 4,
                element_count: 4,
                size: 8,
            })
        );
    }
}
