//! Operation Registry
//!
//! Maps operation names to their declared schema and implementation.
//! Built once at startup, then shared read-only.

use std::collections::HashMap;
use std::fmt;

use crate::error::{DispatchError, OperationFailure};
use crate::schema::OperationSpec;
use crate::value::Arguments;

/// A callable operation. Arguments have already been validated against the
/// operation's spec when `invoke` runs.
pub trait Operation: Send + Sync {
    fn invoke(&self, args: &Arguments) -> Result<String, OperationFailure>;
}

impl<F> Operation for F
where
    F: Fn(&Arguments) -> Result<String, OperationFailure> + Send + Sync,
{
    fn invoke(&self, args: &Arguments) -> Result<String, OperationFailure> {
        self(args)
    }
}

/// Spec plus implementation
pub struct RegisteredOperation {
    pub spec: OperationSpec,
    pub implementation: Box<dyn Operation>,
}

impl fmt::Debug for RegisteredOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredOperation")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<RegisteredOperation>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<O>(
        &mut self,
        spec: OperationSpec,
        implementation: O,
    ) -> Result<(), DispatchError>
    where
        O: Operation + 'static,
    {
        if self.index.contains_key(&spec.name) {
            return Err(DispatchError::DuplicateOperation(spec.name));
        }
        spec.validate()?;

        self.index.insert(spec.name.clone(), self.entries.len());
        self.entries.push(RegisteredOperation {
            spec,
            implementation: Box::new(implementation),
        });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&RegisteredOperation, DispatchError> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))
    }

    pub fn spec(&self, name: &str) -> Option<&OperationSpec> {
        self.lookup(name).ok().map(|entry| &entry.spec)
    }

    /// Specs in registration order. The iterator is cheap to clone, so a
    /// caller can walk it more than once.
    pub fn describe_all(&self) -> DescribeAll<'_> {
        DescribeAll {
            inner: self.entries.iter(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.spec.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Iterator returned by [`Registry::describe_all`]
#[derive(Clone)]
pub struct DescribeAll<'a> {
    inner: std::slice::Iter<'a, RegisteredOperation>,
}

impl<'a> Iterator for DescribeAll<'a> {
    type Item = &'a OperationSpec;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| &e.spec)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for DescribeAll<'_> {}
