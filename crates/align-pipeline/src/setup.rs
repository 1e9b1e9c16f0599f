//! Typed registry of named objects.
//!
//! An [`AlignSetup`] owns every value stored in it. Stages of one processing
//! session share a setup by reference; there is no process-wide instance.
//!
//! ```
//! use align_pipeline::AlignSetup;
//!
//! let mut setup = AlignSetup::<Vec<u32>>::new();
//! setup.get_or_create("TOBRods").push(7);
//! assert_eq!(setup.find("TOBRods").unwrap(), &vec![7]);
//! assert!(setup.find("TIBRods").is_err());
//! ```

use std::collections::BTreeMap;

use log::info;
use thiserror::Error;

/// Errors returned by [`AlignSetup`] lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("no object named `{0}` in setup")]
    NotFound(String),
    #[error("an object named `{0}` already exists in setup")]
    AlreadyExists(String),
}

/// Named objects of one type, kept in name order.
#[derive(Debug, Clone)]
pub struct AlignSetup<T> {
    objects: BTreeMap<String, T>,
}

impl<T> Default for AlignSetup<T> {
    fn default() -> Self {
        Self {
            objects: BTreeMap::new(),
        }
    }
}

impl<T> AlignSetup<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value for `name`, default-constructed and inserted if absent.
    pub fn get_or_create(&mut self, name: &str) -> &mut T
    where
        T: Default,
    {
        self.objects.entry(name.to_owned()).or_default()
    }

    /// Stored value for `name`.
    ///
    /// # Errors
    /// [`SetupError::NotFound`] if nothing is stored under `name`.
    pub fn find(&self, name: &str) -> Result<&T, SetupError> {
        self.objects
            .get(name)
            .ok_or_else(|| SetupError::NotFound(name.to_owned()))
    }

    /// # Errors
    /// [`SetupError::NotFound`] if nothing is stored under `name`.
    pub fn find_mut(&mut self, name: &str) -> Result<&mut T, SetupError> {
        self.objects
            .get_mut(name)
            .ok_or_else(|| SetupError::NotFound(name.to_owned()))
    }

    /// Store `value` under a new name.
    ///
    /// # Errors
    /// [`SetupError::AlreadyExists`] if `name` is taken; the stored value is
    /// kept and `value` is dropped.
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> Result<&mut T, SetupError> {
        use std::collections::btree_map::Entry;

        match self.objects.entry(name.into()) {
            Entry::Occupied(entry) => Err(SetupError::AlreadyExists(entry.key().clone())),
            Entry::Vacant(entry) => Ok(entry.insert(value)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Stored names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Log every stored name at info level and return them.
    pub fn dump(&self) -> Vec<String> {
        info!("Printing out AlignSetup: {} objects", self.objects.len());
        self.objects
            .keys()
            .map(|name| {
                info!("  {name}");
                name.clone()
            })
            .collect()
    }
}
