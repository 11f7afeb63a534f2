//! Generic tree walker. Applies a string transform to every string leaf of a record.
//!
//! Records opt in with [`visit_fields!`], which lists the document-facing
//! fields explicitly. Fields left out of the list (derived URLs, cached icons,
//! bookkeeping ids) are never visited.
//!
//! # Rules
//! - Non-empty strings are replaced by `transform(s)`; empty strings are skipped.
//! - Sequences are visited by position, maps by value.
//! - Numbers, booleans and calendar dates are left alone.
//! - The first transform error aborts the walk and is returned unchanged.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use chrono::NaiveDate;

/// A node that can hand each of its string leaves to a transform.
pub trait Walk {
    fn walk_strings<E, F>(&mut self, transform: &mut F) -> Result<(), E>
    where
        F: FnMut(&str) -> Result<String, E>;
}

/// Walks `node` in place, replacing every non-empty string leaf with `transform(leaf)`.
pub fn walk<T, E, F>(node: &mut T, mut transform: F) -> Result<(), E>
where
    T: Walk + ?Sized,
    F: FnMut(&str) -> Result<String, E>,
{
    node.walk_strings(&mut transform)
}

impl Walk for String {
    fn walk_strings<E, F>(&mut self, transform: &mut F) -> Result<(), E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        if !self.is_empty() {
            *self = transform(self)?;
        }
        Ok(())
    }
}

impl<T: Walk> Walk for Vec<T> {
    fn walk_strings<E, F>(&mut self, transform: &mut F) -> Result<(), E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        for item in self.iter_mut() {
            item.walk_strings(transform)?;
        }
        Ok(())
    }
}

impl<T: Walk> Walk for Option<T> {
    fn walk_strings<E, F>(&mut self, transform: &mut F) -> Result<(), E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        match self {
            Some(inner) => inner.walk_strings(transform),
            None => Ok(()),
        }
    }
}

impl<K: Ord, V: Walk> Walk for BTreeMap<K, V> {
    fn walk_strings<E, F>(&mut self, transform: &mut F) -> Result<(), E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        for value in self.values_mut() {
            value.walk_strings(transform)?;
        }
        Ok(())
    }
}

impl<K, V: Walk, S: BuildHasher> Walk for HashMap<K, V, S> {
    fn walk_strings<E, F>(&mut self, transform: &mut F) -> Result<(), E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        for value in self.values_mut() {
            value.walk_strings(transform)?;
        }
        Ok(())
    }
}

macro_rules! opaque_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Walk for $ty {
                fn walk_strings<E, F>(&mut self, _transform: &mut F) -> Result<(), E>
                where
                    F: FnMut(&str) -> Result<String, E>,
                {
                    Ok(())
                }
            }
        )*
    };
}

opaque_leaf!(bool, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64, NaiveDate);

/// Implements [`Walk`] for a struct by visiting the listed fields in order.
macro_rules! visit_fields {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::walk::Walk for $ty {
            #[allow(unused_variables)]
            fn walk_strings<E, F>(&mut self, transform: &mut F) -> Result<(), E>
            where
                F: FnMut(&str) -> Result<String, E>,
            {
                $( $crate::walk::Walk::walk_strings(&mut self.$field, transform)?; )*
                Ok(())
            }
        }
    };
}

pub(crate) use visit_fields;
