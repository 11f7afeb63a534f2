//! Structural overwrite merger. Fills a target record from a source record.
//!
//! Two flavours share the same rule: an empty/zero source value never
//! overwrites anything, nested records are merged field by field, and every
//! other non-empty source value replaces the target value wholesale.
//!
//! - [`Merge`] / [`merge`] work on typed records declared with [`merge_fields!`].
//!   The shapes are checked by the compiler.
//! - [`merge_documents`] works on decoded YAML documents, where the shapes are
//!   only known at run time and a mismatch is reported as [`MergeError::ShapeMismatch`].

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use chrono::NaiveDate;
use serde_yaml_ng::{Mapping, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("{0}")]
    ShapeMismatch(String),
}

/// A value that can be overwritten by the non-empty parts of another value of the same type.
pub trait Merge {
    /// True when the value is the type's zero value and must not overwrite anything.
    fn is_unset(&self) -> bool;

    /// Copies every set part of `source` into `self`.
    fn merge_from(&mut self, source: &Self);
}

/// Overwrites `target` with every non-empty field of `source`.
pub fn merge<T: Merge>(target: &mut T, source: &T) {
    target.merge_from(source);
}

macro_rules! replace_when_set {
    ($($ty:ty => |$v:ident| $unset:expr),* $(,)?) => {
        $(
            impl Merge for $ty {
                fn is_unset(&self) -> bool {
                    let $v = self;
                    $unset
                }

                fn merge_from(&mut self, source: &Self) {
                    if !source.is_unset() {
                        *self = source.clone();
                    }
                }
            }
        )*
    };
}

replace_when_set!(
    String => |s| s.is_empty(),
    bool => |b| !*b,
    u32 => |n| *n == 0,
    u64 => |n| *n == 0,
    i32 => |n| *n == 0,
    i64 => |n| *n == 0,
    usize => |n| *n == 0,
    f64 => |n| *n == 0.0,
    NaiveDate => |d| *d == NaiveDate::default(),
);

impl<T: Clone> Merge for Vec<T> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }

    fn merge_from(&mut self, source: &Self) {
        if !source.is_empty() {
            *self = source.clone();
        }
    }
}

impl<K: Ord + Clone, V: Clone> Merge for BTreeMap<K, V> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }

    fn merge_from(&mut self, source: &Self) {
        if !source.is_empty() {
            *self = source.clone();
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone, S: BuildHasher + Clone> Merge for HashMap<K, V, S> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }

    fn merge_from(&mut self, source: &Self) {
        if !source.is_empty() {
            *self = source.clone();
        }
    }
}

impl<T: Merge + Clone> Merge for Option<T> {
    fn is_unset(&self) -> bool {
        self.as_ref().map_or(true, Merge::is_unset)
    }

    fn merge_from(&mut self, source: &Self) {
        let Some(incoming) = source else {
            return;
        };
        if let Some(existing) = self.as_mut() {
            existing.merge_from(incoming);
        } else if !incoming.is_unset() {
            *self = Some(incoming.clone());
        }
    }
}

/// Implements [`Merge`] for a struct by merging the listed fields one by one.
/// A record is unset when every listed field is unset.
macro_rules! merge_fields {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::merge::Merge for $ty {
            fn is_unset(&self) -> bool {
                true $( && $crate::merge::Merge::is_unset(&self.$field) )*
            }

            #[allow(unused_variables)]
            fn merge_from(&mut self, source: &Self) {
                $( $crate::merge::Merge::merge_from(&mut self.$field, &source.$field); )*
            }
        }
    };
}

pub(crate) use merge_fields;

// ────────────────────────────────────────────────────────────────────────────
// Document-level merge
// ────────────────────────────────────────────────────────────────────────────

/// Overlays `source` onto `target`. Both must be YAML mappings.
///
/// A non-empty source value whose shape (mapping or not) differs from a
/// non-null target value at the same key is a [`MergeError::ShapeMismatch`]
/// naming the dotted key path.
pub fn merge_documents(target: &mut Value, source: &Value) -> Result<(), MergeError> {
    match (target, source) {
        (Value::Mapping(t), Value::Mapping(s)) => merge_mappings(t, s, &mut Vec::new()),
        (t, s) => Err(MergeError::ShapeMismatch(format!(
            "target and source must both be mappings (got {} and {})",
            kind(t),
            kind(s)
        ))),
    }
}

fn merge_mappings(
    target: &mut Mapping,
    source: &Mapping,
    path: &mut Vec<String>,
) -> Result<(), MergeError> {
    for (key, incoming) in source {
        if is_zero(incoming) {
            continue;
        }
        path.push(key_label(key));

        if let Some(existing) = target.get_mut(key) {
            match (existing, incoming) {
                (Value::Mapping(t), Value::Mapping(s)) => merge_mappings(t, s, path)?,
                (existing, incoming)
                    if !existing.is_null() && existing.is_mapping() != incoming.is_mapping() =>
                {
                    return Err(MergeError::ShapeMismatch(format!(
                        "'{}' is {} in one document and {} in the other",
                        path.join("."),
                        kind(existing),
                        kind(incoming)
                    )));
                }
                (existing, incoming) => *existing = incoming.clone(),
            }
        } else {
            target.insert(key.clone(), incoming.clone());
        }

        path.pop();
    }
    Ok(())
}

/// The YAML counterpart of a zero value: null, false, 0, "", [] or a mapping of zeros.
fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !*b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        Value::Mapping(map) => map.values().all(is_zero),
        Value::Tagged(tagged) => is_zero(&tagged.value),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => kind(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Address {
        city: String,
        zip: String,
    }

    merge_fields!(Address { city, zip });

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Profile {
        title: String,
        years: u32,
        remote: bool,
        address: Address,
        skills: Vec<String>,
        mentor: Option<Address>,
        cache: String,
    }

    merge_fields!(Profile {
        title,
        years,
        remote,
        address,
        skills,
        mentor,
    });

    fn yaml(src: &str) -> Value {
        serde_yaml_ng::from_str(src).unwrap()
    }

    #[test]
    fn test_empty_source_keeps_target() {
        let mut target = Profile {
            title: "Senior Engineer".to_string(),
            ..Default::default()
        };
        merge(&mut target, &Profile::default());
        assert_eq!(target.title, "Senior Engineer");
    }

    #[test]
    fn test_set_source_fills_target() {
        let mut target = Profile::default();
        let source = Profile {
            title: "Senior Engineer".to_string(),
            years: 5,
            remote: true,
            ..Default::default()
        };
        merge(&mut target, &source);
        assert_eq!(target.title, "Senior Engineer");
        assert_eq!(target.years, 5);
        assert!(target.remote);
    }

    #[test]
    fn test_set_source_overwrites_set_target() {
        let mut target = Profile {
            title: "Engineer".to_string(),
            ..Default::default()
        };
        let source = Profile {
            title: "Staff Engineer".to_string(),
            ..Default::default()
        };
        merge(&mut target, &source);
        assert_eq!(target.title, "Staff Engineer");
    }

    #[test]
    fn test_nested_partial_records_merge_fieldwise() {
        let mut target = Profile {
            address: Address {
                city: "NYC".to_string(),
                zip: String::new(),
            },
            ..Default::default()
        };
        let source = Profile {
            address: Address {
                city: String::new(),
                zip: "10001".to_string(),
            },
            ..Default::default()
        };
        merge(&mut target, &source);
        assert_eq!(
            target.address,
            Address {
                city: "NYC".to_string(),
                zip: "10001".to_string()
            }
        );
    }

    #[test]
    fn test_sequences_replaced_wholesale() {
        let mut target = Profile {
            skills: vec!["go".to_string(), "c".to_string()],
            ..Default::default()
        };
        merge(
            &mut target,
            &Profile {
                skills: vec!["rust".to_string()],
                ..Default::default()
            },
        );
        assert_eq!(target.skills, vec!["rust"]);
        merge(&mut target, &Profile::default());
        assert_eq!(target.skills, vec!["rust"]);
    }

    #[test]
    fn test_option_merges_inner_record() {
        let mut target = Profile {
            mentor: Some(Address {
                city: "Boston".to_string(),
                zip: String::new(),
            }),
            ..Default::default()
        };
        let source = Profile {
            mentor: Some(Address {
                city: String::new(),
                zip: "02101".to_string(),
            }),
            ..Default::default()
        };
        merge(&mut target, &source);
        let mentor = target.mentor.unwrap();
        assert_eq!(mentor.city, "Boston");
        assert_eq!(mentor.zip, "02101");
    }

    #[test]
    fn test_option_unset_source_ignored() {
        let mut target = Profile::default();
        merge(
            &mut target,
            &Profile {
                mentor: Some(Address::default()),
                ..Default::default()
            },
        );
        assert!(target.mentor.is_none());
    }

    #[test]
    fn test_undeclared_fields_not_merged() {
        let mut target = Profile::default();
        merge(
            &mut target,
            &Profile {
                cache: "derived".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(target.cache, "");
    }

    #[test]
    fn test_record_is_unset() {
        assert!(Profile::default().is_unset());
        assert!(!Profile {
            years: 1,
            ..Default::default()
        }
        .is_unset());
    }

    #[test]
    fn test_documents_merge_nested() {
        let mut base = yaml(
            "information:\n  name: Jane\n  address:\n    city: NYC\n    zip: ''\njob:\n  title: Engineer\n",
        );
        let primary = yaml(
            "information:\n  address:\n    city: ''\n    zip: '10001'\njob:\n  title: ''\n  company: Acme\n",
        );
        merge_documents(&mut base, &primary).unwrap();
        assert_eq!(
            base,
            yaml("information:\n  name: Jane\n  address:\n    city: NYC\n    zip: '10001'\njob:\n  title: Engineer\n  company: Acme\n")
        );
    }

    #[test]
    fn test_documents_primary_wins_when_set() {
        let mut base = yaml("job:\n  title: Engineer\nskills: [a, b]\n");
        let primary = yaml("job:\n  title: Senior Engineer\nskills: [c]\n");
        merge_documents(&mut base, &primary).unwrap();
        assert_eq!(base, yaml("job:\n  title: Senior Engineer\nskills: [c]\n"));
    }

    #[test]
    fn test_documents_null_target_accepts_mapping() {
        let mut base = yaml("summary:\n");
        let primary = yaml("summary:\n  body: hello\n");
        merge_documents(&mut base, &primary).unwrap();
        assert_eq!(base, yaml("summary:\n  body: hello\n"));
    }

    #[test]
    fn test_documents_top_level_must_be_mappings() {
        let mut base = yaml("- a\n- b\n");
        let err = merge_documents(&mut base, &yaml("job: {}\n")).unwrap_err();
        assert!(matches!(err, MergeError::ShapeMismatch(_)));
    }

    #[test]
    fn test_documents_kind_mismatch_names_path() {
        let mut base = yaml("information:\n  address:\n    city: NYC\n");
        let primary = yaml("information:\n  address: 1 Main St\n");
        let err = merge_documents(&mut base, &primary).unwrap_err();
        assert_eq!(
            err,
            MergeError::ShapeMismatch(
                "'information.address' is a mapping in one document and a string in the other"
                    .to_string()
            )
        );
    }
}
