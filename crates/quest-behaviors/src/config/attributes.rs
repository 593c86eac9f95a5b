//! Typed access to a behavior element's string attributes.
//!
//! Every read records the attribute as recognized and pushes a
//! [`ConfigIssue`] instead of failing, so one pass over an element reports
//! all of its problems. Reads that fail fall back to the default.

use std::any::type_name;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;

use bot_core::Vec3;

use crate::error::ConfigIssue;

pub(crate) struct AttributeReader<'a> {
    attributes: &'a BTreeMap<String, String>,
    recognized: BTreeSet<&'a str>,
    issues: Vec<ConfigIssue>,
}

impl<'a> AttributeReader<'a> {
    pub(crate) fn new(attributes: &'a BTreeMap<String, String>) -> Self {
        Self {
            attributes,
            recognized: BTreeSet::new(),
            issues: Vec::new(),
        }
    }

    fn raw(&mut self, name: &str) -> Option<&'a str> {
        let attributes = self.attributes;
        let (key, value) = attributes.get_key_value(name)?;
        self.recognized.insert(key.as_str());
        Some(value.trim())
    }

    fn parse<T: FromStr>(&mut self, name: &str, raw: &str) -> Option<T> {
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.issues.push(ConfigIssue::Unparsable {
                    name: name.to_owned(),
                    value: raw.to_owned(),
                    expected: short_type_name::<T>(),
                });
                None
            }
        }
    }

    fn constrain<T>(&mut self, name: &str, value: T, domain: &RangeInclusive<T>) -> Option<T>
    where
        T: PartialOrd + Display,
    {
        if domain.contains(&value) {
            Some(value)
        } else {
            self.issues.push(ConfigIssue::OutOfRange {
                name: name.to_owned(),
                value: value.to_string(),
                domain: format!("[{}..{}]", domain.start(), domain.end()),
            });
            None
        }
    }

    /// Optional value constrained to `domain`.
    pub(crate) fn ranged<T>(&mut self, name: &str, domain: RangeInclusive<T>) -> Option<T>
    where
        T: FromStr + PartialOrd + Display,
    {
        let raw = self.raw(name)?;
        let value = self.parse::<T>(name, raw)?;
        self.constrain(name, value, &domain)
    }

    /// Boolean flag, accepting `true`/`false` in any case.
    pub(crate) fn flag(&mut self, name: &str, default: bool) -> bool {
        let Some(raw) = self.raw(name) else {
            return default;
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                self.issues.push(ConfigIssue::Unparsable {
                    name: name.to_owned(),
                    value: raw.to_owned(),
                    expected: "bool",
                });
                default
            }
        }
    }

    /// Enumerated value parsed through `FromStr`.
    pub(crate) fn choice<T: FromStr>(&mut self, name: &str, default: T) -> T {
        match self.raw(name) {
            Some(raw) => self.parse(name, raw).unwrap_or(default),
            None => default,
        }
    }

    /// Comma-separated list, each element constrained to `domain`.
    pub(crate) fn list<T>(&mut self, name: &str, domain: RangeInclusive<T>) -> Vec<T>
    where
        T: FromStr + PartialOrd + Display,
    {
        let Some(raw) = self.raw(name) else {
            return Vec::new();
        };
        let mut values = Vec::new();
        for item in raw.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            if let Some(value) = self.parse::<T>(name, item) {
                if let Some(value) = self.constrain(name, value, &domain) {
                    values.push(value);
                }
            }
        }
        values
    }

    /// Values of `base`, `base1`, `base2`, ... in attribute-name order.
    ///
    /// Pushes [`ConfigIssue::Missing`] when fewer than `required` are found.
    pub(crate) fn numbered<T>(
        &mut self,
        base: &str,
        required: usize,
        domain: RangeInclusive<T>,
    ) -> Vec<T>
    where
        T: FromStr + PartialOrd + Display + Clone,
    {
        let attributes = self.attributes;
        let names: Vec<&'a str> = attributes
            .keys()
            .map(String::as_str)
            .filter(|key| {
                key.strip_prefix(base)
                    .is_some_and(|suffix| suffix.bytes().all(|b| b.is_ascii_digit()))
            })
            .collect();

        let mut values = Vec::with_capacity(names.len());
        for name in names {
            if let Some(value) = self.ranged(name, domain.clone()) {
                values.push(value);
            }
        }
        if values.len() < required && !self.has_issue_for(base) {
            self.issues.push(ConfigIssue::Missing {
                name: format!("{base}1"),
            });
        }
        values
    }

    /// Point read from `{prefix}X`, `{prefix}Y` and `{prefix}Z`.
    ///
    /// Missing axes read as zero; `None` when no axis is present at all.
    pub(crate) fn vector(&mut self, prefix: &str) -> Option<Vec3> {
        let mut coords = [0.0f32; 3];
        let mut present = false;
        for (slot, axis) in coords.iter_mut().zip(["X", "Y", "Z"]) {
            let name = format!("{prefix}{axis}");
            if let Some(raw) = self.raw(&name) {
                present = true;
                if let Some(value) = self.parse::<f32>(&name, raw) {
                    *slot = value;
                }
            }
        }
        present.then(|| Vec3::new(coords[0], coords[1], coords[2]))
    }

    fn has_issue_for(&self, base: &str) -> bool {
        self.issues.iter().any(|issue| match issue {
            ConfigIssue::Unparsable { name, .. } | ConfigIssue::OutOfRange { name, .. } => {
                name.starts_with(base)
            }
            _ => false,
        })
    }

    /// Attributes never read, in name order.
    pub(crate) fn unrecognized(&self) -> Vec<&'a str> {
        let attributes = self.attributes;
        attributes
            .keys()
            .map(String::as_str)
            .filter(|key| !self.recognized.contains(key))
            .collect()
    }

    pub(crate) fn into_issues(self) -> Vec<ConfigIssue> {
        self.issues
    }
}

fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn numbered_reads_base_and_suffixes() {
        let map = attrs(&[
            ("EscortNpcId", "200"),
            ("EscortNpcId2", "202"),
            ("EscortNpcId1", "201"),
            ("EscortNpcIdle", "7"),
        ]);
        let mut reader = AttributeReader::new(&map);
        let ids = reader.numbered::<u32>("EscortNpcId", 1, 1..=u32::MAX);
        assert_eq!(ids, vec![200, 201, 202]);
        assert_eq!(reader.unrecognized(), vec!["EscortNpcIdle"]);
        assert!(reader.into_issues().is_empty());
    }

    #[test]
    fn missing_required_numbered_is_reported() {
        let map = attrs(&[]);
        let mut reader = AttributeReader::new(&map);
        assert!(reader.numbered::<u32>("EscortNpcId", 1, 1..=u32::MAX).is_empty());
        assert_eq!(
            reader.into_issues(),
            vec![ConfigIssue::Missing {
                name: "EscortNpcId1".into()
            }]
        );
    }

    #[test]
    fn list_collects_every_bad_element() {
        let map = attrs(&[("StartEscortGossipOptions", "1, 2,x,11")]);
        let mut reader = AttributeReader::new(&map);
        let options = reader.list::<usize>("StartEscortGossipOptions", 1..=10);
        assert_eq!(options, vec![1, 2]);
        let issues = reader.into_issues();
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], ConfigIssue::Unparsable { .. }));
        assert!(matches!(issues[1], ConfigIssue::OutOfRange { .. }));
    }

    #[test]
    fn ranged_rejects_out_of_domain() {
        let map = attrs(&[("EscortMaxFollowDistance", "1.5")]);
        let mut reader = AttributeReader::new(&map);
        assert_eq!(reader.ranged::<f32>("EscortMaxFollowDistance", 3.0..=100.0), None);
        assert_eq!(reader.into_issues().len(), 1);
    }
}
