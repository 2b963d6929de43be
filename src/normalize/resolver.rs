//! Ordered candidate-key resolution over a property bag.

use super::keys::FieldSpec;
use super::numeric::{value_to_metres, value_to_number};
use crate::error::ConfigError;
use crate::model::{PropertyBag, PropertyValue};
use regex::Regex;

/// How a resolved raw value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// First parseable number.
    Numeric,
    /// First parseable number, unit-normalized to metres.
    Length,
    /// First present value, trimmed.
    Text,
}

/// Resolves one semantic field out of a property bag.
///
/// Candidates are tried in three passes: exact key names in priority order,
/// then (when enabled) lower-cased key names equal to or containing a
/// candidate, then key names matching the fallback pattern in bag order.
#[derive(Debug, Clone)]
pub struct FieldResolver {
    strategy: Strategy,
    keys: Vec<String>,
    lowered: Vec<String>,
    fallback: Option<Regex>,
    substring: bool,
}

impl FieldResolver {
    pub fn new(strategy: Strategy, spec: &FieldSpec) -> Result<Self, ConfigError> {
        let fallback = spec
            .fallback
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()?;

        Ok(Self {
            strategy,
            lowered: spec.keys.iter().map(|k| k.to_lowercase()).collect(),
            keys: spec.keys.clone(),
            fallback,
            substring: false,
        })
    }

    /// Enables the case-insensitive substring pass over key names.
    #[must_use]
    pub fn with_substring_match(mut self) -> Self {
        self.substring = true;
        self
    }

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Values of every candidate in resolution order. A key may appear
    /// more than once across passes.
    pub fn candidates<'a>(&'a self, bag: &'a PropertyBag) -> impl Iterator<Item = &'a PropertyValue> + 'a {
        let exact = self.keys.iter().filter_map(move |k| bag.get(k));

        let substring = self
            .lowered
            .iter()
            .filter(move |_| self.substring)
            .filter_map(move |candidate| {
                bag.iter()
                    .find(|(key, _)| {
                        let key = key.to_lowercase();
                        key == *candidate || key.contains(candidate.as_str())
                    })
                    .map(|(_, value)| value)
            });

        let fallback = self.fallback.iter().flat_map(move |pattern| {
            bag.iter()
                .filter(move |(key, _)| pattern.is_match(key))
                .map(|(_, value)| value)
        });

        exact.chain(substring).chain(fallback)
    }

    /// Numeric reading per the resolver's strategy. Text resolvers parse
    /// their first present value.
    #[must_use]
    pub fn number(&self, bag: &PropertyBag) -> Option<f64> {
        match self.strategy {
            Strategy::Length => self.candidates(bag).find_map(value_to_metres),
            Strategy::Numeric => self.candidates(bag).find_map(value_to_number),
            Strategy::Text => self.candidates(bag).next().and_then(value_to_number),
        }
    }

    /// Trimmed text of the first present candidate.
    #[must_use]
    pub fn text(&self, bag: &PropertyBag) -> Option<String> {
        self.candidates(bag).next().map(PropertyValue::to_trimmed)
    }

    /// Trimmed, non-empty values of every exact candidate key present.
    #[must_use]
    pub fn present_texts(&self, bag: &PropertyBag) -> Vec<String> {
        self.keys
            .iter()
            .filter_map(|k| bag.get(k))
            .map(PropertyValue::to_trimmed)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// First candidate value that parses as a number, then the first key
/// matching `fallback` whose value parses.
#[must_use]
pub fn resolve_numeric<S: AsRef<str>>(
    bag: &PropertyBag,
    candidate_keys: &[S],
    fallback: Option<&Regex>,
) -> Option<f64> {
    scan(bag, candidate_keys, fallback, value_to_number)
}

/// As [`resolve_numeric`] with the value converted to metres.
#[must_use]
pub fn resolve_length<S: AsRef<str>>(
    bag: &PropertyBag,
    candidate_keys: &[S],
    fallback: Option<&Regex>,
) -> Option<f64> {
    scan(bag, candidate_keys, fallback, value_to_metres)
}

/// Trimmed text of the first candidate key present.
#[must_use]
pub fn resolve_string<S: AsRef<str>>(bag: &PropertyBag, candidate_keys: &[S]) -> Option<String> {
    candidate_keys
        .iter()
        .find_map(|k| bag.get(k.as_ref()))
        .map(PropertyValue::to_trimmed)
}

fn scan<S: AsRef<str>>(
    bag: &PropertyBag,
    candidate_keys: &[S],
    fallback: Option<&Regex>,
    read: fn(&PropertyValue) -> Option<f64>,
) -> Option<f64> {
    candidate_keys
        .iter()
        .filter_map(|k| bag.get(k.as_ref()))
        .find_map(read)
        .or_else(|| {
            let pattern = fallback?;
            bag.iter()
                .filter(|(key, _)| pattern.is_match(key))
                .find_map(|(_, value)| read(value))
        })
}
