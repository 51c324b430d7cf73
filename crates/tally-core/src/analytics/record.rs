//! Event records as seen by the analytics pipeline
//!
//! Analytics never mutate records; they only read a timestamp plus
//! optional numeric and categorical attributes by field name.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{Feedback, Inquiry, ServiceRecord};

/// A timestamped business event
pub trait EventRecord {
    /// When the event happened (UTC, naive)
    fn occurred_at(&self) -> NaiveDateTime;

    /// Numeric attribute by field name, `None` when the record lacks it
    fn numeric(&self, _field: &str) -> Option<f64> {
        None
    }

    /// Categorical attribute by field name, `None` when the record lacks it
    fn category(&self, _field: &str) -> Option<Cow<'_, str>> {
        None
    }
}

impl<T: EventRecord + ?Sized> EventRecord for &T {
    fn occurred_at(&self) -> NaiveDateTime {
        (**self).occurred_at()
    }

    fn numeric(&self, field: &str) -> Option<f64> {
        (**self).numeric(field)
    }

    fn category(&self, field: &str) -> Option<Cow<'_, str>> {
        (**self).category(field)
    }
}

/// Attribute value on a generic [`Event`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

/// Generic event with free-form attributes, for data that does not come
/// from the store (CLI input files, tests)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub occurred_at: NaiveDateTime,
    #[serde(default)]
    pub attributes: HashMap<String, AttrValue>,
}

impl Event {
    pub fn at(occurred_at: NaiveDateTime) -> Self {
        Self {
            occurred_at,
            attributes: HashMap::new(),
        }
    }

    pub fn with_number(mut self, field: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(field.into(), AttrValue::Number(value));
        self
    }

    pub fn with_text(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(field.into(), AttrValue::Text(value.into()));
        self
    }
}

impl EventRecord for Event {
    fn occurred_at(&self) -> NaiveDateTime {
        self.occurred_at
    }

    fn numeric(&self, field: &str) -> Option<f64> {
        match self.attributes.get(field)? {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(s) => s.trim().parse().ok(),
        }
    }

    fn category(&self, field: &str) -> Option<Cow<'_, str>> {
        match self.attributes.get(field)? {
            AttrValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            AttrValue::Number(n) => Some(Cow::Owned(n.to_string())),
        }
    }
}

impl EventRecord for Inquiry {
    fn occurred_at(&self) -> NaiveDateTime {
        self.created_at.naive_utc()
    }

    fn category(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "subject" => self.subject.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}

impl EventRecord for Feedback {
    fn occurred_at(&self) -> NaiveDateTime {
        self.created_at.naive_utc()
    }

    fn numeric(&self, field: &str) -> Option<f64> {
        self.ratings.get(field)
    }
}

impl EventRecord for ServiceRecord {
    /// Services count on the day they were rendered, not when entered
    fn occurred_at(&self) -> NaiveDateTime {
        self.date.and_time(chrono::NaiveTime::MIN)
    }

    fn category(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "service" => Some(Cow::Borrowed(self.service.as_str())),
            "service_category" | "category" => Some(Cow::Borrowed(self.category().as_str())),
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            _ => None,
        }
    }
}
