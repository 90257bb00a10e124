//! Curation history: creators and created/modified dates.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::entities::{InstanceEdit, Person};

/// Timestamp layout used by the knowledge base.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a knowledge base timestamp; anything unparseable is treated as absent.
pub fn parse_datetime(datetime: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(datetime.trim(), DATE_TIME_FORMAT).ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Creator {
    pub family_name: String,
    pub given_name: String,
    pub organisation: Option<String>,
}

impl From<&Person> for Creator {
    fn from(person: &Person) -> Self {
        // the most recent affiliation wins, and its latest name
        let organisation = person
            .affiliations
            .iter()
            .filter_map(|affiliation| affiliation.names.last())
            .last()
            .cloned();
        Self {
            family_name: person.surname.clone().unwrap_or_default(),
            given_name: person.firstname.clone().unwrap_or_default(),
            organisation,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct History {
    pub creators: Vec<Creator>,
    pub created: Option<NaiveDateTime>,
    pub modified: Vec<NaiveDateTime>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_creators(&mut self, edit: &InstanceEdit) {
        self.creators.extend(edit.authors.iter().map(Creator::from));
    }

    /// Record a creation edit; its date is kept only when it parses.
    pub fn record_created(&mut self, edit: &InstanceEdit) {
        self.add_creators(edit);
        self.created = parse_datetime(&edit.date_time);
    }

    /// Record a later edit; unparseable dates are dropped.
    pub fn record_modified(&mut self, edit: &InstanceEdit) {
        self.add_creators(edit);
        if let Some(date) = parse_datetime(&edit.date_time) {
            self.modified.push(date);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty() && self.created.is_none() && self.modified.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Affiliation;
    use chrono::{Datelike, Timelike};

    #[test]
    fn given_database_timestamp_when_parsing_then_returns_date() {
        let date = parse_datetime("2018-04-12 15:30:05").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2018, 4, 12));
        assert_eq!(date.hour(), 15);
    }

    #[test]
    fn given_garbage_timestamp_when_parsing_then_none() {
        assert_eq!(parse_datetime("yesterday"), None);
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn given_person_without_names_when_converting_then_empty_strings() {
        let person = Person {
            surname: None,
            firstname: None,
            affiliations: vec![
                Affiliation {
                    names: vec!["EBI".to_string()],
                },
                Affiliation {
                    names: vec!["OICR".to_string(), "Ontario Institute".to_string()],
                },
            ],
        };
        let creator = Creator::from(&person);
        assert_eq!(creator.family_name, "");
        assert_eq!(creator.given_name, "");
        assert_eq!(creator.organisation.as_deref(), Some("Ontario Institute"));
    }

    #[test]
    fn given_edit_with_bad_date_when_recording_modified_then_only_creators_kept() {
        let mut history = History::new();
        history.record_modified(&InstanceEdit {
            date_time: "not a date".to_string(),
            authors: vec![Person::default()],
        });
        assert_eq!(history.creators.len(), 1);
        assert!(history.modified.is_empty());
    }
}
