use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::models::{Event, EventId};
use crate::utils::error::MalformedTimeString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    /// Buckets a 24-hour clock hour.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeOfDay::Morning,
            12..=15 => TimeOfDay::Afternoon,
            16..=19 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time of day '{0}', expected morning, afternoon, evening or night")]
pub struct UnknownTimeOfDay(pub String);

impl FromStr for TimeOfDay {
    type Err = UnknownTimeOfDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeOfDay::ALL
            .into_iter()
            .find(|bucket| bucket.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTimeOfDay(s.to_string()))
    }
}

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

/// Classifies an `H[:MM] [AM|PM]` clock string into its time-of-day bucket.
///
/// Without a meridiem the hour is read on a 24-hour clock. Minutes are
/// validated but never affect the bucket.
pub fn classify_time_of_day(time: &str) -> Result<TimeOfDay, MalformedTimeString> {
    let trimmed = time.trim();
    if trimmed.is_empty() {
        return Err(MalformedTimeString::new(time, "empty time"));
    }

    let (clock, meridiem) = match trimmed.split_once(' ') {
        Some((clock, rest)) => (clock, Some(rest.trim())),
        None => (trimmed, None),
    };

    let meridiem = match meridiem {
        None => None,
        Some(token) if token.eq_ignore_ascii_case("am") => Some(Meridiem::Am),
        Some(token) if token.eq_ignore_ascii_case("pm") => Some(Meridiem::Pm),
        Some(_) => return Err(MalformedTimeString::new(time, "expected AM or PM after the clock")),
    };

    let (hour, minute) = match clock.split_once(':') {
        Some((hour, minute)) => (hour, Some(minute)),
        None => (clock, None),
    };

    let hour = parse_clock_field(hour, 1..=2)
        .ok_or_else(|| MalformedTimeString::new(time, "hour is not a number"))?;

    if let Some(minute) = minute {
        let minute = parse_clock_field(minute, 2..=2)
            .ok_or_else(|| MalformedTimeString::new(time, "minute is not a two-digit number"))?;
        if minute > 59 {
            return Err(MalformedTimeString::new(time, "minute out of range"));
        }
    }

    let hour = match meridiem {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return Err(MalformedTimeString::new(
                    time,
                    "hour out of range for a 12-hour clock",
                ));
            }
            match (meridiem, hour) {
                (Meridiem::Am, 12) => 0,
                (Meridiem::Am, h) => h,
                (Meridiem::Pm, 12) => 12,
                (Meridiem::Pm, h) => h + 12,
            }
        }
        None => {
            if hour > 23 {
                return Err(MalformedTimeString::new(
                    time,
                    "hour out of range for a 24-hour clock",
                ));
            }
            hour
        }
    };

    Ok(TimeOfDay::from_hour(hour))
}

fn parse_clock_field(field: &str, digits: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !digits.contains(&field.len()) || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Visitor-selected catalog predicates. Empty strings and `None` impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub category: Option<String>,
    pub location_substring: Option<String>,
    pub time_of_day: Option<TimeOfDay>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location_substring = Some(location.into());
        self
    }

    pub fn with_time_of_day(mut self, time_of_day: TimeOfDay) -> Self {
        self.time_of_day = Some(time_of_day);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.active_category().is_none()
            && self.active_location().is_none()
            && self.time_of_day.is_none()
    }

    /// Clears every constraint.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn active_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    fn active_location(&self) -> Option<&str> {
        self.location_substring.as_deref().filter(|l| !l.is_empty())
    }
}

/// Result of filtering a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogView {
    pub events: Vec<Event>,
    /// Events dropped only because their `time` could not be classified.
    pub unclassified_event_ids: Vec<EventId>,
}

struct Matcher {
    category: Option<String>,
    location: Option<String>,
    time_of_day: Option<TimeOfDay>,
}

impl Matcher {
    fn new(criteria: &FilterCriteria) -> Self {
        Self {
            category: criteria.active_category().map(str::to_lowercase),
            location: criteria.active_location().map(str::to_lowercase),
            time_of_day: criteria.time_of_day,
        }
    }

    fn matches(&self, event: &Event) -> Result<bool, MalformedTimeString> {
        if let Some(category) = &self.category {
            match &event.category {
                Some(c) if c.to_lowercase() == *category => {}
                _ => return Ok(false),
            }
        }

        if let Some(location) = &self.location {
            match &event.venue {
                Some(venue) if venue.to_lowercase().contains(location.as_str()) => {}
                _ => return Ok(false),
            }
        }

        match (self.time_of_day, &event.time) {
            (None, _) => Ok(true),
            (Some(_), None) => Ok(false),
            (Some(wanted), Some(time)) => Ok(classify_time_of_day(time)? == wanted),
        }
    }
}

/// Applies `criteria` to `events`, keeping input order and reporting events whose
/// time could not be classified.
pub fn filter_catalog(events: &[Event], criteria: &FilterCriteria) -> CatalogView {
    let matcher = Matcher::new(criteria);
    let mut view = CatalogView::default();

    for event in events {
        match matcher.matches(event) {
            Ok(true) => view.events.push(event.clone()),
            Ok(false) => {}
            Err(err) => {
                warn!(event_id = event.id, error = %err, "Excluding event with unclassifiable time");
                view.unclassified_event_ids.push(event.id);
            }
        }
    }

    view
}

pub fn filter_events(events: &[Event], criteria: &FilterCriteria) -> Vec<Event> {
    filter_catalog(events, criteria).events
}

/// Lowercased, sorted, de-duplicated categories present in `events`.
pub fn distinct_categories(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| event.category.as_deref())
        .map(|category| category.trim().to_lowercase())
        .filter(|category| !category.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: EventId, category: &str, venue: &str, time: &str) -> Event {
        Event {
            id,
            name: format!("Event {}", id),
            description: None,
            venue: Some(venue.to_string()),
            category: Some(category.to_string()),
            date: Some("2024-11-02".to_string()),
            time: Some(time.to_string()),
            image_url: None,
        }
    }

    fn catalog() -> Vec<Event> {
        vec![
            event(1, "Comedy", "Carnivore Grounds, Nairobi", "8:00 PM"),
            event(2, "sport", "Kasarani Stadium", "3:00 PM"),
            event(3, "Concert", "KICC Nairobi", "7:30 PM"),
            event(4, "comedy", "Alliance Francaise", "11:00 AM"),
            event(5, "Concert", "Uhuru Gardens", "22:00"),
        ]
    }

    fn ids(events: &[Event]) -> Vec<EventId> {
        events.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_classify_documented_boundaries() {
        let cases = [
            ("6:00 AM", TimeOfDay::Morning),
            ("11:59 AM", TimeOfDay::Morning),
            ("12:00 PM", TimeOfDay::Afternoon),
            ("3:59 PM", TimeOfDay::Afternoon),
            ("4:00 PM", TimeOfDay::Evening),
            ("7:59 PM", TimeOfDay::Evening),
            ("8:00 PM", TimeOfDay::Night),
            ("12:00 AM", TimeOfDay::Night),
        ];

        for (input, expected) in cases {
            assert_eq!(
                classify_time_of_day(input),
                Ok(expected),
                "classifying '{}'",
                input
            );
        }
    }

    #[test]
    fn test_classify_24_hour_and_loose_forms() {
        assert_eq!(classify_time_of_day("05:59"), Ok(TimeOfDay::Night));
        assert_eq!(classify_time_of_day("6"), Ok(TimeOfDay::Morning));
        assert_eq!(classify_time_of_day("13:15"), Ok(TimeOfDay::Afternoon));
        assert_eq!(classify_time_of_day("19:00"), Ok(TimeOfDay::Evening));
        assert_eq!(classify_time_of_day("0:00"), Ok(TimeOfDay::Night));
        assert_eq!(classify_time_of_day("7 pm"), Ok(TimeOfDay::Evening));
        assert_eq!(classify_time_of_day(" 9:00 am "), Ok(TimeOfDay::Morning));
    }

    #[test]
    fn test_classify_rejects_malformed_input() {
        for input in [
            "", "   ", "noon", "ab:00 PM", "7:xx PM", "7:5 PM", "7:60", "24:00", "13:00 PM",
            "0:30 AM", "7:00 XM", "7:00 PM sharp", "-1:00", "+7:00",
        ] {
            let err = classify_time_of_day(input).unwrap_err();
            assert_eq!(err.input, input);
        }
    }

    #[test]
    fn test_time_of_day_parses_case_insensitively() {
        assert_eq!("Evening".parse::<TimeOfDay>(), Ok(TimeOfDay::Evening));
        assert_eq!(" night ".parse::<TimeOfDay>(), Ok(TimeOfDay::Night));
        assert!("dusk".parse::<TimeOfDay>().is_err());
        assert_eq!(TimeOfDay::Afternoon.to_string(), "afternoon");
    }

    #[test]
    fn test_empty_criteria_returns_input_unchanged() {
        let events = catalog();
        assert_eq!(filter_events(&events, &FilterCriteria::new()), events);

        let blank = FilterCriteria::new().with_category("").with_location("");
        assert!(blank.is_empty());
        assert_eq!(filter_events(&events, &blank), events);
    }

    #[test]
    fn test_category_is_case_insensitive_equality() {
        let criteria = FilterCriteria::new().with_category("COMEDY");
        assert_eq!(ids(&filter_events(&catalog(), &criteria)), vec![1, 4]);

        // Substrings of a category do not match.
        let criteria = FilterCriteria::new().with_category("con");
        assert!(filter_events(&catalog(), &criteria).is_empty());
    }

    #[test]
    fn test_location_is_case_insensitive_substring() {
        let criteria = FilterCriteria::new().with_location("nairobi");
        assert_eq!(ids(&filter_events(&catalog(), &criteria)), vec![1, 3]);
    }

    #[test]
    fn test_constraints_are_conjunctive() {
        let criteria = FilterCriteria::new()
            .with_category("concert")
            .with_location("nairobi")
            .with_time_of_day(TimeOfDay::Evening);
        assert_eq!(ids(&filter_events(&catalog(), &criteria)), vec![3]);

        let criteria = criteria.with_time_of_day(TimeOfDay::Morning);
        assert!(filter_events(&catalog(), &criteria).is_empty());
    }

    #[test]
    fn test_time_of_day_filter() {
        let criteria = FilterCriteria::new().with_time_of_day(TimeOfDay::Night);
        assert_eq!(ids(&filter_events(&catalog(), &criteria)), vec![1, 5]);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let criteria = FilterCriteria::new()
            .with_location("a")
            .with_time_of_day(TimeOfDay::Evening);
        let once = filter_events(&catalog(), &criteria);
        let twice = filter_events(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_fields_never_match_active_constraints() {
        let mut bare = event(9, "Comedy", "Somewhere", "8:00 PM");
        bare.category = None;
        bare.venue = None;
        bare.time = None;
        let events = vec![bare];

        assert!(filter_events(&events, &FilterCriteria::new().with_category("comedy")).is_empty());
        assert!(filter_events(&events, &FilterCriteria::new().with_location("some")).is_empty());

        let view = filter_catalog(
            &events,
            &FilterCriteria::new().with_time_of_day(TimeOfDay::Night),
        );
        assert!(view.events.is_empty());
        assert!(view.unclassified_event_ids.is_empty());

        assert_eq!(filter_events(&events, &FilterCriteria::new()).len(), 1);
    }

    #[test]
    fn test_unclassifiable_times_are_reported() {
        let mut events = catalog();
        events.push(event(6, "Concert", "KICC Nairobi", "late"));

        let view = filter_catalog(
            &events,
            &FilterCriteria::new().with_time_of_day(TimeOfDay::Evening),
        );
        assert_eq!(ids(&view.events), vec![3]);
        assert_eq!(view.unclassified_event_ids, vec![6]);

        // Without a time constraint the bad time is never inspected.
        let view = filter_catalog(&events, &FilterCriteria::new().with_category("concert"));
        assert_eq!(ids(&view.events), vec![3, 5, 6]);
        assert!(view.unclassified_event_ids.is_empty());
    }

    #[test]
    fn test_reset_clears_criteria() {
        let mut criteria = FilterCriteria::new()
            .with_category("sport")
            .with_time_of_day(TimeOfDay::Afternoon);
        assert!(!criteria.is_empty());
        criteria.reset();
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn test_distinct_categories() {
        let mut events = catalog();
        events[0].category = Some("  Comedy ".to_string());
        events[1].category = None;
        assert_eq!(distinct_categories(&events), vec!["comedy", "concert"]);
    }
}
