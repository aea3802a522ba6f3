use std::collections::{BTreeMap, BTreeSet};

use crate::services::show_api::ShowSlot;

/// Splits a `datetime-local` style value (`2024-05-01T14:00`) into its date
/// and time parts. Both parts must be non-empty; anything after a second
/// `T` is ignored.
pub fn parse_date_time(input: &str) -> Option<(&str, &str)> {
    let mut parts = input.split('T');
    let date = parts.next().filter(|d| !d.is_empty())?;
    let time = parts.next().filter(|t| !t.is_empty())?;
    Some((date, time))
}

/// Show times grouped by date.
///
/// A date is only present while it has at least one time; removing the last
/// time of a date removes the date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateTimeSelection {
    slots: BTreeMap<String, BTreeSet<String>>,
}

impl DateTimeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `time` under `date`. Returns `false` if the pair was already present.
    pub fn insert(&mut self, date: &str, time: &str) -> bool {
        self.slots
            .entry(date.to_string())
            .or_default()
            .insert(time.to_string())
    }

    /// Removes `time` from `date`, dropping the date once it has no times left.
    pub fn remove(&mut self, date: &str, time: &str) -> bool {
        let Some(times) = self.slots.get_mut(date) else {
            return false;
        };
        let removed = times.remove(time);
        if times.is_empty() {
            self.slots.remove(date);
        }
        removed
    }

    pub fn contains(&self, date: &str, time: &str) -> bool {
        self.slots
            .get(date)
            .is_some_and(|times| times.contains(time))
    }

    pub fn has_any_time(&self) -> bool {
        self.slots.values().any(|times| !times.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of (date, time) pairs.
    pub fn len(&self) -> usize {
        self.slots.values().map(BTreeSet::len).sum()
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn times(&self, date: &str) -> impl Iterator<Item = &str> {
        self.slots
            .get(date)
            .into_iter()
            .flat_map(|times| times.iter().map(String::as_str))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.slots.iter().map(|(date, times)| (date.as_str(), times))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// One slot per time, paired with its date.
    pub fn flatten(&self) -> Vec<ShowSlot> {
        self.slots
            .iter()
            .flat_map(|(date, times)| {
                times.iter().map(move |time| ShowSlot {
                    date: date.clone(),
                    time: time.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(date: &str, time: &str) -> ShowSlot {
        ShowSlot {
            date: date.to_string(),
            time: time.to_string(),
        }
    }

    #[test]
    fn parse_splits_on_t() {
        assert_eq!(
            parse_date_time("2024-05-01T14:00"),
            Some(("2024-05-01", "14:00"))
        );
        assert_eq!(
            parse_date_time("2024-05-01T14:00T99"),
            Some(("2024-05-01", "14:00"))
        );
    }

    #[test]
    fn parse_rejects_missing_parts() {
        assert_eq!(parse_date_time(""), None);
        assert_eq!(parse_date_time("2024-05-01"), None);
        assert_eq!(parse_date_time("2024-05-01T"), None);
        assert_eq!(parse_date_time("T14:00"), None);
    }

    #[test]
    fn duplicate_pair_is_stored_once() {
        let mut sel = DateTimeSelection::new();
        assert!(sel.insert("2024-05-01", "14:00"));
        assert!(!sel.insert("2024-05-01", "14:00"));
        assert_eq!(sel.len(), 1);
        assert_eq!(sel.times("2024-05-01").collect::<Vec<_>>(), vec!["14:00"]);
    }

    #[test]
    fn removing_last_time_drops_the_date() {
        let mut sel = DateTimeSelection::new();
        sel.insert("2024-05-01", "14:00");
        sel.insert("2024-05-01", "18:00");
        sel.insert("2024-05-02", "20:00");

        assert!(sel.remove("2024-05-01", "14:00"));
        assert_eq!(sel.dates().collect::<Vec<_>>(), vec!["2024-05-01", "2024-05-02"]);

        assert!(sel.remove("2024-05-01", "18:00"));
        assert_eq!(sel.dates().collect::<Vec<_>>(), vec!["2024-05-02"]);
        assert_eq!(sel.times("2024-05-01").count(), 0);
        assert!(sel.iter().all(|(_, times)| !times.is_empty()));
    }

    #[test]
    fn removing_unknown_pair_is_a_noop() {
        let mut sel = DateTimeSelection::new();
        sel.insert("2024-05-01", "14:00");
        let before = sel.clone();

        assert!(!sel.remove("2024-05-01", "09:00"));
        assert!(!sel.remove("2024-06-01", "14:00"));
        assert_eq!(sel, before);
    }

    #[test]
    fn flatten_cross_joins_dates_and_times() {
        let mut sel = DateTimeSelection::new();
        sel.insert("2024-05-01", "14:00");
        sel.insert("2024-05-01", "18:00");
        sel.insert("2024-05-02", "20:00");

        let mut flat = sel.flatten();
        flat.sort();
        assert_eq!(
            flat,
            vec![
                slot("2024-05-01", "14:00"),
                slot("2024-05-01", "18:00"),
                slot("2024-05-02", "20:00"),
            ]
        );
    }

    #[test]
    fn empty_selection_has_no_time() {
        let mut sel = DateTimeSelection::new();
        assert!(!sel.has_any_time());
        sel.insert("2024-05-01", "14:00");
        assert!(sel.has_any_time());
        sel.clear();
        assert!(sel.is_empty());
        assert!(sel.flatten().is_empty());
    }
}
