use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::filter::FilteredView;
use super::model::{ActivityRecord, MonthKey};

// ---------------------------------------------------------------------------
// Aggregate rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MonthCount {
    pub month_key: MonthKey,
    pub month_label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthPeople {
    pub month_key: MonthKey,
    pub month_label: String,
    pub people: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeCount {
    pub action_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventCount {
    pub event: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventPeople {
    pub event: String,
    pub people: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventSummary {
    pub event: String,
    pub total_people: u64,
    pub mean_people: f64,
    pub actions: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummary {
    pub contract: String,
    pub actions: usize,
    pub people: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollaboratorSummary {
    pub contract: String,
    pub collaborator: String,
    pub people: u64,
    pub actions: usize,
}

/// Headline numbers for a view.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub actions: usize,
    pub people: u64,
    /// `None` when the view is empty.
    pub mean_people: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistinctCounts {
    pub types: usize,
    pub events: usize,
    pub collaborators: usize,
}

/// Community actions in date order, with their totals.
#[derive(Debug, Clone)]
pub struct CommunitySubset<'a> {
    pub records: Vec<&'a ActivityRecord>,
    pub kpis: Kpis,
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    count: usize,
    people: u64,
}

impl Tally {
    fn add(&mut self, record: &ActivityRecord) {
        self.count += 1;
        // Saturates instead of wrapping on absurd counts.
        self.people = self.people.saturating_add(record.people_impacted);
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.people as f64 / self.count as f64)
    }
}

/// Group records by `key`, keeping groups in order of first appearance so
/// that stable sorts afterwards break ties by that order.
fn group_in_order<'a, K, F>(records: impl Iterator<Item = &'a ActivityRecord>, key: F) -> Vec<(K, Tally)>
where
    K: Eq + Hash + Clone,
    F: Fn(&'a ActivityRecord) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Tally)> = Vec::new();
    for record in records {
        let k = key(record);
        let pos = *positions.entry(k.clone()).or_insert_with(|| {
            groups.push((k, Tally::default()));
            groups.len() - 1
        });
        groups[pos].1.add(record);
    }
    groups
}

// ---------------------------------------------------------------------------
// Aggregations over a filtered view
// ---------------------------------------------------------------------------

impl<'a> FilteredView<'a> {
    pub fn kpis(&self) -> Kpis {
        let mut tally = Tally::default();
        self.records().for_each(|r| tally.add(r));
        Kpis {
            actions: tally.count,
            people: tally.people,
            mean_people: tally.mean(),
        }
    }

    pub fn distinct_counts(&self) -> DistinctCounts {
        let mut types = HashSet::new();
        let mut events = HashSet::new();
        let mut collaborators = HashSet::new();
        for r in self.records() {
            types.insert(r.action_type.as_str());
            events.insert(r.event.as_str());
            collaborators.insert(r.collaborator.as_str());
        }
        DistinctCounts {
            types: types.len(),
            events: events.len(),
            collaborators: collaborators.len(),
        }
    }

    /// Actions per month, oldest month first.
    pub fn count_by_month(&self) -> Vec<MonthCount> {
        self.by_month()
            .into_iter()
            .map(|((month_key, month_label), tally)| MonthCount {
                month_key,
                month_label: month_label.to_string(),
                count: tally.count,
            })
            .collect()
    }

    /// People impacted per month, oldest month first.
    pub fn sum_people_by_month(&self) -> Vec<MonthPeople> {
        self.by_month()
            .into_iter()
            .map(|((month_key, month_label), tally)| MonthPeople {
                month_key,
                month_label: month_label.to_string(),
                people: tally.people,
            })
            .collect()
    }

    /// The label is a function of the key, so grouping on the pair is
    /// grouping by month.
    fn by_month(&self) -> Vec<((MonthKey, &'a str), Tally)> {
        let mut groups =
            group_in_order(self.records(), |r: &'a ActivityRecord| (r.month_key(), r.month_label()));
        groups.sort_by_key(|((key, _), _)| *key);
        groups
    }

    /// Actions per type, most frequent first.
    pub fn count_by_type(&self) -> Vec<TypeCount> {
        let mut groups = group_in_order(self.records(), |r| r.action_type.as_str());
        groups.sort_by(|a, b| b.1.count.cmp(&a.1.count));
        groups
            .into_iter()
            .map(|(action_type, tally)| TypeCount {
                action_type: action_type.to_string(),
                count: tally.count,
            })
            .collect()
    }

    /// The `n` most frequent events; ties keep first-seen order.
    pub fn top_events_by_count(&self, n: usize) -> Vec<EventCount> {
        let mut groups = self.by_event();
        groups.sort_by(|a, b| b.1.count.cmp(&a.1.count));
        groups
            .into_iter()
            .take(n)
            .map(|(event, tally)| EventCount {
                event: event.to_string(),
                count: tally.count,
            })
            .collect()
    }

    /// The `n` events that reached the most people.
    pub fn top_events_by_people_impacted(&self, n: usize) -> Vec<EventPeople> {
        let mut groups = self.by_event();
        groups.sort_by(|a, b| b.1.people.cmp(&a.1.people));
        groups
            .into_iter()
            .take(n)
            .map(|(event, tally)| EventPeople {
                event: event.to_string(),
                people: tally.people,
            })
            .collect()
    }

    /// Total, mean and count of people per event, largest total first.
    pub fn summary_by_event(&self) -> Vec<EventSummary> {
        let mut groups = self.by_event();
        groups.sort_by(|a, b| b.1.people.cmp(&a.1.people));
        groups
            .into_iter()
            .map(|(event, tally)| EventSummary {
                event: event.to_string(),
                total_people: tally.people,
                mean_people: tally.mean().unwrap_or(0.0),
                actions: tally.count,
            })
            .collect()
    }

    fn by_event(&self) -> Vec<(&'a str, Tally)> {
        group_in_order(self.records(), |r| r.event.as_str())
    }

    /// Actions and people per contract, in order of first appearance.
    pub fn by_region(&self) -> Vec<RegionSummary> {
        group_in_order(self.records(), |r| r.contract.as_str())
            .into_iter()
            .map(|(contract, tally)| RegionSummary {
                contract: contract.to_string(),
                actions: tally.count,
                people: tally.people,
            })
            .collect()
    }

    /// People and actions per (contract, collaborator), largest total first.
    pub fn by_collaborator_and_region(&self) -> Vec<CollaboratorSummary> {
        let mut groups = group_in_order(self.records(), |r| {
            (r.contract.as_str(), r.collaborator.as_str())
        });
        groups.sort_by(|a, b| b.1.people.cmp(&a.1.people));
        groups
            .into_iter()
            .map(|((contract, collaborator), tally)| CollaboratorSummary {
                contract: contract.to_string(),
                collaborator: collaborator.to_string(),
                people: tally.people,
                actions: tally.count,
            })
            .collect()
    }

    /// Community actions sorted by date; same-day actions keep table order.
    pub fn community_subset(&self) -> CommunitySubset<'a> {
        let mut records: Vec<&'a ActivityRecord> =
            self.records().filter(|r| r.is_community()).collect();
        records.sort_by_key(|r| r.date());

        let mut tally = Tally::default();
        records.iter().for_each(|r| tally.add(r));
        CommunitySubset {
            records,
            kpis: Kpis {
                actions: tally.count,
                people: tally.people,
                mean_people: tally.mean(),
            },
        }
    }
}
