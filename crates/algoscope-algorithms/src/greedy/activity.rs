//! Activity selection.

use algoscope_trace::{Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub start: u32,
    pub end: u32,
}

impl Activity {
    pub fn new(name: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// Key the activities are sorted by before scanning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Start,
    Duration,
    /// Earliest finish first: the choice that yields a maximum selection.
    #[default]
    End,
}

impl SortKey {
    fn of(self, activity: &Activity) -> u32 {
        match self {
            SortKey::Start => activity.start,
            SortKey::Duration => activity.duration(),
            SortKey::End => activity.end,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityOptions {
    pub key: SortKey,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    #[default]
    Pending,
    Selected,
    Rejected,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCell {
    pub activity: Activity,
    pub status: ActivityStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityEvent {
    /// Activities in input order.
    Start,
    Sorted { key: SortKey },
    /// Starts no earlier than the last selected end.
    Select { index: usize },
    /// Overlaps the last selected activity.
    Reject { index: usize, last_end: u32 },
    Done { count: usize },
    #[default]
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStep {
    pub event: ActivityEvent,
    /// Input order on the first step, sorted order afterwards.
    pub activities: Vec<ActivityCell>,
    /// Positions in `activities` chosen so far.
    pub selected: Vec<usize>,
    pub last_end: Option<u32>,
}

impl Snapshot for ActivityStep {
    type State = ActivityStep;

    fn snapshot(&self) -> &Self::State {
        self
    }
}

algoscope_trace::replay_by_snapshot!(ActivityStep);

/// Trace greedy activity selection.
///
/// Activities are stably sorted by `options.key`, then scanned once. An
/// activity is selected iff it starts no earlier than the end of the last
/// selected one.
pub fn activity_selection(activities: &[Activity], options: &ActivityOptions) -> Trace<ActivityStep> {
    let mut tracer = Tracer::new("activity_selection");
    if activities.is_empty() {
        tracer.record("No activities: the empty schedule is optimal", ActivityStep::default());
        return tracer.finish();
    }

    let mut step = ActivityStep {
        event: ActivityEvent::Start,
        activities: activities
            .iter()
            .map(|activity| ActivityCell {
                activity: activity.clone(),
                status: ActivityStatus::Pending,
            })
            .collect(),
        selected: Vec::new(),
        last_end: None,
    };
    tracer.record(format!("{} activities to schedule", activities.len()), step.clone());

    let key = options.key;
    step.activities.sort_by_key(|cell| key.of(&cell.activity));
    step.event = ActivityEvent::Sorted { key };
    tracer.record(format!("Sort by {key:?} (stable)").to_lowercase(), step.clone());

    for index in 0..step.activities.len() {
        let activity = step.activities[index].activity.clone();
        match step.last_end {
            Some(last_end) if activity.start < last_end => {
                step.activities[index].status = ActivityStatus::Rejected;
                step.event = ActivityEvent::Reject { index, last_end };
                tracer.record(
                    format!(
                        "Reject {} [{}, {}): starts before {last_end}",
                        activity.name, activity.start, activity.end
                    ),
                    step.clone(),
                );
            }
            _ => {
                step.activities[index].status = ActivityStatus::Selected;
                step.selected.push(index);
                step.last_end = Some(activity.end);
                step.event = ActivityEvent::Select { index };
                tracer.record(
                    format!("Select {} [{}, {})", activity.name, activity.start, activity.end),
                    step.clone(),
                );
            }
        }
    }

    let count = step.selected.len();
    let names: Vec<&str> = step
        .selected
        .iter()
        .map(|&i| step.activities[i].activity.name.as_str())
        .collect();
    let description = format!("Done: {count} selected ({})", names.join(", "));
    step.event = ActivityEvent::Done { count };
    tracer.record(description, step);

    tracing::debug!(n = activities.len(), selected = count, ?key, "activity selection traced");
    tracer.finish()
}
