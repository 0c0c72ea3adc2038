//! Conditional field groups and the rules that show or hide them.

use super::{Field, FieldMap};

/// Statuses of the min-bets check that must be tracked in a task.
pub const TASK_STATUSES: [&str; 2] = ["exceptions", "bug"];

/// Dependent groups whose visibility follows other fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    DefaultBetsStatus,
    MinBetsStatus,
    AddedToTask,
    ManagerResponse,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 4] = [
        FieldGroup::DefaultBetsStatus,
        FieldGroup::MinBetsStatus,
        FieldGroup::AddedToTask,
        FieldGroup::ManagerResponse,
    ];

    /// The input contained in the group.
    pub fn field(self) -> Field {
        match self {
            FieldGroup::DefaultBetsStatus => Field::DefaultBetsStatus,
            FieldGroup::MinBetsStatus => Field::MinBetsStatus,
            FieldGroup::AddedToTask => Field::AddedToTask,
            FieldGroup::ManagerResponse => Field::ManagerResponse,
        }
    }

    /// Whether changing `field` can change this group's visibility.
    pub fn is_triggered_by(self, field: Field) -> bool {
        match self {
            FieldGroup::DefaultBetsStatus => field == Field::DefaultBets,
            FieldGroup::MinBetsStatus => field == Field::MinBetsChecked,
            FieldGroup::AddedToTask => {
                matches!(field, Field::MinBetsChecked | Field::MinBetsStatus)
            }
            FieldGroup::ManagerResponse => field == Field::NotifyManager,
        }
    }

    pub fn of_field(field: Field) -> Option<FieldGroup> {
        FieldGroup::ALL.into_iter().find(|group| group.field() == field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupState {
    pub group: FieldGroup,
    pub visible: bool,
    pub required: bool,
}

/// Visibility of every dependent group for one set of field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility {
    groups: [GroupState; 4],
}

impl Visibility {
    pub fn compute(values: &FieldMap) -> Self {
        let min_bets = values.flag(Field::MinBetsChecked);
        let groups = FieldGroup::ALL.map(|group| {
            let visible = match group {
                FieldGroup::DefaultBetsStatus => values.text(Field::DefaultBets) == "checked",
                FieldGroup::MinBetsStatus => min_bets,
                FieldGroup::AddedToTask => {
                    min_bets && TASK_STATUSES.contains(&values.text(Field::MinBetsStatus))
                }
                FieldGroup::ManagerResponse => values.text(Field::NotifyManager) == "yes",
            };
            GroupState {
                group,
                visible,
                required: visible,
            }
        });
        Self { groups }
    }

    pub fn state(&self, group: FieldGroup) -> GroupState {
        self.groups
            .iter()
            .copied()
            .find(|state| state.group == group)
            .unwrap_or(GroupState {
                group,
                visible: false,
                required: false,
            })
    }

    pub fn is_visible(&self, group: FieldGroup) -> bool {
        self.state(group).visible
    }

    /// Whether `field` is currently shown. Fields outside any group always are.
    pub fn shows_field(&self, field: Field) -> bool {
        FieldGroup::of_field(field).map_or(true, |group| self.is_visible(group))
    }

    pub fn hidden(&self) -> impl Iterator<Item = FieldGroup> + '_ {
        self.groups
            .iter()
            .filter(|state| !state.visible)
            .map(|state| state.group)
    }

    pub fn groups(&self) -> &[GroupState] {
        &self.groups
    }
}

/// Recomputes visibility and clears the inputs of hidden groups.
///
/// Runs to a fixed point: clearing `minBetsStatus` can in turn hide `addedToTask`.
/// Returns the groups whose inputs were cleared.
pub fn apply(values: &mut FieldMap) -> (Visibility, Vec<FieldGroup>) {
    let mut cleared = Vec::new();
    loop {
        let visibility = Visibility::compute(values);
        let mut changed = false;
        for group in visibility.hidden() {
            let key = group.field().key();
            if values.values.remove(key).is_some() {
                cleared.push(group);
                changed = true;
            }
        }
        if !changed {
            return (visibility, cleared);
        }
    }
}
