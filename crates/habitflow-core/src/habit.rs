//! Habit catalog model.
//!
//! Habits are partitioned into two fixed lists, morning and evening, each
//! ordered by a per-partition `order` field. Deleting a habit is normally
//! a soft archive so historical ledger entries stay meaningful; permanent
//! removal exists but is rarely used.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::schedule::Recurrence;

/// The two fixed habit partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitKind {
    Morning,
    Evening,
}

impl HabitKind {
    /// Both partitions, in display order.
    pub const ALL: [HabitKind; 2] = [HabitKind::Morning, HabitKind::Evening];

    pub fn label(&self) -> &'static str {
        match self {
            HabitKind::Morning => "morning",
            HabitKind::Evening => "evening",
        }
    }
}

impl std::str::FromStr for HabitKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "morning" | "am" => Ok(HabitKind::Morning),
            "evening" | "pm" => Ok(HabitKind::Evening),
            other => Err(format!("unknown habit kind '{other}'")),
        }
    }
}

/// A user-defined recurring task tracked for daily completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub kind: HabitKind,
    /// Display position within the partition; unique per kind.
    pub order: u32,
    #[serde(default)]
    pub archived: bool,
    /// Absent schedule means due every day.
    #[serde(default)]
    pub schedule: Recurrence,
    pub created_at: NaiveDate,
}

/// The full habit catalog, both partitions.
///
/// Active lists exclude archived habits; archived habits are retained so
/// the ledger history keeps resolving their ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    habits: Vec<Habit>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed catalog for first run.
    pub fn with_defaults(today: NaiveDate) -> Self {
        let mut catalog = Self::new();
        for name in [
            "Wake up without snoozing",
            "Drink a glass of water",
            "Stretch for five minutes",
        ] {
            let _ = catalog.add(name, HabitKind::Morning, Recurrence::Daily, today);
        }
        for name in [
            "Plan tomorrow",
            "Read a few pages",
            "Lights out on time",
        ] {
            let _ = catalog.add(name, HabitKind::Evening, Recurrence::Daily, today);
        }
        catalog
    }

    /// Add a habit at the end of its partition.
    pub fn add(
        &mut self,
        name: &str,
        kind: HabitKind,
        schedule: Recurrence,
        today: NaiveDate,
    ) -> Result<&Habit, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let order = self
            .habits
            .iter()
            .filter(|h| h.kind == kind)
            .map(|h| h.order)
            .max()
            .unwrap_or(0)
            + 1;
        self.habits.push(Habit {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            kind,
            order,
            archived: false,
            schedule,
            created_at: today,
        });
        let idx = self.habits.len() - 1;
        Ok(&self.habits[idx])
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Habit, ValidationError> {
        self.habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| ValidationError::UnknownHabit(id.to_string()))
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        self.get_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn reschedule(&mut self, id: &str, schedule: Recurrence) -> Result<(), ValidationError> {
        self.get_mut(id)?.schedule = schedule;
        Ok(())
    }

    /// Soft delete: the habit leaves active lists but keeps its ledger ids.
    pub fn archive(&mut self, id: &str) -> Result<(), ValidationError> {
        self.get_mut(id)?.archived = true;
        Ok(())
    }

    pub fn unarchive(&mut self, id: &str) -> Result<(), ValidationError> {
        self.get_mut(id)?.archived = false;
        Ok(())
    }

    /// Permanent removal. Ledger entries referencing the id are preserved.
    pub fn remove(&mut self, id: &str) -> Result<Habit, ValidationError> {
        let idx = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| ValidationError::UnknownHabit(id.to_string()))?;
        Ok(self.habits.remove(idx))
    }

    /// Reassign partition order to match the given id sequence.
    /// Ids not listed keep their relative order after the listed ones.
    pub fn reorder(&mut self, kind: HabitKind, ids: &[&str]) {
        let mut next = 1u32;
        for id in ids {
            if let Some(habit) = self.habits.iter_mut().find(|h| h.id == *id && h.kind == kind) {
                habit.order = next;
                next += 1;
            }
        }
        let mut rest: Vec<&mut Habit> = self
            .habits
            .iter_mut()
            .filter(|h| h.kind == kind && !ids.contains(&h.id.as_str()))
            .collect();
        rest.sort_by_key(|h| h.order);
        for habit in rest {
            habit.order = next;
            next += 1;
        }
    }

    /// Non-archived habits of a partition, in display order.
    pub fn active(&self, kind: HabitKind) -> Vec<&Habit> {
        let mut list: Vec<&Habit> = self
            .habits
            .iter()
            .filter(|h| h.kind == kind && !h.archived)
            .collect();
        list.sort_by_key(|h| h.order);
        list
    }

    /// All habits of a partition, archived included, in display order.
    pub fn all(&self, kind: HabitKind) -> Vec<&Habit> {
        let mut list: Vec<&Habit> = self.habits.iter().filter(|h| h.kind == kind).collect();
        list.sort_by_key(|h| h.order);
        list
    }

    /// Every active habit across both partitions.
    pub fn iter_active(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter().filter(|h| !h.archived)
    }

    pub fn active_len(&self, kind: HabitKind) -> usize {
        self.habits
            .iter()
            .filter(|h| h.kind == kind && !h.archived)
            .count()
    }

    pub fn total_active(&self) -> usize {
        self.habits.iter().filter(|h| !h.archived).count()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }
}
