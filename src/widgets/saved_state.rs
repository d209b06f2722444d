//! Saved-state parcels exchanged with the host across restarts.
//!
//! A [`Parcel`] is an arbitrary TOML value. Widgets wrap their own fields around
//! the parcel produced by the generic view layer and hand that inner parcel back
//! untouched on restore.

use log::debug;
use toml::{Table, Value};

pub type Parcel = Value;

pub const KEY_PROGRESS: &str = "progress";
pub const KEY_GOAL: &str = "goal";
pub const KEY_SUPER_STATE: &str = "super_state";

/// Generic view-level persistence the widget delegates to.
pub trait ViewPersistence {
    fn save_state(&self) -> Parcel;
    fn restore_state(&mut self, state: Parcel);
}

/// Plain view state shared by every widget: whether it is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseView {
    pub visible: bool,
}

impl Default for BaseView {
    fn default() -> Self {
        Self { visible: true }
    }
}

impl ViewPersistence for BaseView {
    fn save_state(&self) -> Parcel {
        let mut table = Table::new();
        table.insert("visible".into(), Value::Boolean(self.visible));
        Value::Table(table)
    }

    fn restore_state(&mut self, state: Parcel) {
        match state.get("visible").and_then(Value::as_bool) {
            Some(visible) => self.visible = visible,
            None => debug!("No view state to restore"),
        }
    }
}

/// Fields a goal bar stores around the view parcel.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSnapshot {
    pub progress: i32,
    pub goal: i32,
    pub super_state: Parcel,
}

impl BarSnapshot {
    pub fn into_parcel(self) -> Parcel {
        let mut table = Table::new();
        table.insert(KEY_PROGRESS.into(), Value::Integer(self.progress.into()));
        table.insert(KEY_GOAL.into(), Value::Integer(self.goal.into()));
        table.insert(KEY_SUPER_STATE.into(), self.super_state);
        Value::Table(table)
    }

    /// Splits a parcel written by [`BarSnapshot::into_parcel`]. Any other shape is
    /// handed back unchanged as the error value.
    pub fn from_parcel(parcel: Parcel) -> Result<Self, Parcel> {
        let fields = parcel.as_table().and_then(|t| {
            let progress = int_field(t, KEY_PROGRESS)?;
            let goal = int_field(t, KEY_GOAL)?;
            Some((progress, goal))
        });

        let Some((progress, goal)) = fields else {
            return Err(parcel);
        };

        let super_state = match parcel {
            Value::Table(mut table) => table
                .remove(KEY_SUPER_STATE)
                .unwrap_or_else(|| Value::Table(Table::new())),
            other => return Err(other),
        };

        Ok(Self {
            progress,
            goal,
            super_state,
        })
    }
}

fn int_field(table: &Table, key: &str) -> Option<i32> {
    table
        .get(key)
        .and_then(Value::as_integer)
        .and_then(|v| i32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_survives_a_parcel() {
        let snap = BarSnapshot {
            progress: 42,
            goal: 60,
            super_state: BaseView { visible: false }.save_state(),
        };
        let back = BarSnapshot::from_parcel(snap.clone().into_parcel()).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn foreign_shapes_are_returned_unchanged() {
        let foreign = Value::String("opaque".into());
        assert_eq!(BarSnapshot::from_parcel(foreign.clone()), Err(foreign));

        let mut partial = Table::new();
        partial.insert(KEY_PROGRESS.into(), Value::Integer(3));
        let partial = Value::Table(partial);
        assert_eq!(BarSnapshot::from_parcel(partial.clone()), Err(partial));

        let mut overflow = Table::new();
        overflow.insert(KEY_PROGRESS.into(), Value::Integer(i64::MAX));
        overflow.insert(KEY_GOAL.into(), Value::Integer(1));
        let overflow = Value::Table(overflow);
        assert_eq!(BarSnapshot::from_parcel(overflow.clone()), Err(overflow));
    }

    #[test]
    fn missing_super_state_becomes_empty_table() {
        let mut table = Table::new();
        table.insert(KEY_PROGRESS.into(), Value::Integer(10));
        table.insert(KEY_GOAL.into(), Value::Integer(20));
        let snap = BarSnapshot::from_parcel(Value::Table(table)).unwrap();
        assert_eq!(snap.super_state, Value::Table(Table::new()));
    }

    #[test]
    fn base_view_restores_visibility() {
        let mut view = BaseView::default();
        view.restore_state(BaseView { visible: false }.save_state());
        assert!(!view.visible);
        view.restore_state(Value::Integer(1));
        assert!(!view.visible);
    }
}
