//! Typed access to a widget's styled attributes.
//!
//! Attributes come from a TOML table in the config file. A [`StyledAttributes`]
//! handle is obtained for one read pass and released when dropped. Releasing
//! after a completed pass reports attributes that were set but never read
//! (usually typos); after a failed pass nothing is reported.

use crate::gfx::math::Color;
use crate::widgets::goal_bar::IndicatorType;
use anyhow::{anyhow, Result};
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use toml::{Table, Value};

pub struct StyledAttributes<'a> {
    widget: &'static str,
    table: &'a Table,
    read: RefCell<BTreeSet<String>>,
    complete: Cell<bool>,
}

impl<'a> StyledAttributes<'a> {
    pub fn obtain(widget: &'static str, table: &'a Table) -> Self {
        debug!("Obtained {} styled attributes for {}", table.len(), widget);
        Self {
            widget,
            table,
            read: RefCell::new(BTreeSet::new()),
            complete: Cell::new(false),
        }
    }

    fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.read.borrow_mut().insert(name.to_string());
        self.table.get(name)
    }

    fn number(&self, name: &str) -> Result<Option<f64>> {
        match self.lookup(name) {
            None => Ok(None),
            Some(Value::Integer(i)) => Ok(Some(*i as f64)),
            Some(Value::Float(f)) => Ok(Some(*f)),
            Some(other) => Err(anyhow!(
                "{}.{}: expected a number, got {}",
                self.widget,
                name,
                other.type_str()
            )),
        }
    }

    /// Length in pixels.
    pub fn dimension(&self, name: &str, default: f32) -> Result<f32> {
        Ok(self.number(name)?.map_or(default, |v| v as f32))
    }

    /// Length in whole pixels, truncated.
    pub fn dimension_offset(&self, name: &str, default: i32) -> Result<i32> {
        Ok(self.number(name)?.map_or(default, |v| v as i32))
    }

    pub fn color(&self, name: &str, default: Color) -> Result<Color> {
        match self.lookup(name) {
            None => Ok(default),
            Some(Value::String(s)) => {
                Color::parse(s).map_err(|e| e.context(format!("{}.{}", self.widget, name)))
            }
            Some(other) => Err(anyhow!(
                "{}.{}: expected a color string, got {}",
                self.widget,
                name,
                other.type_str()
            )),
        }
    }

    /// Indicator type given either by name or by index.
    pub fn indicator_type(&self, name: &str, default: IndicatorType) -> Result<IndicatorType> {
        let parsed = match self.lookup(name) {
            None => return Ok(default),
            Some(Value::Integer(i)) => IndicatorType::from_index(*i),
            Some(Value::String(s)) => IndicatorType::from_name(s),
            Some(other) => Err(anyhow!("expected a name or index, got {}", other.type_str())),
        };
        parsed.map_err(|e| e.context(format!("{}.{}", self.widget, name)))
    }

    /// Marks the read pass as finished so release can report leftovers.
    fn mark_complete(&self) {
        self.complete.set(true);
    }

    /// Attributes left unread by a completed pass. Empty while the pass is
    /// unfinished, since an aborted read skips valid names too.
    pub fn unknown(&self) -> Vec<String> {
        if self.complete.get() {
            self.unread()
        } else {
            Vec::new()
        }
    }

    /// Attribute names present in the table that nobody asked for.
    pub fn unread(&self) -> Vec<String> {
        let read = self.read.borrow();
        self.table
            .keys()
            .filter(|k| !read.contains(k.as_str()))
            .cloned()
            .collect()
    }
}

impl Drop for StyledAttributes<'_> {
    fn drop(&mut self) {
        let unknown = self.unknown();
        if !unknown.is_empty() {
            warn!("Unknown {} attributes ignored: {}", self.widget, unknown.join(", "));
        }
        debug!(
            "Released styled attributes for {} (complete: {})",
            self.widget,
            self.complete.get()
        );
    }
}

/// Runs `read` against the attributes of `widget`, releasing them on every exit path.
pub fn with_attributes<T>(
    widget: &'static str,
    table: &Table,
    read: impl FnOnce(&StyledAttributes<'_>) -> Result<T>,
) -> Result<T> {
    let attrs = StyledAttributes::obtain(widget, table);
    let value = read(&attrs)?;
    attrs.mark_complete();
    Ok(value)
}
