//! Property change notification.
//!
//! The layout exposes a handful of observable properties.  Whenever one of
//! them changes value, a [`LayoutEvent::PropertyChanged`] is sent to every
//! registered observer over an [`mpsc`](std::sync::mpsc) channel.  Spacing
//! setters additionally send a single [`LayoutEvent::LayoutChanged`] so a
//! host can queue a relayout.

use std::fmt;
use std::str::FromStr;
use std::sync::mpsc;

/// Observable properties of a [`DynamicTableLayout`](crate::table::DynamicTableLayout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Gap between rows (read-write).
    RowSpacing,
    /// Gap between columns (read-write).
    ColumnSpacing,
    /// Visible children considered in the last pass (read-only).
    NumberChildren,
    /// Rows computed in the last pass (read-only).
    Rows,
    /// Columns computed in the last pass (read-only).
    Columns,
}

impl Property {
    /// Canonical dashed name, e.g. `"row-spacing"`.
    pub fn name(&self) -> &'static str {
        match self {
            Property::RowSpacing => "row-spacing",
            Property::ColumnSpacing => "column-spacing",
            Property::NumberChildren => "number-children",
            Property::Rows => "rows",
            Property::Columns => "columns",
        }
    }

    /// Whether callers may set this property.
    pub fn is_writable(&self) -> bool {
        matches!(self, Property::RowSpacing | Property::ColumnSpacing)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a property name is not known.
#[derive(Debug, thiserror::Error)]
#[error("unknown property: {0:?}")]
pub struct UnknownProperty(String);

impl FromStr for Property {
    type Err = UnknownProperty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('_', "-").to_lowercase().as_str() {
            "row-spacing" => Ok(Property::RowSpacing),
            "column-spacing" => Ok(Property::ColumnSpacing),
            "number-children" => Ok(Property::NumberChildren),
            "rows" => Ok(Property::Rows),
            "columns" => Ok(Property::Columns),
            _ => Err(UnknownProperty(s.to_string())),
        }
    }
}

/// Value of a property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Float(f32),
    Int(usize),
}

/// One property transition.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    pub property: Property,
    pub old: PropertyValue,
    pub new: PropertyValue,
}

/// Events sent to observers.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    /// A property changed value.
    PropertyChanged(PropertyChange),
    /// The configuration changed in a way that requires a new layout pass.
    LayoutChanged,
}

/// The set of registered observers.
///
/// Observers whose receiving end has been dropped are pruned on the next
/// emission.
#[derive(Debug, Default)]
pub(crate) struct Observers {
    senders: Vec<mpsc::Sender<LayoutEvent>>,
}

impl Observers {
    pub(crate) fn add(&mut self, tx: mpsc::Sender<LayoutEvent>) {
        self.senders.push(tx);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }

    pub(crate) fn emit(&mut self, event: LayoutEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Collects property changes while notification is frozen and emits them
/// in one batch when thawed.
///
/// A property recorded more than once keeps its first `old` and its last
/// `new` value; if those end up equal nothing is emitted for it.
#[derive(Debug, Default)]
pub(crate) struct FrozenNotify {
    pending: Vec<PropertyChange>,
}

impl FrozenNotify {
    pub(crate) fn record(&mut self, property: Property, old: PropertyValue, new: PropertyValue) {
        if let Some(existing) = self.pending.iter_mut().find(|c| c.property == property) {
            existing.new = new;
        } else {
            self.pending.push(PropertyChange { property, old, new });
        }
    }

    pub(crate) fn thaw(self, observers: &mut Observers) {
        for change in self.pending {
            if change.old != change.new {
                observers.emit(LayoutEvent::PropertyChanged(change));
            }
        }
    }
}
