//! Dynamic table layout.
//!
//! [`DynamicTableLayout`] arranges the visible children of a container in a
//! grid whose shape is not configured but derived on every pass: the number
//! of columns that fit into the available width (or rows into the available
//! height) is determined from the largest natural child size, and the other
//! dimension follows from the number of children.
//!
//! Children are placed in row-major order.  All cells in a column share the
//! same width; each row is as tall as its tallest child.
//!
//! ```text
//!  b[0]      b[1]      b[2]
//!   ┌────────┐ ┌────────┐
//!   │   0    │ │   1    │    row 0
//!   └────────┘ └────────┘
//!   ┌────────┐ ┌────────┐
//!   │   2    │ │   3    │    row 1
//!   └────────┘ └────────┘
//!           ↑ spacing
//! ```

use crate::config::LayoutConfig;
use crate::geometry::{ActorBox, RequestMode, Size};
use crate::notify::{FrozenNotify, LayoutEvent, Observers, Property, PropertyChange, PropertyValue};
use crate::traits::{LayoutChild, LayoutContainer};
use log::{debug, warn};
use std::sync::mpsc;

/// Errors produced by the layout's setters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Spacing must be finite and non-negative.
    #[error("invalid {property} {value}: spacing must be finite and non-negative")]
    InvalidSpacing { property: Property, value: f32 },
    /// The combined setter was given a value neither axis accepts.
    #[error("invalid spacing {0}: row-spacing and column-spacing must be finite and non-negative")]
    InvalidCombinedSpacing(f32),
    /// Attempt to write a read-only property.
    #[error("property {0} is read-only")]
    ReadOnly(Property),
}

/// A grid layout whose rows and columns follow the number of children.
///
/// Every public entry point ([`recompute`](Self::recompute),
/// [`preferred_width`](Self::preferred_width),
/// [`preferred_height`](Self::preferred_height), [`allocate`](Self::allocate))
/// recomputes the layout from scratch; nothing is cached across calls with
/// different constraints.
#[derive(Debug)]
pub struct DynamicTableLayout {
    row_spacing: f32,
    column_spacing: f32,

    rows: usize,
    columns: usize,
    number_children: usize,

    /// `columns + 1` x-offsets of the column edges.
    column_coords: Vec<f32>,
    /// `rows + 1` y-offsets of the row edges.
    row_coords: Vec<f32>,

    observers: Observers,
}

impl Default for DynamicTableLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicTableLayout {
    /// Create an empty layout with zero spacing.
    pub fn new() -> Self {
        Self {
            row_spacing: 0.0,
            column_spacing: 0.0,
            rows: 0,
            columns: 0,
            number_children: 0,
            column_coords: vec![0.0],
            row_coords: vec![0.0],
            observers: Observers::default(),
        }
    }

    /// Create a layout with the spacing from `config`.
    ///
    /// `config.spacing`, when set, applies to both axes and takes precedence
    /// over the per-axis values.
    pub fn from_config(config: &LayoutConfig) -> Result<Self, LayoutError> {
        let mut layout = Self::new();
        match config.spacing {
            Some(spacing) => layout.set_spacing(spacing)?,
            None => {
                layout.set_row_spacing(config.row_spacing)?;
                layout.set_column_spacing(config.column_spacing)?;
            }
        }
        Ok(layout)
    }

    /// Register an observer for property and relayout notifications.
    pub fn add_observer(&mut self, tx: mpsc::Sender<LayoutEvent>) {
        self.observers.add(tx);
    }

    /// Convenience wrapper around [`add_observer`](Self::add_observer) that
    /// creates the channel.
    pub fn subscribe(&mut self) -> mpsc::Receiver<LayoutEvent> {
        let (tx, rx) = mpsc::channel();
        self.add_observer(tx);
        rx
    }

    //  Accessors

    pub fn row_spacing(&self) -> f32 {
        self.row_spacing
    }

    pub fn column_spacing(&self) -> f32 {
        self.column_spacing
    }

    /// Rows computed by the last pass.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Columns computed by the last pass.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Visible children considered by the last pass.
    pub fn number_children(&self) -> usize {
        self.number_children
    }

    /// Column edges of the last pass; `columns() + 1` entries.
    pub fn column_boundaries(&self) -> &[f32] {
        &self.column_coords
    }

    /// Row edges of the last pass; `rows() + 1` entries.
    pub fn row_boundaries(&self) -> &[f32] {
        &self.row_coords
    }

    /// Read a property by identifier.
    pub fn property(&self, property: Property) -> PropertyValue {
        match property {
            Property::RowSpacing => PropertyValue::Float(self.row_spacing),
            Property::ColumnSpacing => PropertyValue::Float(self.column_spacing),
            Property::NumberChildren => PropertyValue::Int(self.number_children),
            Property::Rows => PropertyValue::Int(self.rows),
            Property::Columns => PropertyValue::Int(self.columns),
        }
    }

    /// Write a writable property by identifier.
    pub fn set_property(&mut self, property: Property, value: f32) -> Result<(), LayoutError> {
        if !property.is_writable() {
            return Err(LayoutError::ReadOnly(property));
        }
        if property == Property::RowSpacing {
            self.set_row_spacing(value)
        } else {
            self.set_column_spacing(value)
        }
    }

    //  Setters

    pub fn set_row_spacing(&mut self, spacing: f32) -> Result<(), LayoutError> {
        validate_spacing(Property::RowSpacing, spacing)?;
        if self.row_spacing != spacing {
            let old = self.row_spacing;
            self.row_spacing = spacing;
            debug!("row-spacing {} -> {}", old, spacing);
            self.notify_float(Property::RowSpacing, old, spacing);
            self.observers.emit(LayoutEvent::LayoutChanged);
        }
        Ok(())
    }

    pub fn set_column_spacing(&mut self, spacing: f32) -> Result<(), LayoutError> {
        validate_spacing(Property::ColumnSpacing, spacing)?;
        if self.column_spacing != spacing {
            let old = self.column_spacing;
            self.column_spacing = spacing;
            debug!("column-spacing {} -> {}", old, spacing);
            self.notify_float(Property::ColumnSpacing, old, spacing);
            self.observers.emit(LayoutEvent::LayoutChanged);
        }
        Ok(())
    }

    /// Set row and column spacing to the same value at once.
    ///
    /// Observers see one property change per axis that actually changed and
    /// a single [`LayoutEvent::LayoutChanged`].
    pub fn set_spacing(&mut self, spacing: f32) -> Result<(), LayoutError> {
        if !is_valid_spacing(spacing) {
            warn!("rejecting spacing {}", spacing);
            return Err(LayoutError::InvalidCombinedSpacing(spacing));
        }
        if self.row_spacing == spacing && self.column_spacing == spacing {
            return Ok(());
        }

        let (old_row, old_column) = (self.row_spacing, self.column_spacing);
        self.row_spacing = spacing;
        self.column_spacing = spacing;
        debug!("spacing {}/{} -> {}", old_row, old_column, spacing);

        if old_row != spacing {
            self.notify_float(Property::RowSpacing, old_row, spacing);
        }
        if old_column != spacing {
            self.notify_float(Property::ColumnSpacing, old_column, spacing);
        }
        self.observers.emit(LayoutEvent::LayoutChanged);
        Ok(())
    }

    //  Layout

    /// Recompute the grid shape and boundaries for `container`.
    ///
    /// `available_width` / `available_height` are `None` when unconstrained.
    /// With both unconstrained all children go into a single row.  With one
    /// unconstrained, the constrained axis is fitted first.  With both
    /// constrained, the container's [`RequestMode`] decides.
    pub fn recompute<C: LayoutContainer>(
        &mut self,
        container: &C,
        available_width: Option<f32>,
        available_height: Option<f32>,
    ) {
        let mut frozen = FrozenNotify::default();

        // Visible children and the largest natural size among them.
        let sizes: Vec<Size> = container
            .children()
            .iter()
            .filter(|c| c.is_visible())
            .map(|c| c.preferred_size())
            .collect();
        let count = sizes.len();
        let largest = sizes.iter().fold(Size::default(), |acc, s| {
            Size::new(acc.width.max(s.width), acc.height.max(s.height))
        });

        if count != self.number_children {
            frozen.record(
                Property::NumberChildren,
                PropertyValue::Int(self.number_children),
                PropertyValue::Int(count),
            );
            self.number_children = count;
        }

        let (rows, columns, cell_width) = if count == 0 {
            (0, 0, 0.0)
        } else {
            let mode = match (available_width, available_height) {
                (None, None) => None,
                (None, Some(_)) => Some(RequestMode::WidthForHeight),
                (Some(_), None) => Some(RequestMode::HeightForWidth),
                (Some(_), Some(_)) => Some(container.request_mode()),
            };
            match mode {
                None => (1, count, largest.width),
                Some(RequestMode::HeightForWidth) => {
                    let width = available_width.unwrap_or(0.0);
                    let (columns, cell_width) =
                        fit_tracks(width, count, largest.width, self.column_spacing);
                    (count.div_ceil(columns), columns, cell_width)
                }
                Some(RequestMode::WidthForHeight) => {
                    let height = available_height.unwrap_or(0.0);
                    let (fitted_rows, _) =
                        fit_tracks(height, count, largest.height, self.row_spacing);
                    let columns = count.div_ceil(fitted_rows);
                    // Filling row-major may need fewer rows than fitted.
                    (count.div_ceil(columns), columns, largest.width)
                }
            }
        };

        if rows != self.rows {
            frozen.record(Property::Rows, PropertyValue::Int(self.rows), PropertyValue::Int(rows));
            self.rows = rows;
        }
        if columns != self.columns {
            frozen.record(
                Property::Columns,
                PropertyValue::Int(self.columns),
                PropertyValue::Int(columns),
            );
            self.columns = columns;
        }

        self.column_coords = column_boundaries(columns, cell_width, self.column_spacing);
        self.row_coords = row_boundaries(&sizes, columns, self.row_spacing);

        debug!(
            "recompute: {} children in {}x{} (available {:?}x{:?})",
            count, columns, rows, available_width, available_height
        );

        frozen.thaw(&mut self.observers);
    }

    /// Minimum and natural width for the given height.
    pub fn preferred_width<C: LayoutContainer>(
        &mut self,
        container: &C,
        for_height: Option<f32>,
    ) -> (f32, f32) {
        self.recompute(container, None, for_height);
        if self.columns == 0 {
            return (0.0, 0.0);
        }
        let min = (self.columns - 1) as f32 * self.column_spacing;
        (min, self.column_coords[self.columns])
    }

    /// Minimum and natural height for the given width.
    pub fn preferred_height<C: LayoutContainer>(
        &mut self,
        container: &C,
        for_width: Option<f32>,
    ) -> (f32, f32) {
        self.recompute(container, for_width, None);
        if self.rows == 0 {
            return (0.0, 0.0);
        }
        let min = (self.rows - 1) as f32 * self.row_spacing;
        (min, self.row_coords[self.rows])
    }

    /// Lay out `container` inside `allocation` and allocate every visible
    /// child its cell.
    ///
    /// Cell rectangles are relative to the container, like the boundaries.
    pub fn allocate<C: LayoutContainer>(&mut self, container: &mut C, allocation: ActorBox) {
        let width = allocation.width().max(0.0);
        let height = allocation.height().max(0.0);
        self.recompute(container, Some(width), Some(height));

        let mut index = 0;
        for child in container.children_mut().iter_mut() {
            if !child.is_visible() {
                continue;
            }
            match self.cell_box(index) {
                Some(cell) => child.allocate(cell),
                None => warn!("no cell for visible child {}", index),
            }
            index += 1;
        }
    }

    /// `(column, row)` of the `index`-th visible child in the last pass.
    pub fn cell_of(&self, index: usize) -> Option<(usize, usize)> {
        if self.columns == 0 || index >= self.number_children {
            return None;
        }
        Some((index % self.columns, index / self.columns))
    }

    /// The rectangle of the `index`-th visible child in the last pass.
    ///
    /// A cell spans from its leading boundaries to the next boundaries minus
    /// spacing.  Column widths are uniform, so the last column, whose end
    /// boundary carries no trailing spacing, ends at that boundary.
    pub fn cell_box(&self, index: usize) -> Option<ActorBox> {
        let (column, row) = self.cell_of(index)?;
        let x2 = if column + 1 == self.columns {
            self.column_coords[column + 1]
        } else {
            self.column_coords[column + 1] - self.column_spacing
        };
        Some(ActorBox::new(
            self.column_coords[column],
            self.row_coords[row],
            x2,
            self.row_coords[row + 1] - self.row_spacing,
        ))
    }

    //  Internal

    fn notify_float(&mut self, property: Property, old: f32, new: f32) {
        self.observers.emit(LayoutEvent::PropertyChanged(PropertyChange {
            property,
            old: PropertyValue::Float(old),
            new: PropertyValue::Float(new),
        }));
    }
}

fn is_valid_spacing(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn validate_spacing(property: Property, value: f32) -> Result<(), LayoutError> {
    if is_valid_spacing(value) {
        Ok(())
    } else {
        warn!("rejecting {} {}", property, value);
        Err(LayoutError::InvalidSpacing { property, value })
    }
}

/// Fit as many tracks of size `largest` as possible into `available`.
///
/// Returns the track count (at least 1, at most `count`) and the resulting
/// uniform track size.  `count` must be non-zero.
fn fit_tracks(available: f32, count: usize, largest: f32, spacing: f32) -> (usize, f32) {
    let tracks = if largest > 0.0 {
        let fitting = (available / largest).ceil() as usize;
        let mut tracks = fitting.min(count).max(1);
        while tracks > 1 && tracks as f32 * largest + (tracks - 1) as f32 * spacing > available {
            tracks -= 1;
        }
        tracks
    } else {
        count
    };
    let size = (available - (tracks - 1) as f32 * spacing).floor() / tracks as f32;
    (tracks, size.max(0.0))
}

fn column_boundaries(columns: usize, cell_width: f32, spacing: f32) -> Vec<f32> {
    let mut coords = Vec::with_capacity(columns + 1);
    coords.push(0.0);
    for k in 1..=columns {
        let gaps = if k == columns { k - 1 } else { k };
        coords.push(k as f32 * cell_width + gaps as f32 * spacing);
    }
    coords
}

fn row_boundaries(sizes: &[Size], columns: usize, spacing: f32) -> Vec<f32> {
    let mut coords = vec![0.0];
    if columns == 0 {
        return coords;
    }
    let mut row_height: f32 = 0.0;
    for (i, size) in sizes.iter().enumerate() {
        if i > 0 && i % columns == 0 {
            let start = coords[coords.len() - 1];
            coords.push(start + row_height + spacing);
            row_height = 0.0;
        }
        row_height = row_height.max(size.height);
    }
    let start = coords[coords.len() - 1];
    coords.push(start + row_height);
    coords
}

//  Tests
