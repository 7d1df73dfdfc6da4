//! **dyntable** — a dynamic table layout engine for launcher overviews.
//!
//! Children are arranged in a grid whose shape is never configured: the
//! number of columns that fit into the available width (or rows into the
//! available height) is derived from the largest natural child size, and
//! the other dimension follows from the number of visible children.  Rows
//! and columns therefore appear and disappear as children are added,
//! removed, hidden, or the container is resized.
//!
//! # Architecture
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::LayoutChild`] — a child actor that reports its natural size
//!   and accepts an allocation.
//! * [`traits::LayoutContainer`] — the actor whose children are laid out; it
//!   also supplies the [`geometry::RequestMode`] used when both dimensions
//!   are constrained.
//!
//! [`table::DynamicTableLayout`] implements the engine on top of those
//! traits and reports property changes through [`notify`].  [`scene`] and
//! [`config`] back the `dyntable` command-line tool.

pub mod config;
pub mod geometry;
pub mod notify;
pub mod scene;
pub mod table;
pub mod traits;
