//! Geometry primitives shared by the layout engine and its hosts.
//!
//! [`ActorBox`] is an axis-aligned rectangle given by its two corners,
//! [`Size`] a plain width/height pair, and [`RequestMode`] tells the engine
//! which axis drives the other when both are constrained.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Natural (preferred) size of a child.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An allocation rectangle, `(x1, y1)` top-left and `(x2, y2)` bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActorBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl ActorBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// A box of the given size anchored at the origin.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}

/// Which axis drives the other during a size negotiation.
///
/// Only consulted when both the available width and the available height
/// are constrained; otherwise the unconstrained axis decides.
///
/// Has no `Default`: every container states its own mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequestMode {
    /// Columns are fitted into the width, rows follow.
    HeightForWidth,
    /// Rows are fitted into the height, columns follow.
    WidthForHeight,
}

impl fmt::Display for RequestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestMode::HeightForWidth => write!(f, "height-for-width"),
            RequestMode::WidthForHeight => write!(f, "width-for-height"),
        }
    }
}

/// Parse a request mode (case-insensitive; accepts "height-for-width",
/// "HeightForWidth", "width_for_height", etc.).
fn parse_request_mode(s: &str) -> Option<RequestMode> {
    let normalized: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect();
    match normalized.as_str() {
        "heightforwidth" => Some(RequestMode::HeightForWidth),
        "widthforheight" => Some(RequestMode::WidthForHeight),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for RequestMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_request_mode(&s)
            .ok_or_else(|| DeError::custom(format!("invalid request mode: {:?}", s)))
    }
}

/// Normalise a host-supplied dimension: negative or NaN means
/// "unconstrained".
pub fn constraint(value: f32) -> Option<f32> {
    if value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_dimensions() {
        let b = ActorBox::new(10.0, 20.0, 110.0, 70.0);
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 50.0);
        assert_eq!(ActorBox::from_size(3.0, 4.0), ActorBox::new(0.0, 0.0, 3.0, 4.0));
    }

    #[test]
    fn request_mode_parses_loosely() {
        let m: RequestMode = serde_json::from_str(r#""height-for-width""#).unwrap();
        assert_eq!(m, RequestMode::HeightForWidth);
        let m: RequestMode = serde_json::from_str(r#""WidthForHeight""#).unwrap();
        assert_eq!(m, RequestMode::WidthForHeight);
        let m: RequestMode = serde_json::from_str(r#""width_for_height""#).unwrap();
        assert_eq!(m, RequestMode::WidthForHeight);
        assert!(serde_json::from_str::<RequestMode>(r#""diagonal""#).is_err());
    }

    #[test]
    fn request_mode_display() {
        assert_eq!(RequestMode::HeightForWidth.to_string(), "height-for-width");
        assert_eq!(RequestMode::WidthForHeight.to_string(), "width-for-height");
    }

    #[test]
    fn negative_dimension_is_unconstrained() {
        assert_eq!(constraint(-1.0), None);
        assert_eq!(constraint(f32::NAN), None);
        assert_eq!(constraint(0.0), Some(0.0));
        assert_eq!(constraint(250.0), Some(250.0));
    }
}
