//! Scene files for the `dyntable` command-line tool.
//!
//! A scene describes one container: its children's natural sizes and the
//! space available to it.  Running a scene lays it out and produces a
//! [`SceneReport`].
//!
//! # Wire format
//!
//! ```json
//! {
//!   "width": 250,
//!   "height": 180,
//!   "request_mode": "height-for-width",
//!   "children": [
//!     "100x50",
//!     { "width": 100, "height": 50 },
//!     { "width": 80, "height": 40, "visible": false }
//!   ]
//! }
//! ```
//!
//! `width` / `height` are optional; a missing or negative value means
//! unconstrained.  With both present the children are allocated, otherwise
//! the preferred size along the free axis is reported.

use crate::geometry::{constraint, ActorBox, RequestMode};
use crate::table::DynamicTableLayout;
use crate::traits::{Container, FixedActor};
use log::debug;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

/// Errors produced while reading a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One child of a scene.
///
/// Accepts `{"width": w, "height": h, "visible": bool}` (visibility defaults
/// to `true`) or the compact string `"WxH"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneChild {
    pub width: f32,
    pub height: f32,
    pub visible: bool,
}

impl<'de> Deserialize<'de> for SceneChild {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = SceneChild;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "object {{width, height, visible?}} or string \"WxH\"")
            }
            fn visit_map<A>(self, mut map: A) -> Result<SceneChild, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut width = None;
                let mut height = None;
                let mut visible = None;
                while let Some(k) = map.next_key::<String>()? {
                    match k.as_str() {
                        "width" => width = Some(map.next_value()?),
                        "height" => height = Some(map.next_value()?),
                        "visible" => visible = Some(map.next_value()?),
                        _ => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }
                Ok(SceneChild {
                    width: width.ok_or_else(|| DeError::missing_field("width"))?,
                    height: height.ok_or_else(|| DeError::missing_field("height"))?,
                    visible: visible.unwrap_or(true),
                })
            }
            fn visit_str<E>(self, s: &str) -> Result<SceneChild, E>
            where
                E: DeError,
            {
                let (w, h) = s
                    .trim()
                    .split_once(['x', 'X'])
                    .ok_or_else(|| {
                        DeError::custom(format!("child: expected \"WxH\", got {:?}", s))
                    })?;
                let width: f32 = w
                    .trim()
                    .parse()
                    .map_err(|_| DeError::custom("child: width must be a number"))?;
                let height: f32 = h
                    .trim()
                    .parse()
                    .map_err(|_| DeError::custom("child: height must be a number"))?;
                Ok(SceneChild { width, height, visible: true })
            }
        }
        deserializer.deserialize_any(V)
    }
}

impl From<SceneChild> for FixedActor {
    fn from(c: SceneChild) -> Self {
        let mut actor = FixedActor::new(c.width, c.height);
        actor.visible = c.visible;
        actor
    }
}

/// A container to lay out.
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub request_mode: Option<RequestMode>,
    #[serde(default)]
    pub children: Vec<SceneChild>,
}

/// Minimum and natural size along one axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferredSize {
    /// `"width"` or `"height"`.
    pub axis: &'static str,
    pub min: f32,
    pub natural: f32,
}

/// Where one visible child ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellReport {
    /// Index of the child in the scene, hidden children included.
    pub child: usize,
    pub column: usize,
    pub row: usize,
    pub allocation: ActorBox,
}

/// Result of running a [`Scene`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneReport {
    pub number_children: usize,
    pub rows: usize,
    pub columns: usize,
    pub column_boundaries: Vec<f32>,
    pub row_boundaries: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred: Option<PreferredSize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<CellReport>,
}

impl Scene {
    /// Read a scene from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a scene from a JSON string.
    pub fn parse(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Lay the scene out with `layout`.
    ///
    /// `default_mode` is used when the scene does not name a request mode.
    pub fn run(&self, layout: &mut DynamicTableLayout, default_mode: RequestMode) -> SceneReport {
        let mode = self.request_mode.unwrap_or(default_mode);
        let children = self.children.iter().copied().map(FixedActor::from).collect();
        let mut container = Container::new(children, mode);

        let width = self.width.and_then(constraint);
        let height = self.height.and_then(constraint);
        debug!(
            "running scene: {} children, {:?}x{:?}, {}",
            self.children.len(),
            width,
            height,
            mode
        );

        let preferred = match (width, height) {
            (Some(w), Some(h)) => {
                layout.allocate(&mut container, ActorBox::from_size(w, h));
                None
            }
            (Some(w), None) => {
                let (min, natural) = layout.preferred_height(&container, Some(w));
                Some(PreferredSize { axis: "height", min, natural })
            }
            (None, h) => {
                let (min, natural) = layout.preferred_width(&container, h);
                Some(PreferredSize { axis: "width", min, natural })
            }
        };

        let cells = container
            .into_children()
            .into_iter()
            .enumerate()
            .filter_map(|(child, actor)| actor.allocation.map(|a| (child, a)))
            .enumerate()
            .filter_map(|(visible_index, (child, allocation))| {
                let (column, row) = layout.cell_of(visible_index)?;
                Some(CellReport { child, column, row, allocation })
            })
            .collect();

        SceneReport {
            number_children: layout.number_children(),
            rows: layout.rows(),
            columns: layout.columns(),
            column_boundaries: layout.column_boundaries().to_vec(),
            row_boundaries: layout.row_boundaries().to_vec(),
            preferred,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_accepts_object_and_compact_string() {
        let c: SceneChild = serde_json::from_str(r#"{"width": 100, "height": 50}"#).unwrap();
        assert_eq!(c, SceneChild { width: 100.0, height: 50.0, visible: true });

        let c: SceneChild =
            serde_json::from_str(r#"{"width": 1, "height": 2, "visible": false}"#).unwrap();
        assert!(!c.visible);

        let c: SceneChild = serde_json::from_str(r#""64x48""#).unwrap();
        assert_eq!(c, SceneChild { width: 64.0, height: 48.0, visible: true });

        let c: SceneChild = serde_json::from_str(r#"" 10 X 20 ""#).unwrap();
        assert_eq!((c.width, c.height), (10.0, 20.0));
    }

    #[test]
    fn child_ignores_unknown_keys() {
        let json = r#"{"label": "terminal", "width": 3, "tags": [1, 2], "height": 4}"#;
        let c: SceneChild = serde_json::from_str(json).unwrap();
        assert_eq!(c, SceneChild { width: 3.0, height: 4.0, visible: true });
    }

    #[test]
    fn malformed_children_rejected() {
        assert!(serde_json::from_str::<SceneChild>(r#""100""#).is_err());
        assert!(serde_json::from_str::<SceneChild>(r#""ax50""#).is_err());
        assert!(serde_json::from_str::<SceneChild>(r#"{"width": 100}"#).is_err());
        assert!(serde_json::from_str::<SceneChild>("42").is_err());
    }

    #[test]
    fn allocating_scene_reports_cells() {
        let scene = Scene::parse(
            r#"{
                "width": 250, "height": 180,
                "children": [
                    "100x50",
                    "100x50",
                    {"width": 9, "height": 9, "visible": false},
                    "100x50"
                ]
            }"#,
        )
        .unwrap();
        let mut layout = DynamicTableLayout::new();
        let report = scene.run(&mut layout, RequestMode::HeightForWidth);

        assert_eq!(report.number_children, 3);
        assert_eq!((report.columns, report.rows), (2, 2));
        assert!(report.preferred.is_none());
        assert_eq!(report.cells.len(), 3);
        assert_eq!(report.cells[2].child, 3);
        assert_eq!((report.cells[2].column, report.cells[2].row), (0, 1));
        assert_eq!(report.cells[2].allocation, ActorBox::new(0.0, 50.0, 125.0, 100.0));
    }

    #[test]
    fn width_only_scene_reports_preferred_height() {
        let json = r#"{"width": 250, "children": ["100x50","100x50","100x50","100x50","100x50"]}"#;
        let scene = Scene::parse(json).unwrap();
        let mut layout = DynamicTableLayout::new();
        let report = scene.run(&mut layout, RequestMode::HeightForWidth);
        assert_eq!(
            report.preferred,
            Some(PreferredSize { axis: "height", min: 0.0, natural: 150.0 })
        );
        assert!(report.cells.is_empty());
    }

    #[test]
    fn negative_dimensions_mean_unconstrained() {
        let scene =
            Scene::parse(r#"{"width": -1, "height": -1, "children": ["10x10", "10x10"]}"#).unwrap();
        let mut layout = DynamicTableLayout::new();
        let report = scene.run(&mut layout, RequestMode::HeightForWidth);
        assert_eq!((report.rows, report.columns), (1, 2));
        assert_eq!(
            report.preferred,
            Some(PreferredSize { axis: "width", min: 0.0, natural: 20.0 })
        );
    }

    #[test]
    fn scene_request_mode_overrides_default() {
        let scene = Scene::parse(
            r#"{"width": 1000, "height": 100, "request_mode": "width-for-height",
                "children": ["100x50","100x50","100x50","100x50","100x50","100x50"]}"#,
        )
        .unwrap();
        let mut layout = DynamicTableLayout::new();
        let report = scene.run(&mut layout, RequestMode::HeightForWidth);
        assert_eq!((report.columns, report.rows), (3, 2));
    }

    #[test]
    fn report_serializes_without_empty_sections() {
        let scene = Scene::parse(r#"{"children": []}"#).unwrap();
        let mut layout = DynamicTableLayout::new();
        let report = scene.run(&mut layout, RequestMode::HeightForWidth);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("cells").is_none());
        assert_eq!(json["rows"], 0);
        assert_eq!(json["preferred"]["natural"], 0.0);
    }
}
