//! Scroll-step scenes as data.
//!
//! Step `n` (1-based, as written in `data-step="n"`) runs the n-th action.
//! Actions set absolute state so re-entering a step is harmless.

use crate::backend::{MapBackend, Overlay};
use crate::controller::{MapController, VisualizationMode};
use crate::geo::{LatLng, LatLngBounds};
use dana_meteo::{MeteoError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SceneAction {
    SetView { center: LatLng, zoom: f64 },
    FitBounds { bounds: LatLngBounds },
    ResetView,
    ShowOverlay { overlay: Overlay },
    HideOverlay { overlay: Overlay },
    SetMode { mode: VisualizationMode },
    HighlightExtremes { threshold: f64 },
    ResetStyle,
    Sequence { actions: Vec<SceneAction> },
}

impl SceneAction {
    pub fn apply<B: MapBackend>(&self, controller: &mut MapController<B>) {
        match self {
            SceneAction::SetView { center, zoom } => controller.set_view(*center, *zoom),
            SceneAction::FitBounds { bounds } => controller.fit_bounds(*bounds),
            SceneAction::ResetView => controller.reset_view(),
            SceneAction::ShowOverlay { overlay } => {
                controller.show_overlay(*overlay);
            }
            SceneAction::HideOverlay { overlay } => {
                controller.hide_overlay(*overlay);
            }
            SceneAction::SetMode { mode } => {
                controller.set_mode(*mode);
            }
            SceneAction::HighlightExtremes { threshold } => controller.highlight_extremes(*threshold),
            SceneAction::ResetStyle => controller.reset_style(),
            SceneAction::Sequence { actions } => {
                for action in actions {
                    action.apply(controller);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneTable {
    scenes: Vec<SceneAction>,
}

impl SceneTable {
    pub fn new(scenes: Vec<SceneAction>) -> Self {
        Self { scenes }
    }

    /// The story as published: Spain, the DANA track, Valencia, the
    /// municipalities, the extremes, the relief, a wider closing view.
    pub fn story_default() -> Self {
        Self::new(vec![
            SceneAction::SetView {
                center: LatLng::new(40.2, -3.5),
                zoom: 6.0,
            },
            SceneAction::ShowOverlay {
                overlay: Overlay::DanaTrack,
            },
            SceneAction::SetView {
                center: LatLng::new(39.4, -0.4),
                zoom: 8.0,
            },
            SceneAction::Sequence {
                actions: vec![
                    SceneAction::SetMode {
                        mode: VisualizationMode::Choropleth,
                    },
                    SceneAction::ResetStyle,
                ],
            },
            SceneAction::HighlightExtremes { threshold: 300.0 },
            SceneAction::ShowOverlay {
                overlay: Overlay::Relief,
            },
            SceneAction::SetView {
                center: LatLng::new(39.5, -0.6),
                zoom: 7.0,
            },
        ])
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let table: SceneTable = serde_json::from_str(json)?;
        if table.scenes.is_empty() {
            return Err(MeteoError::InvalidFormat("scene table is empty".to_string()));
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Action for a 1-based step.
    pub fn get(&self, step: usize) -> Option<&SceneAction> {
        step.checked_sub(1).and_then(|i| self.scenes.get(i))
    }

    /// Run step `step`. Returns false when no scene has that number.
    pub fn apply<B: MapBackend>(&self, step: usize, controller: &mut MapController<B>) -> bool {
        match self.get(step) {
            Some(action) => {
                log::debug!("[DANA] scene {}: {:?}", step, action);
                action.apply(controller);
                true
            }
            None => {
                log::debug!("[DANA] scene {}: no such scene", step);
                false
            }
        }
    }
}

impl Default for SceneTable {
    fn default() -> Self {
        Self::story_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choropleth::StyleRule;
    use crate::config::MapConfig;
    use crate::controller::LayerId;
    use crate::mock::{MockMap, GEOJSON};

    fn controller() -> MapController<MockMap> {
        let mut c = MapController::new(MockMap::new(), MapConfig::default());
        c.load(GEOJSON).unwrap();
        c
    }

    #[test]
    fn test_steps_are_one_based() {
        let table = SceneTable::story_default();
        assert_eq!(table.len(), 7);
        assert!(table.get(0).is_none());
        assert!(table.get(8).is_none());
        assert_eq!(
            table.get(1),
            Some(&SceneAction::SetView {
                center: LatLng::new(40.2, -3.5),
                zoom: 6.0
            })
        );
        assert_eq!(
            table.get(7),
            Some(&SceneAction::SetView {
                center: LatLng::new(39.5, -0.6),
                zoom: 7.0
            })
        );
    }

    #[test]
    fn test_out_of_range_step_does_nothing() {
        let table = SceneTable::story_default();
        let mut c = controller();
        let before = c.snapshot();
        assert!(!table.apply(0, &mut c));
        assert!(!table.apply(42, &mut c));
        assert_eq!(c.snapshot(), before);
    }

    #[test]
    fn test_every_scene_is_idempotent() {
        let table = SceneTable::story_default();
        for step in 1..=table.len() {
            let mut once = controller();
            table.apply(step, &mut once);

            let mut twice = controller();
            table.apply(step, &mut twice);
            table.apply(step, &mut twice);

            assert_eq!(once.snapshot(), twice.snapshot(), "step {}", step);
        }
    }

    #[test]
    fn test_story_walkthrough() {
        let table = SceneTable::story_default();
        let mut c = controller();
        c.set_mode(VisualizationMode::Heatmap);

        for step in 1..=7 {
            assert!(table.apply(step, &mut c));
        }
        let s = c.snapshot();
        assert_eq!(s.center, LatLng::new(39.5, -0.6));
        assert_eq!(s.zoom, 7.0);
        assert_eq!(s.mode, VisualizationMode::Choropleth);
        assert_eq!(s.style, StyleRule::Extremes { threshold: 300.0 });
        assert_eq!(
            s.layers,
            vec![
                LayerId::Choropleth,
                LayerId::Overlay(Overlay::DanaTrack),
                LayerId::Overlay(Overlay::Relief)
            ]
        );
    }

    #[test]
    fn test_scene_four_clears_highlight() {
        let table = SceneTable::story_default();
        let mut c = controller();
        table.apply(5, &mut c);
        table.apply(4, &mut c);
        assert_eq!(c.style_rule(), StyleRule::Scale);
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"[
            {"action": "set_view", "center": {"lat": 39.4, "lng": -0.4}, "zoom": 9},
            {"action": "show_overlay", "overlay": "dana"},
            {"action": "sequence", "actions": [
                {"action": "set_mode", "mode": "heatmap"},
                {"action": "highlight_extremes", "threshold": 200}
            ]},
            {"action": "reset_view"}
        ]"#;
        let table = SceneTable::from_json(json).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.get(2),
            Some(&SceneAction::ShowOverlay {
                overlay: Overlay::DanaTrack
            })
        );

        let mut c = controller();
        table.apply(3, &mut c);
        assert_eq!(c.mode(), VisualizationMode::Heatmap);
        assert_eq!(c.style_rule(), StyleRule::Extremes { threshold: 200.0 });
    }

    #[test]
    fn test_bad_tables_are_rejected() {
        assert!(SceneTable::from_json("[]").is_err());
        assert!(SceneTable::from_json(r#"[{"action": "fly_to"}]"#).is_err());
    }
}
