//! The controllers behind the page and the glue that drives them.
//!
//! `Story` is cloned into every handler (it is a bundle of `Rc`s). Each
//! operation mutates a controller synchronously and then copies what the
//! components render into `StoryState`.

use anyhow::anyhow;
use dana_charts::{ComboChart, MultiLineChart, SeaTempChart};
use dana_map::{MapConfig, MapController, MapEvent, ScrollObserver, SceneTable, VisualizationMode};
use dana_meteo::sea_temperature::SeaTemperatureData;
use dana_meteo::station::PrecipitationData;
use dana_meteo::variable::MapVariable;
use dana_story_ui::chart_js::ChartJs;
use dana_story_ui::js_bridge::{fetch_text, wait_for_global};
use dana_story_ui::leaflet::{HoverListener, LeafletMap, MapListener};
use dana_story_ui::observer::StepObserver;
use dana_story_ui::state::StoryState;
use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

pub const GEOJSON_URL: &str = "data/municipios_con_meteo.geojson";
pub const PRECIPITATION_URL: &str = "data/datos_precipitacion.json";
pub const SEA_TEMPERATURE_URL: &str = "data/datos_temperatura.json";

pub const COMBO_CANVAS: &str = "comboChart";
pub const MULTI_CANVAS: &str = "multiLineChart";
pub const SEA_CANVAS: &str = "seaTempChart";

/// Elements the scroll observer watches.
pub const STEP_SELECTOR: &str = ".step";

/// 100 ms apart, so about ten seconds for the host page's libraries.
const LIBRARY_WAIT_ATTEMPTS: u32 = 100;

type SharedMap = Rc<RefCell<Option<MapController<LeafletMap>>>>;

/// Subscriptions that must end with the page.
#[derive(Default)]
struct Guards {
    moves: Option<MapListener>,
    hover: Option<HoverListener>,
    steps: Option<StepObserver>,
}

#[derive(Clone)]
pub struct Story {
    map: SharedMap,
    scenes: Rc<SceneTable>,
    scroll: ScrollObserver,
    combo: Rc<RefCell<ComboChart<ChartJs>>>,
    multi: Rc<RefCell<MultiLineChart<ChartJs>>>,
    sea: Rc<RefCell<SeaTempChart<ChartJs>>>,
    guards: Rc<RefCell<Guards>>,
}

impl Story {
    pub fn new() -> Self {
        Self {
            map: Rc::new(RefCell::new(None)),
            scenes: Rc::new(SceneTable::story_default()),
            scroll: ScrollObserver::default(),
            combo: Rc::new(RefCell::new(ComboChart::new(ChartJs, COMBO_CANVAS))),
            multi: Rc::new(RefCell::new(MultiLineChart::new(ChartJs, MULTI_CANVAS))),
            sea: Rc::new(RefCell::new(SeaTempChart::new(ChartJs, SEA_CANVAS))),
            guards: Rc::new(RefCell::new(Guards::default())),
        }
    }

    /// Run `f` on the map controller. `None` when there is no map yet or
    /// the controller is already borrowed further up the stack.
    fn with_map<R>(&self, f: impl FnOnce(&mut MapController<LeafletMap>) -> R) -> Option<R> {
        let Ok(mut slot) = self.map.try_borrow_mut() else {
            log::warn!("[DANA] story: map busy, dropping call");
            return None;
        };
        slot.as_mut().map(f)
    }

    // ---- map ----

    /// Mount Leaflet, wire map and scroll events, then fetch the municipalities.
    pub async fn start_map(self, mut state: StoryState) {
        if let Err(e) = wait_for_global("L", LIBRARY_WAIT_ATTEMPTS).await {
            log::error!("[DANA] story: {:#}", e);
            return;
        }
        let config = MapConfig::default();
        let backend = match LeafletMap::mount(&config) {
            Ok(backend) => backend,
            Err(e) => {
                log::error!("[DANA] story: map mount failed: {:#}", e);
                return;
            }
        };
        *self.map.borrow_mut() = Some(MapController::new(backend, config));
        self.listen_map(state);
        self.observe_steps(state);
        self.sync_map(state);
        state.map_ready.set(true);

        let fetched = fetch_text(GEOJSON_URL).await;
        self.with_map(|controller| controller.load_result(fetched));
        self.sync_map(state);
    }

    fn listen_map(&self, mut state: StoryState) {
        let map = self.map.clone();
        let moves = MapListener::new(move |event| dispatch_map_event(&map, event, false));

        let map = self.map.clone();
        let hover = HoverListener::new(move |index| {
            let info = match (index, map.try_borrow()) {
                (Some(i), Ok(slot)) => slot.as_ref().and_then(|c| c.describe(i)),
                _ => None,
            };
            state.hovered.set(info);
        });

        let mut guards = self.guards.borrow_mut();
        guards.moves = Some(moves);
        guards.hover = Some(hover);
    }

    fn observe_steps(&self, state: StoryState) {
        let story = self.clone();
        let observed = StepObserver::observe(STEP_SELECTOR, self.scroll.threshold(), move |batch| {
            story.apply_steps(batch, state, false);
        });
        match observed {
            Ok((observer, count)) => {
                log::info!("[DANA] story: observing {} steps", count);
                self.guards.borrow_mut().steps = Some(observer);
            }
            Err(e) => log::error!("[DANA] story: scroll observer failed: {:#}", e),
        }
    }

    fn apply_steps(
        &self,
        batch: Vec<dana_map::StepEntry>,
        mut state: StoryState,
        retried: bool,
    ) {
        let applied = match self.map.try_borrow_mut() {
            Ok(mut slot) => match slot.as_mut() {
                Some(controller) => self.scroll.dispatch(&batch, &self.scenes, controller),
                None => return,
            },
            Err(_) => {
                // Delivered while a scene is still running; retry once after it.
                match on_busy(retried) {
                    Busy::Defer => {
                        let story = self.clone();
                        spawn_local(async move { story.apply_steps(batch, state, true) });
                    }
                    Busy::Drop => {
                        log::warn!("[DANA] story: dropped {} step entries", batch.len())
                    }
                }
                return;
            }
        };
        if let Some(&last) = applied.last() {
            log::debug!("[DANA] story: scenes {:?}", applied);
            state.current_step.set(Some(last));
            self.sync_map(state);
        }
    }

    pub fn select_mode(&self, mode: VisualizationMode, state: StoryState) {
        if self.with_map(|c| c.set_mode(mode)).unwrap_or(false) {
            self.sync_map(state);
        }
    }

    pub fn select_variable(&self, id: &str, state: StoryState) {
        let Some(variable) = MapVariable::by_id(id) else {
            log::warn!("[DANA] story: unknown variable {}", id);
            return;
        };
        if self.with_map(|c| c.set_variable(variable)).unwrap_or(false) {
            self.sync_map(state);
        }
    }

    fn sync_map(&self, mut state: StoryState) {
        let Ok(slot) = self.map.try_borrow() else {
            return;
        };
        let Some(controller) = slot.as_ref() else {
            return;
        };
        state.map_mode.set(controller.mode());
        state.map_variable.set(controller.variable());
        state.legend.set(Some(controller.legend().clone()));
    }

    // ---- charts ----

    pub async fn load_precipitation(self, state: StoryState) {
        if let Err(e) = wait_for_global("Chart", LIBRARY_WAIT_ATTEMPTS).await {
            log::error!("[DANA] story: {:#}", e);
        }
        let result = fetch_text(PRECIPITATION_URL)
            .await
            .and_then(|text| Ok(PrecipitationData::from_json(&text)?));
        let copy = match &result {
            Ok(data) => Ok(data.clone()),
            Err(e) => Err(anyhow!("{:#}", e)),
        };
        self.combo.borrow_mut().load(result);
        self.multi.borrow_mut().load(copy);
        self.sync_combo(state);
        self.sync_multi(state);
    }

    pub fn select_station(&self, key: &str, state: StoryState) {
        if self.combo.borrow_mut().update(key) {
            self.sync_combo(state);
        }
    }

    pub fn toggle_station(&self, key: &str, checked: bool, state: StoryState) {
        if self.multi.borrow_mut().toggle(key, checked) {
            self.sync_multi(state);
        }
    }

    fn sync_combo(&self, mut state: StoryState) {
        let combo = self.combo.borrow();
        state.combo_options.set(combo.options());
        state.combo_error.set(combo.error().map(str::to_string));
    }

    fn sync_multi(&self, mut state: StoryState) {
        let multi = self.multi.borrow();
        state.multi_options.set(multi.options());
        state.multi_error.set(multi.error().map(str::to_string));
    }

    pub async fn load_sea_temperature(self, mut state: StoryState) {
        if let Err(e) = wait_for_global("Chart", LIBRARY_WAIT_ATTEMPTS).await {
            log::error!("[DANA] story: {:#}", e);
        }
        let result = fetch_text(SEA_TEMPERATURE_URL)
            .await
            .and_then(|text| Ok(SeaTemperatureData::from_json(&text)?));
        if let Ok(data) = &result {
            match data.peak_anomaly() {
                Ok(Some((day, anomaly))) => {
                    log::info!("[DANA] story: peak sea anomaly +{:.1} °C on {}", anomaly, day)
                }
                Ok(None) => {}
                Err(e) => log::warn!("[DANA] story: {}", e),
            }
        }
        let mut sea = self.sea.borrow_mut();
        sea.load(result);
        state.sea_error.set(sea.error().map(str::to_string));
        state.sea_loading.set(false);
    }

    // ---- lifecycle ----

    /// Unsubscribe everything and release the map and charts.
    pub fn teardown(&self) {
        *self.guards.borrow_mut() = Guards::default();
        if let Ok(mut slot) = self.map.try_borrow_mut() {
            if let Some(mut controller) = slot.take() {
                controller.teardown();
            }
        }
        self.combo.borrow_mut().destroy();
        self.multi.borrow_mut().destroy();
        self.sea.borrow_mut().destroy();
    }
}

impl Default for Story {
    fn default() -> Self {
        Self::new()
    }
}

/// What to do with work that found the map controller borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Busy {
    /// Try again once the current borrow ends
    Defer,
    Drop,
}

/// Work is deferred at most once; a second conflict drops it.
fn on_busy(retried: bool) -> Busy {
    if retried {
        Busy::Drop
    } else {
        Busy::Defer
    }
}

/// Leaflet fires `moveend` synchronously inside `setView`, i.e. while a
/// scene holds the controller. Such events are replayed once it is free.
fn dispatch_map_event(map: &SharedMap, event: MapEvent, retried: bool) {
    match map.try_borrow_mut() {
        Ok(mut slot) => {
            if let Some(controller) = slot.as_mut() {
                controller.dispatch(event);
            }
        }
        Err(_) => match on_busy(retried) {
            Busy::Defer => {
                let map = map.clone();
                spawn_local(async move { dispatch_map_event(&map, event, true) });
            }
            Busy::Drop => log::warn!("[DANA] story: dropped {:?}", event),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_work_is_deferred_once() {
        assert_eq!(on_busy(false), Busy::Defer);
        assert_eq!(on_busy(true), Busy::Drop);
    }
}
