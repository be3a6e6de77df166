//! Before/after image comparison with a draggable divider.

use dioxus::prelude::*;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Where the divider starts.
pub const INITIAL_PERCENT: f64 = 50.0;

/// Percent of the wrapper revealed for a pointer at `client_x`, given the
/// wrapper's left edge and width. A zero-width wrapper reveals nothing.
pub fn reveal_percent(client_x: f64, left: f64, width: f64) -> f64 {
    if !(width > 0.0) {
        return 0.0;
    }
    (client_x - left).clamp(0.0, width) / width * 100.0
}

/// New percent for a pointer move, if a drag is in progress. Positions past
/// either edge of the wrapper clamp to 0 or 100.
pub fn drag_percent(dragging: bool, client_x: f64, span: Option<(f64, f64)>) -> Option<f64> {
    if !dragging {
        return None;
    }
    let (left, width) = span?;
    Some(reveal_percent(client_x, left, width))
}

/// (left, width) of an element on screen.
fn element_span(id: &str) -> Option<(f64, f64)> {
    let element = web_sys::window()?.document()?.get_element_by_id(id)?;
    let rect = element.get_bounding_client_rect();
    Some((rect.left(), rect.width()))
}

/// `mousemove`/`mouseup` on the window, so a drag keeps tracking once the
/// pointer leaves the wrapper. Removed on drop.
struct WindowDrag {
    on_move: Closure<dyn FnMut(web_sys::MouseEvent)>,
    on_up: Closure<dyn FnMut(web_sys::MouseEvent)>,
}

impl WindowDrag {
    fn install(
        mut on_move: impl FnMut(f64) + 'static,
        mut on_up: impl FnMut() + 'static,
    ) -> Option<Self> {
        let window = web_sys::window()?;
        let on_move =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
                on_move(f64::from(e.client_x()))
            });
        let on_up =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_: web_sys::MouseEvent| on_up());
        for (name, callback) in [("mousemove", &on_move), ("mouseup", &on_up)] {
            let listener = callback.as_ref().unchecked_ref();
            if let Err(e) = window.add_event_listener_with_callback(name, listener) {
                log::warn!("[DANA] compare: {} listener not added: {:?}", name, e);
            }
        }
        Some(Self { on_move, on_up })
    }
}

impl Drop for WindowDrag {
    fn drop(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        for (name, callback) in [("mousemove", &self.on_move), ("mouseup", &self.on_up)] {
            let listener = callback.as_ref().unchecked_ref();
            if let Err(e) = window.remove_event_listener_with_callback(name, listener) {
                log::warn!("[DANA] compare: {} listener not removed: {:?}", name, e);
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct CompareSliderProps {
    /// DOM id of the wrapper, used to measure it
    pub id: String,
    pub before_src: String,
    pub after_src: String,
    #[props(default = "Antes".to_string())]
    pub before_label: String,
    #[props(default = "Después".to_string())]
    pub after_label: String,
}

#[component]
pub fn CompareSlider(props: CompareSliderProps) -> Element {
    let mut percent = use_signal(|| INITIAL_PERCENT);
    let mut dragging = use_signal(|| false);
    let id = use_signal(|| props.id.clone());

    let mut move_to = move |client_x: f64| match element_span(&id.read()) {
        Some((left, width)) => percent.set(reveal_percent(client_x, left, width)),
        None => log::warn!("[DANA] compare: #{} not found", id.read()),
    };

    let _window_drag = use_hook(move || {
        let window_drag = WindowDrag::install(
            move |client_x| {
                let span = element_span(&id.peek());
                if let Some(next) = drag_percent(*dragging.peek(), client_x, span) {
                    percent.set(next);
                }
            },
            move || dragging.set(false),
        );
        Rc::new(window_drag)
    });

    let p = percent();

    rsx! {
        div {
            id: "{props.id}",
            class: "compare-wrapper",
            style: "position: relative; width: 100%; overflow: hidden; user-select: none; touch-action: none; cursor: ew-resize;",
            onmousedown: move |evt: MouseEvent| {
                evt.prevent_default();
                dragging.set(true);
                move_to(evt.client_coordinates().x);
            },
            ontouchstart: move |evt: TouchEvent| {
                if let Some(touch) = evt.touches().first() {
                    dragging.set(true);
                    move_to(touch.client_coordinates().x);
                }
            },
            ontouchmove: move |evt: TouchEvent| {
                if dragging() {
                    if let Some(touch) = evt.touches().first() {
                        move_to(touch.client_coordinates().x);
                    }
                }
            },
            ontouchend: move |_| dragging.set(false),

            img {
                class: "base",
                src: "{props.after_src}",
                alt: "{props.after_label}",
                draggable: "false",
                style: "display: block; width: 100%;",
            }
            div {
                class: "compare-overlay",
                style: "position: absolute; top: 0; left: 0; height: 100%; width: {p}%; overflow: hidden;",
                img {
                    class: "overlay-img",
                    src: "{props.before_src}",
                    alt: "{props.before_label}",
                    draggable: "false",
                    style: "display: block; height: 100%; width: auto; max-width: none;",
                }
            }
            div {
                class: "compare-slider",
                style: "position: absolute; top: 0; bottom: 0; left: {p}%; width: 3px; margin-left: -1px; background: #fff; box-shadow: 0 0 4px rgba(0,0,0,0.6);",
            }
            span {
                style: "position: absolute; top: 8px; left: 8px; font-size: 11px; color: #fff; background: rgba(0,0,0,0.5); padding: 2px 6px;",
                "{props.before_label}"
            }
            span {
                style: "position: absolute; top: 8px; right: 8px; font-size: 11px; color: #fff; background: rgba(0,0,0,0.5); padding: 2px 6px;",
                "{props.after_label}"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_percent() {
        assert_eq!(reveal_percent(150.0, 100.0, 200.0), 25.0);
        assert_eq!(reveal_percent(300.0, 100.0, 200.0), 100.0);
    }

    #[test]
    fn test_reveal_percent_clamps() {
        assert_eq!(reveal_percent(50.0, 100.0, 200.0), 0.0);
        assert_eq!(reveal_percent(900.0, 100.0, 200.0), 100.0);
    }

    #[test]
    fn test_drag_past_wrapper_edges_clamps() {
        let span = Some((100.0, 200.0));
        assert_eq!(drag_percent(true, 20.0, span), Some(0.0));
        assert_eq!(drag_percent(true, 1200.0, span), Some(100.0));
        assert_eq!(drag_percent(true, 250.0, span), Some(75.0));
    }

    #[test]
    fn test_moves_without_drag_are_ignored() {
        assert_eq!(drag_percent(false, 150.0, Some((100.0, 200.0))), None);
        assert_eq!(drag_percent(true, 150.0, None), None);
    }

    #[test]
    fn test_zero_width_reveals_nothing() {
        assert_eq!(reveal_percent(150.0, 100.0, 0.0), 0.0);
        assert_eq!(reveal_percent(150.0, 100.0, f64::NAN), 0.0);
    }
}
