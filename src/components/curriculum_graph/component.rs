use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use super::config::GraphConfig;
use super::interaction::Tooltip;
use super::model::GraphModel;
use super::render;
use super::state::CurriculumGraphState;

type Listener<E> = Rc<RefCell<Option<Closure<dyn FnMut(E)>>>>;

fn window_size(window: &Window) -> (f64, f64) {
	(
		window.inner_width().unwrap().as_f64().unwrap(),
		window.inner_height().unwrap().as_f64().unwrap(),
	)
}

fn remove_listener<E: 'static>(window: &Window, event: &str, listener: &Listener<E>) {
	if let Some(cb) = listener.borrow_mut().take() {
		let _ = window.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
	}
}

fn detach_window_listeners(
	window: &Window,
	keydown: &Listener<KeyboardEvent>,
	resize: &Listener<web_sys::Event>,
) {
	remove_listener(window, "keydown", keydown);
	remove_listener(window, "resize", resize);
}

/// Canvas-backed curriculum graph. Owns its simulation for as long as it is
/// mounted; the frame loop and window listeners stop on unmount.
#[component]
pub fn CurriculumGraph(
	model: GraphModel,
	#[prop(optional)] config: GraphConfig,
	#[prop(default = true)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<CurriculumGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Listener<f64> = Rc::new(RefCell::new(None));
	let keydown: Listener<KeyboardEvent> = Rc::new(RefCell::new(None));
	let resize_cb: Listener<web_sys::Event> = Rc::new(RefCell::new(None));
	let tooltip = RwSignal::new(Tooltip::default());
	let alive = Arc::new(AtomicBool::new(true));

	// Window listeners detach here; the frame loop drops itself on its next tick.
	let alive_cleanup = alive.clone();
	let window_listeners = StoredValue::new_local((keydown.clone(), resize_cb.clone()));
	on_cleanup(move || {
		alive_cleanup.store(false, Ordering::Relaxed);
		if let Some(win) = web_sys::window() {
			window_listeners.try_with_value(|(keydown, resize)| {
				detach_window_listeners(&win, keydown, resize)
			});
		}
	});

	let (state_init, animate_init) = (state.clone(), animate.clone());
	let (keydown_init, resize_init, alive_init) = (keydown.clone(), resize_cb.clone(), alive.clone());
	let mut pending = Some((model, config));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some((model, config)) = pending.take() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		*state_init.borrow_mut() = Some(CurriculumGraphState::new(model, w, h, config));
		debug!("Curriculum graph mounted at {}x{}", w, h);

		let (state_key, alive_key) = (state_init.clone(), alive_init.clone());
		*keydown_init.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
			if !alive_key.load(Ordering::Relaxed) {
				return;
			}
			if let Some(ref mut s) = *state_key.borrow_mut() {
				s.handle_key(&ev.key());
			}
		}));
		if let Some(ref cb) = *keydown_init.borrow() {
			let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_init.borrow_mut() = Some(Closure::new(move |_: web_sys::Event| {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_init.borrow() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let (keydown_anim, resize_anim, alive_anim) =
			(keydown_init.clone(), resize_init.clone(), alive_init.clone());
		let mut last_ts: Option<f64> = None;
		*animate_init.borrow_mut() = Some(Closure::new(move |ts: f64| {
			let Some(win) = web_sys::window() else {
				return;
			};
			if !alive_anim.load(Ordering::Relaxed) {
				detach_window_listeners(&win, &keydown_anim, &resize_anim);
				state_anim.borrow_mut().take();
				// dropped after this call returns
				animate_inner.borrow_mut().take();
				debug!("Curriculum graph unmounted");
				return;
			}

			let dt = last_ts.map_or(0.0, |prev| ts - prev);
			last_ts = Some(ts);
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.frame(dt);
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let local_point = move |ev: &MouseEvent| -> (f64, f64) {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let p = local_point(&ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(p);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let p = local_point(&ev);
		let client = (ev.client_x() as f64, ev.client_y() as f64);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pointer_move(p, client) {
				tooltip.set(s.interaction.tooltip().clone());
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			if s.pointer_leave() {
				tooltip.set(s.interaction.tooltip().clone());
			}
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let p = local_point(&ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(ev.delta_y(), ev.delta_mode(), p);
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		ev.prevent_default();
		let p = local_point(&ev);
		if let Some(ref mut s) = *state_dc.borrow_mut() {
			s.double_click(p, ev.shift_key());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="curriculum-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dblclick=on_dblclick
			style="display: block; cursor: grab;"
		/>
		<div
			class="graph-tooltip"
			style="position: fixed; pointer-events: none; background: #151826; color: #e6e6e6; border: 1px solid #2a3042; border-radius: 6px; padding: 6px 8px; font-size: 12px; transition: opacity 120ms;"
			style:left=move || format!("{}px", tooltip.with(|t| t.left))
			style:top=move || format!("{}px", tooltip.with(|t| t.top))
			style:opacity=move || if tooltip.with(|t| t.visible) { "1" } else { "0" }
			inner_html=move || tooltip.with(|t| t.html.clone())
		/>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use std::cell::Cell;

	use wasm_bindgen_test::*;

	use super::*;

	wasm_bindgen_test_configure!(run_in_browser);

	#[wasm_bindgen_test]
	fn detached_listeners_stop_receiving_events() {
		let window = web_sys::window().unwrap();
		let hits = Rc::new(Cell::new(0));
		let keydown: Listener<KeyboardEvent> = Rc::new(RefCell::new(None));
		let resize: Listener<web_sys::Event> = Rc::new(RefCell::new(None));

		let counter = hits.clone();
		*keydown.borrow_mut() = Some(Closure::new(move |_: KeyboardEvent| counter.set(counter.get() + 1)));
		if let Some(ref cb) = *keydown.borrow() {
			window
				.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())
				.unwrap();
		}

		let press = || {
			let ev = KeyboardEvent::new("keydown").unwrap();
			window.dispatch_event(&ev).unwrap();
		};
		press();
		assert_eq!(hits.get(), 1);

		detach_window_listeners(&window, &keydown, &resize);
		assert!(keydown.borrow().is_none());
		press();
		assert_eq!(hits.get(), 1);

		// second teardown from the frame loop is a no-op
		detach_window_listeners(&window, &keydown, &resize);
	}
}
