//! Leptos components for the ambient particle fields.
//!
//! Both components share [`mount_field`]: it acquires a 2D context, builds a
//! [`ParticleSystem`] for the container's size, wires pointer/scroll/resize/
//! visibility listeners, and runs the throttled frame loop. A canvas without
//! a 2D context mounts nothing.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlCanvasElement, MouseEvent};

use crate::components::frame_loop::{FrameLoop, Mounted, now_ms, teardown_on_cleanup};
use crate::components::particles::builder::browser_rng;
use crate::components::particles::scheduler::{FrameThrottle, ResizeDebounce};
use crate::components::particles::surface::CanvasSurface;
use crate::components::particles::{FieldStyle, ParticleSystem, Vec2, Viewport};

/// Where pointer coordinates are read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PointerSource {
	/// Whole document; the canvas itself ignores pointer events.
	Document,
	/// Only while over the canvas; leaving clears the pointer.
	Canvas,
}

/// Size of the canvas' container, falling back to the window.
fn container_viewport(canvas: &HtmlCanvasElement) -> Viewport {
	if let Some(rect) = canvas.parent_element().map(|p| p.get_bounding_client_rect()) {
		if rect.width() > 0.0 && rect.height() > 0.0 {
			return Viewport::new(rect.width(), rect.height());
		}
	}
	web_sys::window()
		.map(|w| {
			Viewport::new(
				w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
				w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
			)
		})
		.unwrap_or_default()
}

/// Top-left corner of the container in client coordinates.
fn container_origin(canvas: &HtmlCanvasElement) -> (f64, f64) {
	let element: Option<Element> = canvas.parent_element().or_else(|| Some(canvas.clone().into()));
	element
		.map(|e| {
			let rect = e.get_bounding_client_rect();
			(rect.left(), rect.top())
		})
		.unwrap_or((0.0, 0.0))
}

fn mount_field(
	canvas: &HtmlCanvasElement,
	style: FieldStyle,
	animate: MaybeProp<bool>,
	source: PointerSource,
) -> Option<Mounted> {
	let window = web_sys::window()?;
	let document = window.document()?;
	let viewport = container_viewport(canvas);

	let Some(mut surface) = CanvasSurface::new(canvas, viewport) else {
		warn!("particle field: 2d context unavailable, skipping animation");
		return None;
	};

	let max_fps = style.max_fps;
	let quiet_ms = style.resize_quiet_ms;
	let system = Rc::new(RefCell::new(ParticleSystem::new(style, viewport, browser_rng())));
	let pointer: Rc<Cell<Option<Vec2>>> = Rc::new(Cell::new(None));
	let origin = Rc::new(Cell::new(container_origin(canvas)));
	let throttle = Rc::new(RefCell::new(FrameThrottle::new(max_fps)));
	let resize = Rc::new(RefCell::new(ResizeDebounce::<Viewport>::new(quiet_ms)));
	info!(
		"particle field mounted: {} particles, {}x{}",
		system.borrow().particles.len(),
		viewport.width,
		viewport.height
	);

	let (system_tick, pointer_tick, throttle_tick, resize_tick, origin_tick) = (
		system.clone(),
		pointer.clone(),
		throttle.clone(),
		resize.clone(),
		origin.clone(),
	);
	let canvas_tick = canvas.clone();
	let frame = FrameLoop::start(move |now| {
		let Some(dt) = throttle_tick.borrow_mut().poll(now) else {
			return;
		};
		let mut system = system_tick.borrow_mut();
		if let Some(viewport) = resize_tick.borrow_mut().poll(now) {
			surface.resize(viewport);
			system.rebuild(viewport);
			origin_tick.set(container_origin(&canvas_tick));
		}
		system.paused = !animate.get_untracked().unwrap_or(true);
		if system.paused {
			return;
		}
		let pointer = pointer_tick.get();
		system.update(dt, pointer);
		system.paint(&mut surface, pointer);
	});

	let mut mounted = Mounted::new(frame);

	let pointer_target: web_sys::EventTarget = match source {
		PointerSource::Document => document.clone().into(),
		PointerSource::Canvas => canvas.clone().into(),
	};
	let (pointer_mm, origin_mm) = (pointer.clone(), origin.clone());
	mounted.listen(&pointer_target, "mousemove", move |ev| {
		if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
			let (left, top) = origin_mm.get();
			pointer_mm.set(Some(Vec2::new(
				ev.client_x() as f64 - left,
				ev.client_y() as f64 - top,
			)));
		}
	});

	if source == PointerSource::Canvas {
		let pointer_ml = pointer.clone();
		mounted.listen(&pointer_target, "mouseleave", move |_| pointer_ml.set(None));
	}

	let (canvas_scroll, origin_scroll) = (canvas.clone(), origin.clone());
	mounted.listen(&window, "scroll", move |_| {
		origin_scroll.set(container_origin(&canvas_scroll));
	});

	let (canvas_resize, resize_ev) = (canvas.clone(), resize.clone());
	mounted.listen(&window, "resize", move |_| {
		resize_ev
			.borrow_mut()
			.notify(now_ms(), container_viewport(&canvas_resize));
	});

	let (document_vis, throttle_vis) = (document.clone(), throttle.clone());
	mounted.listen(&document, "visibilitychange", move |_| {
		if document_vis.visibility_state() == web_sys::VisibilityState::Visible {
			throttle_vis.borrow_mut().reset();
		}
	});

	Some(mounted)
}

/// Hero background: a field of dots revealed and pushed around by the cursor.
///
/// The canvas fills its positioned parent and ignores pointer events; the
/// cursor is tracked at document level. On compact viewports the dots drift
/// without interaction. `animate = false` freezes the field.
#[component]
pub fn InteractiveDotGrid(
	#[prop(optional, into)] animate: MaybeProp<bool>,
	#[prop(optional)] style: Option<FieldStyle>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let style = style.unwrap_or_else(FieldStyle::dot_grid);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if let Some(mounted) = mount_field(&canvas, style.clone(), animate, PointerSource::Document) {
			teardown_on_cleanup(mounted);
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="dot-grid-canvas"
			style="position: absolute; inset: 0; width: 100%; height: 100%; pointer-events: none;"
		/>
	}
}

/// Linked multicolor constellation that shies away from the cursor.
#[component]
pub fn ParticleField(#[prop(optional)] style: Option<FieldStyle>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let style = style.unwrap_or_else(FieldStyle::constellation);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if let Some(mounted) =
			mount_field(&canvas, style.clone(), MaybeProp::default(), PointerSource::Canvas)
		{
			teardown_on_cleanup(mounted);
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-field-canvas"
			style="position: absolute; inset: 0; width: 100%; height: 100%; z-index: 0;"
		/>
	}
}
