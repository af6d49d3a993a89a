//! Browser plumbing shared by the canvas components: a cancellable
//! `requestAnimationFrame` loop and RAII event-listener registrations.
//!
//! Everything registered here is released when the owning [`Mounted`] is
//! dropped, which [`teardown_on_cleanup`] ties to the component's reactive
//! owner.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::on_cleanup;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A self-rescheduling animation frame callback.
pub struct FrameLoop {
	handle: Rc<Cell<Option<i32>>>,
	callback: FrameCallback,
}

impl FrameLoop {
	/// Starts calling `tick` with the frame timestamp (ms) once per display
	/// refresh. The next frame is requested before `tick` runs.
	pub fn start(mut tick: impl FnMut(f64) + 'static) -> Option<Self> {
		let window = web_sys::window()?;
		let handle = Rc::new(Cell::new(None));
		let callback: FrameCallback = Rc::new(RefCell::new(None));
		let (handle_inner, callback_inner) = (handle.clone(), callback.clone());

		*callback.borrow_mut() = Some(Closure::new(move |now: f64| {
			if let Some(ref cb) = *callback_inner.borrow() {
				handle_inner.set(
					web_sys::window()
						.and_then(|w| w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()),
				);
			}
			tick(now);
		}));

		if let Some(ref cb) = *callback.borrow() {
			handle.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
		Some(Self { handle, callback })
	}

	/// Cancels the pending frame and releases the callback.
	pub fn cancel(&self) {
		if let (Some(id), Some(window)) = (self.handle.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		// Breaks the closure's reference to itself.
		self.callback.borrow_mut().take();
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.cancel();
	}
}

/// An event listener that unregisters itself on drop.
pub struct EventListener {
	target: EventTarget,
	kind: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
	pub fn new(target: &EventTarget, kind: &'static str, handler: impl FnMut(Event) + 'static) -> Self {
		let callback = Closure::<dyn FnMut(Event)>::new(handler);
		let _ = target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref());
		Self {
			target: target.clone(),
			kind,
			callback,
		}
	}
}

impl Drop for EventListener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
	}
}

/// Everything a mounted canvas effect registered with the browser.
#[derive(Default)]
pub struct Mounted {
	frame: Option<FrameLoop>,
	listeners: Vec<EventListener>,
}

impl Mounted {
	pub fn new(frame: Option<FrameLoop>) -> Self {
		Self {
			frame,
			listeners: Vec::new(),
		}
	}

	pub fn listen(
		&mut self,
		target: &EventTarget,
		kind: &'static str,
		handler: impl FnMut(Event) + 'static,
	) {
		self.listeners.push(EventListener::new(target, kind, handler));
	}
}

impl Drop for Mounted {
	fn drop(&mut self) {
		if let Some(frame) = self.frame.take() {
			frame.cancel();
		}
		let count = self.listeners.len();
		self.listeners.clear();
		log::debug!("torn down frame loop and {count} listeners");
	}
}

/// Drops `mounted` when the current reactive owner is cleaned up.
pub fn teardown_on_cleanup(mounted: Mounted) {
	let mounted = SendWrapper::new(mounted);
	on_cleanup(move || drop(mounted.take()));
}

/// `performance.now()` in milliseconds; the clock frame timestamps use.
pub fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or(0.0)
}
