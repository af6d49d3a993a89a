use leptos::prelude::*;
use log::debug;
use web_sys::HtmlDivElement;

use super::state::{COPIES, Carousel, CarouselStyle};
use super::types::CarouselItem;
use crate::components::frame_loop::{FrameLoop, Mounted, teardown_on_cleanup};
use crate::components::particles::scheduler::FrameThrottle;

fn window_width() -> f64 {
	web_sys::window()
		.and_then(|w| w.inner_width().ok())
		.and_then(|v| v.as_f64())
		.unwrap_or(0.0)
}

/// Looping slide track with spring animation, autoplay, arrows and dots.
///
/// Autoplay pauses while the pointer is over the carousel.
#[component]
pub fn InfiniteCarousel(
	items: Vec<CarouselItem>,
	#[prop(optional)] style: Option<CarouselStyle>,
) -> impl IntoView {
	let style = style.unwrap_or_default();
	let len = items.len();
	let container_ref = NodeRef::<leptos::html::Div>::new();

	let state = StoredValue::new_local(Carousel::new(len, 0.0, window_width(), style));
	let offset = RwSignal::new(state.with_value(Carousel::offset));
	let index = RwSignal::new(state.with_value(Carousel::index));
	let item_width = RwSignal::new(state.with_value(Carousel::item_width));
	let active_dot = RwSignal::new(state.with_value(Carousel::active_dot));
	let gap = style.gap;

	let publish = move |c: &Carousel| {
		offset.set(c.offset());
		if index.get_untracked() != c.index() {
			index.set(c.index());
			active_dot.set(c.active_dot());
		}
		if item_width.get_untracked() != c.item_width() {
			item_width.set(c.item_width());
		}
	};

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let container: HtmlDivElement = container.into();
		state.update_value(|c| {
			c.resize(container.offset_width() as f64, window_width());
			publish(c);
		});

		let mut throttle = FrameThrottle::new(None);
		let frame = FrameLoop::start(move |now| {
			let Some(dt) = throttle.poll(now) else {
				return;
			};
			state.update_value(|c| {
				if c.tick(now, dt) {
					publish(c);
				}
			});
		});

		let mut mounted = Mounted::new(frame);
		if let Some(window) = web_sys::window() {
			let container = container.clone();
			mounted.listen(&window, "resize", move |_| {
				state.update_value(|c| {
					c.resize(container.offset_width() as f64, window_width());
					publish(c);
				});
			});
		}
		debug!("carousel mounted with {len} items");
		teardown_on_cleanup(mounted);
	});

	let slides = (0..COPIES)
		.flat_map(|_| items.iter().cloned())
		.enumerate()
		.map(|(slot, item)| {
			let is_center = move || index.get() == slot;
			view! {
				<div
					class="carousel-card"
					class:center=is_center
					style=move || format!("flex: 0 0 {}px;", item_width.get())
				>
					<img src=item.image.clone() alt=item.title.clone() />
					<div class="carousel-card-content">
						<p class="carousel-card-subtitle">{item.subtitle.clone()}</p>
						<h3 class="carousel-card-title">{item.title.clone()}</h3>
						{item.desc.clone().map(|desc| view! { <p class="carousel-card-desc">{desc}</p> })}
					</div>
				</div>
			}
		})
		.collect_view();

	let dots = (0..len)
		.map(|dot| {
			view! {
				<div class="carousel-dot" class:active=move || { active_dot.get() == dot } />
			}
		})
		.collect_view();

	view! {
		<div
			class="carousel"
			node_ref=container_ref
			style="position: relative; width: 100%; overflow: hidden;"
			on:mouseenter=move |_| state.update_value(|c| c.set_hovered(true))
			on:mouseleave=move |_| state.update_value(|c| c.set_hovered(false))
		>
			<div
				class="carousel-track"
				style=move || {
					format!("display: flex; align-items: center; gap: {gap}px; transform: translateX({}px);", offset.get())
				}
			>
				{slides}
			</div>
			<button
				class="carousel-prev"
				aria-label="Previous slide"
				on:click=move |_| state.update_value(Carousel::prev)
			>
				"‹"
			</button>
			<button
				class="carousel-next"
				aria-label="Next slide"
				on:click=move |_| state.update_value(Carousel::next)
			>
				"›"
			</button>
			<div class="carousel-dots">{dots}</div>
		</div>
	}
}
