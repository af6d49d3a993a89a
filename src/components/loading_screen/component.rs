use leptos::prelude::*;
use log::{info, warn};
use web_sys::HtmlCanvasElement;

use crate::components::frame_loop::{FrameLoop, Mounted, teardown_on_cleanup};
use crate::components::particles::builder::browser_rng;
use crate::components::particles::glyphs::{
	FormationLayout, FormationTargets, GlyphTargets, rasterize_text, sample,
};
use crate::components::particles::surface::CanvasSurface;
use crate::components::particles::timeline::{Phase, Timeline};
use crate::components::particles::{LoadingScene, LoadingStyle, Viewport};

fn window_viewport() -> Viewport {
	web_sys::window()
		.map(|w| {
			Viewport::new(
				w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
				w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
			)
		})
		.unwrap_or_default()
}

fn glyph_targets(text: &str, viewport: Viewport, font_size: f64, style: &LoadingStyle, cap: usize) -> GlyphTargets {
	rasterize_text(text, viewport, font_size, &style.font_family)
		.map(|mask| sample(&mask, font_size, cap))
		.unwrap_or_default()
}

/// Intro overlay that plays the particle timeline once and then calls
/// `on_complete`.
///
/// The overlay gains the `fading` class when the fade phase starts so the
/// host stylesheet can transition it out. If the canvas has no 2D context the
/// timeline still runs to completion without painting.
#[component]
pub fn LoadingScreen(
	#[prop(into)] on_complete: Callback<()>,
	#[prop(optional)] style: Option<LoadingStyle>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let (fading, set_fading) = signal(false);
	let style = style.unwrap_or_default();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let style = style.clone();
		let viewport = window_viewport();

		let mut surface = CanvasSurface::new(&canvas, viewport);
		if surface.is_none() {
			warn!("loading screen: 2d context unavailable, timeline will complete unpainted");
		}

		let layout = FormationLayout::for_viewport(viewport);
		let targets = FormationTargets::new(
			glyph_targets(&style.first_text, viewport, layout.first_font_size, &style, layout.max_points),
			glyph_targets(&style.second_text, viewport, layout.second_font_size, &style, layout.max_points),
		);
		info!(
			"loading screen: sampled {} / {} glyph points",
			targets.first.len(),
			targets.second.len()
		);

		let timeline = Timeline::new(style.timeline).with_completion(move || on_complete.run(()));
		let mut scene = LoadingScene::new(style, viewport, targets, timeline, &mut browser_rng());

		let mut start: Option<f64> = None;
		let frame = FrameLoop::start(move |now| {
			let start = *start.get_or_insert(now);
			let frame = scene.step((now - start) / 1000.0);
			if frame.phase >= Phase::Fade && !fading.get_untracked() {
				set_fading.set(true);
			}
			if let Some(surface) = surface.as_mut() {
				scene.paint(surface, &frame);
			}
		});
		teardown_on_cleanup(Mounted::new(frame));
	});

	view! {
		<div
			class="loading-screen"
			class:fading=move || fading.get()
			style="position: fixed; inset: 0; z-index: 100; background: #000;"
		>
			<canvas
				node_ref=canvas_ref
				style="position: absolute; inset: 0; width: 100%; height: 100%;"
			/>
		</div>
	}
}
