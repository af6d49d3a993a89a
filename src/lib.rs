//! nextgen-fx: canvas effects for the NextGen SuperComputing site.
//!
//! The crate ships the intro loading screen, the hero dot grid, the about
//! section's particle constellation and the looping image carousel as Leptos
//! components, plus a framework-independent contact form handler. The
//! animation cores live in [`components::particles`] and
//! [`components::carousel::state`] and run headless under `cargo test`.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::{Deserialize, Deserializer};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod contact;

pub use components::carousel::{CarouselItem, CarouselStyle, InfiniteCarousel};
pub use components::loading_screen::LoadingScreen;
pub use components::particle_field::{InteractiveDotGrid, ParticleField};
pub use components::particles::theme::FieldStylePatch;
pub use components::particles::{FieldStyle, LoadingStyle};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("nextgen-fx: logging initialized");
}

/// Page content and style overrides embedded by the host page.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SiteData {
	pub carousel: Vec<CarouselItem>,
	pub carousel_style: Option<CarouselStyle>,
	#[serde(deserialize_with = "dot_grid_style")]
	pub dot_grid: Option<FieldStyle>,
	#[serde(deserialize_with = "constellation_style")]
	pub constellation: Option<FieldStyle>,
	pub loading: Option<LoadingStyle>,
}

fn dot_grid_style<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<FieldStyle>, D::Error> {
	Option::<FieldStylePatch>::deserialize(deserializer).map(|p| p.map(|p| p.apply(FieldStyle::dot_grid())))
}

fn constellation_style<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<FieldStyle>, D::Error> {
	Option::<FieldStylePatch>::deserialize(deserializer)
		.map(|p| p.map(|p| p.apply(FieldStyle::constellation())))
}

/// Load site data from a script element with id="site-data".
/// Expected format: JSON matching [`SiteData`]; every key is optional.
fn load_site_data() -> Option<SiteData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("site-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<SiteData>(&json_text) {
		Ok(data) => {
			info!("nextgen-fx: loaded site data, {} carousel items", data.carousel.len());
			Some(data)
		}
		Err(e) => {
			warn!("nextgen-fx: failed to parse site data: {}", e);
			None
		}
	}
}

/// Main application component.
/// Plays the loading screen once, then reveals the page sections.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let data = load_site_data().unwrap_or_default();
	let (loaded, set_loaded) = signal(false);
	let on_complete = Callback::new(move |()| set_loaded.set(true));

	let SiteData {
		carousel,
		carousel_style,
		dot_grid,
		constellation,
		loading,
	} = data;

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="NextGen SuperComputing" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Show when=move || !loaded.get()>
			<LoadingScreen on_complete=on_complete style=loading.clone().unwrap_or_default() />
		</Show>

		<main class="site" class:ready=move || loaded.get()>
			<section class="hero" style="position: relative; min-height: 100vh; overflow: hidden;">
				<InteractiveDotGrid animate=loaded style=dot_grid.unwrap_or_else(FieldStyle::dot_grid) />
				<div class="hero-content">
					<h1>"NextGen SuperComputing"</h1>
				</div>
			</section>
			<section class="about" style="position: relative; overflow: hidden;">
				<ParticleField style=constellation.unwrap_or_else(FieldStyle::constellation) />
				<div class="about-content">
					<h2>"About Us"</h2>
				</div>
			</section>
			<section class="cluster">
				<InfiniteCarousel items=carousel style=carousel_style.unwrap_or_default() />
			</section>
		</main>
	}
}
