//! Story graph viewer: a character/event network explored by multi-hop
//! neighborhood, iteration and connection count.
//!
//! The engine lives in [`components::force_graph`] and has no DOM
//! dependencies; [`App`] mounts the demo viewer on top of it.

use leptos::prelude::*;
use leptos_meta::{Html, Meta, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;
use log::{Level, info};

pub mod components;
mod pages;

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Route `log` output to the browser console and report panics there.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("story graph viewer starting");
}

/// Root view: the story viewer at `/`, a not-found page elsewhere.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:data-theme="dark" />
		<Title formatter=|text: String| format!("{text} | Story Graph") />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<main>
				<Routes fallback=NotFound>
					<Route path=path!("/") view=Home />
				</Routes>
			</main>
		</Router>
	}
}
