#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use gloo_events::EventListener;
use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, HtmlCanvasElement};

use crate::assets::fetch_image;
use crate::{DemoConfig, Renderer, TextureCycle};

#[wasm_bindgen(start)]
pub fn bootstrap() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger not installed: {err}")));
    }
}

/// Handle returned to JavaScript. Dropping it detaches the click listener.
#[wasm_bindgen]
pub struct QuadApp {
    state: Rc<RefCell<WebState>>,
    _click: EventListener,
}

#[wasm_bindgen]
impl QuadApp {
    /// Name of the texture currently on screen.
    pub fn current_texture(&self) -> Option<String> {
        self.state
            .borrow()
            .renderer
            .active_texture()
            .map(str::to_string)
    }
}

/// Renders the first texture into the configured canvas and starts
/// listening for clicks.
#[wasm_bindgen]
pub async fn start(config_json: Option<String>) -> Result<QuadApp, JsValue> {
    let config = match config_json {
        Some(json) => DemoConfig::from_json(&json).map_err(to_js)?,
        None => DemoConfig::default(),
    };
    config.validate().map_err(to_js)?;
    let cycle = TextureCycle::new(config.textures.iter().cloned()).map_err(to_js)?;

    let window = window().ok_or_else(|| JsValue::from_str("window not available"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("document not available"))?;
    let canvas = document
        .get_element_by_id(&config.canvas_id)
        .ok_or_else(|| JsValue::from_str("canvas element not found"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("element is not a canvas"))?;

    let mut renderer = Renderer::for_canvas(canvas.clone(), &config)
        .await
        .map_err(to_js)?;
    let (width, height) = renderer.size();
    info!("rendering into #{} ({width}x{height})", config.canvas_id);

    let first = cycle.current().to_string();
    let image = fetch_image(&config, &first)
        .await
        .map_err(|err| JsValue::from_str(&format!("failed to load {first}: {err}")))?;
    renderer.set_texture(&image);

    let state = Rc::new(RefCell::new(WebState {
        config,
        cycle,
        renderer,
    }));
    state.borrow_mut().draw();

    let click_state = Rc::clone(&state);
    let click = EventListener::new(&canvas, "click", move |_event| {
        on_click(&click_state);
    });

    Ok(QuadApp {
        state,
        _click: click,
    })
}

struct WebState {
    config: DemoConfig,
    cycle: TextureCycle,
    renderer: Renderer,
}

impl WebState {
    fn draw(&mut self) {
        if let Err(err) = self.renderer.render() {
            if let Err(err) = self.renderer.handle_surface_error(err) {
                error!("render failed: {err:#}");
            }
        }
    }
}

fn on_click(state: &Rc<RefCell<WebState>>) {
    let pending = {
        let mut app = state.borrow_mut();
        let name = app.cycle.advance().to_string();
        if app.renderer.activate(&name) {
            app.draw();
            None
        } else {
            Some((name, app.cycle.generation(), app.config.clone()))
        }
    };

    let Some((name, generation, config)) = pending else {
        return;
    };
    let state = Rc::clone(state);
    spawn_local(async move {
        let image = match fetch_image(&config, &name).await {
            Ok(image) => image,
            Err(err) => {
                error!("failed to load texture {name}: {err}");
                return;
            }
        };
        let mut app = state.borrow_mut();
        if !app.cycle.is_current(generation) {
            debug!("discarding {name}: superseded by a later click");
            return;
        }
        app.renderer.set_texture(&image);
        app.draw();
    });
}

fn to_js(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}
