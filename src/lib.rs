// Re-export all public modules so they can be used from main.rs
pub mod logging;
pub mod config;
pub mod utils;
pub mod ui;
pub mod app;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

pub use app::DemoApp;
pub use config::DemoConfig;

#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{Event, HtmlCanvasElement, KeyboardEvent, PointerEvent, Window};

#[cfg(target_arch = "wasm32")]
use controller::InputEvent;
#[cfg(target_arch = "wasm32")]
use model::TouchpadSkin;
#[cfg(target_arch = "wasm32")]
use view::GpuContext;

#[cfg(target_arch = "wasm32")]
const CANVAS_WIDTH: u32 = 800;
#[cfg(target_arch = "wasm32")]
const CANVAS_HEIGHT: u32 = 600;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    logging::init();
    let (window, canvas) = init_canvas()?;
    setup_app(&window, &canvas).await
}

/// Main application setup for WASM
#[cfg(target_arch = "wasm32")]
async fn setup_app(window: &Window, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let config = DemoConfig::default();

    let gpu = GpuContext::new(canvas, canvas.width(), canvas.height())
        .await
        .map_err(|e| js_error(format!("GPU init failed: {e}")))?;
    let skin = TouchpadSkin::embedded().map_err(|e| js_error(format!("asset load failed: {e}")))?;

    let app = Rc::new(RefCell::new(DemoApp::init(gpu, &config, &skin)));

    setup_input_listeners(window, canvas, app.clone())?;

    let performance = window.performance().ok_or_else(|| js_error("no performance on window"))?;
    let mut last_time = performance.now();

    // Continuous redraw using requestAnimationFrame
    let window_for_input = window.clone();
    let f = RcCellCallback::new(window.clone(), move || {
        let now = performance.now();
        let dt = ((now - last_time) / 1000.0) as f32;
        last_time = now;

        let mut app = app.borrow_mut();
        let (width, height) = app.size();
        let raw_input = ui::canvas_input(width, height, window_for_input.device_pixel_ratio() as f32);

        match app.tick(dt, raw_input) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => app.gpu.reconfigure(),
            Err(e) => tracing::warn!("frame dropped: {:?}", e),
        }
    });
    f.start()
}

/// Canvas-relative pointer position in canvas pixels
#[cfg(target_arch = "wasm32")]
fn pointer_position(canvas: &HtmlCanvasElement, e: &PointerEvent) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    let sx = if rect.width() > 0.0 { canvas.width() as f64 / rect.width() } else { 1.0 };
    let sy = if rect.height() > 0.0 { canvas.height() as f64 / rect.height() } else { 1.0 };
    (
        ((e.client_x() as f64 - rect.left()) * sx) as f32,
        ((e.client_y() as f64 - rect.top()) * sy) as f32,
    )
}

#[cfg(target_arch = "wasm32")]
fn add_pointer_listener(
    canvas: &HtmlCanvasElement,
    event_name: &str,
    app: Rc<RefCell<DemoApp>>,
    to_event: fn(u64, f32, f32) -> InputEvent,
) -> Result<(), JsValue> {
    let canvas_for_pos = canvas.clone();
    let listener = Closure::wrap(Box::new(move |e: PointerEvent| {
        let (x, y) = pointer_position(&canvas_for_pos, &e);
        let id = e.pointer_id() as u64;
        if e.type_() == "pointerdown" {
            if let Err(err) = canvas_for_pos.set_pointer_capture(e.pointer_id()) {
                tracing::debug!("pointer capture failed for {}: {:?}", id, err);
            }
        }
        if app.borrow_mut().handle_event(&to_event(id, x, y)) {
            e.prevent_default();
        }
    }) as Box<dyn FnMut(PointerEvent)>);
    canvas.add_event_listener_with_callback(event_name, listener.as_ref().unchecked_ref())?;
    listener.forget();
    Ok(())
}

/// Setup all input event listeners
#[cfg(target_arch = "wasm32")]
fn setup_input_listeners(
    window: &Window,
    canvas: &HtmlCanvasElement,
    app: Rc<RefCell<DemoApp>>,
) -> Result<(), JsValue> {
    add_pointer_listener(canvas, "pointerdown", app.clone(), |id, x, y| InputEvent::PointerDown { id, x, y })?;
    add_pointer_listener(canvas, "pointermove", app.clone(), |id, x, y| InputEvent::PointerMove { id, x, y })?;
    add_pointer_listener(canvas, "pointerup", app.clone(), |id, x, y| InputEvent::PointerUp { id, x, y })?;
    add_pointer_listener(canvas, "pointercancel", app.clone(), |id, x, y| InputEvent::PointerUp { id, x, y })?;

    // Focus loss releases the pad
    {
        let app = app.clone();
        let blur = Closure::wrap(Box::new(move |_e: Event| {
            app.borrow_mut().handle_event(&InputEvent::FocusLost);
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
        blur.forget();
    }

    // Debug overlay toggle
    {
        let app = app.clone();
        let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            if e.key() == "F3" {
                app.borrow_mut().toggle_debug();
                e.prevent_default();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);
        window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }

    // Canvas follows the window size
    {
        let window_for_size = window.clone();
        let canvas = canvas.clone();
        let resize = Closure::wrap(Box::new(move |_e: Event| {
            let css_width = window_for_size.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let css_height = window_for_size.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let (width, height) = fit_canvas(&window_for_size, &canvas, css_width, css_height);
            app.borrow_mut().resize(width, height);
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
        resize.forget();
    }

    Ok(())
}

/// Size the canvas to `css_width` x `css_height` CSS pixels with a backing store
/// scaled by the device pixel ratio. Returns the backing store size.
#[cfg(target_arch = "wasm32")]
fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement, css_width: f64, css_height: f64) -> (u32, u32) {
    let dpr = window.device_pixel_ratio().max(1.0);
    let width = (css_width * dpr).round() as u32;
    let height = (css_height * dpr).round() as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    let style = canvas.style();
    if let Err(e) = style
        .set_property("width", &format!("{css_width}px"))
        .and_then(|_| style.set_property("height", &format!("{css_height}px")))
    {
        tracing::debug!("could not size canvas element: {:?}", e);
    }
    (width, height)
}

#[cfg(target_arch = "wasm32")]
fn init_canvas() -> Result<(Window, HtmlCanvasElement), JsValue> {
    let window = web_sys::window().ok_or_else(|| js_error("no global `window`"))?;
    let document = window.document().ok_or_else(|| js_error("no document on window"))?;
    let body = document.body().ok_or_else(|| js_error("no body on document"))?;
    let canvas_el = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| js_error("failed to create canvas"))?;
    fit_canvas(&window, &canvas_el, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
    body.append_child(&canvas_el)?;
    Ok((window, canvas_el))
}

#[cfg(target_arch = "wasm32")]
fn js_error<E: Into<String>>(msg: E) -> JsValue {
    JsValue::from_str(&msg.into())
}

#[cfg(target_arch = "wasm32")]
struct RcCellCallback {
    inner: Rc<RefCell<Box<dyn FnMut()>>>,
    window: Window,
}

#[cfg(target_arch = "wasm32")]
impl RcCellCallback {
    fn new(window: Window, f: impl FnMut() + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Box::new(f))),
            window,
        }
    }

    fn start(self) -> Result<(), JsValue> {
        let inner = self.inner.clone();
        let window = self.window.clone();

        let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
        let callback_clone = callback.clone();

        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            inner.borrow_mut().as_mut()();

            // Recursively schedule next frame
            if let Some(cb) = callback_clone.borrow().as_ref() {
                if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    tracing::error!("requestAnimationFrame failed: {:?}", e);
                }
            }
        }) as Box<dyn FnMut()>));

        if let Some(cb) = callback.borrow().as_ref() {
            self.window.request_animation_frame(cb.as_ref().unchecked_ref())?;
        }

        // Leak the closure to keep it alive
        std::mem::forget(callback);
        Ok(())
    }
}
