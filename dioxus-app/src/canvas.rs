use dioxus::prelude::*;
#[cfg(target_arch = "wasm32")]
use dioxus::web::WebEventExt;
#[cfg(target_arch = "wasm32")]
use portfolio_core::rain::{FADE_ALPHA, FONT_SIZE};
#[cfg(target_arch = "wasm32")]
use portfolio_core::{Rain, Trail};
#[cfg(target_arch = "wasm32")]
use std::cell::{Cell, RefCell};
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

#[cfg(target_arch = "wasm32")]
use crate::clock;

/// A `requestAnimationFrame` loop that keeps running while its callback
/// returns `true`. Dropping the handle does not stop it; call [`stop`].
///
/// [`stop`]: AnimationLoop::stop
#[cfg(target_arch = "wasm32")]
pub struct AnimationLoop {
    holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    frame_id: Rc<Cell<Option<i32>>>,
}

#[cfg(target_arch = "wasm32")]
impl AnimationLoop {
    pub fn start(mut on_frame: impl FnMut(f64) -> bool + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let frame_id = Rc::new(Cell::new(None));

        let holder_for_cb = Rc::clone(&holder);
        let frame_id_for_cb = Rc::clone(&frame_id);
        let callback = Closure::wrap(Box::new(move |timestamp: f64| {
            frame_id_for_cb.set(None);
            if !on_frame(timestamp) {
                return;
            }
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(callback) = holder_for_cb.borrow().as_ref() {
                if let Ok(id) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    frame_id_for_cb.set(Some(id));
                }
            }
        }) as Box<dyn FnMut(f64)>);

        let id = window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()?;
        frame_id.set(Some(id));
        *holder.borrow_mut() = Some(callback);
        Some(Self { holder, frame_id })
    }

    /// Cancels the pending frame and releases the callback.
    pub fn stop(&self) {
        if let Some(id) = self.frame_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        self.holder.borrow_mut().take();
    }
}

#[cfg(target_arch = "wasm32")]
struct WindowListener {
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

#[cfg(target_arch = "wasm32")]
impl WindowListener {
    fn attach(event: &'static str, handler: impl FnMut(web_sys::Event) + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        window
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .ok()?;
        Some(Self { event, closure })
    }

    fn detach(&self) {
        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
        }
    }
}

#[cfg(target_arch = "wasm32")]
struct CanvasHandles {
    animation: AnimationLoop,
    listener: Option<WindowListener>,
    on_stop: Box<dyn Fn()>,
}

#[cfg(target_arch = "wasm32")]
impl CanvasHandles {
    fn release(&self) {
        (self.on_stop)();
        self.animation.stop();
        if let Some(listener) = self.listener.as_ref() {
            listener.detach();
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn viewport() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (0.0, 0.0);
    };
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width, height)
}

#[cfg(target_arch = "wasm32")]
fn context_2d(canvas: &web_sys::HtmlCanvasElement) -> Option<web_sys::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<web_sys::CanvasRenderingContext2d>().ok())
}

#[cfg(target_arch = "wasm32")]
fn fit_canvas(canvas: &web_sys::HtmlCanvasElement) -> (f64, f64) {
    let (width, height) = viewport();
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    (width, height)
}

#[cfg(target_arch = "wasm32")]
fn start_rain(canvas: web_sys::HtmlCanvasElement) -> Option<CanvasHandles> {
    let ctx = context_2d(&canvas)?;
    let (width, height) = fit_canvas(&canvas);
    let rain = Rc::new(RefCell::new(Rain::new(width, height, clock::seed())));

    let rain_for_resize = Rc::clone(&rain);
    let canvas_for_resize = canvas.clone();
    let listener = WindowListener::attach("resize", move |_event| {
        let (width, height) = fit_canvas(&canvas_for_resize);
        rain_for_resize.borrow_mut().resize(width, height);
    });

    let rain_for_frame = Rc::clone(&rain);
    let animation = AnimationLoop::start(move |timestamp| {
        let mut rain = rain_for_frame.borrow_mut();
        if rain.is_stopped() {
            return false;
        }
        let Some(glyphs) = rain.frame(timestamp) else {
            return true;
        };
        ctx.set_fill_style_str(&format!("rgba(0, 0, 0, {FADE_ALPHA})"));
        ctx.fill_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        ctx.set_font(&format!("{FONT_SIZE}px monospace"));
        let mut buffer = [0u8; 4];
        for glyph in glyphs {
            ctx.set_fill_style_str(&glyph.tone.css());
            let _ = ctx.fill_text(glyph.ch.encode_utf8(&mut buffer), glyph.x, glyph.y);
        }
        true
    })?;

    tracing::debug!("canvas: rain started");
    Some(CanvasHandles {
        animation,
        listener,
        on_stop: Box::new(move || rain.borrow_mut().stop()),
    })
}

#[cfg(target_arch = "wasm32")]
fn start_trail(canvas: web_sys::HtmlCanvasElement) -> Option<CanvasHandles> {
    let ctx = context_2d(&canvas)?;
    fit_canvas(&canvas);
    let trail = Rc::new(RefCell::new(Trail::new(clock::seed())));

    let trail_for_move = Rc::clone(&trail);
    let canvas_for_move = canvas.clone();
    let listener = WindowListener::attach("mousemove", move |event| {
        let Ok(event) = event.dyn_into::<web_sys::MouseEvent>() else {
            return;
        };
        let (width, height) = viewport();
        if canvas_for_move.width() != width as u32 || canvas_for_move.height() != height as u32 {
            fit_canvas(&canvas_for_move);
        }
        trail_for_move
            .borrow_mut()
            .move_pointer(event.client_x() as f64, event.client_y() as f64);
    });

    let trail_for_frame = Rc::clone(&trail);
    let animation = AnimationLoop::start(move |timestamp| {
        let mut trail = trail_for_frame.borrow_mut();
        if !trail.frame(timestamp) {
            return false;
        }
        ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        let mut buffer = [0u8; 4];
        for particle in trail.particles() {
            ctx.set_global_alpha(particle.alpha());
            ctx.set_font(&format!("{}px monospace", particle.font_size()));
            ctx.set_shadow_blur(particle.glow());
            ctx.set_shadow_color("#4ade80");
            ctx.set_fill_style_str("#4ade80");
            let _ = ctx.fill_text(particle.ch.encode_utf8(&mut buffer), particle.x, particle.y);
        }
        ctx.set_global_alpha(1.0);
        ctx.set_shadow_blur(0.0);
        true
    })?;

    tracing::debug!("canvas: trail started");
    Some(CanvasHandles {
        animation,
        listener,
        on_stop: Box::new(move || trail.borrow_mut().stop()),
    })
}

#[component]
pub fn MatrixRain() -> Element {
    #[cfg(target_arch = "wasm32")]
    let mut canvas_handle = use_signal(|| None::<web_sys::HtmlCanvasElement>);
    #[cfg(target_arch = "wasm32")]
    let mut handles = use_signal(|| None::<CanvasHandles>);

    #[cfg(target_arch = "wasm32")]
    use_effect(move || {
        let Some(canvas) = canvas_handle.read().as_ref().cloned() else {
            return;
        };
        if handles.peek().is_some() {
            return;
        }
        handles.set(start_rain(canvas));
    });

    #[cfg(target_arch = "wasm32")]
    use_drop(move || {
        if let Some(handles) = handles.peek().as_ref() {
            handles.release();
        }
    });

    rsx! {
        canvas {
            class: "matrix-rain",
            aria_hidden: "true",
            onmounted: move |_event| {
                #[cfg(target_arch = "wasm32")]
                {
                    let element = _event.data.as_ref().as_web_event();
                    if let Ok(node) = element.dyn_into::<web_sys::HtmlCanvasElement>() {
                        canvas_handle.set(Some(node));
                    }
                }
            },
        }
    }
}

#[component]
pub fn MouseTrail() -> Element {
    #[cfg(target_arch = "wasm32")]
    let mut canvas_handle = use_signal(|| None::<web_sys::HtmlCanvasElement>);
    #[cfg(target_arch = "wasm32")]
    let mut handles = use_signal(|| None::<CanvasHandles>);

    #[cfg(target_arch = "wasm32")]
    use_effect(move || {
        let Some(canvas) = canvas_handle.read().as_ref().cloned() else {
            return;
        };
        if handles.peek().is_some() {
            return;
        }
        handles.set(start_trail(canvas));
    });

    #[cfg(target_arch = "wasm32")]
    use_drop(move || {
        if let Some(handles) = handles.peek().as_ref() {
            handles.release();
        }
    });

    rsx! {
        canvas {
            class: "mouse-trail",
            aria_hidden: "true",
            onmounted: move |_event| {
                #[cfg(target_arch = "wasm32")]
                {
                    let element = _event.data.as_ref().as_web_event();
                    if let Ok(node) = element.dyn_into::<web_sys::HtmlCanvasElement>() {
                        canvas_handle.set(Some(node));
                    }
                }
            },
        }
    }
}
