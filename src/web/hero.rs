use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Event, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent};

use super::canvas::{CanvasRasterizer, CanvasSurface};
use crate::particles::{CanvasRect, ContainerSize, FieldError, HeroOptions, HeroScene};

struct Mount {
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
    rasterizer: CanvasRasterizer,
    scene: HeroScene,
}

impl Mount {
    fn container_size(&self) -> ContainerSize {
        let rect = self.container.get_bounding_client_rect();
        ContainerSize {
            css_width: rect.width(),
            css_height: rect.height(),
            dpr: device_pixel_ratio(),
        }
    }

    fn canvas_rect(&self) -> CanvasRect {
        let rect = self.canvas.get_bounding_client_rect();
        CanvasRect {
            left: rect.left(),
            top: rect.top(),
        }
    }

    fn tick(&mut self) {
        // Measuring the container forces layout; only do it when a build will run.
        if self.scene.wants_rebuild() {
            let container = self.container_size();
            match self.scene.rebuild_if_needed(container, &mut self.rasterizer) {
                Ok(Some(config)) => {
                    let fitted =
                        self.surface.fit(&config, container.css_width, container.css_height);
                    if let Err(err) = fitted {
                        gloo::console::warn!("hero: canvas resize failed", err.to_string());
                    }
                }
                Ok(None) => {}
                Err(err) if err.is_transient() => {}
                Err(err) => gloo::console::warn!("hero: field rebuild failed", err.to_string()),
            }
        }
        self.scene.frame(&mut self.surface);
    }
}

fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|window| window.device_pixel_ratio())
        .unwrap_or(1.0)
}

#[derive(Default)]
struct HeroRuntime {
    mount: RefCell<Option<Mount>>,
    frame: RefCell<Option<AnimationFrame>>,
    listeners: RefCell<Vec<EventListener>>,
    torn_down: Cell<bool>,
}

impl HeroRuntime {
    fn with_mount(&self, f: impl FnOnce(&mut Mount)) {
        // Skip rather than panic if a handler fires while a frame holds the mount.
        if let Ok(mut mount) = self.mount.try_borrow_mut() {
            if let Some(mount) = mount.as_mut() {
                f(mount);
            }
        }
    }

    fn schedule(self: &Rc<Self>) {
        if self.torn_down.get() {
            return;
        }
        let runtime = Rc::downgrade(self);
        let handle = request_animation_frame(move |_timestamp| {
            let Some(runtime) = runtime.upgrade() else {
                return;
            };
            let _fired = runtime.frame.borrow_mut().take();
            runtime.with_mount(Mount::tick);
            runtime.schedule();
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn install_listeners(self: &Rc<Self>, canvas: &HtmlCanvasElement) {
        let mut listeners = Vec::new();

        if let Some(window) = web_sys::window() {
            let runtime = Rc::downgrade(self);
            listeners.push(EventListener::new(&window, "resize", move |_event: &Event| {
                with_runtime(&runtime, |mount| mount.scene.request_rebuild());
            }));
        }

        let runtime = Rc::downgrade(self);
        listeners.push(EventListener::new(canvas, "mousemove", move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let (x, y) = (event.client_x() as f64, event.client_y() as f64);
            with_runtime(&runtime, |mount| {
                let rect = mount.canvas_rect();
                mount.scene.pointer_moved(x, y, rect);
            });
        }));

        let runtime = Rc::downgrade(self);
        listeners.push(EventListener::new(canvas, "touchmove", move |event: &Event| {
            let Some(touch) = event
                .dyn_ref::<TouchEvent>()
                .and_then(|event| event.touches().get(0))
            else {
                return;
            };
            let (x, y) = (touch.client_x() as f64, touch.client_y() as f64);
            with_runtime(&runtime, |mount| {
                let rect = mount.canvas_rect();
                mount.scene.pointer_moved(x, y, rect);
            });
        }));

        for leave in ["mouseleave", "touchend", "touchcancel"] {
            let runtime = Rc::downgrade(self);
            listeners.push(EventListener::new(canvas, leave, move |_event: &Event| {
                with_runtime(&runtime, |mount| mount.scene.pointer_left());
            }));
        }

        *self.listeners.borrow_mut() = listeners;
    }

    fn wait_for_fonts(self: &Rc<Self>) {
        let runtime = Rc::downgrade(self);
        spawn_local(async move {
            let ready = web_sys::window()
                .and_then(|window| window.document())
                .map(|document| document.fonts().ready());
            if let Some(Ok(promise)) = ready {
                if let Err(err) = JsFuture::from(promise).await {
                    gloo::console::warn!("hero: font loading failed, drawing with fallback", err);
                }
            }
            with_runtime(&runtime, |mount| mount.scene.mark_fonts_ready());
        });
    }

    /// Cancels the frame loop, detaches every listener and releases the canvas.
    fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        self.frame.borrow_mut().take();
        self.listeners.borrow_mut().clear();
        self.mount.borrow_mut().take();
    }
}

fn with_runtime(runtime: &Weak<HeroRuntime>, f: impl FnOnce(&mut Mount)) {
    if let Some(runtime) = runtime.upgrade() {
        runtime.with_mount(f);
    }
}

/// Particle headline bound to a container element and its canvas.
#[wasm_bindgen]
pub struct HeroCanvas {
    runtime: Rc<HeroRuntime>,
}

#[wasm_bindgen]
impl HeroCanvas {
    /// Mounts the hero. `options` is an optional object with `physics`,
    /// `sampling` and `headline` sections; missing fields keep their defaults.
    ///
    /// Options that would destabilize the field are rejected with an error.
    /// Without a 2D context the hero stays blank instead of failing.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        canvas: HtmlCanvasElement,
        options: JsValue,
    ) -> Result<HeroCanvas, JsValue> {
        let options: HeroOptions = if options.is_undefined() || options.is_null() {
            HeroOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        options
            .validate()
            .map_err(|err| JsValue::from(js_sys::Error::new(&err.to_string())))?;

        let runtime = Rc::new(HeroRuntime::default());
        match mount(container, canvas.clone(), options) {
            Ok(mounted) => {
                *runtime.mount.borrow_mut() = Some(mounted);
                runtime.install_listeners(&canvas);
                runtime.wait_for_fonts();
                runtime.schedule();
            }
            Err(err) => {
                gloo::console::warn!("hero: not mounted", err.to_string());
                runtime.torn_down.set(true);
            }
        }

        Ok(HeroCanvas { runtime })
    }

    /// Whether the frame loop is running.
    pub fn is_active(&self) -> bool {
        !self.runtime.torn_down.get()
    }

    pub fn particle_count(&self) -> usize {
        self.runtime
            .mount
            .try_borrow()
            .ok()
            .and_then(|mount| mount.as_ref().map(|mount| mount.scene.field().len()))
            .unwrap_or(0)
    }

    /// Mean distance of the particles from their origins, in device pixels.
    pub fn mean_displacement(&self) -> f32 {
        self.runtime
            .mount
            .try_borrow()
            .ok()
            .and_then(|mount| {
                mount
                    .as_ref()
                    .map(|mount| mount.scene.field().mean_displacement())
            })
            .unwrap_or(0.0)
    }

    /// Requests a rebuild on the next frame, as a window resize would.
    pub fn rebuild(&self) {
        self.runtime.with_mount(|mount| mount.scene.request_rebuild());
    }

    pub fn destroy(&self) {
        self.runtime.teardown();
    }
}

impl Drop for HeroCanvas {
    fn drop(&mut self) {
        self.runtime.teardown();
    }
}

fn mount(
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    options: HeroOptions,
) -> Result<Mount, FieldError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(FieldError::ContextUnavailable)?;
    let surface = CanvasSurface::new(canvas.clone())?;
    let rasterizer = CanvasRasterizer::new(&document)?;
    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;

    Ok(Mount {
        container,
        canvas,
        surface,
        rasterizer,
        scene: HeroScene::new(options, seed)?,
    })
}
