// Re-export all public modules so they can be used from main.rs
pub mod logging;
pub mod config;
pub mod utils;
pub mod ui;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use tracing::{info, warn};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
    use web_sys::{Document, Event, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

    use crate::config::GameConfig;
    use crate::controller::{InputProcessor, MouseButton, Session};
    use crate::view::{FramePainter, GpuContext, IsoRenderer};
    use crate::{logging, ui};

    #[wasm_bindgen(start)]
    pub async fn start() -> Result<(), JsValue> {
        logging::init();
        let (window, document, canvas) = init_canvas()?;
        setup_app(&window, &document, &canvas).await
    }

    /// Build the session, GPU and listeners, then hand over to the animation frame loop
    async fn setup_app(window: &Window, document: &Document, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        let gpu = GpuContext::new(canvas, canvas.width(), canvas.height())
            .await
            .map_err(|e| js_error(format!("GPU init failed: {e:#}")))?;

        let query = window.location().search().unwrap_or_default();
        let config = GameConfig::from_query(&query);

        let session = Rc::new(RefCell::new(Session::new(config)));
        let egui_ctx = egui::Context::default();
        let egui_events: Rc<RefCell<Vec<egui::Event>>> = Rc::new(RefCell::new(Vec::new()));

        setup_input_listeners(document, canvas, session.clone(), egui_events.clone(), egui_ctx.clone())?;

        let performance = window.performance().ok_or_else(|| js_error("no performance on window"))?;
        let mut frame = WebFrame {
            window: window.clone(),
            canvas: canvas.clone(),
            painter: FramePainter::new(&gpu),
            gpu,
            renderer: IsoRenderer::new(config.block_scale),
            session,
            egui_ctx,
            egui_events,
            last_time: performance.now(),
            performance,
        };

        info!("browser host started");
        RcCellCallback::new(window.clone(), move || frame.tick()).start();
        Ok(())
    }

    /// Everything one animation frame touches
    struct WebFrame {
        window: Window,
        canvas: HtmlCanvasElement,
        gpu: GpuContext,
        painter: FramePainter,
        renderer: IsoRenderer,
        session: Rc<RefCell<Session>>,
        egui_ctx: egui::Context,
        egui_events: Rc<RefCell<Vec<egui::Event>>>,
        performance: web_sys::Performance,
        last_time: f64,
    }

    impl WebFrame {
        fn tick(&mut self) {
            let now = self.performance.now();
            let dt = Duration::from_secs_f64(((now - self.last_time) / 1000.0).max(0.0));
            self.last_time = now;

            self.handle_resize();
            self.session.borrow_mut().update(dt);

            let dpr = self.window.device_pixel_ratio() as f32;
            let (width, height) = self.gpu.size();
            let mut raw_input = egui::RawInput::default();
            raw_input.time = Some(now / 1000.0);
            raw_input.screen_rect = Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(width as f32 / dpr, height as f32 / dpr),
            ));
            raw_input.events.extend(self.egui_events.borrow_mut().drain(..));
            self.egui_ctx.set_pixels_per_point(dpr);

            let (output, intents) = {
                let session = self.session.borrow();
                ui::build_ui(&self.egui_ctx, raw_input, &session, &mut self.renderer)
            };
            {
                let mut session = self.session.borrow_mut();
                for intent in intents {
                    session.apply(intent);
                }
            }

            if let Err(e) = self.painter.paint(&self.gpu, &self.egui_ctx, output, dpr) {
                warn!("frame dropped: {e:?}");
            }
        }

        fn handle_resize(&mut self) {
            let dpr = self.window.device_pixel_ratio();
            let width = self.window.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(800.0);
            let height = self.window.inner_height().ok().and_then(|h| h.as_f64()).unwrap_or(600.0);
            let (width, height) = ((width * dpr) as u32, (height * dpr) as u32);

            if (width, height) != self.gpu.size() {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                self.gpu.resize(width, height);
            }
        }
    }

    /// Keyboard, mouse and wheel listeners. Pointer events also feed egui so the HUD
    /// stays clickable; clicks over the HUD never reach the world.
    fn setup_input_listeners(
        document: &Document,
        canvas: &HtmlCanvasElement,
        session: Rc<RefCell<Session>>,
        egui_events: Rc<RefCell<Vec<egui::Event>>>,
        egui_ctx: egui::Context,
    ) -> Result<(), JsValue> {
        let input_processor = InputProcessor::default();

        // Keyboard down
        {
            let session = session.clone();
            let input_processor = input_processor.clone();
            let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                if let Some(intent) = input_processor.intent_for_key(&e.key()) {
                    session.borrow_mut().apply(intent);
                    e.prevent_default();
                }
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
            keydown.forget();
        }

        // Mouse move
        {
            let egui_events = egui_events.clone();
            let mousemove = Closure::wrap(Box::new(move |e: MouseEvent| {
                let pos = egui::pos2(e.client_x() as f32, e.client_y() as f32);
                egui_events.borrow_mut().push(egui::Event::PointerMoved(pos));
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
            mousemove.forget();
        }

        // Mouse down - HUD first, then break/place
        {
            let session = session.clone();
            let egui_events = egui_events.clone();
            let input_processor = input_processor.clone();
            let mousedown = Closure::wrap(Box::new(move |e: MouseEvent| {
                let pos = egui::pos2(e.client_x() as f32, e.client_y() as f32);
                let Some(button) = mouse_button(e.button()) else {
                    return;
                };
                egui_events.borrow_mut().push(pointer_button(pos, button, true));

                if !egui_ctx.is_pointer_over_area() {
                    if let Some(intent) = input_processor.intent_for_click(button) {
                        session.borrow_mut().apply(intent);
                    }
                }
                e.prevent_default();
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
            mousedown.forget();
        }

        // Mouse up
        {
            let egui_events = egui_events.clone();
            let mouseup = Closure::wrap(Box::new(move |e: MouseEvent| {
                if let Some(button) = mouse_button(e.button()) {
                    let pos = egui::pos2(e.client_x() as f32, e.client_y() as f32);
                    egui_events.borrow_mut().push(pointer_button(pos, button, false));
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
            mouseup.forget();
        }

        // Context menu prevention
        {
            let contextmenu = Closure::wrap(Box::new(move |e: MouseEvent| {
                e.prevent_default();
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas.add_event_listener_with_callback("contextmenu", contextmenu.as_ref().unchecked_ref())?;
            contextmenu.forget();
        }

        // Mouse wheel - cycle the selected block
        {
            let wheel = Closure::wrap(Box::new(move |e: Event| {
                let js_val = JsValue::from(e.clone());
                let delta_y = js_sys::Reflect::get(&js_val, &JsValue::from_str("deltaY"))
                    .ok()
                    .and_then(|v| v.as_f64());
                if let Some(intent) = delta_y.and_then(|dy| input_processor.intent_for_wheel(dy as f32)) {
                    session.borrow_mut().apply(intent);
                    e.prevent_default();
                }
            }) as Box<dyn FnMut(Event)>);
            canvas.add_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref())?;
            wheel.forget();
        }

        Ok(())
    }

    fn mouse_button(code: i16) -> Option<MouseButton> {
        match code {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }

    fn pointer_button(pos: egui::Pos2, button: MouseButton, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: match button {
                MouseButton::Left => egui::PointerButton::Primary,
                MouseButton::Right => egui::PointerButton::Secondary,
                MouseButton::Middle => egui::PointerButton::Middle,
            },
            pressed,
            modifiers: egui::Modifiers::default(),
        }
    }

    fn init_canvas() -> Result<(Window, Document, HtmlCanvasElement), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no global `window`"))?;
        let document = window.document().ok_or_else(|| js_error("no document on window"))?;
        let body = document.body().ok_or_else(|| js_error("no body on document"))?;
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_error("failed to create canvas"))?;

        let dpr = window.device_pixel_ratio();
        let width = window.inner_width()?.as_f64().unwrap_or(800.0);
        let height = window.inner_height()?.as_f64().unwrap_or(600.0);
        canvas.set_width((width * dpr) as u32);
        canvas.set_height((height * dpr) as u32);
        canvas.style().set_property("width", "100vw")?;
        canvas.style().set_property("height", "100vh")?;
        canvas.style().set_property("display", "block")?;
        body.append_child(&canvas)?;
        Ok((window, document, canvas))
    }

    fn js_error<E: Into<String>>(msg: E) -> JsValue {
        JsValue::from_str(&msg.into())
    }

    /// Re-arms itself on every animation frame for the life of the page
    struct RcCellCallback {
        inner: Rc<RefCell<Box<dyn FnMut()>>>,
        window: Window,
    }

    impl RcCellCallback {
        fn new(window: Window, f: impl FnMut() + 'static) -> Self {
            Self {
                inner: Rc::new(RefCell::new(Box::new(f))),
                window,
            }
        }

        fn start(self) {
            let inner = self.inner.clone();
            let window = self.window.clone();

            let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
            let callback_clone = callback.clone();

            *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                inner.borrow_mut().as_mut()();

                if let Some(cb) = callback_clone.borrow().as_ref() {
                    if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        warn!("requestAnimationFrame failed: {e:?}");
                    }
                }
            }) as Box<dyn FnMut()>));

            if let Some(cb) = callback.borrow().as_ref() {
                if let Err(e) = self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    warn!("requestAnimationFrame failed: {e:?}");
                }
            }

            // the closure owns itself through the Rc cycle and lives as long as the page
            std::mem::forget(callback);
        }
    }

}
