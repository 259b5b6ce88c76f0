//! Mini Golf entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Element, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use mini_golf::Settings;
    use mini_golf::audio::AudioManager;
    use mini_golf::scene::{
        HudView, LoadError, LoadTicket, ModelHandle, ModelLoader, ObjectId, Placement,
        PresentationBridge, Scene, SceneObject, SceneRenderer,
    };
    use mini_golf::sim::{
        Camera, CourseBook, FixedStep, GameMode, GameSession, Intent, MenuAction, ShotInput,
        TickInput,
    };

    // Scene renderer living on the page (`window.golfScene`)
    #[wasm_bindgen(js_namespace = golfScene)]
    extern "C" {
        #[wasm_bindgen(js_name = attach)]
        fn scene_attach(id: u32, object: &str, placement: &str);
        #[wasm_bindgen(js_name = detach)]
        fn scene_detach(id: u32);
        #[wasm_bindgen(js_name = place)]
        fn scene_place(id: u32, placement: &str);
        #[wasm_bindgen(js_name = setCamera)]
        fn scene_set_camera(eye: &[f32], target: &[f32], fov_y: f32);
        #[wasm_bindgen(js_name = draw)]
        fn scene_draw();
        /// Resolves to a numeric model handle
        #[wasm_bindgen(js_name = loadModel)]
        fn scene_load_model(asset: &str) -> js_sys::Promise;
    }

    /// Forwards scene commands to the page as JSON
    struct JsSceneRenderer;

    fn to_json<T: serde::Serialize>(value: &T) -> Option<String> {
        match serde_json::to_string(value) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Failed to encode scene command: {}", e);
                None
            }
        }
    }

    impl SceneRenderer for JsSceneRenderer {
        fn attach(&mut self, id: ObjectId, object: &SceneObject, placement: Placement) {
            if let (Some(object), Some(placement)) = (to_json(object), to_json(&placement)) {
                scene_attach(id.0, &object, &placement);
            }
        }

        fn detach(&mut self, id: ObjectId) {
            scene_detach(id.0);
        }

        fn place(&mut self, id: ObjectId, placement: Placement) {
            if let Some(placement) = to_json(&placement) {
                scene_place(id.0, &placement);
            }
        }

        fn set_camera(&mut self, camera: &Camera) {
            scene_set_camera(&camera.eye.to_array(), &camera.target.to_array(), camera.fov_y);
        }

        fn draw(&mut self) {
            scene_draw();
        }
    }

    type Completed = Vec<(LoadTicket, Result<ModelHandle, LoadError>)>;

    /// Loads models through the page's promise-based loader
    #[derive(Default)]
    struct JsModelLoader {
        completed: Rc<RefCell<Completed>>,
    }

    impl ModelLoader for JsModelLoader {
        fn request(&mut self, asset: &str, ticket: LoadTicket) {
            let promise = scene_load_model(asset);
            let completed = self.completed.clone();
            let asset = asset.to_string();
            wasm_bindgen_futures::spawn_local(async move {
                let result = match JsFuture::from(promise).await {
                    Ok(value) => value
                        .as_f64()
                        .map(|h| ModelHandle(h as u32))
                        .ok_or_else(|| LoadError {
                            asset,
                            message: "loader returned a non-numeric handle".to_string(),
                        }),
                    Err(e) => Err(LoadError {
                        asset,
                        message: format!("{:?}", e),
                    }),
                };
                completed.borrow_mut().push((ticket, result));
            });
        }

        fn drain_completed(&mut self) -> Completed {
            self.completed.borrow_mut().drain(..).collect()
        }
    }

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        shot: ShotInput,
        stepper: FixedStep,
        input: TickInput,
        scene: Scene<JsSceneRenderer>,
        bridge: PresentationBridge,
        loader: JsModelLoader,
        audio: AudioManager,
        camera: Camera,
        canvas: HtmlCanvasElement,
        last_time: f64,
        /// Mode shown by the HUD last frame
        last_mode: Option<GameMode>,
    }

    impl Game {
        fn new(settings: Settings, courses: CourseBook, canvas: HtmlCanvasElement) -> Self {
            let session = GameSession::new(courses, settings.physics);
            let viewport = Vec2::new(canvas.client_width() as f32, canvas.client_height() as f32);
            let camera =
                Camera::follow(session.ball.pos, session.course.hole.center, viewport);
            Self {
                session,
                shot: ShotInput::new(settings.input),
                stepper: FixedStep::new(),
                input: TickInput::default(),
                scene: Scene::new(JsSceneRenderer),
                bridge: PresentationBridge::new(),
                loader: JsModelLoader::default(),
                audio: AudioManager::new(settings.master_volume, settings.sound),
                camera,
                canvas,
                last_time: 0.0,
                last_mode: None,
            }
        }

        /// Pointer position relative to the canvas
        fn canvas_point(&self, event: &PointerEvent) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new(
                event.client_x() as f32 - rect.left() as f32,
                event.client_y() as f32 - rect.top() as f32,
            )
        }

        fn update(&mut self, dt: f32) {
            self.shot.update(dt);
            self.stepper.advance(&mut self.session, &mut self.input, dt);

            let events = self.session.drain_events();
            self.audio.play_events(&events);

            // Hold the camera still while a drag is in progress
            if !self.shot.is_aiming() {
                let viewport = Vec2::new(
                    self.canvas.client_width() as f32,
                    self.canvas.client_height() as f32,
                );
                self.camera = Camera::follow(
                    self.session.ball.pos,
                    self.session.course.hole.center,
                    viewport,
                );
            }
        }

        fn render(&mut self) {
            self.bridge.sync(
                &mut self.scene,
                &self.session,
                &self.shot,
                &self.camera,
                &mut self.loader,
            );
        }

        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = HudView::from_session(&self.session, &self.shot);

            let show = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };
            let text = |id: &str, value: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(value));
                }
            };

            show("title-screen", hud.show_title());
            show("level-select", hud.show_level_select());
            show("scorecard", hud.show_scorecard());
            show("result-banner", hud.result.is_some());

            text("hole", &format!("{}/{}", hud.hole, hud.hole_count));
            text("par", &hud.par.to_string());
            text("strokes", &hud.strokes.to_string());
            text("total", &hud.total_score.to_string());
            text("result-label", hud.result.as_deref().unwrap_or(""));
            text("prompt", hud.prompt.as_deref().unwrap_or(""));

            if let Some(el) = document.get_element_by_id("power-fill") {
                let _ = el.set_attribute("style", &format!("width: {:.0}%", hud.power * 100.0));
            }

            // Level buttons only change while outside level select
            if self.last_mode != Some(hud.mode) && hud.show_level_select() {
                if let Some(list) = document.get_element_by_id("level-list") {
                    let buttons: String = hud
                        .levels
                        .iter()
                        .map(|b| {
                            format!(
                                "<button data-course=\"{}\"{}>{}. {}</button>",
                                b.index,
                                if b.enabled { "" } else { " disabled" },
                                b.index,
                                b.name
                            )
                        })
                        .collect();
                    list.set_inner_html(&buttons);
                }
            }
            self.last_mode = Some(hud.mode);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Mini Golf starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document available");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("Canvas element 'canvas' not found");
            return;
        };

        let settings = Settings::load();
        let courses = match CourseBook::builtin() {
            Ok(courses) => courses,
            Err(e) => {
                log::error!("Failed to load courses: {}", e);
                return;
            }
        };
        log::info!("Loaded {} courses", courses.len());

        let game = Rc::new(RefCell::new(Game::new(settings, courses, canvas.clone())));

        setup_pointer_handlers(&canvas, game.clone());
        setup_keyboard(game.clone());
        setup_menu_buttons(&document, game.clone());

        request_animation_frame(game);

        log::info!("Mini Golf running!");
    }

    fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
        target: &web_sys::EventTarget,
        name: &str,
        handler: impl FnMut(E) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Press on the ball starts aiming
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            listen(canvas, "pointerdown", move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let point = g.canvas_point(&event);
                let Game {
                    shot,
                    session,
                    camera,
                    ..
                } = &mut *g;
                if shot.pointer_down(session, camera, point) {
                    event.prevent_default();
                    let _ = canvas_clone.set_pointer_capture(event.pointer_id());
                }
            });
        }

        {
            let game = game.clone();
            listen(canvas, "pointermove", move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let point = g.canvas_point(&event);
                let Game {
                    shot,
                    session,
                    camera,
                    ..
                } = &mut *g;
                shot.pointer_move(session, camera, point);
            });
        }

        // Release fires the shot
        for name in ["pointerup", "pointercancel"] {
            let game = game.clone();
            let cancel = name == "pointercancel";
            listen(canvas, name, move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                if cancel {
                    g.shot.reset();
                    return;
                }
                let point = g.canvas_point(&event);
                let Game {
                    shot,
                    session,
                    camera,
                    input,
                    ..
                } = &mut *g;
                if let Some(release) = shot.pointer_up(session, camera, point) {
                    input.push(Intent::Shot(release));
                }
            });
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        listen(&window, "keydown", move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            g.audio.resume();
            match event.key().as_str() {
                "Escape" => g.shot.reset(),
                "m" | "M" => {
                    let muted = g.audio.toggle_muted();
                    log::info!("Sound {}", if muted { "muted" } else { "on" });
                }
                key => {
                    if let Some(action) = MenuAction::from_key(key) {
                        event.prevent_default();
                        g.input.push(Intent::Menu(action));
                    }
                }
            }
        });
    }

    fn setup_menu_buttons(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        let buttons = [
            ("play-btn", MenuAction::Play),
            ("levels-btn", MenuAction::OpenLevelSelect),
            ("back-btn", MenuAction::Back),
            ("continue-btn", MenuAction::Continue),
        ];
        for (id, action) in buttons {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                listen(&btn, "click", move |_event: web_sys::MouseEvent| {
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    g.input.push(Intent::Menu(action));
                });
            }
        }

        // Level buttons are rebuilt on entry; listen on their container
        if let Some(list) = document.get_element_by_id("level-list") {
            listen(&list, "click", move |event: web_sys::MouseEvent| {
                let course = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.get_attribute("data-course"))
                    .and_then(|v| v.parse::<u32>().ok());
                if let Some(index) = course {
                    game.borrow_mut()
                        .input
                        .push(Intent::Menu(MenuAction::SelectCourse(index)));
                }
            });
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                mini_golf::consts::SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Native build: play every course with the autoplayer and print a scorecard
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use mini_golf::Settings;
    use mini_golf::sim::{Autoplayer, CourseBook, GameSession};

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);
    log::info!("Mini Golf (native) autoplay with seed {}", seed);

    let settings = Settings::load();
    let courses = match CourseBook::builtin() {
        Ok(courses) => courses,
        Err(e) => {
            log::error!("Failed to load courses: {}", e);
            std::process::exit(1);
        }
    };
    let mut session = GameSession::new(courses, settings.physics);

    let results = Autoplayer::new(seed).play_run(&mut session);

    println!("{:<4} {:<16} {:>4} {:>8}  Result", "Hole", "Course", "Par", "Strokes");
    for result in &results {
        let name = session
            .courses()
            .get(result.course)
            .map(|c| c.name.as_str())
            .unwrap_or("?");
        println!(
            "{:<4} {:<16} {:>4} {:>8}  {}",
            result.course, name, result.par, result.strokes, result.label
        );
    }
    match results.last() {
        Some(last) if last.final_course => println!("Total: {}", last.total_score),
        _ => println!("Run abandoned after {} holes", results.len()),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
