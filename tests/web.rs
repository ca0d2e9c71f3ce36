#![cfg(target_arch = "wasm32")]

use hero_particles::particles::{
    ContainerSize, FieldConfig, HeadlineStyle, HeroOptions, HeroScene, SamplingConfig,
    TextRasterizer,
};
use hero_particles::web::{CanvasRasterizer, CanvasSurface, HeroCanvas};
use js_sys::Promise;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{window, Document, Event, HtmlCanvasElement, HtmlElement, MouseEvent, MouseEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    window().and_then(|w| w.document()).expect("document")
}

fn container_with_canvas(width: u32, height: u32) -> (HtmlElement, HtmlCanvasElement) {
    let document = document();
    let container = document
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    container
        .style()
        .set_property("width", &format!("{width}px"))
        .unwrap();
    container
        .style()
        .set_property("height", &format!("{height}px"))
        .unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    container.append_child(&canvas).unwrap();
    document.body().unwrap().append_child(&container).unwrap();
    (container, canvas)
}

async fn next_frame() {
    let promise = Promise::new(&mut |resolve, _reject| {
        window()
            .unwrap()
            .request_animation_frame(&resolve)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

async fn frames(count: u32) {
    for _ in 0..count {
        next_frame().await;
    }
}

#[wasm_bindgen_test]
fn canvas_rasterizer_produces_ink() {
    let mut rasterizer = CanvasRasterizer::new(&document()).unwrap();
    let config = FieldConfig::derive(
        400.0,
        200.0,
        1.0,
        &HeadlineStyle::default(),
        &SamplingConfig::default(),
    );
    let mask = rasterizer
        .rasterize(&config, &HeadlineStyle::default())
        .unwrap();
    assert_eq!((mask.width(), mask.height()), (400, 200));
    assert!(mask.pixels().iter().any(|p| p.a > 128 && p.r < 200));
}

#[wasm_bindgen_test]
fn canvas_rasterizer_defers_zero_size() {
    let mut rasterizer = CanvasRasterizer::new(&document()).unwrap();
    let config = FieldConfig::derive(
        0.0,
        200.0,
        1.0,
        &HeadlineStyle::default(),
        &SamplingConfig::default(),
    );
    let err = rasterizer
        .rasterize(&config, &HeadlineStyle::default())
        .unwrap_err();
    assert!(err.is_transient());
}

#[wasm_bindgen_test]
fn scene_draws_on_a_canvas_surface() {
    let (_container, canvas) = container_with_canvas(300, 150);
    let mut surface = CanvasSurface::new(canvas.clone()).unwrap();
    let mut rasterizer = CanvasRasterizer::new(&document()).unwrap();
    let mut scene = HeroScene::new(HeroOptions::default(), 5).unwrap();
    scene.mark_fonts_ready();
    let container = ContainerSize {
        css_width: 300.0,
        css_height: 150.0,
        dpr: 1.0,
    };
    let config = scene
        .rebuild_if_needed(container, &mut rasterizer)
        .unwrap()
        .unwrap();
    surface.fit(&config, 300.0, 150.0).unwrap();
    scene.frame(&mut surface);

    assert!(!scene.field().is_empty());
    assert_eq!((canvas.width(), canvas.height()), (300, 150));
}

#[wasm_bindgen_test]
fn hero_canvas_mounts_and_tears_down() {
    let (container, canvas) = container_with_canvas(320, 160);
    let hero = HeroCanvas::new(container, canvas, JsValue::UNDEFINED).unwrap();
    assert!(hero.is_active());
    hero.rebuild();
    hero.destroy();
    assert!(!hero.is_active());
    assert_eq!(hero.particle_count(), 0);
    hero.destroy();
}

#[wasm_bindgen_test]
fn hero_canvas_rejects_malformed_options() {
    let (container, canvas) = container_with_canvas(320, 160);
    let options = JsValue::from_str("not an options object");
    assert!(HeroCanvas::new(container, canvas, options).is_err());
}

#[wasm_bindgen_test]
fn hero_canvas_rejects_unstable_physics() {
    let (container, canvas) = container_with_canvas(320, 160);
    let options = js_sys::JSON::parse(r#"{ "physics": { "friction": 1.5 } }"#).unwrap();
    let err = HeroCanvas::new(container, canvas, options).err().unwrap();
    let message = err.dyn_into::<js_sys::Error>().unwrap().message();
    assert!(String::from(message).contains("physics.friction"));
}

#[wasm_bindgen_test]
async fn mouse_events_push_particles_and_leave_lets_them_settle() {
    let (container, canvas) = container_with_canvas(480, 240);
    let hero = HeroCanvas::new(container, canvas.clone(), JsValue::UNDEFINED).unwrap();

    for _ in 0..300 {
        if hero.particle_count() > 0 {
            break;
        }
        next_frame().await;
    }
    assert!(hero.particle_count() > 0, "field was never built");
    assert_eq!(hero.mean_displacement(), 0.0);

    let rect = canvas.get_bounding_client_rect();
    let init = MouseEventInit::new();
    init.set_client_x((rect.left() + rect.width() / 2.0) as i32);
    init.set_client_y((rect.top() + rect.height() / 2.0) as i32);
    let moved = MouseEvent::new_with_mouse_event_init_dict("mousemove", &init).unwrap();
    canvas.dispatch_event(&moved).unwrap();
    frames(5).await;
    let disturbed = hero.mean_displacement();
    assert!(disturbed > 0.1, "pointer did not disturb the field: {disturbed}");

    canvas
        .dispatch_event(&Event::new("mouseleave").unwrap())
        .unwrap();
    frames(400).await;
    let settled = hero.mean_displacement();
    assert!(settled < 0.05, "field did not settle after leave: {settled}");

    hero.destroy();
}
