//! Browser bindings: a `<canvas>` surface, a canvas text rasterizer and the
//! mounted [`HeroCanvas`] with its frame loop and DOM listeners.

pub mod canvas;
pub mod hero;

pub use canvas::{CanvasRasterizer, CanvasSurface};
pub use hero::HeroCanvas;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
