//! Headless room client.
//!
//! Connects to a running relay, joins a room, draws one rectangle, and
//! then keeps pumping: every inbound create or erase rebuilds the display
//! list and prints a one-line summary.
//!
//! Start the relay first (`cargo run -p slateboard-server`), then:
//!
//! ```sh
//! cargo run -p slateboard-render --example room_client -- ws://localhost:3030/ws demo
//! ```

use kurbo::{Point, Size};
use slateboard_core::{Engine, NativeWebSocket, PointerEvent, Tool};
use slateboard_render::{DisplayListRenderer, RenderContext, Renderer};
use std::thread;
use std::time::Duration;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;

fn main() -> Result<(), String> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .unwrap_or_else(|| "ws://localhost:3030/ws".to_string());
    let room = args.next().unwrap_or_else(|| "demo".to_string());

    let mut engine: Engine<NativeWebSocket> = Engine::new(room, WIDTH, HEIGHT);
    engine.attach_transport(NativeWebSocket::connect(&url)?);

    // Wait for the socket so the first create is not dropped
    while !engine.transport_open() {
        engine.pump();
        thread::sleep(Duration::from_millis(16));
    }

    engine.set_tool(Tool::Rectangle);
    engine.pointer_down(PointerEvent::primary(Point::new(10.0, 10.0)));
    engine.pointer_up(PointerEvent::primary(Point::new(110.0, 60.0)));

    let mut renderer = DisplayListRenderer::new();
    loop {
        engine.pump();
        if engine.take_redraw_request() {
            let preview = engine.preview_shape();
            let ctx = RenderContext::new(
                engine.board(),
                engine.camera(),
                Size::new(WIDTH, HEIGHT),
            )
            .with_preview(preview.as_ref());
            renderer.build_scene(&ctx).map_err(|e| e.to_string())?;
            println!(
                "room {}: {} shapes, {} paint commands",
                engine.room_id(),
                engine.board().len(),
                renderer.commands().len()
            );
        }
        thread::sleep(Duration::from_millis(16));
    }
}
