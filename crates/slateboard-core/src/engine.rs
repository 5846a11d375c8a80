//! Drawing engine: ties the board, camera, tools and sync channel together
//! behind a pointer/wheel event interface.
//!
//! The engine is single-threaded and event-driven. Embedders feed it input
//! events and transport events, then poll [`Engine::take_redraw_request`]
//! to decide whether to repaint.

use crate::board::Board;
use crate::camera::Camera;
use crate::history::{shapes_from_history, HistoryEntry};
use crate::input::{PointerEvent, WheelEvent};
use crate::shapes::{Shape, ShapeId};
use crate::sync::{Envelope, Operation, SyncEvent, SyncTransport};
use crate::tools::{construct_shape, Gesture, Tool};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Minimum interval between processed pointer-move samples.
const MOVE_THROTTLE: Duration = Duration::from_millis(16);

/// Zoom factor per wheel notch or zoom button press.
const ZOOM_STEP: f64 = 1.1;

/// Snapshot of the view transform, for toolbars and overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportInfo {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

/// The drawing engine for one room.
pub struct Engine<T: SyncTransport> {
    board: Board,
    camera: Camera,
    tool: Tool,
    gesture: Gesture,
    room_id: String,
    transport: Option<T>,
    width: f64,
    height: f64,
    last_move: Option<Instant>,
    needs_redraw: bool,
    closed: bool,
}

impl<T: SyncTransport> Engine<T> {
    /// Create an engine for a room with the given surface size in pixels.
    pub fn new(room_id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            board: Board::new(),
            camera: Camera::new(),
            tool: Tool::default(),
            gesture: Gesture::Idle,
            room_id: room_id.into(),
            transport: None,
            width,
            height,
            last_move: None,
            needs_redraw: true,
            closed: false,
        }
    }

    /// Attach the sync transport. The room subscription is announced once
    /// the transport reports [`SyncEvent::Connected`].
    pub fn attach_transport(&mut self, transport: T) {
        self.transport = Some(transport);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Select a tool. An in-progress gesture keeps the tool it started
    /// with; the change applies from the next pointer-down.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    // ------------------------------------------------------------------
    // Pointer state machine
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, ev: PointerEvent) {
        if self.closed || !self.gesture.is_idle() {
            return;
        }
        self.last_move = None;
        self.gesture = if ev.is_pan_trigger() {
            Gesture::Panning {
                start_screen: ev.position,
                start_offset: self.camera.offset,
            }
        } else if self.tool == Tool::Eraser {
            Gesture::Erasing
        } else {
            let anchor = self.camera.screen_to_world(ev.position);
            let pencil = if self.tool == Tool::Pencil {
                vec![anchor]
            } else {
                Vec::new()
            };
            Gesture::Drawing {
                tool: self.tool,
                anchor,
                current: anchor,
                pencil,
            }
        };
    }

    /// Process a pointer-move sample.
    ///
    /// Samples arriving faster than the throttle interval are dropped
    /// outright; the final position is still captured at pointer-up.
    pub fn pointer_move(&mut self, ev: PointerEvent) {
        if self.closed || self.gesture.is_idle() {
            return;
        }
        if let Some(last) = self.last_move {
            if last.elapsed() < MOVE_THROTTLE {
                return;
            }
        }
        self.last_move = Some(Instant::now());

        match &mut self.gesture {
            Gesture::Drawing {
                tool,
                current,
                pencil,
                ..
            } => {
                let world = self.camera.screen_to_world(ev.position);
                *current = world;
                if *tool == Tool::Pencil {
                    pencil.push(world);
                }
                self.needs_redraw = true;
            }
            Gesture::Panning {
                start_screen,
                start_offset,
            } => {
                self.camera.offset = *start_offset + (ev.position - *start_screen);
                self.needs_redraw = true;
            }
            // The erase target is evaluated at pointer-up
            Gesture::Erasing => {}
            Gesture::Idle => {}
        }
    }

    pub fn pointer_up(&mut self, ev: PointerEvent) {
        if self.closed {
            return;
        }
        let gesture = std::mem::take(&mut self.gesture);
        self.last_move = None;

        match gesture {
            Gesture::Drawing {
                tool,
                anchor,
                mut pencil,
                ..
            } => {
                let world = self.camera.screen_to_world(ev.position);
                if tool == Tool::Pencil {
                    pencil.push(world);
                }
                if let Some(shape) = construct_shape(tool, anchor, world, &pencil) {
                    self.board.append(shape.clone());
                    self.broadcast(Operation::Create(shape));
                    self.needs_redraw = true;
                }
            }
            Gesture::Erasing => {
                let world = self.camera.screen_to_world(ev.position);
                let hits = self.board.hits_at(world);
                let removed = self.board.remove_by_ids(&hits);
                if !removed.is_empty() {
                    // The wire payload carries the removed shapes themselves
                    self.broadcast(Operation::Erase(removed));
                    self.needs_redraw = true;
                }
            }
            Gesture::Panning { .. } | Gesture::Idle => {}
        }
    }

    pub fn wheel(&mut self, ev: WheelEvent) {
        if self.closed {
            return;
        }
        if ev.is_zoom() {
            let factor = if ev.delta.y < 0.0 {
                ZOOM_STEP
            } else {
                1.0 / ZOOM_STEP
            };
            self.camera.zoom_at(ev.position, factor);
        } else {
            self.camera.pan(-ev.delta);
        }
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------
    // Programmatic view control
    // ------------------------------------------------------------------

    pub fn pan(&mut self, delta: Vec2) {
        self.camera.pan(delta);
        self.needs_redraw = true;
    }

    /// Zoom in one step, anchored at the surface centre.
    pub fn zoom_in(&mut self) {
        self.camera.zoom_at(self.surface_center(), ZOOM_STEP);
        self.needs_redraw = true;
    }

    /// Zoom out one step, anchored at the surface centre.
    pub fn zoom_out(&mut self) {
        self.camera.zoom_at(self.surface_center(), 1.0 / ZOOM_STEP);
        self.needs_redraw = true;
    }

    /// Jump to an absolute zoom level, anchored at the surface centre.
    pub fn set_zoom(&mut self, scale: f64) {
        let factor = scale / self.camera.scale;
        self.camera.zoom_at(self.surface_center(), factor);
        self.needs_redraw = true;
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
        self.needs_redraw = true;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.needs_redraw = true;
    }

    pub fn viewport(&self) -> ViewportInfo {
        ViewportInfo {
            offset_x: self.camera.offset.x,
            offset_y: self.camera.offset.y,
            scale: self.camera.scale,
            width: self.width,
            height: self.height,
        }
    }

    fn surface_center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    // ------------------------------------------------------------------
    // Rendering hooks
    // ------------------------------------------------------------------

    /// The in-progress shape under the cursor, if a drawing drag is live.
    /// Preview shapes are never committed or broadcast.
    pub fn preview_shape(&self) -> Option<Shape> {
        match &self.gesture {
            Gesture::Drawing {
                tool,
                anchor,
                current,
                pencil,
            } => construct_shape(*tool, *anchor, *current, pencil),
            _ => None,
        }
    }

    /// Take the pending redraw request, clearing it.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    // ------------------------------------------------------------------
    // Sync channel
    // ------------------------------------------------------------------

    /// Whether an attached transport is currently open for sending.
    pub fn transport_open(&self) -> bool {
        self.transport.as_ref().is_some_and(|t| t.is_open())
    }

    /// Poll the transport and apply whatever arrived. Call once per frame.
    pub fn pump(&mut self) {
        let events = match &mut self.transport {
            Some(transport) => transport.poll_events(),
            None => return,
        };
        self.handle_events(events);
    }

    /// Feed transport events pumped by the embedder.
    pub fn handle_events(&mut self, events: Vec<SyncEvent>) {
        for event in events {
            match event {
                SyncEvent::Connected => self.join_room(),
                SyncEvent::Message(envelope) => self.handle_incoming(envelope),
                SyncEvent::Disconnected => {
                    log::info!("Sync channel disconnected");
                }
                SyncEvent::Error { message } => {
                    log::error!("Sync channel error: {}", message);
                }
            }
        }
    }

    /// Apply one inbound envelope. Malformed payloads are logged and
    /// dropped without disturbing the board.
    pub fn handle_incoming(&mut self, envelope: Envelope) {
        if self.closed {
            return;
        }
        match envelope.operation() {
            Ok(Some(op)) => self.apply_remote(op),
            Ok(None) => {}
            Err(e) => log::warn!("Dropping inbound message: {}", e),
        }
    }

    /// Apply a remote board mutation.
    pub fn apply_remote(&mut self, op: Operation) {
        match op {
            Operation::Create(shape) => {
                self.board.append(shape);
                self.needs_redraw = true;
            }
            Operation::Erase(shapes) => {
                let ids: HashSet<ShapeId> = shapes.iter().map(|s| s.id().clone()).collect();
                if !self.board.remove_by_ids(&ids).is_empty() {
                    self.needs_redraw = true;
                }
            }
        }
    }

    /// Load the room backfill fetched from the history endpoint.
    ///
    /// The fetch races teardown, so a closed engine ignores the result.
    pub fn load_history(&mut self, entries: &[HistoryEntry]) {
        if self.closed {
            return;
        }
        for shape in shapes_from_history(entries) {
            self.board.append(shape);
        }
        self.needs_redraw = true;
    }

    /// Announce the room subscription on the transport.
    pub fn join_room(&mut self) {
        self.send_envelope(Envelope::JoinRoom {
            room_id: self.room_id.clone(),
        });
    }

    fn broadcast(&mut self, op: Operation) {
        match op.into_envelope(&self.room_id) {
            Ok(envelope) => self.send_envelope(envelope),
            Err(e) => log::error!("Failed to encode outbound message: {}", e),
        }
    }

    /// Local application already happened by the time a send is attempted,
    /// so a not-open transport loses the update for other clients. That
    /// matches the fire-and-forget channel semantics; the drop is logged.
    fn send_envelope(&mut self, envelope: Envelope) {
        let Some(transport) = &self.transport else {
            log::warn!("No transport attached, dropping outbound message");
            return;
        };
        if !transport.is_open() {
            log::warn!("Transport not open, dropping outbound message");
            return;
        }
        match serde_json::to_string(&envelope) {
            Ok(raw) => {
                if let Err(e) = transport.send(&raw) {
                    log::warn!("Transport send failed: {}", e);
                }
            }
            Err(e) => log::error!("Failed to encode envelope: {}", e),
        }
    }

    /// Tear down the engine. Input and late async results are ignored
    /// afterwards.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.gesture = Gesture::Idle;
        if let Some(transport) = &mut self.transport {
            transport.close();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::shapes::Rectangle;
    use crate::sync::ChatPayload;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct MockTransport {
        open: bool,
        sent: Rc<RefCell<Vec<String>>>,
        inbox: Vec<SyncEvent>,
    }

    impl MockTransport {
        fn open() -> (Self, Rc<RefCell<Vec<String>>>) {
            let sent = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    open: true,
                    sent: sent.clone(),
                    inbox: Vec::new(),
                },
                sent,
            )
        }

        fn not_open() -> (Self, Rc<RefCell<Vec<String>>>) {
            let sent = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    open: false,
                    sent: sent.clone(),
                    inbox: Vec::new(),
                },
                sent,
            )
        }
    }

    impl SyncTransport for MockTransport {
        fn is_open(&self) -> bool {
            self.open
        }

        fn send(&self, msg: &str) -> Result<(), String> {
            self.sent.borrow_mut().push(msg.to_string());
            Ok(())
        }

        fn poll_events(&mut self) -> Vec<SyncEvent> {
            std::mem::take(&mut self.inbox)
        }

        fn close(&mut self) {
            self.open = false;
        }
    }

    fn engine_with_transport() -> (Engine<MockTransport>, Rc<RefCell<Vec<String>>>) {
        let mut engine = Engine::new("room-1", 800.0, 600.0);
        let (transport, sent) = MockTransport::open();
        engine.attach_transport(transport);
        (engine, sent)
    }

    #[test]
    fn test_rectangle_drag_commits_and_broadcasts() {
        let (mut engine, sent) = engine_with_transport();
        engine.set_tool(Tool::Rectangle);

        engine.pointer_down(PointerEvent::primary(Point::new(10.0, 10.0)));
        engine.pointer_move(PointerEvent::primary(Point::new(60.0, 40.0)));
        engine.pointer_up(PointerEvent::primary(Point::new(110.0, 60.0)));

        assert_eq!(engine.board().len(), 1);
        match &engine.board().shapes()[0] {
            Shape::Rectangle(r) => {
                assert!((r.x - 10.0).abs() < f64::EPSILON);
                assert!((r.y - 10.0).abs() < f64::EPSILON);
                assert!((r.width - 100.0).abs() < f64::EPSILON);
                assert!((r.height - 50.0).abs() < f64::EPSILON);
            }
            other => panic!("expected rectangle, got {other:?}"),
        }

        let frames = sent.borrow();
        assert_eq!(frames.len(), 1);
        let envelope = Envelope::parse(&frames[0]).unwrap();
        match &envelope {
            Envelope::Chat { room_id, message } => {
                assert_eq!(room_id, "room-1");
                let payload: ChatPayload = serde_json::from_str(message).unwrap();
                assert_eq!(payload.shape.id(), engine.board().shapes()[0].id());
            }
            other => panic!("expected chat envelope, got {other:?}"),
        }
    }

    #[test]
    fn test_preview_live_but_uncommitted() {
        let (mut engine, sent) = engine_with_transport();
        engine.set_tool(Tool::Circle);

        engine.pointer_down(PointerEvent::primary(Point::new(0.0, 0.0)));
        assert!(engine.preview_shape().is_some());
        assert!(engine.board().is_empty());
        assert!(sent.borrow().is_empty());

        engine.pointer_up(PointerEvent::primary(Point::new(100.0, 40.0)));
        assert!(engine.preview_shape().is_none());
        assert_eq!(engine.board().len(), 1);
    }

    #[test]
    fn test_tool_change_does_not_retarget_gesture() {
        let (mut engine, _sent) = engine_with_transport();
        engine.set_tool(Tool::Rectangle);

        engine.pointer_down(PointerEvent::primary(Point::new(0.0, 0.0)));
        engine.set_tool(Tool::Circle);
        engine.pointer_up(PointerEvent::primary(Point::new(50.0, 50.0)));

        assert!(matches!(engine.board().shapes()[0], Shape::Rectangle(_)));
        assert_eq!(engine.tool(), Tool::Circle);
    }

    #[test]
    fn test_rapid_moves_are_throttled() {
        let (mut engine, _sent) = engine_with_transport();
        engine.set_tool(Tool::Pencil);

        engine.pointer_down(PointerEvent::primary(Point::new(0.0, 0.0)));
        engine.pointer_move(PointerEvent::primary(Point::new(10.0, 0.0)));
        // Immediately following sample lands inside the throttle window
        engine.pointer_move(PointerEvent::primary(Point::new(20.0, 0.0)));

        match engine.preview_shape() {
            Some(Shape::Pencil(p)) => assert_eq!(p.points.len(), 2),
            other => panic!("expected pencil preview, got {other:?}"),
        }
    }

    #[test]
    fn test_pencil_final_point_captured_at_up() {
        let (mut engine, _sent) = engine_with_transport();
        engine.set_tool(Tool::Pencil);

        engine.pointer_down(PointerEvent::primary(Point::new(0.0, 0.0)));
        engine.pointer_up(PointerEvent::primary(Point::new(30.0, 30.0)));

        match &engine.board().shapes()[0] {
            Shape::Pencil(p) => {
                assert_eq!(p.points.len(), 2);
                assert_eq!(p.points[1], Point::new(30.0, 30.0));
            }
            other => panic!("expected pencil, got {other:?}"),
        }
    }

    #[test]
    fn test_erase_hit_removes_and_broadcasts() {
        let (mut engine, sent) = engine_with_transport();
        let shape = Shape::Rectangle(Rectangle::new(0.0, 0.0, 50.0, 50.0));
        let id = shape.id().to_string();
        engine.apply_remote(Operation::Create(shape));

        engine.set_tool(Tool::Eraser);
        engine.pointer_down(PointerEvent::primary(Point::new(25.0, 25.0)));
        engine.pointer_up(PointerEvent::primary(Point::new(25.0, 25.0)));

        assert!(engine.board().is_empty());
        let frames = sent.borrow();
        assert_eq!(frames.len(), 1);
        match Envelope::parse(&frames[0]).unwrap().operation().unwrap() {
            Some(Operation::Erase(shapes)) => {
                // The payload carries the removed shape, not a bare id
                assert_eq!(shapes.len(), 1);
                assert!(matches!(shapes[0], Shape::Rectangle(_)));
                assert_eq!(shapes[0].id().to_string(), id);
            }
            other => panic!("expected erase, got {other:?}"),
        }
    }

    #[test]
    fn test_erase_miss_is_silent() {
        let (mut engine, sent) = engine_with_transport();
        engine.apply_remote(Operation::Create(Shape::Rectangle(Rectangle::new(
            0.0, 0.0, 50.0, 50.0,
        ))));

        engine.set_tool(Tool::Eraser);
        engine.pointer_down(PointerEvent::primary(Point::new(500.0, 500.0)));
        engine.pointer_up(PointerEvent::primary(Point::new(500.0, 500.0)));

        assert_eq!(engine.board().len(), 1);
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn test_pan_gesture_moves_camera_only() {
        let (mut engine, sent) = engine_with_transport();
        let ev = |x, y| PointerEvent {
            position: Point::new(x, y),
            button: crate::input::MouseButton::Left,
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        };

        engine.pointer_down(ev(100.0, 100.0));
        engine.pointer_move(ev(130.0, 120.0));
        engine.pointer_up(ev(130.0, 120.0));

        assert_eq!(engine.camera().offset, Vec2::new(30.0, 20.0));
        assert!(engine.board().is_empty());
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn test_drawing_accounts_for_camera_transform() {
        let (mut engine, _sent) = engine_with_transport();
        engine.set_tool(Tool::Rectangle);
        engine.pan(Vec2::new(100.0, 50.0));
        engine.set_zoom(2.0);
        // Camera now maps screen (300,250)-ish region onto world space;
        // the committed shape must use world coordinates.
        let down = engine.camera().world_to_screen(Point::new(10.0, 10.0));
        let up = engine.camera().world_to_screen(Point::new(110.0, 60.0));

        engine.pointer_down(PointerEvent::primary(down));
        engine.pointer_up(PointerEvent::primary(up));

        match &engine.board().shapes()[0] {
            Shape::Rectangle(r) => {
                assert!((r.x - 10.0).abs() < 1e-9);
                assert!((r.width - 100.0).abs() < 1e-9);
            }
            other => panic!("expected rectangle, got {other:?}"),
        }
    }

    #[test]
    fn test_wheel_zoom_and_pan() {
        let (mut engine, _sent) = engine_with_transport();

        engine.wheel(WheelEvent {
            position: Point::new(400.0, 300.0),
            delta: Vec2::new(0.0, -120.0),
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        });
        assert!((engine.camera().scale - 1.1).abs() < 1e-9);

        let before = engine.camera().offset;
        engine.wheel(WheelEvent {
            position: Point::new(400.0, 300.0),
            delta: Vec2::new(15.0, 10.0),
            modifiers: Modifiers::NONE,
        });
        assert_eq!(engine.camera().offset, before + Vec2::new(-15.0, -10.0));
    }

    #[test]
    fn test_remote_operations_apply() {
        let (mut engine, _sent) = engine_with_transport();
        let shape = Shape::Rectangle(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        let erased = shape.clone();

        let create = Operation::Create(shape).into_envelope("room-1").unwrap();
        engine.handle_incoming(create);
        assert_eq!(engine.board().len(), 1);
        assert!(engine.take_redraw_request());

        let erase = Operation::Erase(vec![erased])
            .into_envelope("room-1")
            .unwrap();
        engine.handle_incoming(erase);
        assert!(engine.board().is_empty());
    }

    #[test]
    fn test_remote_erase_of_unknown_shape_is_silent() {
        let (mut engine, sent) = engine_with_transport();
        engine.apply_remote(Operation::Create(Shape::Rectangle(Rectangle::new(
            0.0, 0.0, 10.0, 10.0,
        ))));
        engine.take_redraw_request();

        // Erase names a shape this board never saw
        let ghost = Shape::Rectangle(Rectangle::new(900.0, 900.0, 10.0, 10.0));
        let erase = Operation::Erase(vec![ghost]).into_envelope("room-1").unwrap();
        engine.handle_incoming(erase);

        assert_eq!(engine.board().len(), 1);
        assert!(!engine.take_redraw_request());
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn test_malformed_inbound_leaves_board_intact() {
        let (mut engine, _sent) = engine_with_transport();
        engine.apply_remote(Operation::Create(Shape::Rectangle(Rectangle::new(
            0.0, 0.0, 10.0, 10.0,
        ))));

        engine.handle_incoming(Envelope::Chat {
            room_id: "room-1".into(),
            message: "{not json".into(),
        });
        assert_eq!(engine.board().len(), 1);
    }

    #[test]
    fn test_send_on_not_open_transport_drops() {
        let mut engine = Engine::new("room-1", 800.0, 600.0);
        let (transport, sent) = MockTransport::not_open();
        engine.attach_transport(transport);
        engine.set_tool(Tool::Line);

        engine.pointer_down(PointerEvent::primary(Point::new(0.0, 0.0)));
        engine.pointer_up(PointerEvent::primary(Point::new(50.0, 50.0)));

        // Applied locally, lost for everyone else
        assert_eq!(engine.board().len(), 1);
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn test_pump_drains_transport() {
        let mut engine = Engine::new("room-1", 800.0, 600.0);
        let sent = Rc::new(RefCell::new(Vec::new()));
        let shape = Shape::Rectangle(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        let envelope = Operation::Create(shape).into_envelope("room-1").unwrap();
        engine.attach_transport(MockTransport {
            open: true,
            sent: sent.clone(),
            inbox: vec![SyncEvent::Connected, SyncEvent::Message(envelope)],
        });

        engine.pump();

        // Connection event triggered the room handshake, then the create
        // landed on the board
        assert_eq!(engine.board().len(), 1);
        let frames = sent.borrow();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].contains("join_room"));
    }

    #[test]
    fn test_connected_event_triggers_join() {
        let (mut engine, sent) = engine_with_transport();
        engine.handle_events(vec![SyncEvent::Connected]);
        let frames = sent.borrow();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], r#"{"type":"join_room","roomId":"room-1"}"#);
    }

    #[test]
    fn test_closed_engine_ignores_everything() {
        let (mut engine, sent) = engine_with_transport();
        engine.close();

        engine.pointer_down(PointerEvent::primary(Point::new(0.0, 0.0)));
        engine.pointer_up(PointerEvent::primary(Point::new(50.0, 50.0)));
        engine.load_history(&[HistoryEntry {
            message: r#"{"shape":{"type":"rectangle","id":"x","x":0.0,"y":0.0,"width":1.0,"height":1.0}}"#.into(),
        }]);
        engine.handle_incoming(
            Operation::Create(Shape::Rectangle(Rectangle::new(0.0, 0.0, 1.0, 1.0)))
                .into_envelope("room-1")
                .unwrap(),
        );

        assert!(engine.board().is_empty());
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn test_load_history_appends_in_order() {
        let (mut engine, _sent) = engine_with_transport();
        let row = |id: &str| HistoryEntry {
            message: format!(
                r#"{{"shape":{{"type":"rectangle","id":"{id}","x":0.0,"y":0.0,"width":1.0,"height":1.0}}}}"#
            ),
        };
        engine.load_history(&[row("a"), row("b")]);

        let ids: Vec<_> = engine
            .board()
            .shapes()
            .iter()
            .map(|s| s.id().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_viewport_snapshot() {
        let (mut engine, _sent) = engine_with_transport();
        engine.pan(Vec2::new(12.0, -8.0));
        let vp = engine.viewport();
        assert_eq!(vp.offset_x, 12.0);
        assert_eq!(vp.offset_y, -8.0);
        assert_eq!(vp.width, 800.0);
        assert_eq!(vp.height, 600.0);
    }

    #[test]
    fn test_redraw_request_is_taken_once() {
        let (mut engine, _sent) = engine_with_transport();
        assert!(engine.take_redraw_request());
        assert!(!engine.take_redraw_request());
        engine.pan(Vec2::new(1.0, 0.0));
        assert!(engine.take_redraw_request());
    }
}
