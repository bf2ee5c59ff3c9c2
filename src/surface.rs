use ratatui::layout::{Position, Rect};

use crate::pointer::{PointerAction, PointerEvent, PointerKind};

/// What the surface reports back to its consumer. `Dropped` with `over: None`
/// means the gesture ended outside every droppable and should change nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Started { id: String },
    Dropped { id: String, over: Option<String> },
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    id: String,
    #[allow(dead_code)]
    kind: PointerKind,
    origin: Position,
    current: Position,
}

/// Pick-up/drop semantics over registered draggable items and droppable
/// regions. Regions are re-registered every frame from the current layout;
/// the surface itself carries no game state beyond the in-flight gesture.
#[derive(Debug, Default)]
pub struct DragSurface {
    draggables: Vec<(String, Rect)>,
    droppables: Vec<(String, Rect)>,
    active: Option<ActiveDrag>,
}

impl DragSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all registered regions ahead of a fresh layout pass. An in-flight
    /// gesture survives; its pick-up region may have moved or vanished.
    pub fn begin_frame(&mut self) {
        self.draggables.clear();
        self.droppables.clear();
    }

    /// Forget every registration and any in-flight gesture, for screen
    /// transitions where the drawn regions no longer exist.
    pub fn reset(&mut self) {
        self.begin_frame();
        self.active = None;
    }

    pub fn register_draggable(&mut self, id: impl Into<String>, area: Rect) {
        self.draggables.push((id.into(), area));
    }

    pub fn register_droppable(&mut self, id: impl Into<String>, area: Rect) {
        self.droppables.push((id.into(), area));
    }

    /// Feed one pointer sample through the gesture state machine. `Up` or
    /// `Move` without a preceding `Down` on a draggable is a no-op.
    pub fn handle(&mut self, ev: PointerEvent) -> Option<SurfaceEvent> {
        let pos = Position::new(ev.column, ev.row);

        match ev.action {
            PointerAction::Down => {
                if self.active.is_some() {
                    return None;
                }
                let (id, _) = self
                    .draggables
                    .iter()
                    .find(|(_, area)| area.contains(pos))?;
                let id = id.clone();
                self.active = Some(ActiveDrag {
                    id: id.clone(),
                    kind: ev.kind,
                    origin: pos,
                    current: pos,
                });
                Some(SurfaceEvent::Started { id })
            }
            PointerAction::Move => {
                if let Some(drag) = self.active.as_mut() {
                    drag.current = pos;
                }
                None
            }
            PointerAction::Up => {
                let drag = self.active.take()?;
                let over = self
                    .droppables
                    .iter()
                    .find(|(_, area)| area.contains(pos))
                    .map(|(id, _)| id.clone());
                Some(SurfaceEvent::Dropped { id: drag.id, over })
            }
            PointerAction::Cancel => {
                let drag = self.active.take()?;
                Some(SurfaceEvent::Dropped {
                    id: drag.id,
                    over: None,
                })
            }
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|d| d.id.as_str())
    }

    /// Offset of the pointer from the pick-up point, for visual feedback.
    pub fn drag_offset(&self) -> Option<(i32, i32)> {
        self.active.as_ref().map(|d| {
            (
                d.current.x as i32 - d.origin.x as i32,
                d.current.y as i32 - d.origin.y as i32,
            )
        })
    }

    /// Current pointer position of the in-flight gesture.
    pub fn drag_position(&self) -> Option<Position> {
        self.active.as_ref().map(|d| d.current)
    }

    /// Whether the in-flight gesture is hovering the given droppable.
    pub fn is_over(&self, droppable_id: &str) -> bool {
        self.hovered() == Some(droppable_id)
    }

    pub fn hovered(&self) -> Option<&str> {
        let drag = self.active.as_ref()?;
        self.droppables
            .iter()
            .find(|(_, area)| area.contains(drag.current))
            .map(|(id, _)| id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::PointerAction::{Cancel, Down, Move, Up};

    fn surface() -> DragSurface {
        let mut s = DragSurface::new();
        s.register_draggable("alpha", Rect::new(0, 0, 10, 1));
        s.register_draggable("beta", Rect::new(0, 2, 10, 1));
        s.register_droppable("0", Rect::new(20, 0, 10, 1));
        s.register_droppable("1", Rect::new(20, 2, 10, 1));
        s
    }

    #[test]
    fn down_on_draggable_starts_gesture() {
        let mut s = surface();

        let ev = s.handle(PointerEvent::mouse(Down, 3, 0));

        assert_eq!(
            ev,
            Some(SurfaceEvent::Started {
                id: "alpha".to_string()
            })
        );
        assert_eq!(s.active_id(), Some("alpha"));
        assert_eq!(s.drag_offset(), Some((0, 0)));
    }

    #[test]
    fn down_outside_draggables_is_noop() {
        let mut s = surface();

        assert_eq!(s.handle(PointerEvent::mouse(Down, 15, 5)), None);
        assert_eq!(s.active_id(), None);
    }

    #[test]
    fn move_updates_offset_and_hover() {
        let mut s = surface();
        s.handle(PointerEvent::mouse(Down, 3, 0));

        s.handle(PointerEvent::mouse(Move, 22, 2));

        assert_eq!(s.drag_offset(), Some((19, 2)));
        assert!(s.is_over("1"));
        assert!(!s.is_over("0"));
        assert_eq!(s.hovered(), Some("1"));
    }

    #[test]
    fn up_over_droppable_reports_target() {
        let mut s = surface();
        s.handle(PointerEvent::mouse(Down, 3, 0));
        s.handle(PointerEvent::mouse(Move, 25, 0));

        let ev = s.handle(PointerEvent::mouse(Up, 25, 0));

        assert_eq!(
            ev,
            Some(SurfaceEvent::Dropped {
                id: "alpha".to_string(),
                over: Some("0".to_string())
            })
        );
        assert_eq!(s.active_id(), None);
    }

    #[test]
    fn up_outside_droppables_reports_no_target() {
        let mut s = surface();
        s.handle(PointerEvent::mouse(Down, 3, 2));

        let ev = s.handle(PointerEvent::mouse(Up, 50, 20));

        assert_eq!(
            ev,
            Some(SurfaceEvent::Dropped {
                id: "beta".to_string(),
                over: None
            })
        );
    }

    #[test]
    fn up_without_down_is_noop() {
        let mut s = surface();

        assert_eq!(s.handle(PointerEvent::mouse(Up, 25, 0)), None);
        assert_eq!(s.handle(PointerEvent::mouse(Move, 25, 0)), None);
    }

    #[test]
    fn cancel_ends_gesture_without_target() {
        let mut s = surface();
        s.handle(PointerEvent::mouse(Down, 3, 0));
        s.handle(PointerEvent::mouse(Move, 25, 0));

        let ev = s.handle(PointerEvent::mouse(Cancel, 25, 0));

        assert_eq!(
            ev,
            Some(SurfaceEvent::Dropped {
                id: "alpha".to_string(),
                over: None
            })
        );
        assert_eq!(s.active_id(), None);
    }

    #[test]
    fn second_down_during_gesture_is_ignored() {
        let mut s = surface();
        s.handle(PointerEvent::mouse(Down, 3, 0));

        assert_eq!(s.handle(PointerEvent::mouse(Down, 3, 2)), None);
        assert_eq!(s.active_id(), Some("alpha"));
    }

    #[test]
    fn begin_frame_keeps_active_gesture() {
        let mut s = surface();
        s.handle(PointerEvent::mouse(Down, 3, 0));

        s.begin_frame();
        s.register_droppable("0", Rect::new(20, 0, 10, 1));

        assert_eq!(s.active_id(), Some("alpha"));
        let ev = s.handle(PointerEvent::mouse(Up, 25, 0));
        assert_eq!(
            ev,
            Some(SurfaceEvent::Dropped {
                id: "alpha".to_string(),
                over: Some("0".to_string())
            })
        );
    }

    #[test]
    fn reset_discards_gesture_and_regions() {
        let mut s = surface();
        s.handle(PointerEvent::mouse(Down, 3, 0));

        s.reset();

        assert_eq!(s.active_id(), None);
        // Nothing is registered any more, so nothing can start or land.
        assert_eq!(s.handle(PointerEvent::mouse(Down, 3, 0)), None);
    }

    #[test]
    fn touch_gestures_behave_like_mouse_gestures() {
        let mut mouse = surface();
        let mut touch = surface();

        for (m, t) in [
            (
                PointerEvent::mouse(Down, 3, 0),
                PointerEvent::touch(Down, 3, 0),
            ),
            (
                PointerEvent::mouse(Move, 25, 2),
                PointerEvent::touch(Move, 25, 2),
            ),
            (
                PointerEvent::mouse(Up, 25, 2),
                PointerEvent::touch(Up, 25, 2),
            ),
        ] {
            assert_eq!(mouse.handle(m), touch.handle(t));
        }
    }
}
