//! Drag-reorder controller: a two-state machine over the section list.
//!
//! ```text
//!   Idle ──start──▶ Dragging ──move/key──▶ Dragging
//!     ▲                │
//!     └──drop/cancel───┘
//! ```
//!
//! While dragging, only the drop target changes. The document is touched once,
//! on drop, through `reorder_sections`. Pointer and keyboard input drive the
//! same transitions, so moving one slot down with the arrow key ends in the
//! same document as dragging the pointer onto the next slot.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::editor::mutators::reorder_sections;
use crate::errors::EditError;
use crate::models::resume::Document;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GestureError {
    #[error("A drag gesture is already in progress")]
    AlreadyDragging,

    #[error("No drag gesture is in progress")]
    NotDragging,

    #[error("Section {0} is not in the document")]
    UnknownSection(String),

    #[error("Slot layout has {got} slots but the document has {expected} sections")]
    LayoutMismatch { expected: usize, got: usize },

    #[error("Invalid slot geometry: {0}")]
    InvalidSlot(String),

    #[error(transparent)]
    Edit(#[from] EditError),
}

// ────────────────────────────────────────────────────────────────────────────
// Slot geometry
// ────────────────────────────────────────────────────────────────────────────

/// Vertical extent of one section on screen, in any consistent unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub top: f32,
    pub height: f32,
}

impl Slot {
    pub fn center(&self) -> f32 {
        self.top + self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Slots for every section, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotLayout {
    slots: Vec<Slot>,
}

impl SlotLayout {
    /// Unit-height slots stacked from 0. Used when the client sends no geometry
    /// (keyboard gestures, tests).
    pub fn uniform(count: usize) -> Self {
        SlotLayout {
            slots: (0..count)
                .map(|i| Slot {
                    top: i as f32,
                    height: 1.0,
                })
                .collect(),
        }
    }

    pub fn new(slots: Vec<Slot>) -> Result<Self, GestureError> {
        for (i, slot) in slots.iter().enumerate() {
            if !slot.top.is_finite() || !slot.height.is_finite() || slot.height <= 0.0 {
                return Err(GestureError::InvalidSlot(format!(
                    "slot {i} has top {} and height {}",
                    slot.top, slot.height
                )));
            }
        }
        Ok(SlotLayout { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Index of the slot whose midpoint is nearest to `y`.
    ///
    /// `None` when `y` lies outside the drop area (above the topmost slot or
    /// below the bottommost one). Equal distances resolve to the lower index.
    pub fn closest_center(&self, y: f32) -> Option<usize> {
        let top = self.slots.iter().map(|s| s.top).reduce(f32::min)?;
        let bottom = self.slots.iter().map(Slot::bottom).reduce(f32::max)?;
        if !y.is_finite() || y < top || y > bottom {
            return None;
        }

        let mut best: Option<(usize, f32)> = None;
        for (i, slot) in self.slots.iter().enumerate() {
            let distance = (slot.center() - y).abs();
            match best {
                Some((_, d)) if distance >= d => {}
                _ => best = Some((i, distance)),
            }
        }
        best.map(|(i, _)| i)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// State
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// One gesture in flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gesture {
    pub active_id: String,
    /// Section ids in display order when the gesture started.
    pub snapshot: Vec<String>,
    pub origin: usize,
    /// Current drop target; `None` while outside the drop area.
    pub over: Option<usize>,
    #[serde(skip)]
    layout: SlotLayout,
    /// Pointer offset from the picked-up slot's center at start.
    #[serde(skip)]
    grab_offset: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Gesture),
}

/// Input accepted by the controller, from either modality.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum GestureEvent {
    /// Pick up a section. `pointer` is absent for keyboard pick-ups.
    Start {
        section_id: String,
        #[serde(default)]
        pointer: Option<f32>,
        #[serde(default)]
        slots: Option<Vec<Slot>>,
    },
    PointerMove {
        y: f32,
    },
    Key {
        direction: Direction,
    },
    Drop,
    Cancel,
}

/// Why a finished gesture left the document alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unchanged {
    SamePosition,
    OutsideDropArea,
    Cancelled,
    /// The section list changed under the gesture.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Moved {
        from: usize,
        to: usize,
        document: Document,
    },
    Unchanged(Unchanged),
}

// ────────────────────────────────────────────────────────────────────────────
// Controller
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Idle → Dragging.
    pub fn start(
        &mut self,
        document: &Document,
        section_id: &str,
        pointer: Option<f32>,
        slots: Option<Vec<Slot>>,
    ) -> Result<(), GestureError> {
        if self.is_dragging() {
            return Err(GestureError::AlreadyDragging);
        }
        let origin = document
            .position_of(section_id)
            .ok_or_else(|| GestureError::UnknownSection(section_id.to_string()))?;

        let layout = match slots {
            Some(slots) => SlotLayout::new(slots)?,
            None => SlotLayout::uniform(document.len()),
        };
        if layout.len() != document.len() {
            return Err(GestureError::LayoutMismatch {
                expected: document.len(),
                got: layout.len(),
            });
        }

        let grab_offset = match (pointer, layout.slot(origin)) {
            (Some(y), Some(slot)) => y - slot.center(),
            _ => 0.0,
        };

        debug!("Drag start: section {section_id} at index {origin}");
        self.state = DragState::Dragging(Gesture {
            active_id: section_id.to_string(),
            snapshot: document.ordered_ids().iter().map(|s| s.to_string()).collect(),
            origin,
            over: Some(origin),
            layout,
            grab_offset,
        });
        Ok(())
    }

    /// Dragging → Dragging on pointer movement. Returns the new drop target.
    pub fn pointer_move(&mut self, y: f32) -> Result<Option<usize>, GestureError> {
        let gesture = self.gesture_mut()?;
        gesture.over = gesture.layout.closest_center(y - gesture.grab_offset);
        Ok(gesture.over)
    }

    /// Dragging → Dragging on a keyboard step. Steps past either end clamp.
    pub fn key_step(&mut self, direction: Direction) -> Result<Option<usize>, GestureError> {
        let gesture = self.gesture_mut()?;
        let last = gesture.snapshot.len().saturating_sub(1);
        let current = gesture.over.unwrap_or(gesture.origin);
        gesture.over = Some(match direction {
            Direction::Up => current.saturating_sub(1),
            Direction::Down => (current + 1).min(last),
        });
        Ok(gesture.over)
    }

    /// Dragging → Idle, applying the move if the target differs from the origin.
    pub fn drop_on(&mut self, document: &Document) -> Result<DropOutcome, GestureError> {
        let gesture = match std::mem::take(&mut self.state) {
            DragState::Dragging(g) => g,
            DragState::Idle => return Err(GestureError::NotDragging),
        };

        if document.ordered_ids() != gesture.snapshot {
            debug!("Drag drop on stale snapshot for {}", gesture.active_id);
            return Ok(DropOutcome::Unchanged(Unchanged::Stale));
        }

        match gesture.over {
            None => Ok(DropOutcome::Unchanged(Unchanged::OutsideDropArea)),
            Some(to) if to == gesture.origin => Ok(DropOutcome::Unchanged(Unchanged::SamePosition)),
            Some(to) => {
                let document = reorder_sections(document, gesture.origin, to)?;
                debug!(
                    "Drag drop: section {} moved {} -> {}",
                    gesture.active_id, gesture.origin, to
                );
                Ok(DropOutcome::Moved {
                    from: gesture.origin,
                    to,
                    document,
                })
            }
        }
    }

    /// Dragging → Idle without touching the document.
    pub fn cancel(&mut self) -> Result<DropOutcome, GestureError> {
        if !self.is_dragging() {
            return Err(GestureError::NotDragging);
        }
        self.state = DragState::Idle;
        Ok(DropOutcome::Unchanged(Unchanged::Cancelled))
    }

    /// Dispatches one event. Only `Drop` and `Cancel` produce an outcome.
    pub fn handle(
        &mut self,
        document: &Document,
        event: GestureEvent,
    ) -> Result<Option<DropOutcome>, GestureError> {
        match event {
            GestureEvent::Start {
                section_id,
                pointer,
                slots,
            } => self.start(document, &section_id, pointer, slots).map(|_| None),
            GestureEvent::PointerMove { y } => self.pointer_move(y).map(|_| None),
            GestureEvent::Key { direction } => self.key_step(direction).map(|_| None),
            GestureEvent::Drop => self.drop_on(document).map(Some),
            GestureEvent::Cancel => self.cancel().map(Some),
        }
    }

    fn gesture_mut(&mut self) -> Result<&mut Gesture, GestureError> {
        match &mut self.state {
            DragState::Dragging(g) => Ok(g),
            DragState::Idle => Err(GestureError::NotDragging),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::mutators::{add_section, reorder_sections};
    use crate::editor::seed::seed_document;
    use crate::models::resume::SectionKind;

    fn moved_document(outcome: DropOutcome) -> Document {
        match outcome {
            DropOutcome::Moved { document, .. } => document,
            other => panic!("expected a move, got {other:?}"),
        }
    }

    // ── closest center ──────────────────────────────────────────────────────

    #[test]
    fn test_closest_center_uniform() {
        let layout = SlotLayout::uniform(3);
        assert_eq!(layout.closest_center(0.1), Some(0));
        assert_eq!(layout.closest_center(1.5), Some(1));
        assert_eq!(layout.closest_center(2.9), Some(2));
    }

    #[test]
    fn test_closest_center_tie_prefers_lower_index() {
        let layout = SlotLayout::uniform(3);
        // 1.0 is equidistant from centers 0.5 and 1.5
        assert_eq!(layout.closest_center(1.0), Some(0));
    }

    #[test]
    fn test_closest_center_outside_area() {
        let layout = SlotLayout::uniform(3);
        assert_eq!(layout.closest_center(-0.01), None);
        assert_eq!(layout.closest_center(3.01), None);
        assert_eq!(SlotLayout::uniform(0).closest_center(0.0), None);
    }

    #[test]
    fn test_closest_center_uneven_slots() {
        let layout = SlotLayout::new(vec![
            Slot { top: 0.0, height: 100.0 },
            Slot { top: 100.0, height: 20.0 },
            Slot { top: 120.0, height: 300.0 },
        ])
        .unwrap();
        // centers: 50, 110, 270
        assert_eq!(layout.closest_center(85.0), Some(1));
        assert_eq!(layout.closest_center(180.0), Some(1));
        assert_eq!(layout.closest_center(200.0), Some(2));
    }

    #[test]
    fn test_invalid_slot_rejected() {
        let err = SlotLayout::new(vec![Slot { top: 0.0, height: 0.0 }]).unwrap_err();
        assert!(matches!(err, GestureError::InvalidSlot(_)));
    }

    // ── transitions ─────────────────────────────────────────────────────────

    #[test]
    fn test_pointer_drag_matches_direct_reorder() {
        let doc = seed_document();
        let mut drag = DragController::new();
        drag.start(&doc, "experience", Some(1.5), None).unwrap();
        assert_eq!(drag.pointer_move(2.2).unwrap(), Some(2));
        let dropped = moved_document(drag.drop_on(&doc).unwrap());

        assert_eq!(dropped, reorder_sections(&doc, 1, 2).unwrap());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_keyboard_drag_matches_pointer_drag() {
        let doc = seed_document();

        let mut pointer = DragController::new();
        pointer.start(&doc, "experience", Some(1.5), None).unwrap();
        pointer.pointer_move(2.5).unwrap();
        let by_pointer = moved_document(pointer.drop_on(&doc).unwrap());

        let mut keyboard = DragController::new();
        keyboard.start(&doc, "experience", None, None).unwrap();
        keyboard.key_step(Direction::Down).unwrap();
        let by_keyboard = moved_document(keyboard.drop_on(&doc).unwrap());

        assert_eq!(by_pointer, by_keyboard);
    }

    #[test]
    fn test_grab_offset_is_respected() {
        let doc = seed_document();
        let mut drag = DragController::new();
        // grabbed below the center of slot 0 (center 0.5)
        drag.start(&doc, "skills", Some(0.75), None).unwrap();
        // dragged item center = 1.25 - 0.25 = 1.0, a tie between 0 and 1
        assert_eq!(drag.pointer_move(1.25).unwrap(), Some(0));
        assert_eq!(drag.pointer_move(1.5).unwrap(), Some(1));
    }

    #[test]
    fn test_hover_without_moving_leaves_document() {
        let doc = seed_document();
        let mut drag = DragController::new();
        drag.start(&doc, "skills", Some(0.5), None).unwrap();
        drag.pointer_move(2.5).unwrap();
        drag.pointer_move(0.4).unwrap();
        assert_eq!(
            drag.drop_on(&doc).unwrap(),
            DropOutcome::Unchanged(Unchanged::SamePosition)
        );
    }

    #[test]
    fn test_leaving_drop_area_then_dropping_is_unchanged() {
        let doc = seed_document();
        let mut drag = DragController::new();
        drag.start(&doc, "skills", Some(0.5), None).unwrap();
        assert_eq!(drag.pointer_move(40.0).unwrap(), None);
        assert_eq!(
            drag.drop_on(&doc).unwrap(),
            DropOutcome::Unchanged(Unchanged::OutsideDropArea)
        );
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let doc = seed_document();
        let mut drag = DragController::new();
        drag.start(&doc, "skills", None, None).unwrap();
        drag.key_step(Direction::Down).unwrap();
        assert_eq!(
            drag.cancel().unwrap(),
            DropOutcome::Unchanged(Unchanged::Cancelled)
        );
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_second_start_rejected() {
        let doc = seed_document();
        let mut drag = DragController::new();
        drag.start(&doc, "skills", None, None).unwrap();
        assert_eq!(
            drag.start(&doc, "education", None, None).unwrap_err(),
            GestureError::AlreadyDragging
        );
    }

    #[test]
    fn test_events_while_idle_rejected() {
        let doc = seed_document();
        let mut drag = DragController::new();
        assert_eq!(drag.pointer_move(1.0).unwrap_err(), GestureError::NotDragging);
        assert_eq!(
            drag.key_step(Direction::Up).unwrap_err(),
            GestureError::NotDragging
        );
        assert_eq!(drag.drop_on(&doc).unwrap_err(), GestureError::NotDragging);
        assert_eq!(drag.cancel().unwrap_err(), GestureError::NotDragging);
    }

    #[test]
    fn test_unknown_section_rejected() {
        let mut drag = DragController::new();
        let err = drag.start(&seed_document(), "awards", None, None).unwrap_err();
        assert_eq!(err, GestureError::UnknownSection("awards".into()));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_layout_must_cover_every_section() {
        let mut drag = DragController::new();
        let err = drag
            .start(
                &seed_document(),
                "skills",
                Some(5.0),
                Some(vec![Slot { top: 0.0, height: 10.0 }]),
            )
            .unwrap_err();
        assert_eq!(
            err,
            GestureError::LayoutMismatch {
                expected: 3,
                got: 1
            }
        );
    }

    #[test]
    fn test_key_steps_clamp_at_edges() {
        let doc = seed_document();
        let mut drag = DragController::new();
        drag.start(&doc, "skills", None, None).unwrap();
        assert_eq!(drag.key_step(Direction::Up).unwrap(), Some(0));
        drag.key_step(Direction::Down).unwrap();
        drag.key_step(Direction::Down).unwrap();
        assert_eq!(drag.key_step(Direction::Down).unwrap(), Some(2));
        let dropped = moved_document(drag.drop_on(&doc).unwrap());
        assert_eq!(dropped.ordered_ids(), vec!["experience", "education", "skills"]);
    }

    #[test]
    fn test_drop_after_section_list_changed_is_stale() {
        let doc = seed_document();
        let mut drag = DragController::new();
        drag.start(&doc, "skills", None, None).unwrap();
        drag.key_step(Direction::Down).unwrap();

        let changed = add_section(&doc, SectionKind::Projects, "");
        assert_eq!(
            drag.drop_on(&changed).unwrap(),
            DropOutcome::Unchanged(Unchanged::Stale)
        );
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_handle_dispatches_events() {
        let doc = seed_document();
        let mut drag = DragController::new();
        let start: GestureEvent = serde_json::from_str(
            r#"{"type": "start", "sectionId": "education", "pointer": 2.5}"#,
        )
        .unwrap();
        assert_eq!(drag.handle(&doc, start).unwrap(), None);
        assert_eq!(
            drag.handle(&doc, GestureEvent::PointerMove { y: 0.2 }).unwrap(),
            None
        );
        let outcome = drag.handle(&doc, GestureEvent::Drop).unwrap().unwrap();
        assert_eq!(
            moved_document(outcome).ordered_ids(),
            vec!["education", "skills", "experience"]
        );
    }
}
