//! Leptos Kanban DnD
//!
//! Mouse-event drag-and-drop for kanban columns. A press only becomes a drag
//! after the pointer moves past the threshold, so plain clicks on a card
//! still reach it. While dragging, the hovered column measures its cards and
//! the drop index follows the pointer.
//!
//! All gesture state lives in a [`kanban_core::DragSession`]; this crate only
//! feeds it DOM events and measurements.

use kanban_core::{visible_boxes, BoundingBox, ColumnId, DragSession, DropRequest, TaskId};
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Attribute every draggable card element carries
pub const TASK_ID_ATTR: &str = "data-task-id";

/// Attribute every column element carries; mouseup resolves the drop column from it
pub const COLUMN_ID_ATTR: &str = "data-column-id";

/// Delay before clicks are accepted again after a drop
const CLICK_SUPPRESS_MS: u32 = 100;

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub session_read: ReadSignal<DragSession>,
    pub session_write: WriteSignal<DragSession>,
    /// Set right after a drag ends so the trailing click can be ignored
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
}

impl DndSignals {
    /// Whether `task_id` is the card being dragged (tracked)
    pub fn is_dragging_task(&self, task_id: &TaskId) -> bool {
        self.session_read.with(|s| s.dragged_task_id() == Some(task_id))
    }

    /// Whether any card is being dragged (tracked)
    pub fn is_dragging(&self) -> bool {
        self.session_read.with(DragSession::is_dragging)
    }

    pub fn is_target_column(&self, column_id: &ColumnId) -> bool {
        self.session_read.with(|s| s.is_target_column(column_id))
    }

    /// Where the drop indicator goes in `column_id`, given the column's
    /// cards in display order (tracked)
    pub fn indicator_slot(&self, column_id: &ColumnId, task_ids: &[TaskId]) -> Option<IndicatorSlot> {
        self.session_read.with(|s| {
            let index = s.indicator_index(column_id)?;
            Some(indicator_slot(s.dragged_task_id(), index, task_ids))
        })
    }

    /// True for a short moment after a drop or cancel
    pub fn drag_just_ended(&self) -> bool {
        self.drag_just_ended_read.get_untracked()
    }
}

pub fn create_dnd_signals() -> DndSignals {
    let (session_read, session_write) = signal(DragSession::new());
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    DndSignals {
        session_read,
        session_write,
        drag_just_ended_read,
        drag_just_ended_write,
    }
}

/// Where to draw the drop indicator within a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorSlot {
    /// Directly above this card
    Before(TaskId),
    /// After the last card
    End,
}

/// Map a drop index (counted over the cards other than the dragged one) to
/// the card the indicator sits above
pub fn indicator_slot(dragged: Option<&TaskId>, index: usize, task_ids: &[TaskId]) -> IndicatorSlot {
    task_ids
        .iter()
        .filter(|id| Some(*id) != dragged)
        .nth(index)
        .map_or(IndicatorSlot::End, |id| IndicatorSlot::Before(id.clone()))
}

/// End drag operation, dropping all gesture state
pub fn end_drag(dnd: &DndSignals) {
    let was_dragging = dnd.session_read.with_untracked(DragSession::is_dragging);
    dnd.session_write.update(DragSession::end_drag);
    if was_dragging {
        suppress_clicks(dnd);
    }
}

/// Raise `drag_just_ended` and lower it again after a short delay
fn suppress_clicks(dnd: &DndSignals) {
    dnd.drag_just_ended_write.set(true);
    let clear = dnd.drag_just_ended_write;
    gloo_timers::callback::Timeout::new(CLICK_SUPPRESS_MS, move || clear.set(false)).forget();
}

/// Create mousedown handler for a card.
/// Records a pending drag with the press position.
pub fn make_on_card_mousedown(
    dnd: DndSignals,
    task_id: TaskId,
    column_id: ColumnId,
) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Controls inside the card keep their own behaviour
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some()
                || target.dyn_ref::<web_sys::HtmlButtonElement>().is_some()
                || target.dyn_ref::<web_sys::HtmlTextAreaElement>().is_some()
            {
                return;
            }
        }
        let (task_id, column_id) = (task_id.clone(), column_id.clone());
        dnd.session_write.update(|s| {
            s.press(task_id, column_id, f64::from(ev.client_x()), f64::from(ev.client_y()))
        });
    }
}

/// Create mousemove handler for a column's card list.
///
/// Measures the cards under the event's current target and recomputes the
/// drop index for the pointer.
pub fn make_on_column_mousemove(
    dnd: DndSignals,
    column_id: ColumnId,
) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |ev: web_sys::MouseEvent| {
        if !dnd.session_read.with_untracked(DragSession::is_dragging) {
            return;
        }
        let Some(container) = ev
            .current_target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        else {
            return;
        };

        let cards = measure_cards(&container);
        let pointer_y = f64::from(ev.client_y());
        dnd.session_write.maybe_update(|s| {
            let before = s.target().cloned();
            let boxes = visible_boxes(&cards, s.dragged_task_id());
            s.update_target(&column_id, pointer_y, &boxes);
            s.target() != before.as_ref()
        });
    }
}

/// Create mouseleave handler for a column
pub fn make_on_column_mouseleave(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.session_read.with_untracked(|s| s.target().is_some()) {
            dnd.session_write.update(DragSession::clear_target);
        }
    }
}

/// Bounding boxes of the cards rendered under `container`, in DOM order
fn measure_cards(container: &web_sys::Element) -> Vec<(TaskId, BoundingBox)> {
    let Ok(nodes) = container.query_selector_all(&format!("[{TASK_ID_ATTR}]")) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .filter_map(|el| {
            let id = el.get_attribute(TASK_ID_ATTR)?;
            let rect = el.get_bounding_client_rect();
            Some((TaskId::new(id), BoundingBox::new(rect.top(), rect.height())))
        })
        .collect()
}

/// Document mousemove: promotes a pending press to a drag past the threshold
pub fn bind_global_mousemove(dnd: DndSignals) {
    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        if !dnd.session_read.with_untracked(DragSession::is_pending) {
            return;
        }
        let (x, y) = (f64::from(ev.client_x()), f64::from(ev.client_y()));
        dnd.session_write.maybe_update(|s| s.pointer_moved(x, y));
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    }
    on_mousemove.forget();
}

/// Document keydown: Escape cancels the drag without a move
pub fn bind_escape_cancel(dnd: DndSignals) {
    let on_keydown = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |ev: web_sys::KeyboardEvent| {
        if ev.key() != "Escape" {
            return;
        }
        let active = dnd.session_read.with_untracked(|s| s.is_dragging() || s.is_pending());
        if active {
            log::debug!("drag cancelled with Escape");
            end_drag(&dnd);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
    }
    on_keydown.forget();
}

/// Column id read from a `data-column-id` attribute value
pub fn column_from_attr(raw: Option<String>) -> Option<ColumnId> {
    raw.filter(|id| !id.is_empty()).map(ColumnId::new)
}

/// Column under the pointer: the nearest `[data-column-id]` ancestor of the
/// event target
fn column_under(ev: &web_sys::MouseEvent) -> Option<ColumnId> {
    let target = ev.target()?.dyn_into::<web_sys::Element>().ok()?;
    let column = target.closest(&format!("[{COLUMN_ID_ATTR}]")).ok()??;
    column_from_attr(column.get_attribute(COLUMN_ID_ATTR))
}

/// Bind global mouseup handler for drop detection.
///
/// The column under the release point wins over the tracked target, so a
/// drag that never produced a column mousemove still drops (appending).
/// `on_drop` runs only for a real drag released over a column; releases
/// elsewhere cancel.
pub fn bind_global_mouseup<F>(dnd: DndSignals, on_drop: F)
where
    F: Fn(DropRequest) + 'static,
{
    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let (pending, dragging) = dnd
            .session_read
            .with_untracked(|s| (s.is_pending(), s.is_dragging()));
        if !pending && !dragging {
            return;
        }
        let hovered = if dragging { column_under(&ev) } else { None };
        let mut request = None;
        dnd.session_write.update(|s| request = s.drop_on(hovered.as_ref()));
        // A press that never became a drag stays a click
        if dragging {
            suppress_clicks(&dnd);
        }

        if let Some(request) = request {
            on_drop(request);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }
    on_mouseup.forget();

    // Also bind global mousemove and Escape
    bind_global_mousemove(dnd);
    bind_escape_cancel(dnd);
}
