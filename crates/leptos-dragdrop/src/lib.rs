//! Leptos DragDrop Utilities
//!
//! Mouse-event drag and drop for Leptos. The element kinds being dragged and
//! dropped onto are type parameters, so a finished gesture arrives already
//! tagged and the caller never parses element ids.
//! Uses a movement threshold to tell a click from a drag.

mod tracker;

pub use tracker::{DropEvent, GestureTracker, DRAG_THRESHOLD_PX};

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// How long `drag_just_ended` stays set so the trailing click can be ignored
const CLICK_SUPPRESS_MS: i32 = 100;

/// DnD state signals
pub struct DndSignals<S: 'static, T: 'static> {
    pub tracker: RwSignal<GestureTracker<S, T>>,
    pub drag_just_ended: RwSignal<bool>,
}

impl<S: 'static, T: 'static> Clone for DndSignals<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: 'static, T: 'static> Copy for DndSignals<S, T> {}

impl<S, T> DndSignals<S, T>
where
    S: Copy + Send + Sync + 'static,
    T: Copy + Send + Sync + 'static,
{
    /// Element being dragged, for highlighting
    pub fn dragging(&self) -> Option<S> {
        self.tracker.with(|t| t.dragging())
    }

    pub fn hover(&self) -> Option<T> {
        self.tracker.with(|t| t.hover())
    }
}

pub fn create_dnd_signals<S, T>() -> DndSignals<S, T>
where
    S: Copy + Send + Sync + 'static,
    T: Copy + Send + Sync + 'static,
{
    DndSignals {
        tracker: RwSignal::new(GestureTracker::new()),
        drag_just_ended: RwSignal::new(false),
    }
}

/// Mark the end of a gesture and clear the flag shortly after
fn end_drag<S, T>(dnd: DndSignals<S, T>)
where
    S: Copy + Send + Sync + 'static,
    T: Copy + Send + Sync + 'static,
{
    dnd.drag_just_ended.set(true);

    if let Some(win) = web_sys::window() {
        let flag = dnd.drag_just_ended;
        let cb = Closure::<dyn FnMut()>::new(move || {
            flag.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            CLICK_SUPPRESS_MS,
        );
        cb.forget();
    }
}

/// Mousedown handler for a draggable element
pub fn make_on_mousedown<S, T>(dnd: DndSignals<S, T>, source: S) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    S: Copy + Send + Sync + 'static,
    T: Copy + Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Inputs and buttons inside a card keep their own behavior
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() {
                return;
            }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() {
                return;
            }
        }
        dnd.tracker.update(|t| t.press(source, ev.client_x(), ev.client_y()));
    }
}

/// Mouseenter handler for a drop target
pub fn make_on_target_mouseenter<S, T>(dnd: DndSignals<S, T>, target: T) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    S: Copy + Send + Sync + 'static,
    T: Copy + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.tracker.with_untracked(|t| t.is_dragging()) {
            dnd.tracker.update(|t| t.enter(target));
        }
    }
}

pub fn make_on_mouseleave<S, T>(dnd: DndSignals<S, T>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    S: Copy + Send + Sync + 'static,
    T: Copy + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.tracker.with_untracked(|t| t.is_dragging()) {
            dnd.tracker.update(|t| t.leave());
        }
    }
}

fn bind_document_listener(event: &str, handler: &Closure<dyn FnMut(web_sys::MouseEvent)>) {
    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback(event, handler.as_ref().unchecked_ref());
    }
}

/// Document mousemove: promotes a pending press to a drag past the threshold
fn bind_global_mousemove<S, T>(dnd: DndSignals<S, T>)
where
    S: Copy + Send + Sync + 'static,
    T: Copy + Send + Sync + 'static,
{
    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let mut started = false;
        dnd.tracker.update_untracked(|t| started = t.motion(ev.client_x(), ev.client_y()));
        if started {
            dnd.tracker.notify();
        }
    });
    bind_document_listener("mousemove", &on_mousemove);
    on_mousemove.forget();
}

/// Bind document-level mouseup (and mousemove) for drop detection.
/// `on_drop` only runs for real drags; the target is None when the pointer
/// was released over nothing.
pub fn bind_global_mouseup<S, T, F>(dnd: DndSignals<S, T>, on_drop: F)
where
    S: Copy + Send + Sync + 'static,
    T: Copy + Send + Sync + 'static,
    F: Fn(DropEvent<S, T>) + 'static,
{
    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let mut finished = None;
        dnd.tracker.update(|t| finished = t.release());
        end_drag(dnd);
        if let Some(event) = finished {
            on_drop(event);
        }
    });
    bind_document_listener("mouseup", &on_mouseup);
    on_mouseup.forget();

    bind_global_mousemove(dnd);
}
