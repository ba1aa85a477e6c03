//! Pointer tracking in normalized device coordinates
//!
//! A [`PointerHub`] stands in for the window-level event source. Every
//! animation instance that reacts to the pointer holds its own
//! [`PointerListener`], a single-slot cell that the hub overwrites on each
//! pointer move. The cell stays empty until the first move reaches it.
//! Dropping the listener deregisters it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Size of the drawing surface in device pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Viewport { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Latest pointer position, both axes in [-1, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

/// Maps device-pixel coordinates to normalized device coordinates.
///
/// `x` grows to the right and `y` grows upwards. Coordinates outside the
/// viewport are clamped to the edge; an empty viewport yields `None`.
pub fn normalize(client_x: f32, client_y: f32, viewport: Viewport) -> Option<PointerState> {
    if viewport.is_empty() || !client_x.is_finite() || !client_y.is_finite() {
        return None;
    }
    let x = (client_x / viewport.width as f32) * 2.0 - 1.0;
    let y = -(client_y / viewport.height as f32) * 2.0 + 1.0;
    Some(PointerState {
        x: x.clamp(-1.0, 1.0),
        y: y.clamp(-1.0, 1.0),
    })
}

type Slot = Rc<Cell<Option<PointerState>>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    slots: Vec<(u64, Weak<Cell<Option<PointerState>>>)>,
}

/// Window-level source of pointer-move notifications
#[derive(Clone, Default)]
pub struct PointerHub {
    registry: Rc<RefCell<Registry>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new listener with its own pointer cell
    pub fn subscribe(&self) -> PointerListener {
        let slot: Slot = Rc::new(Cell::new(None));
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.slots.push((id, Rc::downgrade(&slot)));
        log::trace!("pointer listener {} registered", id);
        PointerListener {
            id,
            slot,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Delivers a pointer move to every live listener, replacing its last value
    pub fn dispatch(&self, client_x: f32, client_y: f32, viewport: Viewport) {
        let Some(state) = normalize(client_x, client_y, viewport) else {
            return;
        };
        let registry = self.registry.borrow();
        for (_, slot) in &registry.slots {
            if let Some(slot) = slot.upgrade() {
                slot.set(Some(state));
            }
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().slots.len()
    }
}

/// Per-instance pointer cell, deregistered from its hub on drop
pub struct PointerListener {
    id: u64,
    slot: Slot,
    registry: Weak<RefCell<Registry>>,
}

impl PointerListener {
    /// Latest pointer position seen by this listener; `None` before the first move
    pub fn get(&self) -> Option<PointerState> {
        self.slot.get()
    }
}

impl Drop for PointerListener {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.borrow_mut();
            registry.slots.retain(|(id, _)| *id != self.id);
            log::trace!("pointer listener {} removed", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_corners() {
        let viewport = Viewport::new(200, 100);
        assert_eq!(
            normalize(0.0, 0.0, viewport),
            Some(PointerState { x: -1.0, y: 1.0 })
        );
        assert_eq!(
            normalize(200.0, 100.0, viewport),
            Some(PointerState { x: 1.0, y: -1.0 })
        );
        assert_eq!(
            normalize(100.0, 50.0, viewport),
            Some(PointerState { x: 0.0, y: 0.0 })
        );
    }

    #[test]
    fn test_normalize_stays_in_range() {
        for &(width, height) in &[(1u16, 1u16), (3, 7), (80, 24), (1920, 1080), (u16::MAX, 2)] {
            let viewport = Viewport::new(width, height);
            for &cx in &[-50.0f32, 0.0, 0.4, width as f32 / 3.0, width as f32, 1e6] {
                for &cy in &[-3.0f32, 0.0, height as f32 / 2.0, height as f32 + 10.0] {
                    let state = normalize(cx, cy, viewport).unwrap();
                    assert!((-1.0..=1.0).contains(&state.x), "x={} for {}", state.x, cx);
                    assert!((-1.0..=1.0).contains(&state.y), "y={} for {}", state.y, cy);
                }
            }
        }
    }

    #[test]
    fn test_normalize_empty_viewport() {
        assert_eq!(normalize(1.0, 1.0, Viewport::new(0, 10)), None);
        assert_eq!(normalize(f32::NAN, 1.0, Viewport::new(10, 10)), None);
    }

    #[test]
    fn test_last_write_wins() {
        let hub = PointerHub::new();
        let listener = hub.subscribe();
        let viewport = Viewport::new(100, 100);
        hub.dispatch(10.0, 10.0, viewport);
        hub.dispatch(75.0, 25.0, viewport);
        assert_eq!(listener.get(), Some(PointerState { x: 0.5, y: 0.5 }));
    }

    #[test]
    fn test_listeners_are_independent_cells() {
        let hub = PointerHub::new();
        let early = hub.subscribe();
        hub.dispatch(100.0, 0.0, Viewport::new(100, 100));
        let late = hub.subscribe();
        assert_eq!(early.get(), Some(PointerState { x: 1.0, y: 1.0 }));
        assert_eq!(late.get(), None);
    }

    #[test]
    fn test_empty_until_first_move() {
        let hub = PointerHub::new();
        let listener = hub.subscribe();
        assert_eq!(listener.get(), None);
        // Moves on an empty viewport are dropped
        hub.dispatch(5.0, 5.0, Viewport::new(0, 0));
        assert_eq!(listener.get(), None);
        hub.dispatch(50.0, 50.0, Viewport::new(100, 100));
        assert_eq!(listener.get(), Some(PointerState { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn test_drop_deregisters() {
        let hub = PointerHub::new();
        let first = hub.subscribe();
        let second = hub.subscribe();
        assert_eq!(hub.listener_count(), 2);
        drop(first);
        assert_eq!(hub.listener_count(), 1);
        drop(second);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_listener_outlives_hub() {
        let hub = PointerHub::new();
        let listener = hub.subscribe();
        drop(hub);
        assert_eq!(listener.get(), None);
    }
}
