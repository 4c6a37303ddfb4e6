//! Pointer interaction with stickers: drag, scale and rotate.
//!
//! One session per pointer capture. Moves from any other pointer, or while
//! idle, produce no update.

use serde::{Deserialize, Serialize};

use super::{Sticker, MAX_STICKER_SCALE, MIN_STICKER_SCALE};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn angle_from(self, center: Point) -> f64 {
        (self.y - center.y).atan2(self.x - center.x)
    }
}

/// Partial sticker change; `None` fields are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StickerUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
    pub rotation: Option<f64>,
}

impl StickerUpdate {
    pub fn apply(&self, sticker: &mut Sticker) {
        if let Some(x) = self.x {
            sticker.x = x;
        }
        if let Some(y) = self.y {
            sticker.y = y;
        }
        if let Some(s) = self.scale {
            sticker.scale = s;
        }
        if let Some(r) = self.rotation {
            sticker.rotation = r;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Interaction {
    Idle,
    Dragging { id: u64, pointer_start: Point, origin: Point },
    Scaling { id: u64, center: Point, start_distance: f64, start_scale: f64 },
    Rotating { id: u64, center: Point, start_angle: f64, start_rotation: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSession {
    state: Interaction,
    pointer_id: Option<u32>,
    bounds: (f64, f64),
}

impl InteractionSession {
    /// `bounds` is the preview size stickers are kept inside while dragging.
    pub fn new(bounds: (f64, f64)) -> Self {
        Self { state: Interaction::Idle, pointer_id: None, bounds: (bounds.0.max(0.0), bounds.1.max(0.0)) }
    }

    pub fn is_idle(&self) -> bool {
        self.state == Interaction::Idle
    }

    /// Sticker currently captured, if any.
    pub fn active_sticker(&self) -> Option<u64> {
        match self.state {
            Interaction::Idle => None,
            Interaction::Dragging { id, .. }
            | Interaction::Scaling { id, .. }
            | Interaction::Rotating { id, .. } => Some(id),
        }
    }

    pub fn begin_drag(&mut self, pointer_id: u32, sticker: &Sticker, pointer: Point) {
        self.capture(
            pointer_id,
            Interaction::Dragging { id: sticker.id, pointer_start: pointer, origin: Point::new(sticker.x, sticker.y) },
        );
    }

    /// `center` is the sticker's on-screen centre.
    pub fn begin_scale(&mut self, pointer_id: u32, sticker: &Sticker, center: Point, pointer: Point) {
        self.capture(
            pointer_id,
            Interaction::Scaling {
                id: sticker.id,
                center,
                start_distance: pointer.distance_to(center),
                start_scale: sticker.scale,
            },
        );
    }

    pub fn begin_rotate(&mut self, pointer_id: u32, sticker: &Sticker, center: Point, pointer: Point) {
        self.capture(
            pointer_id,
            Interaction::Rotating {
                id: sticker.id,
                center,
                start_angle: pointer.angle_from(center),
                start_rotation: sticker.rotation,
            },
        );
    }

    fn capture(&mut self, pointer_id: u32, state: Interaction) {
        if !self.is_idle() {
            log::debug!("pointer {} replaced an active sticker interaction", pointer_id);
        }
        self.pointer_id = Some(pointer_id);
        self.state = state;
    }

    /// Translate a pointer move into a sticker update.
    pub fn pointer_move(&self, pointer_id: u32, pointer: Point) -> Option<(u64, StickerUpdate)> {
        if self.pointer_id != Some(pointer_id) {
            return None;
        }
        match self.state {
            Interaction::Idle => None,
            Interaction::Dragging { id, pointer_start, origin } => {
                let x = (origin.x + pointer.x - pointer_start.x).clamp(0.0, self.bounds.0);
                let y = (origin.y + pointer.y - pointer_start.y).clamp(0.0, self.bounds.1);
                Some((id, StickerUpdate { x: Some(x), y: Some(y), ..Default::default() }))
            }
            Interaction::Scaling { id, center, start_distance, start_scale } => {
                let ratio = if start_distance > 0.0 { pointer.distance_to(center) / start_distance } else { 1.0 };
                let scale = (start_scale * ratio).clamp(MIN_STICKER_SCALE, MAX_STICKER_SCALE);
                Some((id, StickerUpdate { scale: Some(scale), ..Default::default() }))
            }
            Interaction::Rotating { id, center, start_angle, start_rotation } => {
                let delta = pointer.angle_from(center) - start_angle;
                Some((id, StickerUpdate { rotation: Some(start_rotation + delta.to_degrees()), ..Default::default() }))
            }
        }
    }

    /// End the capture; only the capturing pointer can release it.
    pub fn release(&mut self, pointer_id: u32) {
        if self.pointer_id == Some(pointer_id) {
            self.state = Interaction::Idle;
            self.pointer_id = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sticker() -> Sticker {
        Sticker { id: 1, symbol: "🔥".into(), x: 180.0, y: 240.0, scale: 1.0, rotation: 0.0 }
    }

    #[test]
    fn idle_moves_do_nothing() {
        let s = InteractionSession::new((360.0, 480.0));
        assert!(s.pointer_move(0, Point::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn drag_is_clamped_to_bounds() {
        let mut s = InteractionSession::new((360.0, 480.0));
        s.begin_drag(1, &sticker(), Point::new(200.0, 250.0));
        let (id, up) = s.pointer_move(1, Point::new(210.0, 230.0)).unwrap();
        assert_eq!(id, 1);
        assert_eq!((up.x, up.y), (Some(190.0), Some(220.0)));
        let (_, up) = s.pointer_move(1, Point::new(1000.0, -500.0)).unwrap();
        assert_eq!((up.x, up.y), (Some(360.0), Some(0.0)));
        // other pointers are ignored
        assert!(s.pointer_move(2, Point::new(0.0, 0.0)).is_none());
        s.release(1);
        assert!(s.is_idle());
    }

    #[test]
    fn degenerate_bounds_pin_drag_to_origin() {
        let mut s = InteractionSession::new((-10.0, f64::NAN));
        s.begin_drag(1, &sticker(), Point::new(0.0, 0.0));
        let (_, up) = s.pointer_move(1, Point::new(50.0, 50.0)).unwrap();
        assert_eq!((up.x, up.y), (Some(0.0), Some(0.0)));
    }

    #[test]
    fn scale_follows_distance_and_clamps() {
        let mut s = InteractionSession::new((360.0, 480.0));
        let c = Point::new(100.0, 100.0);
        s.begin_scale(7, &sticker(), c, Point::new(110.0, 100.0));
        let (_, up) = s.pointer_move(7, Point::new(120.0, 100.0)).unwrap();
        assert_eq!(up.scale, Some(2.0));
        let (_, up) = s.pointer_move(7, Point::new(200.0, 100.0)).unwrap();
        assert_eq!(up.scale, Some(MAX_STICKER_SCALE));
        let (_, up) = s.pointer_move(7, Point::new(100.5, 100.0)).unwrap();
        assert_eq!(up.scale, Some(MIN_STICKER_SCALE));
    }

    #[test]
    fn zero_start_distance_keeps_scale() {
        let mut s = InteractionSession::new((360.0, 480.0));
        let c = Point::new(100.0, 100.0);
        s.begin_scale(1, &sticker(), c, c);
        let (_, up) = s.pointer_move(1, Point::new(300.0, 100.0)).unwrap();
        assert_eq!(up.scale, Some(1.0));
    }

    #[test]
    fn rotate_adds_angle_delta_in_degrees() {
        let mut s = InteractionSession::new((360.0, 480.0));
        let c = Point::new(0.0, 0.0);
        s.begin_rotate(1, &sticker(), c, Point::new(10.0, 0.0));
        let (_, up) = s.pointer_move(1, Point::new(0.0, 10.0)).unwrap();
        assert!((up.rotation.unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(s.active_sticker(), Some(1));
        s.release(3);
        assert!(!s.is_idle());
    }
}
