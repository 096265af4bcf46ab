//! Virtualized vertical list for the terminal.
//!
//! Items are addressed by their combined index and measured in rows. The
//! view knows nothing about what the rows contain: the UI hands it row
//! extents on every layout pass and gets back the visible window.

use std::time::{Duration, Instant};

use crate::observe::Observable;

/// Position of one visible item, as fractions of the viewport height.
/// 0.0 is the top edge of the viewport and 1.0 the bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPosition {
    pub index: usize,
    pub leading_edge: f32,
    pub trailing_edge: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curve {
    Linear,
    #[default]
    EaseInOut,
}

impl Curve {
    pub fn transform(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Linear => t,
            // cubic ease-in-out
            Curve::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub index: usize,
    pub duration: Duration,
    pub curve: Curve,
    /// Where the item's top edge should land, as a fraction of the viewport.
    pub alignment: f32,
}

/// The list surface the scroll/focus controller drives.
pub trait VirtualList {
    /// True once the list has completed a layout pass.
    fn is_attached(&self) -> bool;
    fn scroll_to(&mut self, request: ScrollRequest);
    fn item_positions(&self) -> &Observable<Vec<ItemPosition>>;
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
    curve: Curve,
}

#[derive(Debug)]
pub struct ScrollView {
    extents: Vec<u16>,
    viewport_height: u16,
    offset: f32,
    attached: bool,
    animation: Option<Animation>,
    positions: Observable<Vec<ItemPosition>>,
    last_positions: Vec<ItemPosition>,
}

impl ScrollView {
    pub fn new() -> Self {
        Self {
            extents: Vec::new(),
            viewport_height: 0,
            offset: 0.0,
            attached: false,
            animation: None,
            positions: Observable::new(),
            last_positions: Vec::new(),
        }
    }

    /// Measure the list. The first call attaches the view. Positions are
    /// re-emitted whenever the visible window changed.
    pub fn layout(&mut self, viewport_height: u16, extents: Vec<u16>) {
        self.viewport_height = viewport_height;
        self.extents = extents;
        self.offset = self.offset.clamp(0.0, self.max_offset() as f32);
        self.attached = true;

        let positions = self.compute_positions();
        if positions != self.last_positions || self.positions.latest().is_none() {
            self.last_positions = positions.clone();
            self.positions.emit(positions);
        }
    }

    /// Advance a running animation. Returns true while one is in flight.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        let elapsed = now.saturating_duration_since(anim.started);
        let t = if anim.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f32() / anim.duration.as_secs_f32()
        };
        let eased = anim.curve.transform(t);
        self.offset = anim.from + (anim.to - anim.from) * eased;
        if t >= 1.0 {
            self.offset = anim.to;
            self.animation = None;
        }
        self.animation.is_some()
    }

    pub fn scroll_by(&mut self, rows: i32) {
        self.animation = None;
        let target = self.offset.round() + rows as f32;
        self.offset = target.clamp(0.0, self.max_offset() as f32);
    }

    /// Jump just far enough for `index` to be fully on screen.
    pub fn ensure_visible(&mut self, index: usize) {
        if index >= self.extents.len() {
            return;
        }
        self.animation = None;
        let top = self.item_top(index) as f32;
        let bottom = top + self.extents[index] as f32;
        let height = self.viewport_height as f32;
        if top < self.offset {
            self.offset = top;
        } else if bottom > self.offset + height {
            self.offset = (bottom - height).min(top);
        }
        self.offset = self.offset.clamp(0.0, self.max_offset() as f32);
    }

    /// First row of the viewport.
    pub fn offset_rows(&self) -> usize {
        self.offset.round().max(0.0) as usize
    }

    pub fn content_height(&self) -> usize {
        self.extents.iter().map(|&h| h as usize).sum()
    }

    pub fn viewport_height(&self) -> u16 {
        self.viewport_height
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Target offset of the animation in flight, if any.
    #[cfg(test)]
    pub fn animation_target(&self) -> Option<usize> {
        self.animation.map(|a| a.to.round() as usize)
    }

    /// Visible items with the row (relative to the viewport, may be
    /// negative) their first line is drawn at.
    pub fn visible_items(&self) -> Vec<(usize, i32)> {
        let offset = self.offset_rows() as i32;
        let height = self.viewport_height as i32;
        let mut out = Vec::new();
        let mut top = 0i32;
        for (i, &h) in self.extents.iter().enumerate() {
            let bottom = top + h as i32;
            if bottom > offset && top < offset + height {
                out.push((i, top - offset));
            }
            if top >= offset + height {
                break;
            }
            top = bottom;
        }
        out
    }

    /// Combined index of the item covering a viewport row.
    pub fn item_at_row(&self, row: u16) -> Option<usize> {
        let target = self.offset_rows() + row as usize;
        let mut top = 0usize;
        for (i, &h) in self.extents.iter().enumerate() {
            if target < top + h as usize {
                return Some(i);
            }
            top += h as usize;
        }
        None
    }

    fn item_top(&self, index: usize) -> usize {
        self.extents[..index.min(self.extents.len())]
            .iter()
            .map(|&h| h as usize)
            .sum()
    }

    fn max_offset(&self) -> usize {
        self.content_height()
            .saturating_sub(self.viewport_height as usize)
    }

    fn compute_positions(&self) -> Vec<ItemPosition> {
        if self.viewport_height == 0 {
            return Vec::new();
        }
        let height = self.viewport_height as f32;
        self.visible_items()
            .into_iter()
            .map(|(index, rel_top)| {
                let leading = rel_top as f32 / height;
                let trailing =
                    (rel_top + self.extents[index] as i32) as f32 / height;
                ItemPosition {
                    index,
                    leading_edge: leading,
                    trailing_edge: trailing,
                }
            })
            .collect()
    }
}

impl Default for ScrollView {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualList for ScrollView {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn scroll_to(&mut self, request: ScrollRequest) {
        if request.index >= self.extents.len() {
            log::warn!(
                "scroll target {} beyond list of {} items",
                request.index,
                self.extents.len()
            );
            return;
        }
        let top = self.item_top(request.index) as f32;
        let lead = request.alignment * self.viewport_height as f32;
        let target = (top - lead).round().clamp(0.0, self.max_offset() as f32);
        log::debug!(
            "scrolling to item {} (offset {} -> {}) over {:?}",
            request.index,
            self.offset,
            target,
            request.duration
        );
        self.animation = Some(Animation {
            from: self.offset,
            to: target,
            started: Instant::now(),
            duration: request.duration,
            curve: request.curve,
        });
    }

    fn item_positions(&self) -> &Observable<Vec<ItemPosition>> {
        &self.positions
    }
}
