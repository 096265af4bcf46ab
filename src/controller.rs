//! Initial positioning and marker-driven scrolling for the form screen.
//!
//! On the first data notification the controller picks the question the
//! user should start on (first unanswered or invalid item, else the first
//! editable one), waits for the list to report where things landed, and
//! scrolls there once if the item is not comfortably on screen. After that
//! it only moves the list in response to markers.

use std::time::Duration;

use crate::form::FormModel;
use crate::list::{ListComposition, Segment};
use crate::model::Marker;
use crate::observe::SubscriptionId;
use crate::schedule::FrameScheduler;
use crate::scroll::{Curve, ItemPosition, ScrollRequest, VirtualList};

/// An item whose top edge sits lower than this fraction of the viewport
/// does not count as already visible.
pub const VISIBLE_LEADING_EDGE_LIMIT: f32 = 0.35;

/// Where a scrolled-to item's top edge lands.
pub const SCROLL_ALIGNMENT: f32 = 0.3;

const BASE_SCROLL_MS: u64 = 1000;
const PER_ITEM_SCROLL_MS: u64 = 100;
const FAST_SCROLL_ITEMS: usize = 10;

/// Animation length for scrolling to `index`: flat for the first few
/// items, then growing linearly with distance.
pub fn scroll_duration(index: usize) -> Duration {
    let extra = index.saturating_sub(FAST_SCROLL_ITEMS) as u64;
    Duration::from_millis(BASE_SCROLL_MS.saturating_add(extra.saturating_mul(PER_ITEM_SCROLL_MS)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded { focus_index: Option<usize> },
    /// The one-time initial positioning has run.
    Positioned { focus_index: Option<usize> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    ScrollTo(usize),
    RequestFocus(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    Scrolled { index: usize, duration: Duration },
    NotLoaded,
    NotAttached,
    UnknownLinkId,
}

/// What the list should render at a combined index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEntry {
    Front(usize),
    Main { index: usize, autofocus: bool },
    Back(usize),
}

#[derive(Debug)]
pub struct ScrollFocusController {
    composition: ListComposition,
    state: LoadState,
    focussed: bool,
    /// A marker moved the list, so the initial positioning must not.
    marker_scrolled: bool,
    marker_sub: Option<SubscriptionId>,
    position_sub: Option<SubscriptionId>,
    frame_tasks: FrameScheduler<FrameTask>,
}

impl ScrollFocusController {
    pub fn new(composition: ListComposition) -> Self {
        Self {
            composition,
            state: LoadState::Unloaded,
            focussed: false,
            marker_scrolled: false,
            marker_sub: None,
            position_sub: None,
            frame_tasks: FrameScheduler::new(),
        }
    }

    pub fn composition(&self) -> ListComposition {
        self.composition
    }

    /// Number of entries the list must be built with.
    pub fn item_count(&self) -> usize {
        self.composition.total()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state != LoadState::Unloaded
    }

    pub fn is_positioned(&self) -> bool {
        matches!(self.state, LoadState::Positioned { .. })
    }

    pub fn is_focussed(&self) -> bool {
        self.focussed
    }

    /// Record that input focus was placed elsewhere, so the focus target
    /// no longer asks for it when built.
    pub fn claim_focus(&mut self) {
        self.focussed = true;
    }

    pub fn focus_index(&self) -> Option<usize> {
        match self.state {
            LoadState::Unloaded => None,
            LoadState::Loaded { focus_index } | LoadState::Positioned { focus_index } => {
                focus_index
            }
        }
    }

    pub fn is_waiting_for_positions(&self) -> bool {
        self.position_sub.is_some()
    }

    /// Called whenever the form's data is (re)published. Only the first
    /// call does anything.
    pub fn on_data_available<M: FormModel, L: VirtualList>(&mut self, model: &M, list: &L) {
        if self.state != LoadState::Unloaded {
            return;
        }

        self.marker_sub = Some(model.markers().subscribe());

        let focus_index = model
            .index_of(&|item| item.is_unanswered || item.is_invalid)
            .or_else(|| model.index_of(&|item| !item.is_read_only));
        self.state = LoadState::Loaded { focus_index };
        log::debug!("form loaded, initial focus {:?}", focus_index);

        match focus_index {
            Some(index) if index > 0 => {
                self.position_sub = Some(list.item_positions().subscribe());
            }
            _ => {}
        }
    }

    /// Produce the entry for a combined index. Building the focus target
    /// for the first time queues a focus request for after the frame.
    pub fn build_item(&mut self, index: usize) -> ListEntry {
        match self.composition.locate(index) {
            Segment::Front(i) => ListEntry::Front(i),
            Segment::Back(i) => ListEntry::Back(i),
            Segment::Main(i) => {
                let autofocus = !self.focussed && self.focus_index() == Some(i);
                if autofocus {
                    self.focussed = true;
                    self.frame_tasks
                        .schedule_post_frame(FrameTask::RequestFocus(i));
                }
                ListEntry::Main {
                    index: i,
                    autofocus,
                }
            }
        }
    }

    /// One-shot handler for the list's first position report after load.
    /// Returns false when no listener was registered, so the report was
    /// ignored.
    pub fn on_item_positions<L: VirtualList>(
        &mut self,
        positions: &[ItemPosition],
        list: &L,
    ) -> bool {
        let Some(sub) = self.position_sub.take() else {
            return false;
        };
        list.item_positions().unsubscribe(sub);

        let focus_index = self.focus_index();
        self.state = LoadState::Positioned { focus_index };

        let Some(target) = focus_index else {
            return true;
        };
        let global = self.composition.main_to_global(target);
        let visible = positions
            .iter()
            .any(|p| p.index == global && p.leading_edge < VISIBLE_LEADING_EDGE_LIMIT);
        if visible {
            log::debug!("item {} already visible, not scrolling", target);
        } else if self.marker_scrolled {
            log::debug!("list already moved to a marker, not scrolling to item {}", target);
        } else {
            self.frame_tasks
                .schedule_post_frame(FrameTask::ScrollTo(target));
        }
        true
    }

    /// Animate the list to a main-segment item.
    pub fn scroll_to_index<L: VirtualList>(&mut self, index: usize, list: &mut L) -> ScrollOutcome {
        if !list.is_attached() {
            log::info!("list not attached yet, dropping scroll to item {}", index);
            return ScrollOutcome::NotAttached;
        }
        let duration = scroll_duration(index);
        list.scroll_to(ScrollRequest {
            index: self.composition.main_to_global(index),
            duration,
            curve: Curve::EaseInOut,
            alignment: SCROLL_ALIGNMENT,
        });
        ScrollOutcome::Scrolled { index, duration }
    }

    pub fn scroll_to_marker<M: FormModel, L: VirtualList>(
        &mut self,
        marker: &Marker,
        model: &M,
        list: &mut L,
    ) -> ScrollOutcome {
        if !self.is_loaded() {
            log::info!("form not loaded yet, ignoring marker '{}'", marker.link_id);
            return ScrollOutcome::NotLoaded;
        }
        let link_id = marker.link_id.as_str();
        match model.index_of(&|item| item.link_id == link_id) {
            Some(index) => {
                let outcome = self.scroll_to_index(index, list);
                if matches!(outcome, ScrollOutcome::Scrolled { .. }) {
                    self.marker_scrolled = true;
                    self.frame_tasks
                        .retain(|task| !matches!(task, FrameTask::ScrollTo(_)));
                }
                outcome
            }
            None => {
                log::warn!("marker refers to unknown link_id '{}'", link_id);
                ScrollOutcome::UnknownLinkId
            }
        }
    }

    /// Dispatch everything the model and list emitted since the last call.
    ///
    /// A successful marker scroll wins over the initial positioning, in
    /// whichever order the two arrive.
    pub fn pump<M: FormModel, L: VirtualList>(&mut self, model: &M, list: &mut L) {
        if let Some(sub) = self.marker_sub {
            for batch in model.markers().drain(sub) {
                if let Some(first) = batch.first() {
                    self.scroll_to_marker(first, model, list);
                }
            }
        }

        if let Some(sub) = self.position_sub {
            for positions in list.item_positions().drain(sub) {
                if !self.on_item_positions(&positions, &*list) {
                    break;
                }
            }
        }
    }

    /// Run work deferred to the end of the frame. Returns the item that
    /// should receive input focus, if one was requested.
    pub fn run_post_frame<L: VirtualList>(&mut self, list: &mut L) -> Option<usize> {
        let mut focus = None;
        for task in self.frame_tasks.take_ready() {
            match task {
                FrameTask::ScrollTo(index) => {
                    self.scroll_to_index(index, list);
                }
                FrameTask::RequestFocus(index) => focus = Some(index),
            }
        }
        focus
    }

    /// Drop every subscription so nothing fires after the page is gone.
    pub fn dispose<M: FormModel, L: VirtualList>(&mut self, model: &M, list: &L) {
        if let Some(sub) = self.marker_sub.take() {
            model.markers().unsubscribe(sub);
        }
        if let Some(sub) = self.position_sub.take() {
            list.item_positions().unsubscribe(sub);
        }
        self.frame_tasks.clear();
    }
}
