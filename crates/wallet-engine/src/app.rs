#![forbid(unsafe_code)]

//! Top-level controller.
//!
//! [`WalletApp`] owns the application state and every component, routes
//! canonical input events to them, and drives deferred work from
//! [`WalletApp::tick`]. All mutation happens inside one handler call at a
//! time; continuations (reflow play, removal commit, entrance phases) are
//! messages on the [`Scheduler`].
//!
//! # Tick order
//!
//! 1. Advance node tweens and the removal effect by the elapsed time.
//! 2. Run frame messages queued before this tick (reflow Play).
//! 3. Run timers that came due (removal commits, entrance phases). Any
//!    reflow they invert plays on the next tick.

use std::collections::BTreeSet;
use std::time::Duration;

use tracing::{debug, info};
use wallet_core::animation::stagger::stagger_delay;
use wallet_core::event::{Event, KeyCode, KeyEvent, PointerEvent, PointerEventKind};
use wallet_core::geometry::{Point, Rect};

use crate::card::{CardId, CardRecord};
use crate::config::WalletConfig;
use crate::details::DetailsView;
use crate::drag::DragController;
use crate::effects::{Piece, RemovalEffect, ShredEffect};
use crate::feedback::{Feedback, FeedbackCue};
use crate::filter::FilterProjector;
use crate::generator::CardGenerator;
use crate::reflow::ReflowAnimator;
use crate::render::render_all;
use crate::scheduler::{Scheduler, TaskOwner};
use crate::snapshot::capture_all;
use crate::store::CardStore;
use crate::view::{EntrancePhase, HitRegion, NodeKey, Tilt, ViewTree};

/// Deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMsg {
    /// Remove a shredded card from the store and the view.
    CommitRemoval(CardId),
    /// Play phase of a pending reflow.
    ReflowFrame,
    EntranceStart(NodeKey),
    EntranceEnd(NodeKey),
}

/// Grid or stacked presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    Stack,
}

impl ViewMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::Stack,
            Self::Stack => Self::Grid,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Grid => "Grille",
            Self::Stack => "Pile",
        }
    }
}

/// How a drag session ended. Only a release counts as a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragEnd {
    Release,
    Abort,
}

/// Things that happened, for embedders to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletSignal {
    /// A drag moved a card to a different position.
    Reordered { card: CardId, from: usize, to: usize },
    Removed(CardId),
    DetailsOpened(CardId),
    DetailsClosed,
    ViewModeChanged(ViewMode),
}

/// Application state owned by [`WalletApp`].
#[derive(Debug)]
pub struct WalletState {
    pub store: CardStore,
    pub filter: FilterProjector,
    pub view: ViewTree,
    pub view_mode: ViewMode,
    pub details: Option<DetailsView>,
    /// Cards whose removal is scheduled but not yet committed.
    pub pending_removals: BTreeSet<CardId>,
    pub hovered: Option<CardId>,
}

/// The card wallet.
pub struct WalletApp {
    state: WalletState,
    config: WalletConfig,
    drag: DragController,
    reflow: ReflowAnimator,
    scheduler: Scheduler<AppMsg>,
    removal: Box<dyn RemovalEffect>,
    feedback: Feedback,
    frame_requested: bool,
    last_tick: Duration,
    signals: Vec<WalletSignal>,
}

impl std::fmt::Debug for WalletApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletApp")
            .field("cards", &self.state.store.len())
            .field("rendered", &self.state.view.len())
            .field("dragging", &self.drag.is_active())
            .field("pending_removals", &self.state.pending_removals.len())
            .finish_non_exhaustive()
    }
}

impl WalletApp {
    /// Generate `config.card_count` cards and render them into `viewport`.
    #[must_use]
    pub fn new(config: WalletConfig, viewport: Rect) -> Self {
        let records = CardGenerator::new(config.seed).cards(config.card_count);
        Self::with_records(config, viewport, records)
    }

    /// Start from explicit records.
    #[must_use]
    pub fn with_records(
        config: WalletConfig,
        viewport: Rect,
        records: impl IntoIterator<Item = CardRecord>,
    ) -> Self {
        let store = CardStore::from_records(records);
        let mut view = ViewTree::new(config.layout, viewport);
        render_all(&mut view, store.snapshot(), None);
        info!(cards = store.len(), seed = config.seed, "wallet started");

        Self {
            state: WalletState {
                store,
                filter: FilterProjector::new(),
                view,
                view_mode: ViewMode::Grid,
                details: None,
                pending_removals: BTreeSet::new(),
                hovered: None,
            },
            config,
            drag: DragController::new(),
            reflow: ReflowAnimator::new(config.reflow_duration),
            scheduler: Scheduler::new(),
            removal: Box::new(ShredEffect::default()),
            feedback: Feedback::none(),
            frame_requested: false,
            last_tick: Duration::ZERO,
            signals: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: Feedback) -> Self {
        self.feedback = feedback;
        self
    }

    #[must_use]
    pub fn with_removal_effect(mut self, effect: impl RemovalEffect + 'static) -> Self {
        self.removal = Box::new(effect);
        self
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Pointer(pointer) => self.handle_pointer(pointer),
            Event::Resize { width, height } => self.resize(*width, *height),
            Event::Paste(text) => {
                let query = format!("{}{}", self.state.filter.query(), text);
                self.set_query(&query);
            }
            Event::Tick => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.state.details.is_some() {
            if key.code == KeyCode::Escape {
                self.close_details();
            }
            return;
        }
        let page = i32::from(self.state.view.viewport().height / 2).max(1);
        match key.code {
            KeyCode::Escape if !self.state.filter.query().is_empty() => self.set_query(""),
            KeyCode::Backspace => {
                let mut query = self.state.filter.query().to_string();
                if query.pop().is_some() {
                    self.set_query(&query);
                }
            }
            KeyCode::Char(c) if !key.ctrl() => {
                let query = format!("{}{c}", self.state.filter.query());
                self.set_query(&query);
            }
            KeyCode::Tab => self.toggle_view_mode(),
            KeyCode::Delete => {
                if let Some(id) = self.state.hovered {
                    self.request_delete(id);
                }
            }
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-page),
            KeyCode::PageDown => self.scroll_by(page),
            _ => {}
        }
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        if self.state.details.is_some() {
            let viewport = self.state.view.viewport();
            if matches!(event.kind, PointerEventKind::Down(_))
                && DetailsView::is_backdrop(viewport, event.position)
            {
                self.close_details();
            }
            return;
        }

        match event.kind {
            PointerEventKind::Down(_) => self.press(event),
            PointerEventKind::Move => {
                if self.drag.is_active() {
                    self.drag
                        .pointer_move(event, &mut self.state.view, &mut self.reflow);
                    self.request_frame();
                }
            }
            PointerEventKind::Up(_) => {
                if self.drag.is_driven_by(event.pointer) {
                    self.end_drag(DragEnd::Release);
                }
            }
            PointerEventKind::Cancel => self.end_drag(DragEnd::Abort),
            PointerEventKind::Hover => self.hover(event.position),
            PointerEventKind::Wheel(rows) => self.scroll_by(i32::from(rows)),
        }
    }

    fn press(&mut self, event: &PointerEvent) {
        if self.drag.is_active() {
            debug!(pointer = event.pointer.0, "press during drag ends the session");
            self.end_drag(DragEnd::Abort);
            return;
        }
        let Some(hit) = self.state.view.hit_test(event.position) else {
            return;
        };
        match hit.region {
            HitRegion::Delete => {
                if event.is_primary_press() {
                    self.request_delete(hit.card);
                }
            }
            HitRegion::Body => {
                self.clear_hover();
                if self.drag.begin(event, &mut self.state.view).is_some() {
                    self.feedback.emit(FeedbackCue::Woosh);
                }
            }
        }
    }

    fn end_drag(&mut self, how: DragEnd) {
        let Some(outcome) = self.drag.end(
            &mut self.state.view,
            &mut self.state.store,
            &mut self.reflow,
        ) else {
            return;
        };
        self.request_frame();
        if outcome.reordered() {
            self.signals.push(WalletSignal::Reordered {
                card: outcome.card,
                from: outcome.start_index,
                to: outcome.final_index,
            });
        }
        if outcome.tapped && how == DragEnd::Release {
            self.open_details(outcome.card);
        }
    }

    fn hover(&mut self, point: Point) {
        let target = self
            .state
            .view
            .hit_test(point)
            .map(|hit| (hit.card, hit.rect));
        if self.state.hovered != target.map(|(id, _)| id) {
            self.clear_hover();
        }
        let Some((id, rect)) = target else {
            return;
        };
        let rel_x = ((point.x - rect.x) as f32 + 0.5) / f32::from(rect.width.max(1));
        let rel_y = ((point.y - rect.y) as f32 + 0.5) / f32::from(rect.height.max(1));
        if let Some(node) = self.state.view.card_mut(id) {
            node.style.tilt = Some(Tilt::from_relative(rel_x, rel_y));
            self.state.hovered = Some(id);
        }
    }

    fn clear_hover(&mut self) {
        if let Some(id) = self.state.hovered.take()
            && let Some(node) = self.state.view.card_mut(id)
        {
            node.style.tilt = None;
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Filter the grid by `query`, re-render, and reflow. Ends any drag
    /// first.
    pub fn set_query(&mut self, query: &str) {
        if self.drag.is_active() {
            self.end_drag(DragEnd::Abort);
        }
        let before = capture_all(&self.state.view);
        self.state.filter.apply(query, self.state.store.snapshot());
        self.rerender();
        let after = capture_all(&self.state.view);
        self.reflow.play(&before, &after, &mut self.state.view);
        self.request_frame();
        if self.state.filter.is_active() {
            self.schedule_entrance();
        }
    }

    fn rerender(&mut self) {
        let report = render_all(
            &mut self.state.view,
            self.state.store.snapshot(),
            self.state.filter.visible(),
        );
        for key in report.disposed {
            self.scheduler.cancel_owned_by(TaskOwner::Node(key));
        }
        self.state.hovered = None;
        for id in &self.state.pending_removals {
            if let Some(node) = self.state.view.card_mut(*id) {
                node.style.hidden = true;
                node.style.hit_testable = false;
            }
        }
    }

    fn schedule_entrance(&mut self) {
        let step = self.config.entrance_step;
        let duration = self.config.entrance_duration;
        let keys: Vec<(usize, NodeKey)> = self
            .state
            .view
            .cards()
            .map(|(index, node)| (index, node.key))
            .collect();
        for (index, key) in keys {
            if let Some(node) = self.state.view.card_by_key_mut(key) {
                node.style.entrance = EntrancePhase::Pending;
            }
            let delay = stagger_delay(index, step);
            self.scheduler
                .after(delay, TaskOwner::Node(key), AppMsg::EntranceStart(key));
            self.scheduler.after(
                delay.saturating_add(duration),
                TaskOwner::Node(key),
                AppMsg::EntranceEnd(key),
            );
        }
    }

    /// Start shredding `id`; the store commit follows after the removal
    /// delay. Returns `false` for unknown ids and repeated requests.
    pub fn request_delete(&mut self, id: CardId) -> bool {
        if !self.state.store.contains(id) {
            debug!(card = %id, "delete: not found");
            return false;
        }
        if !self.state.pending_removals.insert(id) {
            debug!(card = %id, "delete: already pending");
            return false;
        }
        if self.drag.session().is_some_and(|session| session.card == id) {
            self.end_drag(DragEnd::Abort);
        }

        self.feedback.emit(FeedbackCue::Shred);
        let bounds = self.state.view.visual_rect(id);
        if let Some(node) = self.state.view.card_mut(id) {
            node.style.hidden = true;
            node.style.hit_testable = false;
            node.style.tilt = None;
        }
        if let Some(bounds) = bounds {
            self.removal.play(id, bounds);
        }
        self.scheduler.after(
            self.config.removal_delay,
            TaskOwner::Controller,
            AppMsg::CommitRemoval(id),
        );
        debug!(card = %id, "delete: scheduled");
        true
    }

    fn commit_removal(&mut self, id: CardId) {
        self.state.pending_removals.remove(&id);
        let before = capture_all(&self.state.view);
        let removed = self.state.store.remove(id);
        self.state.filter.forget(id);
        if let Some((index, node)) = self.state.view.remove_card(id) {
            self.scheduler.cancel_owned_by(TaskOwner::Node(node.key));
            self.drag.on_node_removed(index);
        }
        if self.state.hovered == Some(id) {
            self.state.hovered = None;
        }
        if self.state.details.as_ref().is_some_and(|d| d.card == id) {
            self.close_details();
        }
        let after = capture_all(&self.state.view);
        self.reflow.play(&before, &after, &mut self.state.view);
        self.request_frame();
        if removed.is_some() {
            debug!(card = %id, remaining = self.state.store.len(), "delete: committed");
            self.signals.push(WalletSignal::Removed(id));
        }
    }

    /// Open the details view for `id`.
    pub fn open_details(&mut self, id: CardId) -> bool {
        let Some(record) = self.state.store.get(id) else {
            return false;
        };
        self.state.details = Some(DetailsView::open(record));
        self.clear_hover();
        self.feedback.emit(FeedbackCue::Click);
        self.signals.push(WalletSignal::DetailsOpened(id));
        true
    }

    pub fn close_details(&mut self) {
        if self.state.details.take().is_some() {
            self.signals.push(WalletSignal::DetailsClosed);
        }
    }

    /// Switch between grid and stack, jumping to that mode's scroll target.
    pub fn toggle_view_mode(&mut self) {
        let mode = self.state.view_mode.toggled();
        self.state.view_mode = mode;
        self.feedback.emit(FeedbackCue::Toggle);
        let target = match mode {
            ViewMode::Stack => self.config.stack_scroll,
            ViewMode::Grid => 0,
        };
        self.state.view.set_scroll(target);
        debug!(mode = mode.label(), scroll = self.state.view.scroll(), "view mode");
        self.signals.push(WalletSignal::ViewModeChanged(mode));
    }

    pub fn scroll_by(&mut self, rows: i32) {
        let scroll = self.state.view.scroll().saturating_add(rows);
        self.state.view.set_scroll(scroll);
    }

    /// New viewport size. Cards that change slot position glide there.
    pub fn resize(&mut self, width: u16, height: u16) {
        let before = capture_all(&self.state.view);
        self.state.view.set_viewport(Rect::from_size(width, height));
        let after = capture_all(&self.state.view);
        self.reflow.play(&before, &after, &mut self.state.view);
        self.request_frame();
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// Advance to `now` (time since start) and run whatever came due.
    pub fn tick(&mut self, now: Duration) {
        let dt = now.saturating_sub(self.last_tick);
        self.last_tick = self.last_tick.max(now);
        self.state.view.advance(dt);
        self.removal.advance(dt);

        for msg in self.scheduler.take_frame() {
            self.dispatch(msg);
        }
        for msg in self.scheduler.advance_to(now) {
            self.dispatch(msg);
        }
    }

    fn dispatch(&mut self, msg: AppMsg) {
        match msg {
            AppMsg::ReflowFrame => {
                self.frame_requested = false;
                self.reflow.on_frame(&mut self.state.view);
            }
            AppMsg::CommitRemoval(id) => self.commit_removal(id),
            AppMsg::EntranceStart(key) => self.set_entrance(key, EntrancePhase::Entering),
            AppMsg::EntranceEnd(key) => self.set_entrance(key, EntrancePhase::Settled),
        }
    }

    fn set_entrance(&mut self, key: NodeKey, phase: EntrancePhase) {
        if let Some(node) = self.state.view.card_by_key_mut(key) {
            node.style.entrance = phase;
        }
    }

    fn request_frame(&mut self) {
        if self.reflow.has_pending() && !self.frame_requested {
            self.scheduler.next_frame(AppMsg::ReflowFrame);
            self.frame_requested = true;
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub const fn state(&self) -> &WalletState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &WalletConfig {
        &self.config
    }

    #[must_use]
    pub const fn drag(&self) -> &DragController {
        &self.drag
    }

    #[must_use]
    pub fn query(&self) -> &str {
        self.state.filter.query()
    }

    /// Fragments of running removal effects.
    #[must_use]
    pub fn removal_pieces(&self) -> Vec<Piece> {
        self.removal.pieces()
    }

    /// Signals raised since the last call.
    pub fn drain_signals(&mut self) -> Vec<WalletSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Whether nothing is moving and nothing is scheduled.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.state.view.is_animating()
            && !self.removal.is_active()
            && !self.scheduler.has_frame_work()
            && self.scheduler.pending_timers() == 0
    }

    /// When the next timer is due, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }
}
