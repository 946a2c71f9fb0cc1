// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation and dismissal of a context menu.
//!
//! ## States
//!
//! ```text
//! Idle ──present──► Presenting ──entrance done──► Presented ──select/dismiss──► Dismissing ──exit done──► Dismissed
//! ```
//!
//! - `present` runs the configuration's provider, builds the [`TargetedPreview`] through the
//!   caller's factory, attaches delegate handles to the accessories, lays them out, and starts
//!   the preview's entrance together with every accessory's `animate_in`. All of them share
//!   [`PresenterConfig::animation_duration`].
//! - The presenter stays in `Presenting` until every entrance [`Completion`] has fired.
//! - In `Presented` the user may select an action, dismiss, or an accessory may ask for an
//!   emoji picker without leaving the state.
//! - Dismissing runs the preview's exit and every accessory's `animate_out`. Once they have all
//!   completed, the preview, its snapshot and accessories are released and every delegate
//!   handle goes inert.
//!
//! A dismissal requested while `Presenting` is queued and honored after the entrance finishes.
//! A new presentation is refused until the previous one reaches `Dismissed`.
//!
//! ## Driving
//!
//! Animations finish asynchronously by firing their [`Completion`] tokens. Call
//! [`ContextMenuPresenter::poll`] after they fire (for example once per frame) to advance the
//! state machine and handle queued accessory requests. Every other operation polls first, and
//! animations that complete synchronously are picked up before the operation returns.
//!
//! ## Example
//!
//! ```
//! use kurbo::Rect;
//! use understory_context_menu::action::{Action, Menu};
//! use understory_context_menu::configuration::ContextMenuConfiguration;
//! use understory_context_menu::presenter::{
//!     ContextMenuPresenter, NoAnimations, PresentOutcome, PresentationState, SelectionOutcome,
//! };
//! use understory_context_menu::preview::{Snapshot, TargetedPreview};
//!
//! let mut presenter = ContextMenuPresenter::new(NoAnimations);
//! let base = [Action::new("Copy", |_| {})];
//! let config = ContextMenuConfiguration::with_provider(|base| Some(Menu::new(base.to_vec())));
//!
//! let outcome = presenter.present(config, &base, |_| {
//!     TargetedPreview::from_snapshot(Snapshot::new(Rect::new(0.0, 0.0, 200.0, 60.0), ()))
//! });
//! assert!(matches!(outcome, PresentOutcome::Started(_)));
//! assert_eq!(presenter.state(), PresentationState::Presented);
//!
//! assert_eq!(presenter.select(0), SelectionOutcome::Performed);
//! assert_eq!(presenter.state(), PresentationState::Dismissed);
//! ```

use core::time::Duration;

use kurbo::Rect;

use crate::accessory::{
    AccessoryDelegateHandle, AccessoryId, AccessoryInteractionDelegate, AccessoryRequest,
    EmojiPickerCallback, Mailbox,
};
use crate::action::{Action, Menu};
use crate::alignment::LayoutDirection;
use crate::animation::{AnimationPhase, Completion};
use crate::configuration::{ConfigurationId, ContextMenuConfiguration};
use crate::preview::TargetedPreview;

/// Where a presentation is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PresentationState {
    /// Nothing has been presented yet.
    Idle,
    /// Entrance animations are running.
    Presenting,
    /// Fully shown and interactive.
    Presented,
    /// Exit animations are running.
    Dismissing,
    /// The last presentation is gone; a new one may start.
    Dismissed,
}

impl PresentationState {
    /// Returns `true` if a new presentation may start.
    pub fn can_present(self) -> bool {
        matches!(self, Self::Idle | Self::Dismissed)
    }
}

/// Presenter settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PresenterConfig {
    /// Duration shared by the preview and all accessory animations.
    pub animation_duration: Duration,
    /// Reading direction for leading/trailing accessory alignment.
    pub layout_direction: LayoutDirection,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            animation_duration: Duration::from_millis(250),
            layout_direction: LayoutDirection::LeftToRight,
        }
    }
}

/// Toolkit services the presenter drives.
///
/// The default methods do no animation and complete at once.
pub trait PresentationHost {
    /// Animate the preview into place, then finish `completion`.
    fn animate_preview_in(
        &mut self,
        preview: &TargetedPreview,
        duration: Duration,
        completion: Completion,
    ) {
        let _ = (preview, duration);
        completion.complete();
    }

    /// Animate the preview back to its source, then finish `completion`.
    fn animate_preview_out(
        &mut self,
        preview: &TargetedPreview,
        duration: Duration,
        completion: Completion,
    ) {
        let _ = (preview, duration);
        completion.complete();
    }

    /// Show an emoji picker for `accessory`.
    ///
    /// Dropping `on_result` without calling it means nothing was picked.
    fn present_emoji_picker(&mut self, accessory: AccessoryId, on_result: EmojiPickerCallback) {
        tracing::debug!(?accessory, "no emoji picker available");
        drop(on_result);
    }
}

/// A host without animations or emoji picker.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoAnimations;

impl PresentationHost for NoAnimations {}

/// Result of [`ContextMenuPresenter::present`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresentOutcome {
    /// The presentation started under this identifier.
    Started(ConfigurationId),
    /// The provider declined to produce a menu; nothing is shown.
    Suppressed,
    /// A previous presentation has not been dismissed yet.
    Busy,
}

/// Result of [`ContextMenuPresenter::select`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The handler ran and the menu is being dismissed.
    Performed,
    /// The action is disabled; the handler did not run.
    Disabled,
    /// The action is hidden and cannot be selected.
    Hidden,
    /// Not presented, or no action at that index.
    Ignored,
}

#[derive(Debug)]
struct Session {
    id: u64,
    configuration: ConfigurationId,
    menu: Menu,
    preview: TargetedPreview,
    phase: AnimationPhase,
    mailbox: Mailbox,
    dismissal_queued: bool,
}

/// Drives one context menu presentation at a time.
///
/// Built on `Rc`, so it cannot leave the thread that created it.
pub struct ContextMenuPresenter<H: PresentationHost = NoAnimations> {
    host: H,
    config: PresenterConfig,
    state: PresentationState,
    session: Option<Session>,
    sessions_started: u64,
    polling: bool,
}

impl<H: PresentationHost> core::fmt::Debug for ContextMenuPresenter<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ContextMenuPresenter")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<H: PresentationHost> ContextMenuPresenter<H> {
    /// Create a presenter with the default configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, PresenterConfig::default())
    }

    /// Create a presenter with an explicit configuration.
    pub fn with_config(host: H, config: PresenterConfig) -> Self {
        Self {
            host,
            config,
            state: PresentationState::Idle,
            session: None,
            sessions_started: 0,
            polling: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> PresentationState {
        self.state
    }

    /// Current configuration.
    pub fn config(&self) -> PresenterConfig {
        self.config
    }

    /// Change the duration used by later animations.
    pub fn set_animation_duration(&mut self, duration: Duration) {
        self.config.animation_duration = duration;
    }

    /// Change the reading direction used by later layouts.
    pub fn set_layout_direction(&mut self, direction: LayoutDirection) {
        self.config.layout_direction = direction;
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Identifier of the live presentation.
    pub fn configuration_id(&self) -> Option<&ConfigurationId> {
        self.session.as_ref().map(|s| &s.configuration)
    }

    /// Menu of the live presentation.
    pub fn menu(&self) -> Option<&Menu> {
        self.session.as_ref().map(|s| &s.menu)
    }

    /// Preview of the live presentation.
    pub fn preview(&self) -> Option<&TargetedPreview> {
        self.session.as_ref().map(|s| &s.preview)
    }

    /// Returns `true` if a dismissal is waiting for the entrance to finish.
    pub fn is_dismissal_queued(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.dismissal_queued)
    }

    /// Start presenting after a confirmed trigger.
    ///
    /// The provider runs only if no other presentation is live. `make_preview` runs only if the
    /// provider produced a menu.
    pub fn present(
        &mut self,
        mut configuration: ContextMenuConfiguration,
        base_actions: &[Action],
        make_preview: impl FnOnce(&ConfigurationId) -> TargetedPreview,
    ) -> PresentOutcome {
        self.poll();
        if !self.state.can_present() {
            tracing::warn!(
                state = ?self.state,
                identifier = ?configuration.identifier(),
                "presentation requested before the previous one was dismissed"
            );
            return PresentOutcome::Busy;
        }
        let Some(menu) = configuration.make_menu(base_actions) else {
            return PresentOutcome::Suppressed;
        };
        let identifier = configuration.identifier().clone();
        let mut preview = make_preview(&identifier);
        if preview.is_degraded() {
            tracing::debug!(?identifier, "presenting without a visual preview");
        }

        self.sessions_started += 1;
        let id = self.sessions_started;
        let mailbox = Mailbox::default();
        for (index, accessory) in preview.accessories_mut().iter_mut().enumerate() {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            accessory.attach(AccessoryDelegateHandle::new(
                AccessoryId::new(id, index),
                &mailbox,
            ));
        }
        preview.layout_accessories(self.config.layout_direction);

        self.state = PresentationState::Presenting;
        tracing::debug!(?identifier, session = id, "presenting");
        let phase = AnimationPhase::new();
        let duration = self.config.animation_duration;
        self.host.animate_preview_in(&preview, duration, phase.token());
        for accessory in preview.accessories_mut() {
            accessory.animate_in(duration, phase.token());
        }

        self.session = Some(Session {
            id,
            configuration: identifier.clone(),
            menu,
            preview,
            phase,
            mailbox,
            dismissal_queued: false,
        });
        self.poll();
        PresentOutcome::Started(identifier)
    }

    /// Select the action at `index` in the menu's model order.
    ///
    /// Runs the handler at most once and then dismisses. Disabled and hidden actions are not run.
    pub fn select(&mut self, index: usize) -> SelectionOutcome {
        self.poll();
        if self.state != PresentationState::Presented {
            tracing::debug!(state = ?self.state, index, "selection ignored");
            return SelectionOutcome::Ignored;
        }
        let Some(action) = self.menu().and_then(|m| m.get(index)).cloned() else {
            tracing::debug!(index, "selection out of range");
            return SelectionOutcome::Ignored;
        };
        if action.is_hidden() {
            return SelectionOutcome::Hidden;
        }
        if !action.perform() {
            tracing::debug!(title = action.title(), "disabled action not performed");
            return SelectionOutcome::Disabled;
        }
        self.begin_dismissal();
        self.poll();
        SelectionOutcome::Performed
    }

    /// Dismiss the live presentation.
    ///
    /// Queued while presenting; a no-op when nothing is presented or already dismissing.
    pub fn dismiss(&mut self) {
        self.poll();
        self.request_dismissal();
        self.poll();
    }

    /// Move the preview and re-align its accessories.
    pub fn reposition_preview(&mut self, frame: Rect) {
        self.poll();
        let direction = self.config.layout_direction;
        if let Some(session) = self.session.as_mut() {
            session.preview.set_frame(frame);
            session.preview.layout_accessories(direction);
        }
    }

    /// Advance past finished animation phases and handle queued accessory requests.
    pub fn poll(&mut self) -> PresentationState {
        if self.polling {
            return self.state;
        }
        self.polling = true;
        loop {
            let before = self.state;
            match self.state {
                PresentationState::Presenting => {
                    if self.session.as_ref().is_some_and(|s| s.phase.is_finished()) {
                        self.state = PresentationState::Presented;
                        tracing::debug!("presented");
                    }
                }
                PresentationState::Presented => {
                    if self.is_dismissal_queued() {
                        self.begin_dismissal();
                    } else {
                        self.drain_requests();
                    }
                }
                PresentationState::Dismissing => {
                    if self.session.as_ref().is_none_or(|s| s.phase.is_finished()) {
                        self.finish_dismissal();
                    }
                }
                PresentationState::Idle | PresentationState::Dismissed => {}
            }
            if self.state == before {
                break;
            }
        }
        self.polling = false;
        self.state
    }

    fn owns(&self, accessory: AccessoryId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.id == accessory.session())
    }

    fn request_dismissal(&mut self) {
        match self.state {
            PresentationState::Presenting => {
                if let Some(session) = self.session.as_mut() {
                    tracing::debug!("dismissal queued until entrance completes");
                    session.dismissal_queued = true;
                }
            }
            PresentationState::Presented => self.begin_dismissal(),
            _ => {}
        }
    }

    fn drain_requests(&mut self) {
        while self.state == PresentationState::Presented {
            let next = self
                .session
                .as_ref()
                .and_then(|s| s.mailbox.borrow_mut().pop_front());
            match next {
                Some(AccessoryRequest::Dismissal(accessory)) => {
                    self.accessory_requests_dismissal(accessory);
                }
                Some(AccessoryRequest::EmojiPicker(accessory, on_result)) => {
                    self.accessory_requests_emoji_picker(accessory, on_result);
                }
                None => break,
            }
        }
    }

    fn begin_dismissal(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        self.state = PresentationState::Dismissing;
        tracing::debug!(session = session.id, "dismissing");
        let phase = AnimationPhase::new();
        let duration = self.config.animation_duration;
        session.dismissal_queued = false;
        self.host
            .animate_preview_out(&session.preview, duration, phase.token());
        for accessory in session.preview.accessories_mut() {
            accessory.animate_out(duration, phase.token());
        }
        session.phase = phase;
    }

    fn finish_dismissal(&mut self) {
        if let Some(mut session) = self.session.take() {
            for accessory in session.preview.accessories_mut() {
                accessory.detach();
            }
            tracing::debug!(session = session.id, "dismissed");
        }
        self.state = PresentationState::Dismissed;
    }
}

impl<H: PresentationHost> AccessoryInteractionDelegate for ContextMenuPresenter<H> {
    fn accessory_requests_dismissal(&mut self, accessory: AccessoryId) {
        if !self.owns(accessory) {
            tracing::debug!(?accessory, "dismissal from a foreign accessory ignored");
            return;
        }
        self.request_dismissal();
        self.poll();
    }

    fn accessory_requests_emoji_picker(
        &mut self,
        accessory: AccessoryId,
        on_result: EmojiPickerCallback,
    ) {
        if !self.owns(accessory) || self.state != PresentationState::Presented {
            tracing::warn!(
                ?accessory,
                state = ?self.state,
                "emoji picker requested outside a live presentation"
            );
            return;
        }
        self.host.present_emoji_picker(accessory, on_result);
    }
}
