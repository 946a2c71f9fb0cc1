// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accessories attached to a targeted preview.
//!
//! ## Overview
//!
//! An [`AccessoryController`] owns one accessory view (for example a reaction bar), its
//! [`AccessoryAlignment`], and a non-owning [`AccessoryDelegateHandle`] back to the presenter.
//!
//! The view is reached through the [`AccessoryView`] trait. Toolkits implement it to report and
//! apply frames and to run enter/exit animations. The default animations finish immediately.
//!
//! ## Delegate handles
//!
//! The presenter implements [`AccessoryInteractionDelegate`]. An accessory never holds the
//! presenter itself. It holds an [`AccessoryDelegateHandle`]: its [`AccessoryId`] plus a weak
//! reference to the presentation's request mailbox. Requests are queued and handled by the
//! presenter on its next poll. Once the presentation is dismissed the mailbox is gone and
//! every handle becomes inert, so a handle can never keep a presentation alive.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::time::Duration;

use kurbo::Rect;

use crate::alignment::{AccessoryAlignment, LayoutDirection};
use crate::animation::Completion;

/// Identifies an accessory within one presentation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccessoryId {
    session: u64,
    index: u32,
}

impl AccessoryId {
    pub(crate) fn new(session: u64, index: u32) -> Self {
        Self { session, index }
    }

    /// Position of the accessory in its preview's accessory list.
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Presentation this accessory was attached to.
    pub fn session(self) -> u64 {
        self.session
    }
}

/// Receives the emoji chosen in a picker requested by an accessory.
pub type EmojiPickerCallback = Box<dyn FnOnce(&str)>;

/// Interaction requests an accessory can make of whatever drives it.
pub trait AccessoryInteractionDelegate {
    /// The accessory asks for the menu to be dismissed.
    fn accessory_requests_dismissal(&mut self, accessory: AccessoryId);

    /// The accessory asks for an emoji picker; `on_result` receives the selection.
    fn accessory_requests_emoji_picker(
        &mut self,
        accessory: AccessoryId,
        on_result: EmojiPickerCallback,
    );
}

pub(crate) enum AccessoryRequest {
    Dismissal(AccessoryId),
    EmojiPicker(AccessoryId, EmojiPickerCallback),
}

impl core::fmt::Debug for AccessoryRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Dismissal(id) => f.debug_tuple("Dismissal").field(id).finish(),
            Self::EmojiPicker(id, _) => f.debug_tuple("EmojiPicker").field(id).finish(),
        }
    }
}

pub(crate) type Mailbox = Rc<RefCell<VecDeque<AccessoryRequest>>>;

/// Non-owning route from an accessory back to its presenter.
#[derive(Clone, Debug)]
pub struct AccessoryDelegateHandle {
    accessory: AccessoryId,
    mailbox: Weak<RefCell<VecDeque<AccessoryRequest>>>,
}

impl AccessoryDelegateHandle {
    pub(crate) fn new(accessory: AccessoryId, mailbox: &Mailbox) -> Self {
        Self {
            accessory,
            mailbox: Rc::downgrade(mailbox),
        }
    }

    /// The accessory this handle speaks for.
    pub fn accessory(&self) -> AccessoryId {
        self.accessory
    }

    /// Returns `true` while the presentation that issued this handle is alive.
    pub fn is_connected(&self) -> bool {
        self.mailbox.strong_count() > 0
    }

    /// Ask the presenter to dismiss the menu.
    ///
    /// Returns `false` if the presentation is already gone.
    pub fn request_dismissal(&self) -> bool {
        self.post(AccessoryRequest::Dismissal(self.accessory))
    }

    /// Ask the presenter to show an emoji picker.
    ///
    /// Returns `false` if the presentation is already gone; `on_result` is dropped unused.
    pub fn request_emoji_picker(&self, on_result: impl FnOnce(&str) + 'static) -> bool {
        self.post(AccessoryRequest::EmojiPicker(
            self.accessory,
            Box::new(on_result),
        ))
    }

    fn post(&self, request: AccessoryRequest) -> bool {
        let Some(mailbox) = self.mailbox.upgrade() else {
            tracing::debug!(accessory = ?self.accessory, "request from detached accessory ignored");
            return false;
        };
        mailbox.borrow_mut().push_back(request);
        true
    }
}

/// A renderable accessory as seen by the presenter.
pub trait AccessoryView {
    /// Current frame in the preview's coordinate space.
    ///
    /// Its size is the accessory's natural size when aligning.
    fn frame(&self) -> Rect;

    /// Apply a frame computed from the accessory's alignment.
    fn set_frame(&mut self, frame: Rect);

    /// Run the entrance animation, then finish `completion`.
    fn animate_in(&mut self, duration: Duration, completion: Completion) {
        let _ = duration;
        completion.complete();
    }

    /// Run the exit animation, then finish `completion`.
    fn animate_out(&mut self, duration: Duration, completion: Completion) {
        let _ = duration;
        completion.complete();
    }

    /// Receive (or lose, with `None`) the route back to the presenter.
    fn set_delegate(&mut self, delegate: Option<AccessoryDelegateHandle>) {
        let _ = delegate;
    }
}

/// One accessory view with its layout and delegate.
///
/// The view's frame at construction is kept as the base frame. Every layout resolves from it,
/// so repeated layouts against the same preview frame land in the same place.
pub struct AccessoryController {
    view: Box<dyn AccessoryView>,
    alignment: AccessoryAlignment,
    base: Rect,
    delegate: Option<AccessoryDelegateHandle>,
}

impl core::fmt::Debug for AccessoryController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccessoryController")
            .field("frame", &self.view.frame())
            .field("base", &self.base)
            .field("alignment", &self.alignment)
            .field("delegate", &self.delegate)
            .finish_non_exhaustive()
    }
}

impl AccessoryController {
    /// Wrap an accessory view with its alignment.
    pub fn new(view: impl AccessoryView + 'static, alignment: AccessoryAlignment) -> Self {
        let base = view.frame();
        Self {
            view: Box::new(view),
            alignment,
            base,
            delegate: None,
        }
    }

    /// The accessory view.
    pub fn view(&self) -> &dyn AccessoryView {
        &*self.view
    }

    /// The accessory view, mutably.
    pub fn view_mut(&mut self) -> &mut dyn AccessoryView {
        &mut *self.view
    }

    /// Placement relative to the preview.
    pub fn alignment(&self) -> &AccessoryAlignment {
        &self.alignment
    }

    /// Current frame of the view.
    pub fn frame(&self) -> Rect {
        self.view.frame()
    }

    /// Size and unaligned placement that layout resolves from.
    pub fn base_frame(&self) -> Rect {
        self.base
    }

    /// Replace the base frame, for example after the accessory's natural size changed.
    ///
    /// Takes effect on the next layout.
    pub fn set_base_frame(&mut self, base: Rect) {
        self.base = base;
    }

    /// Route back to the presenter, while presented.
    pub fn delegate(&self) -> Option<&AccessoryDelegateHandle> {
        self.delegate.as_ref()
    }

    /// Forward a dismissal request through the delegate.
    ///
    /// Returns `false` when detached.
    pub fn request_dismissal(&self) -> bool {
        self.delegate
            .as_ref()
            .is_some_and(AccessoryDelegateHandle::request_dismissal)
    }

    /// Forward an emoji picker request through the delegate.
    ///
    /// Returns `false` when detached.
    pub fn request_emoji_picker(&self, on_result: impl FnOnce(&str) + 'static) -> bool {
        match &self.delegate {
            Some(handle) => handle.request_emoji_picker(on_result),
            None => false,
        }
    }

    /// Resolve the alignment against `preview` and apply the frame to the view.
    ///
    /// Resolves from the base frame, never from the view's current frame.
    pub fn layout(&mut self, preview: Rect, direction: LayoutDirection) -> Rect {
        let frame = self.alignment.resolve(preview, self.base, direction);
        tracing::trace!(?preview, ?frame, "accessory laid out");
        self.view.set_frame(frame);
        frame
    }

    /// Start the entrance animation.
    pub fn animate_in(&mut self, duration: Duration, completion: Completion) {
        self.view.animate_in(duration, completion);
    }

    /// Start the exit animation.
    pub fn animate_out(&mut self, duration: Duration, completion: Completion) {
        self.view.animate_out(duration, completion);
    }

    pub(crate) fn attach(&mut self, handle: AccessoryDelegateHandle) {
        self.view.set_delegate(Some(handle.clone()));
        self.delegate = Some(handle);
    }

    pub(crate) fn detach(&mut self) {
        self.view.set_delegate(None);
        self.delegate = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::{Edge, Origin};
    use crate::animation::AnimationPhase;
    use alloc::string::{String, ToString};
    use kurbo::{Point, Size, Vec2};

    #[derive(Default)]
    struct Probe {
        frame: Rect,
        delegate: Option<AccessoryDelegateHandle>,
    }

    struct ProbeView(Rc<RefCell<Probe>>);

    impl AccessoryView for ProbeView {
        fn frame(&self) -> Rect {
            self.0.borrow().frame
        }
        fn set_frame(&mut self, frame: Rect) {
            self.0.borrow_mut().frame = frame;
        }
        fn set_delegate(&mut self, delegate: Option<AccessoryDelegateHandle>) {
            self.0.borrow_mut().delegate = delegate;
        }
    }

    fn probe(size: Size) -> (Rc<RefCell<Probe>>, ProbeView) {
        let p = Rc::new(RefCell::new(Probe {
            frame: Rect::from_origin_size(Point::ZERO, size),
            delegate: None,
        }));
        (p.clone(), ProbeView(p))
    }

    #[test]
    fn layout_applies_resolved_frame() {
        let (p, view) = probe(Size::new(20.0, 20.0));
        let mut c = AccessoryController::new(
            view,
            AccessoryAlignment::new([(Edge::Bottom, Origin::Exterior)])
                .then(Edge::Trailing, Origin::Interior),
        );
        let f = c.layout(Rect::new(0.0, 0.0, 100.0, 40.0), LayoutDirection::LeftToRight);
        assert_eq!(f.origin(), Point::new(80.0, 40.0));
        assert_eq!(p.borrow().frame, f);
        assert_eq!(c.frame(), f);
    }

    #[test]
    fn relayout_does_not_accumulate_offset() {
        let (p, view) = probe(Size::new(20.0, 20.0));
        let mut c = AccessoryController::new(
            view,
            AccessoryAlignment::new([(Edge::Top, Origin::Exterior)])
                .with_offset(Vec2::new(5.0, 0.0)),
        );
        let preview = Rect::new(0.0, 100.0, 100.0, 140.0);
        let first = c.layout(preview, LayoutDirection::LeftToRight);
        assert_eq!(first.origin(), Point::new(5.0, 80.0));
        for _ in 0..3 {
            assert_eq!(c.layout(preview, LayoutDirection::LeftToRight), first);
        }
        assert_eq!(p.borrow().frame, first);
        assert_eq!(c.base_frame().origin(), Point::ZERO);
    }

    #[test]
    fn new_base_frame_applies_on_next_layout() {
        let (_, view) = probe(Size::new(20.0, 20.0));
        let mut c = AccessoryController::new(
            view,
            AccessoryAlignment::new([(Edge::Bottom, Origin::Exterior)]),
        );
        let preview = Rect::new(0.0, 0.0, 100.0, 40.0);
        c.layout(preview, LayoutDirection::LeftToRight);
        c.set_base_frame(Rect::new(30.0, 0.0, 70.0, 10.0));
        assert_eq!(c.frame().size(), Size::new(20.0, 20.0));
        let f = c.layout(preview, LayoutDirection::LeftToRight);
        assert_eq!(f, Rect::new(30.0, 40.0, 70.0, 50.0));
    }

    #[test]
    fn default_animations_complete_immediately() {
        let (_, view) = probe(Size::new(10.0, 10.0));
        let mut c = AccessoryController::new(view, AccessoryAlignment::default());
        let phase = AnimationPhase::new();
        c.animate_in(Duration::from_millis(200), phase.token());
        c.animate_out(Duration::ZERO, phase.token());
        assert!(phase.is_finished());
        assert_eq!(phase.fired(), 2);
    }

    #[test]
    fn detached_controller_requests_are_refused() {
        let (_, view) = probe(Size::new(10.0, 10.0));
        let c = AccessoryController::new(view, AccessoryAlignment::default());
        assert!(!c.request_dismissal());
        assert!(!c.request_emoji_picker(|_| {}));
    }

    #[test]
    fn handle_posts_while_mailbox_lives() {
        let mailbox: Mailbox = Rc::default();
        let (p, view) = probe(Size::new(10.0, 10.0));
        let mut c = AccessoryController::new(view, AccessoryAlignment::default());
        c.attach(AccessoryDelegateHandle::new(AccessoryId::new(1, 0), &mailbox));

        assert!(p.borrow().delegate.is_some(), "view receives the handle");
        assert!(c.request_dismissal());
        assert!(c.request_emoji_picker(|_| {}));
        assert_eq!(mailbox.borrow().len(), 2);
        assert!(matches!(
            mailbox.borrow().front(),
            Some(AccessoryRequest::Dismissal(id)) if id.index() == 0
        ));

        // A handle kept by the view goes inert with the mailbox.
        let kept = p.borrow().delegate.clone().unwrap();
        drop(mailbox);
        assert!(!kept.is_connected());
        assert!(!kept.request_dismissal());
    }

    #[test]
    fn detach_clears_both_sides() {
        let mailbox: Mailbox = Rc::default();
        let (p, view) = probe(Size::new(10.0, 10.0));
        let mut c = AccessoryController::new(view, AccessoryAlignment::default());
        c.attach(AccessoryDelegateHandle::new(AccessoryId::new(4, 2), &mailbox));
        assert_eq!(c.delegate().map(|d| d.accessory().index()), Some(2));
        c.detach();
        assert!(c.delegate().is_none());
        assert!(p.borrow().delegate.is_none());
        assert!(!c.request_dismissal());
        assert!(mailbox.borrow().is_empty());
    }

    #[test]
    fn emoji_callback_is_carried_through() {
        let mailbox: Mailbox = Rc::default();
        let handle = AccessoryDelegateHandle::new(AccessoryId::new(2, 1), &mailbox);
        let picked = Rc::new(RefCell::new(String::new()));
        let sink = picked.clone();
        assert!(handle.request_emoji_picker(move |e| *sink.borrow_mut() = e.to_string()));

        let request = mailbox.borrow_mut().pop_front();
        match request {
            Some(AccessoryRequest::EmojiPicker(id, on_result)) => {
                assert_eq!(id, handle.accessory());
                on_result("👍");
            }
            other => panic!("unexpected request {other:?}"),
        }
        assert_eq!(&*picked.borrow(), "👍");
    }
}
