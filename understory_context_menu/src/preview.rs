// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Targeted previews: the floating stand-in for a source element.
//!
//! ## Capture modes
//!
//! A [`TargetedPreview`] is built in exactly one of two ways:
//!
//! - [`TargetedPreview::capture`] (live capture): the source element must be attached to the
//!   [`RenderSurface`]. Its current appearance is snapshotted without forcing layout, and the
//!   element is remembered by [`ElementId`] for later frame queries.
//! - [`TargetedPreview::from_snapshot`] (pre-captured): the caller hands in a [`Snapshot`] made
//!   ahead of time, for example a replica of a list cell rendered off the gesture path.
//!   No element or surface is involved.
//!
//! ## Degraded previews
//!
//! Live capture never fails outright. Capturing an unattached element, or a surface that cannot
//! produce an image, logs a warning and yields a preview with no snapshot. Such a preview is
//! [degraded](TargetedPreview::is_degraded); presenters show the menu without a visual preview.
//!
//! ## Frame
//!
//! The initial preview frame comes from the snapshot if there is one, otherwise from the
//! surface's frame for the source element, otherwise [`Rect::ZERO`]. The presenter may move it
//! afterwards; accessory frames follow through [`TargetedPreview::layout_accessories`].

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;

use kurbo::Rect;

use crate::accessory::AccessoryController;
use crate::alignment::LayoutDirection;

/// Toolkit handle of a live element. The preview does not own the element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Why a render surface could not produce a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// The element is not attached to an active render surface.
    #[error("element is not attached to a render surface")]
    Detached,
    /// The surface has nothing to capture right now (e.g. not yet rendered).
    #[error("element has no rendered contents to capture")]
    Unavailable,
    /// The surface tried and failed.
    #[error("snapshot failed: {0}")]
    Failed(&'static str),
}

/// Static image of an element's appearance at capture time.
///
/// The contents are opaque to this crate; toolkits downcast them with [`Snapshot::contents`].
#[derive(Clone)]
pub struct Snapshot {
    frame: Rect,
    contents: Rc<dyn Any>,
}

impl core::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Snapshot")
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl Snapshot {
    /// Wrap toolkit-specific contents captured at `frame`.
    pub fn new(frame: Rect, contents: impl Any) -> Self {
        Self {
            frame,
            contents: Rc::new(contents),
        }
    }

    /// Frame of the element when it was captured, in container coordinates.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// The captured contents, if they are a `T`.
    pub fn contents<T: Any>(&self) -> Option<&T> {
        self.contents.downcast_ref::<T>()
    }
}

/// The part of a toolkit live capture needs.
pub trait RenderSurface {
    /// Returns `true` if `element` is attached to an active render surface.
    fn is_attached(&self, element: ElementId) -> bool;

    /// Current frame of `element` in container coordinates.
    fn frame_of(&self, element: ElementId) -> Option<Rect>;

    /// Produce a static image of `element`'s current appearance without forcing a layout pass.
    fn snapshot(&mut self, element: ElementId) -> Result<Snapshot, CaptureError>;
}

/// How a [`TargetedPreview`] was built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CaptureMode {
    /// Captured from a live element.
    Live,
    /// Built from a snapshot supplied by the caller.
    PreCaptured,
}

/// A captured preview of a source element together with its accessories.
#[derive(Debug)]
pub struct TargetedPreview {
    source: Option<ElementId>,
    snapshot: Option<Snapshot>,
    accessories: Vec<AccessoryController>,
    frame: Rect,
}

impl TargetedPreview {
    /// Capture `element` from a live surface.
    ///
    /// Never fails. An unattached element or a failed capture produces a
    /// [degraded](Self::is_degraded) preview.
    pub fn capture<S: RenderSurface + ?Sized>(surface: &mut S, element: ElementId) -> Self {
        let snapshot = if surface.is_attached(element) {
            match surface.snapshot(element) {
                Ok(snapshot) => Some(snapshot),
                Err(error) => {
                    tracing::warn!(?element, %error, "unable to snapshot context menu preview");
                    None
                }
            }
        } else {
            tracing::warn!(
                ?element,
                error = %CaptureError::Detached,
                "live capture requires an attached element"
            );
            None
        };
        let frame = snapshot
            .as_ref()
            .map(Snapshot::frame)
            .or_else(|| surface.frame_of(element))
            .unwrap_or(Rect::ZERO);
        Self {
            source: Some(element),
            snapshot,
            accessories: Vec::new(),
            frame,
        }
    }

    /// Build a preview from a snapshot rendered ahead of time.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            source: None,
            frame: snapshot.frame(),
            snapshot: Some(snapshot),
            accessories: Vec::new(),
        }
    }

    /// Attach accessories, in display order.
    #[must_use]
    pub fn with_accessories(
        mut self,
        accessories: impl IntoIterator<Item = AccessoryController>,
    ) -> Self {
        self.accessories.extend(accessories);
        self
    }

    /// How this preview was built.
    pub fn capture_mode(&self) -> CaptureMode {
        if self.source.is_some() {
            CaptureMode::Live
        } else {
            CaptureMode::PreCaptured
        }
    }

    /// Returns `true` for a live capture that produced no snapshot.
    pub fn is_degraded(&self) -> bool {
        self.snapshot.is_none()
    }

    /// The live source element, in live-capture mode.
    pub fn source(&self) -> Option<ElementId> {
        self.source
    }

    /// The captured appearance, if capture succeeded.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Where the preview is shown.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Move the preview. Accessories are not moved; see [`layout_accessories`](Self::layout_accessories).
    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    /// Ask `surface` where the source element is now.
    ///
    /// `None` for pre-captured previews and for elements the surface no longer knows.
    pub fn source_frame<S: RenderSurface + ?Sized>(&self, surface: &S) -> Option<Rect> {
        self.source.and_then(|element| surface.frame_of(element))
    }

    /// Accessories in display order.
    pub fn accessories(&self) -> &[AccessoryController] {
        &self.accessories
    }

    /// Accessories in display order, mutably.
    pub fn accessories_mut(&mut self) -> &mut [AccessoryController] {
        &mut self.accessories
    }

    /// Position every accessory relative to the current frame.
    pub fn layout_accessories(&mut self, direction: LayoutDirection) {
        let frame = self.frame;
        for accessory in &mut self.accessories {
            accessory.layout(frame, direction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::AccessoryView;
    use crate::alignment::{AccessoryAlignment, Edge, Origin};
    use alloc::collections::BTreeMap;
    use kurbo::{Point, Size};

    #[derive(Default)]
    struct FakeSurface {
        frames: BTreeMap<ElementId, Rect>,
        attached: Vec<ElementId>,
        broken: bool,
        snapshots_taken: usize,
    }

    impl RenderSurface for FakeSurface {
        fn is_attached(&self, element: ElementId) -> bool {
            self.attached.contains(&element)
        }
        fn frame_of(&self, element: ElementId) -> Option<Rect> {
            self.frames.get(&element).copied()
        }
        fn snapshot(&mut self, element: ElementId) -> Result<Snapshot, CaptureError> {
            self.snapshots_taken += 1;
            if self.broken {
                return Err(CaptureError::Failed("gpu readback"));
            }
            let frame = self.frame_of(element).ok_or(CaptureError::Unavailable)?;
            Ok(Snapshot::new(frame, element.0))
        }
    }

    struct Fixed(Rect);

    impl AccessoryView for Fixed {
        fn frame(&self) -> Rect {
            self.0
        }
        fn set_frame(&mut self, frame: Rect) {
            self.0 = frame;
        }
    }

    fn surface_with(element: ElementId, frame: Rect, attached: bool) -> FakeSurface {
        let mut s = FakeSurface::default();
        s.frames.insert(element, frame);
        if attached {
            s.attached.push(element);
        }
        s
    }

    #[test]
    fn live_capture_of_attached_element() {
        let e = ElementId(9);
        let frame = Rect::new(10.0, 200.0, 310.0, 260.0);
        let mut s = surface_with(e, frame, true);
        let p = TargetedPreview::capture(&mut s, e);
        assert_eq!(p.capture_mode(), CaptureMode::Live);
        assert!(!p.is_degraded());
        assert_eq!(p.source(), Some(e));
        assert_eq!(p.frame(), frame);
        assert_eq!(p.snapshot().and_then(|s| s.contents::<u64>()), Some(&9));
        assert!(p.accessories().is_empty());
    }

    #[test]
    fn unattached_element_yields_degraded_preview() {
        let e = ElementId(1);
        let frame = Rect::new(0.0, 0.0, 50.0, 50.0);
        let mut s = surface_with(e, frame, false);
        let p = TargetedPreview::capture(&mut s, e);
        assert!(p.snapshot().is_none());
        assert!(p.is_degraded());
        assert_eq!(s.snapshots_taken, 0, "no capture is attempted");
        assert_eq!(p.frame(), frame, "frame falls back to the surface");
    }

    #[test]
    fn failed_snapshot_yields_degraded_preview() {
        let e = ElementId(2);
        let mut s = surface_with(e, Rect::new(0.0, 0.0, 5.0, 5.0), true);
        s.broken = true;
        let p = TargetedPreview::capture(&mut s, e);
        assert!(p.is_degraded());
        assert_eq!(p.capture_mode(), CaptureMode::Live);
        assert_eq!(s.snapshots_taken, 1);
    }

    #[test]
    fn unknown_element_has_zero_frame() {
        let mut s = FakeSurface::default();
        let p = TargetedPreview::capture(&mut s, ElementId(77));
        assert!(p.is_degraded());
        assert_eq!(p.frame(), Rect::ZERO);
    }

    #[test]
    fn pre_captured_needs_no_surface() {
        let frame = Rect::new(4.0, 8.0, 104.0, 48.0);
        let p = TargetedPreview::from_snapshot(Snapshot::new(frame, "replica"));
        assert_eq!(p.capture_mode(), CaptureMode::PreCaptured);
        assert!(p.source().is_none());
        assert!(!p.is_degraded());
        assert_eq!(p.frame(), frame);
        assert_eq!(p.snapshot().and_then(|s| s.contents::<&str>()), Some(&"replica"));
        assert!(p.snapshot().and_then(|s| s.contents::<u64>()).is_none());

        let s = FakeSurface::default();
        assert_eq!(p.source_frame(&s), None);
    }

    // The snapshot stays usable after the source moves or detaches.
    #[test]
    fn snapshot_outlives_source_changes() {
        let e = ElementId(3);
        let frame = Rect::new(0.0, 0.0, 40.0, 40.0);
        let mut s = surface_with(e, frame, true);
        let p = TargetedPreview::capture(&mut s, e);
        s.frames.insert(e, Rect::new(0.0, 500.0, 40.0, 540.0));
        s.attached.clear();
        assert_eq!(p.snapshot().map(Snapshot::frame), Some(frame));
        assert_eq!(p.source_frame(&s), Some(Rect::new(0.0, 500.0, 40.0, 540.0)));
    }

    #[test]
    fn accessories_follow_the_frame() {
        let p = TargetedPreview::from_snapshot(Snapshot::new(Rect::new(0.0, 0.0, 100.0, 40.0), ()));
        let mut p = p.with_accessories([
            AccessoryController::new(
                Fixed(Rect::from_origin_size(Point::ZERO, Size::new(20.0, 20.0))),
                AccessoryAlignment::new([(Edge::Top, Origin::Exterior)])
                    .then(Edge::Leading, Origin::Interior),
            ),
            AccessoryController::new(
                Fixed(Rect::from_origin_size(Point::ZERO, Size::new(30.0, 10.0))),
                AccessoryAlignment::new([(Edge::Bottom, Origin::Exterior)])
                    .then(Edge::Trailing, Origin::Interior),
            ),
        ]);
        p.layout_accessories(LayoutDirection::LeftToRight);
        assert_eq!(p.accessories()[0].frame().origin(), Point::new(0.0, -20.0));
        assert_eq!(p.accessories()[1].frame().origin(), Point::new(70.0, 40.0));

        p.set_frame(Rect::new(10.0, 100.0, 110.0, 140.0));
        p.layout_accessories(LayoutDirection::LeftToRight);
        assert_eq!(p.accessories()[0].frame().origin(), Point::new(10.0, 80.0));
        assert_eq!(p.accessories()[1].frame().origin(), Point::new(80.0, 140.0));
    }
}
