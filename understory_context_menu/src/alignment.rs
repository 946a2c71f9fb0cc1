// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge alignment of accessories relative to a preview frame.
//!
//! ## Overview
//!
//! An [`AccessoryAlignment`] is an ordered list of `(Edge, Origin)` rules plus a fixed offset.
//! [`AccessoryAlignment::resolve`] turns it into an accessory frame given the preview frame and
//! the accessory's current frame.
//!
//! ## Resolution
//!
//! 1) Start from the accessory's current origin.
//! 2) For each rule in order, overwrite the coordinate on the rule's [`Axis`]:
//!    - [`Origin::Exterior`]: the accessory sits just outside the preview's edge, adjacent and
//!      non-overlapping on that axis.
//!    - [`Origin::Interior`]: the accessory's edge is flush with the preview's edge, inside it.
//!
//!    Rules on the same axis overwrite each other; the last one wins.
//! 3) Translate by the offset.
//!
//! An axis no rule mentions keeps the accessory's current coordinate; nothing is centered
//! implicitly. An empty rule list returns the current frame unchanged and ignores the offset.
//!
//! ## Leading and trailing
//!
//! [`Edge::Leading`] and [`Edge::Trailing`] are logical edges mapped through
//! [`LayoutDirection`]. The offset is always physical.
//!
//! ```
//! use kurbo::{Point, Rect, Vec2};
//! use understory_context_menu::alignment::{
//!     AccessoryAlignment, Edge, LayoutDirection, Origin,
//! };
//!
//! let preview = Rect::new(0.0, 0.0, 100.0, 40.0);
//! let accessory = Rect::new(0.0, 0.0, 20.0, 20.0);
//!
//! let beside = AccessoryAlignment::new([(Edge::Trailing, Origin::Exterior)])
//!     .with_offset(Vec2::new(5.0, 0.0));
//! let frame = beside.resolve(preview, accessory, LayoutDirection::LeftToRight);
//! assert_eq!(frame.origin(), Point::new(105.0, 0.0));
//! ```

use alloc::vec::Vec;
use kurbo::{Point, Rect, Vec2};

/// An edge of the preview frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Minimum y.
    Top,
    /// End of the reading direction.
    Trailing,
    /// Start of the reading direction.
    Leading,
    /// Maximum y.
    Bottom,
}

/// Which side of a preview edge the accessory lands on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Flush against the inside of the edge; overlaps the preview on that axis.
    Interior,
    /// Just outside the edge; adjacent to the preview on that axis.
    Exterior,
}

/// Axis constrained by a rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x coordinate.
    Horizontal,
    /// The y coordinate.
    Vertical,
}

/// Reading direction used to map leading/trailing to physical edges.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutDirection {
    /// Leading is the left (minimum x) edge.
    #[default]
    LeftToRight,
    /// Leading is the right (maximum x) edge.
    RightToLeft,
}

/// Physical side of a rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    MinX,
    MaxX,
    MinY,
    MaxY,
}

impl Edge {
    /// Axis whose coordinate a rule on this edge determines.
    pub fn axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Vertical,
            Self::Leading | Self::Trailing => Axis::Horizontal,
        }
    }

    fn side(self, direction: LayoutDirection) -> Side {
        match (self, direction) {
            (Self::Top, _) => Side::MinY,
            (Self::Bottom, _) => Side::MaxY,
            (Self::Leading, LayoutDirection::LeftToRight)
            | (Self::Trailing, LayoutDirection::RightToLeft) => Side::MinX,
            (Self::Trailing, LayoutDirection::LeftToRight)
            | (Self::Leading, LayoutDirection::RightToLeft) => Side::MaxX,
        }
    }
}

/// Declarative placement of an accessory relative to a preview frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccessoryAlignment {
    alignments: Vec<(Edge, Origin)>,
    offset: Vec2,
}

impl AccessoryAlignment {
    /// Create an alignment from rules applied in order, with zero offset.
    pub fn new(alignments: impl IntoIterator<Item = (Edge, Origin)>) -> Self {
        Self {
            alignments: alignments.into_iter().collect(),
            offset: Vec2::ZERO,
        }
    }

    /// Append a rule.
    #[must_use]
    pub fn then(mut self, edge: Edge, origin: Origin) -> Self {
        self.alignments.push((edge, origin));
        self
    }

    /// Set the translation applied after all rules.
    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Rules in application order.
    pub fn alignments(&self) -> &[(Edge, Origin)] {
        &self.alignments
    }

    /// Translation applied after all rules.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Returns `true` if some rule constrains `axis`.
    pub fn constrains(&self, axis: Axis) -> bool {
        self.alignments.iter().any(|(edge, _)| edge.axis() == axis)
    }

    /// Compute the accessory frame for `preview`.
    ///
    /// `current` supplies the accessory's size and the coordinates used for any axis no rule
    /// constrains. The result always has the size of `current`.
    pub fn resolve(&self, preview: Rect, current: Rect, direction: LayoutDirection) -> Rect {
        if self.alignments.is_empty() {
            return current;
        }
        let size = current.size();
        let mut origin = current.origin();
        for &(edge, placement) in &self.alignments {
            match (edge.side(direction), placement) {
                (Side::MinX, Origin::Exterior) => origin.x = preview.x0 - size.width,
                (Side::MinX, Origin::Interior) => origin.x = preview.x0,
                (Side::MaxX, Origin::Exterior) => origin.x = preview.x1,
                (Side::MaxX, Origin::Interior) => origin.x = preview.x1 - size.width,
                (Side::MinY, Origin::Exterior) => origin.y = preview.y0 - size.height,
                (Side::MinY, Origin::Interior) => origin.y = preview.y0,
                (Side::MaxY, Origin::Exterior) => origin.y = preview.y1,
                (Side::MaxY, Origin::Interior) => origin.y = preview.y1 - size.height,
            }
        }
        Rect::from_origin_size(origin + self.offset, size)
    }

    /// Like [`resolve`](Self::resolve) but only needs the origin of an accessory of `current` size.
    pub fn resolve_origin(&self, preview: Rect, current: Rect, direction: LayoutDirection) -> Point {
        self.resolve(preview, current, direction).origin()
    }
}
