use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::row::Row;
use crate::store::RowStore;

/// Fixed row height in pixels; scroll offsets divide by this.
pub const ROW_HEIGHT: f64 = 30.0;
/// Extra rows rendered past the visible bottom edge.
pub const BUFFER_ROWS: usize = 10;

/// Half-open range of row indices the view should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub start_index: usize,
    pub end_index: usize,
}

impl Viewport {
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.end_index <= self.start_index
    }
}

/// Maps pixel scroll offsets to the row range to render.
///
/// Only the rows inside the current viewport (plus the buffer) are
/// ever handed to the view; the store itself is never walked in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportController {
    viewport: Viewport,
}

impl ViewportController {
    /// Controller positioned at the top with the given viewport height.
    pub fn new(viewport_height: f64) -> Self {
        let mut ctrl = Self {
            viewport: Viewport {
                start_index: 0,
                end_index: 0,
            },
        };
        ctrl.on_scroll(0.0, viewport_height);
        ctrl
    }

    /// Recompute the render range from a scroll offset and viewport
    /// height, both in pixels. The end is clamped to the capacity
    /// ceiling, never to the logical length: scrolling past the data
    /// shows empty rows.
    pub fn on_scroll(&mut self, scroll_top: f64, viewport_height: f64) -> Viewport {
        let start_index =
            ((scroll_top.max(0.0) / ROW_HEIGHT) as usize).min(RowStore::MAX_ROWS);
        let visible = (viewport_height.max(0.0) / ROW_HEIGHT).ceil() as usize;
        let end_index = start_index
            .saturating_add(visible)
            .saturating_add(BUFFER_ROWS)
            .min(RowStore::MAX_ROWS);
        self.viewport = Viewport {
            start_index,
            end_index,
        };
        self.viewport
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The rows currently in range, materialized or not. Unmaterialized
    /// indices yield fresh empty rows without touching the store.
    pub fn rows_to_render<'a>(
        &self,
        store: &'a RowStore,
    ) -> impl Iterator<Item = (usize, Cow<'a, Row>)> {
        let Viewport {
            start_index,
            end_index,
        } = self.viewport;
        (start_index..end_index).filter_map(move |index| {
            // In range by construction (end clamped to MAX_ROWS)
            store.get(index).ok().map(|row| (index, row))
        })
    }
}
