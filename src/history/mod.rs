//! Undo/redo history over heterogeneous page edits.
//!
//! Every [`Edit`] variant carries enough data to apply itself and to invert
//! itself exactly: crop edits snapshot the prior crop at record time,
//! rotation edits store signed deltas, and redaction removal re-inserts the
//! identical region at its original position. Replaying the undo stack in
//! order over pristine pages reproduces the current document state.

use crate::document::region::{FillColor, RedactionRegion, RegionId};
use crate::document::{Document, EnhancementSettings, Page};
use crate::geometry::{self, CropRect, SourceRect};

/// Fine rotation is a small correction on top of the quarter turns.
pub const FINE_ROTATION_RANGE_DEG: f32 = 45.0;

/// A reversible page edit, tagged with the page it targets.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    AddRedaction {
        page: usize,
        region: RedactionRegion,
    },
    RemoveRedaction {
        page: usize,
        region: RedactionRegion,
        /// Position the region held in the page's region list, so undo
        /// restores the exact prior state.
        index: usize,
    },
    Rotate {
        page: usize,
        /// Signed clockwise quarter turns; the inverse is the negated delta.
        quarter_delta: i32,
        fine_delta: f32,
    },
    SetCrop {
        page: usize,
        new: CropRect,
        prev: Option<CropRect>,
    },
    ClearCrop {
        page: usize,
        prev: Option<CropRect>,
    },
    SetEnhancement {
        page: usize,
        new: EnhancementSettings,
        prev: EnhancementSettings,
    },
}

impl Edit {
    /// Build an `AddRedaction` edit. The rectangle must already be in source
    /// space (see [`Document::render_rect_to_source`]); a fresh region
    /// identity is allocated from the document.
    pub fn add_redaction(
        document: &mut Document,
        page: usize,
        rect: SourceRect,
        color: FillColor,
    ) -> crate::error::Result<Edit> {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return Err(crate::error::RedactError::geometry(format!(
                "degenerate redaction rectangle {}x{}",
                rect.width(),
                rect.height()
            )));
        }
        let id = document.allocate_region_id();
        Ok(Edit::AddRedaction {
            page,
            region: RedactionRegion { id, rect, color },
        })
    }

    /// Build a `RemoveRedaction` edit for the region with the given identity,
    /// snapshotting the region and its list position.
    pub fn remove_redaction(
        document: &Document,
        page: usize,
        id: RegionId,
    ) -> crate::error::Result<Edit> {
        let p = document.page(page).ok_or_else(|| {
            crate::error::RedactError::geometry(format!("page index {page} out of range"))
        })?;
        let index = p.find_region(id).ok_or_else(|| {
            crate::error::RedactError::geometry(format!("no redaction region with id {}", id.0))
        })?;
        Ok(Edit::RemoveRedaction {
            page,
            region: p.regions[index],
            index,
        })
    }

    /// Build a rotation edit from signed deltas.
    pub fn rotate(page: usize, quarter_delta: i32, fine_delta: f32) -> Edit {
        Edit::Rotate {
            page,
            quarter_delta,
            fine_delta,
        }
    }

    /// Build a `SetCrop` edit, snapshotting the page's current crop.
    pub fn set_crop(document: &Document, page: usize, new: CropRect) -> crate::error::Result<Edit> {
        let p = document.page(page).ok_or_else(|| {
            crate::error::RedactError::geometry(format!("page index {page} out of range"))
        })?;
        Ok(Edit::SetCrop {
            page,
            new,
            prev: p.crop,
        })
    }

    /// Build a `ClearCrop` edit, snapshotting the page's current crop.
    pub fn clear_crop(document: &Document, page: usize) -> crate::error::Result<Edit> {
        let p = document.page(page).ok_or_else(|| {
            crate::error::RedactError::geometry(format!("page index {page} out of range"))
        })?;
        Ok(Edit::ClearCrop { page, prev: p.crop })
    }

    /// Build a `SetEnhancement` edit, snapshotting the current settings.
    pub fn set_enhancement(
        document: &Document,
        page: usize,
        new: EnhancementSettings,
    ) -> crate::error::Result<Edit> {
        let p = document.page(page).ok_or_else(|| {
            crate::error::RedactError::geometry(format!("page index {page} out of range"))
        })?;
        Ok(Edit::SetEnhancement {
            page,
            new,
            prev: p.enhancement,
        })
    }

    /// Index of the page this edit targets.
    pub fn page_index(&self) -> usize {
        match self {
            Edit::AddRedaction { page, .. }
            | Edit::RemoveRedaction { page, .. }
            | Edit::Rotate { page, .. }
            | Edit::SetCrop { page, .. }
            | Edit::ClearCrop { page, .. }
            | Edit::SetEnhancement { page, .. } => *page,
        }
    }

    /// Validate the edit against the page's current state. Rejected edits
    /// never enter the history.
    fn validate(&self, page: &Page) -> crate::error::Result<()> {
        match self {
            Edit::SetCrop { new, .. } => {
                let (w, h) = page.rotated_dims();
                geometry::validate_crop(new, w, h)
            }
            Edit::Rotate {
                quarter_delta,
                fine_delta,
                ..
            } => {
                let fine = page.fine_rotation_deg + fine_delta;
                if !(-FINE_ROTATION_RANGE_DEG..=FINE_ROTATION_RANGE_DEG).contains(&fine) {
                    return Err(crate::error::RedactError::geometry(format!(
                        "fine rotation {fine} out of range +-{FINE_ROTATION_RANGE_DEG}"
                    )));
                }
                // A quarter turn swaps the crop frame's axes; an existing
                // crop must still fit or the caller has to clear it first.
                if let Some(crop) = page.crop {
                    let turned = page.quarter_turns.turned_by(*quarter_delta);
                    let (sw, sh) = page.source_dims();
                    let (w, h) = turned.rotated_dims(sw, sh);
                    geometry::validate_crop(&crop, w, h)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Forward application.
    fn apply(&self, page: &mut Page) -> crate::error::Result<()> {
        match self {
            Edit::AddRedaction { region, .. } => {
                page.regions.push(*region);
            }
            Edit::RemoveRedaction { region, .. } => {
                let index = page.find_region(region.id).ok_or_else(|| {
                    crate::error::RedactError::geometry(format!(
                        "no redaction region with id {}",
                        region.id.0
                    ))
                })?;
                page.regions.remove(index);
            }
            Edit::Rotate {
                quarter_delta,
                fine_delta,
                ..
            } => {
                page.quarter_turns = page.quarter_turns.turned_by(*quarter_delta);
                page.fine_rotation_deg += fine_delta;
            }
            Edit::SetCrop { new, .. } => {
                page.crop = Some(*new);
            }
            Edit::ClearCrop { .. } => {
                page.crop = None;
            }
            Edit::SetEnhancement { new, .. } => {
                page.enhancement = *new;
            }
        }
        Ok(())
    }

    /// Exact inverse application.
    fn revert(&self, page: &mut Page) -> crate::error::Result<()> {
        match self {
            Edit::AddRedaction { region, .. } => {
                let index = page.find_region(region.id).ok_or_else(|| {
                    crate::error::RedactError::geometry(format!(
                        "no redaction region with id {}",
                        region.id.0
                    ))
                })?;
                page.regions.remove(index);
            }
            Edit::RemoveRedaction { region, index, .. } => {
                page.regions.insert(*index, *region);
            }
            Edit::Rotate {
                quarter_delta,
                fine_delta,
                ..
            } => {
                page.quarter_turns = page.quarter_turns.turned_by(-quarter_delta);
                page.fine_rotation_deg -= fine_delta;
            }
            Edit::SetCrop { prev, .. } | Edit::ClearCrop { prev, .. } => {
                page.crop = *prev;
            }
            Edit::SetEnhancement { prev, .. } => {
                page.enhancement = *prev;
            }
        }
        Ok(())
    }
}

/// Outcome of an undo request. An empty stack is benign, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Undone { page: usize },
    NothingToUndo,
}

/// Outcome of a redo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedoOutcome {
    Redone { page: usize },
    NothingToRedo,
}

/// Per-document edit history: a global undo stack and redo stack of
/// page-tagged edits.
#[derive(Debug, Default)]
pub struct EditHistory {
    undo_stack: Vec<Edit>,
    redo_stack: Vec<Edit>,
}

impl EditHistory {
    pub fn new() -> Self {
        EditHistory::default()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Validate and apply an edit, then push it onto the undo stack.
    /// Recording a new edit discards any pending redo entries.
    ///
    /// Rejected edits leave the document and both stacks untouched.
    pub fn record(&mut self, document: &mut Document, edit: Edit) -> crate::error::Result<()> {
        let page = document.page_mut(edit.page_index())?;
        edit.validate(page)?;
        edit.apply(page)?;
        self.undo_stack.push(edit);
        self.redo_stack.clear();
        Ok(())
    }

    /// Revert the most recent edit, moving it to the redo stack.
    pub fn undo(&mut self, document: &mut Document) -> crate::error::Result<UndoOutcome> {
        let Some(edit) = self.undo_stack.pop() else {
            return Ok(UndoOutcome::NothingToUndo);
        };
        let page = edit.page_index();
        edit.revert(document.page_mut(page)?)?;
        self.redo_stack.push(edit);
        Ok(UndoOutcome::Undone { page })
    }

    /// Re-apply the most recently undone edit, moving it back to the undo
    /// stack.
    pub fn redo(&mut self, document: &mut Document) -> crate::error::Result<RedoOutcome> {
        let Some(edit) = self.redo_stack.pop() else {
            return Ok(RedoOutcome::NothingToRedo);
        };
        let page = edit.page_index();
        edit.apply(document.page_mut(page)?)?;
        self.undo_stack.push(edit);
        Ok(RedoOutcome::Redone { page })
    }
}
