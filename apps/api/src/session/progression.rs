//! Section Progression State Machine.
//!
//! Walks the four sections in order. Each section keeps its current batch of
//! options, the batch it replaced, and the user's selection. Moving forward
//! requires a selection; moving backward is always allowed and never
//! regenerates. Past the last section the machine is `Assembling`.
//!
//! Transitions are two-phase. A `begin_*` call moves the step synchronously
//! and returns the `PendingGeneration` it needs, if any; the caller runs the
//! generation call without holding the state, then hands the outcome to
//! `complete`. Results are stored under the section they were requested for,
//! never under whatever section happens to be active when they arrive.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::generation::options::SectionOption;
use crate::generation::section::SectionId;

const GENERATE_FAILED: &str = "Failed to generate options. Please try again.";
const REGENERATE_FAILED: &str = "Failed to generate new options. Please try again.";

static OPTION_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Option \d+:\s*").expect("option prefix regex is valid"));

#[derive(Debug, Error, PartialEq)]
pub enum ProgressionError {
    #[error("a selection is required for {0}")]
    SelectionRequired(SectionId),

    #[error("{0} has no generated options yet")]
    NotGenerated(SectionId),

    #[error("{0} has not been reached yet")]
    NotReached(SectionId),

    #[error("the cover letter is being assembled; go back to change a section")]
    Assembling,

    #[error("all four sections must be completed before assembling")]
    NotAssembling,

    #[error("selection text cannot be empty")]
    EmptySelection,
}

impl From<ProgressionError> for AppError {
    fn from(e: ProgressionError) -> Self {
        match e {
            ProgressionError::SelectionRequired(section) => {
                AppError::SelectionRequired(section.label().to_string())
            }
            ProgressionError::EmptySelection => AppError::Validation(e.to_string()),
            other => AppError::InvalidState(other.to_string()),
        }
    }
}

/// Per-section history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionState {
    pub current_options: Vec<SectionOption>,
    /// The batch immediately before `current_options`, if a regeneration succeeded.
    pub previous_options: Vec<SectionOption>,
    pub selected: Option<String>,
}

impl SectionState {
    fn has_selection(&self) -> bool {
        self.selected.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    /// First batch for a section that has none.
    Initial,
    /// Fresh batch replacing the current one.
    Regenerate,
}

/// A generation call a transition is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingGeneration {
    pub section: SectionId,
    pub kind: GenerationKind,
}

#[derive(Debug, Clone, Default)]
pub struct ProgressionState {
    active_step: usize,
    sections: BTreeMap<SectionId, SectionState>,
    assembling: bool,
    error: Option<String>,
}

impl ProgressionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_step(&self) -> usize {
        self.active_step
    }

    pub fn active_section(&self) -> SectionId {
        SectionId::ALL[self.active_step]
    }

    pub fn is_assembling(&self) -> bool {
        self.assembling
    }

    /// User-facing message from the last failed transition, cleared on success
    /// and on every step change.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn section(&self, section: SectionId) -> Option<&SectionState> {
        self.sections.get(&section)
    }

    pub fn sections(&self) -> &BTreeMap<SectionId, SectionState> {
        &self.sections
    }

    /// Shows `section`. The first visit needs a generation; later visits
    /// restore what is stored.
    pub fn begin_visit(&mut self, section: SectionId) -> Option<PendingGeneration> {
        self.error = None;
        if self.sections.contains_key(&section) {
            debug!("Restoring stored options for {section}");
            return None;
        }
        Some(PendingGeneration {
            section,
            kind: GenerationKind::Initial,
        })
    }

    /// Records the user's choice for the active section. Does not advance.
    /// A leading `Option N:` marker is stripped from the text.
    pub fn select(&mut self, option_text: &str) -> Result<(), ProgressionError> {
        if self.assembling {
            return Err(ProgressionError::Assembling);
        }

        let cleaned = OPTION_PREFIX.replace(option_text.trim(), "").trim().to_string();
        if cleaned.is_empty() {
            return Err(ProgressionError::EmptySelection);
        }

        let section = self.active_section();
        let state = self
            .sections
            .get_mut(&section)
            .ok_or(ProgressionError::NotGenerated(section))?;

        state.selected = Some(cleaned);
        self.error = None;
        debug!("Selected option for {section}");
        Ok(())
    }

    /// Asks for a fresh batch for the active section. A section that never
    /// got its first batch is generated as a first visit.
    pub fn begin_regenerate(&mut self) -> Result<PendingGeneration, ProgressionError> {
        if self.assembling {
            return Err(ProgressionError::Assembling);
        }

        let section = self.active_section();
        let kind = if self.sections.contains_key(&section) {
            GenerationKind::Regenerate
        } else {
            GenerationKind::Initial
        };
        Ok(PendingGeneration { section, kind })
    }

    /// Moves to the next section, or into `Assembling` from the last one.
    /// Fails without moving if the active section has no selection.
    pub fn begin_advance(&mut self) -> Result<Option<PendingGeneration>, ProgressionError> {
        if self.assembling {
            return Err(ProgressionError::Assembling);
        }

        let section = self.active_section();
        if !self.section(section).is_some_and(SectionState::has_selection) {
            return Err(ProgressionError::SelectionRequired(section));
        }

        if section.is_last() {
            if let Some(missing) = self.first_unselected() {
                return Err(ProgressionError::SelectionRequired(missing));
            }
            self.assembling = true;
            self.error = None;
            info!("All sections selected; ready to assemble");
            return Ok(None);
        }

        self.active_step += 1;
        Ok(self.begin_visit(self.active_section()))
    }

    /// Steps back one section, or out of `Assembling` onto the last section.
    /// A no-op on the first section.
    pub fn begin_back(&mut self) -> Option<PendingGeneration> {
        if self.assembling {
            self.assembling = false;
            self.error = None;
            return None;
        }
        if self.active_step == 0 {
            return None;
        }

        self.active_step -= 1;
        self.begin_visit(self.active_section())
    }

    /// Jumps back to a section at or before the active one.
    pub fn begin_go_to(
        &mut self,
        section: SectionId,
    ) -> Result<Option<PendingGeneration>, ProgressionError> {
        if !self.assembling && section.index() > self.active_step {
            return Err(ProgressionError::NotReached(section));
        }

        self.assembling = false;
        self.active_step = section.index();
        Ok(self.begin_visit(section))
    }

    /// Applies a finished generation to the section it was requested for.
    ///
    /// On success a regeneration moves the replaced batch to
    /// `previous_options`. On failure both batches are left as they were and
    /// the user-facing error is set.
    pub fn complete(
        &mut self,
        pending: PendingGeneration,
        result: Result<Vec<SectionOption>, AppError>,
    ) -> Result<(), AppError> {
        let options = result.map_err(|e| self.fail(pending, e))?;
        let section = pending.section;

        match self.sections.get_mut(&section) {
            Some(state) => {
                state.previous_options = std::mem::replace(&mut state.current_options, options);
                info!("Regenerated options for {section}");
            }
            None => {
                self.sections.insert(
                    section,
                    SectionState {
                        current_options: options,
                        ..SectionState::default()
                    },
                );
                debug!("Stored first options for {section}");
            }
        }
        self.error = None;
        Ok(())
    }

    /// Records the failure message for `pending` and hands the error back.
    pub fn fail(&mut self, pending: PendingGeneration, e: AppError) -> AppError {
        let message = match pending.kind {
            GenerationKind::Initial => GENERATE_FAILED,
            GenerationKind::Regenerate => REGENERATE_FAILED,
        };
        self.error = Some(message.to_string());
        e
    }

    /// The four selected texts in section order, available once assembling.
    pub fn selections(&self) -> Result<BTreeMap<SectionId, String>, ProgressionError> {
        if !self.assembling {
            return Err(ProgressionError::NotAssembling);
        }

        Ok(self
            .sections
            .iter()
            .filter_map(|(id, state)| state.selected.clone().map(|s| (*id, s)))
            .collect())
    }

    fn first_unselected(&self) -> Option<SectionId> {
        SectionId::ALL
            .into_iter()
            .find(|id| !self.section(*id).is_some_and(SectionState::has_selection))
    }
}

/// Runs transitions end to end against an in-process generator, for tests
/// that only care about the state machine.
#[cfg(test)]
pub mod driver {
    use async_trait::async_trait;

    use super::{PendingGeneration, ProgressionState};
    use crate::errors::AppError;
    use crate::generation::options::SectionOption;
    use crate::generation::section::SectionId;

    #[async_trait]
    pub trait SectionGenerator: Send + Sync {
        async fn generate(&self, section: SectionId) -> Result<Vec<SectionOption>, AppError>;
    }

    impl ProgressionState {
        async fn run(
            &mut self,
            pending: Option<PendingGeneration>,
            generator: &dyn SectionGenerator,
        ) -> Result<(), AppError> {
            match pending {
                Some(pending) => {
                    let result = generator.generate(pending.section).await;
                    self.complete(pending, result)
                }
                None => Ok(()),
            }
        }

        pub async fn visit(
            &mut self,
            section: SectionId,
            generator: &dyn SectionGenerator,
        ) -> Result<(), AppError> {
            let pending = self.begin_visit(section);
            self.run(pending, generator).await
        }

        pub async fn regenerate(&mut self, generator: &dyn SectionGenerator) -> Result<(), AppError> {
            let pending = self.begin_regenerate()?;
            self.run(Some(pending), generator).await
        }

        pub async fn advance(&mut self, generator: &dyn SectionGenerator) -> Result<(), AppError> {
            let pending = self.begin_advance()?;
            self.run(pending, generator).await
        }

        pub async fn back(&mut self, generator: &dyn SectionGenerator) -> Result<(), AppError> {
            let pending = self.begin_back();
            self.run(pending, generator).await
        }

        pub async fn go_to(
            &mut self,
            section: SectionId,
            generator: &dyn SectionGenerator,
        ) -> Result<(), AppError> {
            let pending = self.begin_go_to(section)?;
            self.run(pending, generator).await
        }
    }
}
