use crate::{
    assets::fetch::ImageFetcher,
    encode::jpeg::{
        ArtifactPlan, CompositeResult, Disposition, Variant, build_artifact, downscale_to_fit,
    },
    foundation::error::{PrintError, PrintResult},
    foundation::math::units_to_px,
    job::config::EngineConfig,
    layout::geometry::{CanvasGeometry, compute_geometry_with},
    layout::grid::{GridPlan, plan},
    render::acquire::{AcquireTask, acquire_patches, build_thread_pool},
    render::composite::composite,
    render::transform::filter_for,
    request::model::{LayoutRequest, PrintSpec, RenderMode},
};

/// Lifecycle of one compositing job.
///
/// `Validating -> Planning -> Fetching -> Compositing -> Encoding -> Done`, with `Failed`
/// reachable from every non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Checking request shape.
    Validating,
    /// Computing the grid and pixel geometry.
    Planning,
    /// Fetching, decoding, and transforming every image.
    Fetching,
    /// Stamping patches onto the canvas.
    Compositing,
    /// Producing the encoded artifacts.
    Encoding,
    /// Artifacts are ready.
    Done,
    /// The job aborted.
    Failed,
}

impl JobState {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether `self -> next` is a legal step.
    pub fn can_transition_to(self, next: JobState) -> bool {
        use JobState::*;
        match (self, next) {
            (s, Failed) => !s.is_terminal(),
            (Validating, Planning)
            | (Planning, Fetching)
            | (Fetching, Compositing)
            | (Compositing, Encoding)
            | (Encoding, Done) => true,
            _ => false,
        }
    }
}

/// Deliverables of a successful job.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobOutput {
    /// Preview jobs produce one artifact.
    Preview(CompositeResult),
    /// Final jobs produce a print artifact and a display copy of the same composite.
    Final {
        /// Print-grade artifact.
        print: CompositeResult,
        /// Display copy.
        preview: CompositeResult,
    },
}

impl JobOutput {
    /// Every artifact, print first.
    pub fn artifacts(&self) -> Vec<&CompositeResult> {
        match self {
            Self::Preview(p) => vec![p],
            Self::Final { print, preview } => vec![print, preview],
        }
    }

    /// The artifact meant for on-screen display.
    pub fn display(&self) -> &CompositeResult {
        match self {
            Self::Preview(p) => p,
            Self::Final { preview, .. } => preview,
        }
    }

    /// Mode the job ran in.
    pub fn mode(&self) -> RenderMode {
        match self {
            Self::Preview(_) => RenderMode::Preview,
            Self::Final { .. } => RenderMode::Final,
        }
    }
}

/// Outcome of a job plus the states it passed through.
#[derive(Debug)]
pub struct JobRun {
    /// Final result.
    pub outcome: PrintResult<JobOutput>,
    /// Visited states in order, starting with `Validating`.
    pub states: Vec<JobState>,
}

struct StateTracker {
    current: JobState,
    visited: Vec<JobState>,
}

impl StateTracker {
    fn new() -> Self {
        tracing::debug!(state = ?JobState::Validating, "job state");
        Self {
            current: JobState::Validating,
            visited: vec![JobState::Validating],
        }
    }

    fn advance(&mut self, next: JobState) -> PrintResult<()> {
        if !self.current.can_transition_to(next) {
            return Err(PrintError::internal(format!(
                "illegal job transition {:?} -> {next:?}",
                self.current
            )));
        }
        tracing::debug!(from = ?self.current, to = ?next, "job state");
        self.current = next;
        self.visited.push(next);
        Ok(())
    }

    fn fail(&mut self, err: &PrintError) {
        if self.current.is_terminal() {
            return;
        }
        tracing::debug!(from = ?self.current, category = err.category(), "job failed");
        self.current = JobState::Failed;
        self.visited.push(JobState::Failed);
    }
}

/// Compositing engine. Holds the configuration, the fetch capability, and the worker pool;
/// jobs share nothing else, so one engine can serve many jobs.
pub struct PrintEngine<F> {
    config: EngineConfig,
    fetcher: F,
    pool: rayon::ThreadPool,
}

impl<F: ImageFetcher> PrintEngine<F> {
    /// Validate `config` and build the worker pool.
    pub fn new(config: EngineConfig, fetcher: F) -> PrintResult<Self> {
        config.validate()?;
        let pool = build_thread_pool(config.threads)?;
        Ok(Self {
            config,
            fetcher,
            pool,
        })
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The injected fetch capability.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Grid and pixel geometry for `req` without fetching anything.
    pub fn plan(&self, req: &LayoutRequest) -> PrintResult<(GridPlan, CanvasGeometry)> {
        req.validate()?;
        self.plan_validated(req)
    }

    /// Run one job to completion.
    pub fn run(&self, req: &LayoutRequest) -> PrintResult<JobOutput> {
        self.run_traced(req).outcome
    }

    /// Run one job and report the states it visited.
    #[tracing::instrument(skip_all, fields(images = req.images.len(), mode = req.mode().as_str()))]
    pub fn run_traced(&self, req: &LayoutRequest) -> JobRun {
        let mut tracker = StateTracker::new();
        let outcome = self.drive(req, &mut tracker);
        if let Err(e) = &outcome {
            tracker.fail(e);
            if e.is_client_error() {
                tracing::info!(error = %e, "job rejected");
            } else {
                tracing::warn!(error = %e, "job failed");
            }
        }
        JobRun {
            outcome,
            states: tracker.visited,
        }
    }

    fn plan_validated(&self, req: &LayoutRequest) -> PrintResult<(GridPlan, CanvasGeometry)> {
        let grid = plan(req.images.len())?;
        let geometry = compute_geometry_with(
            &req.effective_print_spec(),
            req.mode(),
            req.spacing,
            &grid,
            &self.config.geometry,
        )?;
        Ok((grid, geometry))
    }

    fn drive(&self, req: &LayoutRequest, tracker: &mut StateTracker) -> PrintResult<JobOutput> {
        req.validate()?;

        tracker.advance(JobState::Planning)?;
        let (grid, geometry) = self.plan_validated(req)?;
        tracing::debug!(
            cols = grid.cols,
            rows = grid.layout_rows(),
            width = geometry.width,
            height = geometry.height,
            "planned canvas"
        );

        tracker.advance(JobState::Fetching)?;
        let corner_radius_px = units_to_px(req.corner_radius, geometry.density) as u32;
        let tasks: Vec<AcquireTask<'_>> = grid
            .slots()
            .iter()
            .map(|slot| AcquireTask {
                index: slot.index,
                image: &req.images[slot.index],
                cell: geometry.cell_box(slot),
                fit: req.fit_for(slot.index),
                corner_radius_px,
            })
            .collect();
        let mode = req.mode();
        let patches = acquire_patches(&tasks, &self.fetcher, filter_for(mode), &self.pool)?;

        tracker.advance(JobState::Compositing)?;
        let canvas = composite(&geometry, &patches)?;
        drop(patches);

        tracker.advance(JobState::Encoding)?;
        let spec = req.effective_print_spec();
        let output = match mode {
            RenderMode::Preview => JobOutput::Preview(build_artifact(
                &canvas,
                &self.artifact_plan(mode, Variant::Preview, &spec),
            )?),
            RenderMode::Final => {
                let print =
                    build_artifact(&canvas, &self.artifact_plan(mode, Variant::Print, &spec))?;
                let display = downscale_to_fit(&canvas, self.config.display_max_side_px);
                let preview = build_artifact(
                    &display,
                    &self.artifact_plan(mode, Variant::DisplayPreview, &spec),
                )?;
                JobOutput::Final { print, preview }
            }
        };

        tracker.advance(JobState::Done)?;
        Ok(output)
    }

    fn artifact_plan<'a>(
        &self,
        mode: RenderMode,
        variant: Variant,
        spec: &'a PrintSpec,
    ) -> ArtifactPlan<'a> {
        let (settings, disposition) = match variant {
            Variant::Preview => (self.config.preview_settings(), Disposition::Inline),
            Variant::Print => (self.config.print_settings(), Disposition::Attachment),
            Variant::DisplayPreview => (self.config.display_settings(), Disposition::Inline),
        };
        ArtifactPlan {
            mode,
            variant,
            settings,
            disposition,
            spec,
        }
    }
}

/// One-shot helper: build an engine with `config` and run `req`.
pub fn compose<F: ImageFetcher>(
    req: &LayoutRequest,
    fetcher: F,
    config: EngineConfig,
) -> PrintResult<JobOutput> {
    PrintEngine::new(config, fetcher)?.run(req)
}

#[cfg(test)]
#[path = "../../tests/unit/job/orchestrator.rs"]
mod tests;
