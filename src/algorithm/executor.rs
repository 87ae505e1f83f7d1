use tracing::{debug, info, instrument};

use crate::{
    algorithm::composite::{CompositePlan, composite},
    algorithm::search::{OffsetBounds, Placement, find_best_offset},
    algorithm::seam::carve,
    io::configuration::SynthesisConfig,
    io::error::{ErrorContext, Result, SynthesisError, WithContext, invariant_violation},
    spatial::{EdgeMode, FillGrid, Raster, SeamMemory},
};

/// Snapshot of synthesis progress, reported once per iteration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Completed placements after the seed
    pub iteration: usize,
    /// Filled canvas pixels
    pub filled: usize,
    /// Total canvas pixels
    pub total: usize,
}

impl Progress {
    /// Fraction of the canvas covered, in `[0, 1]`
    pub const fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.filled as f64 / self.total as f64
    }
}

/// Receives progress and decides on cancellation while [`Synthesizer::run`] loops
///
/// Both hooks are called between iterations, never in the middle of one.
pub trait SynthesisObserver {
    /// Called after every placement
    fn on_progress(&mut self, _progress: Progress) {}

    /// Consulted before every placement; returning `true` stops the run
    fn should_cancel(&mut self) -> bool {
        false
    }
}

impl SynthesisObserver for () {}

/// Result of a synthesis run
#[derive(Debug, Clone)]
pub enum Synthesis {
    /// Every canvas pixel was filled
    Complete {
        /// Finished canvas
        canvas: Raster,
        /// Final fill grid, including seam bits
        fill: FillGrid,
        /// Number of placements after the seed
        iterations: usize,
    },
    /// The observer canceled the run before the canvas was covered
    Canceled {
        /// Canvas as it was when cancellation was honored
        canvas: Raster,
        /// Fill grid as it was when cancellation was honored
        fill: FillGrid,
        /// Number of placements completed before cancellation
        iterations: usize,
    },
}

impl Synthesis {
    /// Whether the canvas was fully covered
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// The canvas, finished or partial
    pub const fn canvas(&self) -> &Raster {
        match self {
            Self::Complete { canvas, .. } | Self::Canceled { canvas, .. } => canvas,
        }
    }

    /// The fill grid, finished or partial
    pub const fn fill(&self) -> &FillGrid {
        match self {
            Self::Complete { fill, .. } | Self::Canceled { fill, .. } => fill,
        }
    }

    /// Placements performed after the seed
    pub const fn iterations(&self) -> usize {
        match self {
            Self::Complete { iterations, .. } | Self::Canceled { iterations, .. } => *iterations,
        }
    }

    /// The finished canvas
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::Aborted`] if the run was canceled.
    pub fn into_canvas(self) -> Result<Raster> {
        match self {
            Self::Complete { canvas, .. } => Ok(canvas),
            Self::Canceled {
                fill, iterations, ..
            } => Err(SynthesisError::Aborted {
                iteration: iterations,
                filled: fill.filled_count(),
                total: fill.area(),
            }),
        }
    }
}

/// Patch-based texture synthesizer
///
/// Owns the canvas and its fill grid for the duration of a run. The canvas
/// starts with one copy of the source at the origin; each iteration then
/// anchors on the first unfilled pixel, searches the best nearby placement,
/// carves the overlap and composites the patch, until the canvas is covered.
pub struct Synthesizer {
    /// Source patch copied into the canvas
    pub source: Raster,
    /// Canvas being synthesized
    pub canvas: Raster,
    /// Coverage and seam state of the canvas
    pub fill: FillGrid,
    /// Samples hidden behind the seams recorded in `fill`
    pub seams: SeamMemory,
    /// Validated run configuration
    pub config: SynthesisConfig,
    /// Window of candidate offsets
    pub bounds: OffsetBounds,
    /// Canvas addressing rule
    pub edges: EdgeMode,
    /// Completed placements after the seed
    pub iteration: usize,
    /// Most recent placement
    pub last_placement: Option<Placement>,
}

impl Synthesizer {
    /// Create a synthesizer with the seed patch already placed
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid for this source
    /// (see [`SynthesisConfig::validate`]).
    pub fn new(source: Raster, config: SynthesisConfig) -> Result<Self> {
        config.validate(source.width(), source.height())?;

        let mut canvas = Raster::blank(config.width, config.height, source.channels());
        let mut fill = FillGrid::new(config.width, config.height);

        canvas.paste(&source, [0, 0]);
        fill.fill_rect([0, 0], source.width(), source.height());

        let seams = SeamMemory::new(config.width, config.height, source.channels());
        let bounds = OffsetBounds::from_overlap(config.overlap, source.width(), source.height());

        Ok(Self {
            source,
            canvas,
            fill,
            seams,
            config,
            bounds,
            edges: EdgeMode::from_tileable(config.tileable),
            iteration: 0,
            last_placement: None,
        })
    }

    /// Current progress snapshot
    pub const fn progress(&self) -> Progress {
        Progress {
            iteration: self.iteration,
            filled: self.fill.filled_count(),
            total: self.config.area(),
        }
    }

    /// Whether the canvas is fully covered
    pub fn is_complete(&self) -> bool {
        self.fill.is_full()
    }

    /// Execute a single placement
    ///
    /// Returns `false` without doing anything once the canvas is covered.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if a placement fills no new pixel.
    pub fn execute_iteration(&mut self) -> Result<bool> {
        // Phase 1: Check if we're already complete
        if self.is_complete() {
            return Ok(false);
        }

        let context = ErrorContext {
            iteration: Some(self.iteration + 1),
            ..Default::default()
        };

        // Phase 2: Choose where the next patch goes
        let anchor = self.fill.next_unfilled().with_context(context.clone())?;
        let placement = find_best_offset(
            &self.canvas,
            &self.fill,
            &self.source,
            anchor,
            &self.bounds,
            self.edges,
        );

        // Phase 3: Cut the overlap and write the patch
        let cuts = carve(
            &self.canvas,
            &self.fill,
            &self.seams,
            &self.source,
            &placement,
            self.edges,
        );
        let plan = CompositePlan::new(self.source.width(), self.source.height(), &cuts);
        let newly_filled = composite(
            &mut self.canvas,
            &mut self.fill,
            &mut self.seams,
            &self.source,
            &placement,
            &plan,
            self.edges,
        );

        // Phase 4: Post-placement bookkeeping
        self.iteration += 1;
        self.last_placement = Some(placement);

        debug!(
            iteration = self.iteration,
            x = anchor[0],
            y = anchor[1],
            dx = placement.offset[0],
            dy = placement.offset[1],
            error = placement.error,
            newly_filled,
            "placed patch"
        );

        if newly_filled == 0 {
            return Err(invariant_violation(
                "composite",
                &format!(
                    "placement at [{}, {}] left anchor [{}, {}] unfilled",
                    placement.origin()[0],
                    placement.origin()[1],
                    anchor[0],
                    anchor[1]
                ),
            ))
            .with_context(ErrorContext {
                position: Some(anchor),
                ..context
            });
        }

        Ok(true)
    }

    /// Run until the canvas is covered or the observer cancels
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the loop stops making progress.
    #[instrument(
        skip_all,
        fields(
            width = self.config.width,
            height = self.config.height,
            overlap = self.config.overlap,
            tileable = self.config.tileable
        )
    )]
    pub fn run<O: SynthesisObserver>(mut self, observer: &mut O) -> Result<Synthesis> {
        let limit = self.config.area();

        while !self.is_complete() {
            if observer.should_cancel() {
                info!(
                    iteration = self.iteration,
                    filled = self.fill.filled_count(),
                    "synthesis canceled"
                );
                return Ok(Synthesis::Canceled {
                    canvas: self.canvas,
                    fill: self.fill,
                    iterations: self.iteration,
                });
            }

            // Every placement fills its anchor, so this bound is never reached
            if self.iteration >= limit {
                return Err(invariant_violation(
                    "run",
                    &format!("exceeded {limit} placements without covering the canvas"),
                ))
                .with_context(ErrorContext {
                    iteration: Some(self.iteration),
                    ..Default::default()
                });
            }

            self.execute_iteration()?;
            observer.on_progress(self.progress());
        }

        info!(iterations = self.iteration, "synthesis complete");
        Ok(Synthesis::Complete {
            canvas: self.canvas,
            fill: self.fill,
            iterations: self.iteration,
        })
    }
}
