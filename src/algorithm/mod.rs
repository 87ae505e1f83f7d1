/// Writing placed patches into the canvas along their cuts
pub mod composite;
/// Synthesis loop orchestration, progress and cancellation
pub mod executor;
/// Minimum-error cuts through overlap bands
pub mod seam;
/// Placement search over the bounded offset window
pub mod search;
