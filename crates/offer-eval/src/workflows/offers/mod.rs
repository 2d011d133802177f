//! Job offer evaluation: compensation normalization, cost-of-living adjustment, weighted
//! scoring, negotiation guidance and multi-year career projection.
//!
//! The engine itself is pure and synchronous. Persistence, the job-tracking offer list and
//! the optional narrative generator sit behind traits and are composed by
//! [`OfferEvaluationService`].

pub mod comparison;
pub mod compensation;
pub mod domain;
pub(crate) mod evaluation;
pub(crate) mod guard;
pub mod import;
pub mod narrative;
pub mod projection;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use comparison::{
    compare, matrix_rows, project_career, ComparisonResult, MatrixRow, OfferComparisonRow,
    OfferEvaluationEngine, MATRIX_VERSION,
};
pub use compensation::{
    adjust_for_cost_of_living, format_currency, CompensationNormalizer, NormalizedCompensation,
};
pub use domain::{
    CareerMilestone, CareerProjectionInputs, CompensationPatch, ComparisonOptions, GrowthRates,
    Offer, OfferId, RaiseScenarios, Ratings, ScenarioKey, ScenarioOverrides, StartingCompensation,
    Weights, WorkMode,
};
pub use evaluation::{NegotiationSignal, NegotiationThresholds, ScoredOffer, ScoringEngine};
pub use guard::InvalidInput;
pub use import::{OfferImportError, OfferImporter};
pub use narrative::{
    Narrative, NarrativeError, NarrativeGenerator, NarrativeKind, NarrativeRequest,
    NarrativeSource, TemplateNarrator,
};
pub use projection::{
    CareerProjectionResult, OfferProjection, ProjectionAssumptions, ProjectionSeries,
    ScenarioProjection,
};
pub use repository::{
    ComparisonId, OfferSource, OfferSourceError, SavedComparison, SavedComparisonStore,
    SavedComparisonView, StoreError,
};
pub use router::offer_router;
pub use service::{
    ComparisonReport, OfferEvaluationService, ProjectionReport, ReplayOutcome, ServiceError,
};
