// Job / candidate matching: feature extraction, weighting, ranking, prediction.
// Semantic similarity goes through the injected `Embedder`; no network calls here.

pub mod engine;
pub mod extractors;
pub mod handlers;
pub mod prediction;
pub mod profile;
pub mod ranker;
pub mod store;
pub mod weights;
