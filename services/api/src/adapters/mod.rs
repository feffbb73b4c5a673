pub mod drafting_llm;
pub mod geo;
pub mod store;

pub use drafting_llm::OpenAiDraftingAdapter;
pub use geo::FixedGeoAdapter;
pub use store::JsonFileStore;
