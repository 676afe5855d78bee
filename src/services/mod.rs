pub mod classifier;
pub mod fallback;
pub mod presentation;
pub mod providers;
pub mod store;
pub mod sync;
