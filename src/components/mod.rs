// Export components
pub mod planning;

// Re-export the feed handle
pub use planning::FeedHandle;
