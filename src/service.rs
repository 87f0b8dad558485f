//! Collaborators around the composer: submissions, output naming, the render counter,
//! template listing and the retention sweep.

/// Retention sweep over rendered outputs and its daily schedule.
pub mod cleanup;
/// Persistent render counter guarded by an exclusive file lock.
pub mod counter;
/// Output file naming and timestamp parsing.
pub mod naming;
/// End-to-end handling of one form submission.
pub mod submission;
/// Template enumeration from the video pool.
pub mod templates;
