//! Timeline composition: timed overlay layers over a looped base clip.

/// The composer that owns the base clip, audio and layers, and drives a render.
pub mod composer;
/// Overlay layers and their timing.
pub mod layer;
/// Duration reconciliation, loop counts, audio looping and typewriter schedules.
pub mod reconcile;
