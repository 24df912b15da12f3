// Intake workflow: submission pipeline (collect → assemble → generate → store
// → present) and the HTTP handlers around it.
// All generation goes through the injected GenerationService, never a concrete client.

pub mod handlers;
pub mod pipeline;
