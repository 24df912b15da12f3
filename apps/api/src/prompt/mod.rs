// Prompt Assembler: the versioned ruleset asset, task templates, and the pure
// record → GenerationRequest rendering.

pub mod assembler;
pub mod ruleset;
pub mod templates;
