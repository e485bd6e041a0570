// View-model derivation. Every function here is a pure function of its
// input and never fails: absent data degrades to a placeholder.

// Item-trace derivers
pub mod location;
pub mod nutrition;

// Apparel passport summaries
pub mod dpp;

// Certifications
pub mod compliance;

// Journey and provenance rows
pub mod events;
pub mod provenance;

// Stand-in values used until real data is integrated
pub mod placeholders;
