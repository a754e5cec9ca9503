// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums and traits that define the core
// concepts of the system.
//
// Rules for this layer:
//   - NO file I/O
//   - NO tokenizer or framework types
//   - Only plain Rust structs, enums, traits and the error type
//
// Think of this layer as the "dictionary" of the system:
// it defines what things ARE, not how they work.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// One Com2Sense statement and the raw JSON record it came from
pub mod statement;

// A scored prediction for one statement
pub mod prediction;

// The error taxonomy shared by the core and data layers
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
