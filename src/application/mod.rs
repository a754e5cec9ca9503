// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal per use case.
//
// Rules for this layer:
//   - No masking or metric math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct file parsing (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Mask one sentence with the MLM policy
pub mod mask_use_case;

// Score a predictions file
pub mod evaluate_use_case;

// Load, encode, batch and mask one split as a smoke check
pub mod check_use_case;

// Split a split file by domain and scenario
pub mod partition_use_case;
