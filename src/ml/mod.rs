// ============================================================
// Layer 5 — MLM Masking and Evaluation
// ============================================================
// The two algorithms at the centre of the crate, both pure
// functions over plain vectors:
//
//   rng.rs       — the injectable random generator handle and
//                  the seeding routine
//
//   masking.rs   — 80/10/10 masked-language-model masking of a
//                  token id batch, producing (inputs, labels)
//
//   scoring.rs   — accuracy / precision / recall / F1 with
//                  binary, micro, macro and weighted averaging
//
//   pairwise.rs  — Com2Sense pairwise accuracy over
//                  complementary statement pairs
//
// Nothing in this layer does I/O. The model and training loop
// that consume these outputs live outside this crate.
//
// Reference: Devlin et al. (2019) BERT
//            Singh et al. (2021) Com2Sense

/// Seeded random generator handle
pub mod rng;

/// MLM token masking
pub mod masking;

/// Standard classification metrics
pub mod scoring;

/// Complementary-pair accuracy
pub mod pairwise;
