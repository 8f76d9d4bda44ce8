//! # Shard-Guard Test Suite
//!
//! Cross-crate flows wired with the real adapters: BLAKE3 hashing, Ed25519
//! signatures, bincode serialization and in-memory accounts.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fork_detection.rs   # Header streams through the fork detector
//!     ├── slashing_flow.rs    # Detect → commit → forward → reveal → slash
//!     └── admission_flow.rs   # Signed peer authentications through the interceptor
//!
//! tests/benches/
//! └── fork_detector.rs        # add_header / check_fork throughput
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sg-tests
//!
//! # By flow
//! cargo test -p sg-tests integration::slashing_flow
//!
//! # Benchmarks
//! cargo bench -p sg-tests
//! ```

pub mod integration;
