//! Conversation orchestration for Switchboard.
//!
//! This crate drives the two-phase model conversation that turns one chat
//! message into at most one backend operation:
//!
//! 1. **Classification** - pick the retrieval strategy (event / LOB /
//!    domain fallback) from the raw message
//! 2. **Retrieval** (`retrieval`) - fetch ranked context snippets through
//!    the external retriever boundary
//! 3. **Prompting** (`prompt`) - assemble the phase-1 message sequence with
//!    platform-routing guidance
//! 4. **Model call #1** (`llm`) - the model either answers directly or
//!    proposes a function call against the registry snapshot
//! 5. **Dispatch** - route the proposal through the `FunctionDispatch` seam
//! 6. **Model call #2** - format the dispatch envelope into the final answer
//!
//! The orchestrator holds no session state; every run is a single pass over
//! immutable process-wide state plus per-request values.

pub mod llm;
pub mod orchestrator;
pub mod prompt;
pub mod retrieval;
