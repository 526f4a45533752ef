//! Pipeline stages for transcript analysis.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different extraction backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ relevance ──▶ dialogue ──▶ completion ──▶ normalize
//! (pdf text)  (keyword gate) (speaker turns) (LLM call)   (JSON repair)
//! ```
//!
//! 1. [`extract`]    — pull the per-page text layer, bounded to `max_chars`
//! 2. [`relevance`]  — keyword gate; non-financial documents stop here
//! 3. [`dialogue`]   — mark speaker turns, drop operator boilerplate
//! 4. [`completion`] — assemble the prompt and make the one network call
//! 5. [`normalize`]  — parse untrusted model text, back-fill the contract

pub mod completion;
pub mod dialogue;
pub mod extract;
pub mod normalize;
pub mod relevance;
