//! Boundary to the native compiler under test.
//!
//! The compiler itself is a black box: it takes an argument vector and
//! reports an exit code plus a stream of diagnostics. This crate owns
//! everything on our side of that line:
//!
//! ```text
//! CompilerInvocation ──► Vec<String> ──► dyn Compiler ──► CompilerOutput
//!                                                            │
//!                                    run_compiler() ◄────────┘
//!                                          │
//!                              Ok(()) / CompilationError
//! ```
//!
//! [`ExternalCompiler`] shells out to a compiler executable. Anything else
//! that implements [`Compiler`] (an in-process entry point, a test double)
//! satisfies the same contract.

mod driver;
mod error;
mod invocation;
mod message;
mod target;

pub use driver::{run_compiler, Compiler, CompilerOutput, ExitCode, ExternalCompiler};
pub use error::{CompilationError, CompilerDetails};
pub use invocation::CompilerInvocation;
pub use message::{parse_messages, render_plain, CompilerMessage, MessageLocation, Severity};
pub use target::{Family, Target};
