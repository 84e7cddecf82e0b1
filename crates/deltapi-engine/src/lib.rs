//! Differential API testing engine
//!
//! Replays an ordered list of recorded HTTP actions against two servers that
//! should behave the same and reports, per action, whether they did.
//!
//! ```text
//! lines ─► parser ─► [Action] ─► Engine::run_all ─┬─► client A ─┐
//!                                                 └─► client B ─┴─► compare ─► ActionReport
//!                                                                                  │
//!                                            on_report(index, report) ◄────────────┤
//!                                                                     Report ◄─────┘
//! ```
//!
//! # Key Types
//!
//! - [`Engine`] - Drives a run; owns both clients and the run controller
//! - [`RunControl`] - Pause, resume and stop a run from another task
//! - [`HttpClient`] - Transport seam; [`BasicHttpClient`] uses reqwest

pub mod client;
pub mod control;
pub mod dispatcher;
pub mod engine;
mod error;
pub mod parser;
pub mod reader;
pub mod report_io;

pub use client::{BasicHttpClient, ClientError, HttpClient, HttpResponse};
pub use control::{InvalidTransition, RunControl, RunState};
pub use dispatcher::{dispatch, dispatch_pair};
pub use engine::{Engine, RunOptions};
pub use error::{EngineError, EngineResult};
pub use parser::{parse, parse_actions, parse_reader, parse_stream, ParseError, ParseResult};
pub use reader::{read_actions, read_all};
pub use report_io::{load_report, save_report};
