//! CLI domain: parse, route, output, and presentation only.
//! Generation itself lives in [`crate::generate`].

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_inspect_json, format_inspect_text, EntitySummary};
pub use route::RunContext;
