//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::GenError;

/// Map a generation error to the line printed on stderr.
pub fn map_error(e: &GenError) -> String {
    match e {
        GenError::Config(msg) => format!("configuration error: {msg}"),
        GenError::Model(msg) => format!("model error: {msg}"),
        other => format!("error: {other}"),
    }
}
