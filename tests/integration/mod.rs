//! Integration tests for the datagen generation engine

mod capability_bag;
mod config_integration;
mod dispatch_scenarios;
mod generation_run;
mod key_strategy;
mod test_utils;
