//! Integration tests for tokio_mvc
//!
//! These tests drive the full request cycle in-process: middleware chain,
//! front controller routing, dispatch and output assembly.
//! Run with: cargo test --test integration

mod helpers;

mod debugger;
mod dispatch;
mod navigation;
mod output;
