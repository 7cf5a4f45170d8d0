//! Display components for Pongpad
//!
//! This crate provides:
//! - `FrameBuffer`, a 128x64 monochrome buffer in panel page layout that
//!   implements the `embedded-graphics` `DrawTarget`
//! - `DisplayBackend` trait for panels that can push a frame buffer out
//! - `Renderer`, which draws the game onto any backend and implements the
//!   core `GameDisplay` trait
//!
//! # Architecture
//!
//! The renderer redraws the whole frame on every call, so the picture is a
//! pure function of the latest game state. Panel drivers only need to own a
//! `FrameBuffer` and know how to flush it.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod framebuffer;
pub mod renderer;

// Re-export key types
pub use backend::DisplayBackend;
pub use framebuffer::{FrameBuffer, HEIGHT, PAGES, WIDTH};
pub use renderer::Renderer;
