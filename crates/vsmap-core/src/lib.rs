//! vsmap Core Types and Definitions
//!
//! This crate provides the foundational types shared by every stage of the
//! value stream map pipeline. It includes:
//!
//! - **Model**: Process steps, flow types and waste scores ([`model`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Draw**: Backend-neutral drawing primitives and the [`draw::DrawTarget`]
//!   trait implemented by each document backend ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod model;
