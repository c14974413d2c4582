//! GPU abstraction and test utilities for Lumora.
//!
//! - [`RenderContext`] - Trait abstracting the GPU operations the material layer needs
//! - `MockRenderContext` - Recording implementation for tests (requires `mock` feature)
//! - GPU wrapper types (`GpuBuffer`, `GpuTexture`, ...) - Can be real or mock
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use lumora_test_utils::{MockRenderContext, RenderContext};
//! use wgpu::*;
//!
//! let mock = MockRenderContext::new();
//!
//! let sampler = mock.create_sampler(&SamplerDescriptor {
//!     label: Some("test_sampler"),
//!     ..Default::default()
//! });
//!
//! assert_eq!(mock.count_sampler_creates(), 1);
//! assert!(sampler.is_mock());
//! # }
//! ```
//!
//! All wrapper types are owned and cheap to clone; the real variants hold
//! `wgpu` handles which are reference counted internally. The mock uses
//! `parking_lot::Mutex` so `&self` methods can record calls while the trait
//! stays `Send + Sync` and object safe.

pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;
pub mod render_context;

pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
pub use render_context::*;
