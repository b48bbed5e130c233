pub mod application_renderers;
pub mod bound_texture_view;
pub mod buffer;
pub mod data;
pub mod geometry;
pub mod globe_renderer;
pub mod marker_renderer;
pub mod pipeline;
pub mod render_engine;
pub mod texture;
