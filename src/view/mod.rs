/// Visible surface (form fields, error displays, transcript) - Gateway
mod page;
mod render;

pub use page::{Page, Route};
pub use render::Renderer;
