// Text layout for the PDF export: font metrics, word wrap, page geometry.
// Pure and CPU-bound; callers on the async runtime go through spawn_blocking.

pub mod font_metrics;
pub mod page;
pub mod wrap;

pub use font_metrics::{get_metrics, FontMetricTable};
pub use page::{PageGeometry, PaperSize};
pub use wrap::{wrap_text, TextStyle};
