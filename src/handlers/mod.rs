pub mod common;
pub mod order_lines;
pub mod orders;

pub use order_lines::order_line_routes;
pub use orders::order_routes;
