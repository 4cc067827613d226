pub mod aggregate;
pub mod get;
pub mod list;

pub use aggregate::get_aggregate_positions;
pub use get::get_position;
pub use list::list_positions;
