pub mod position;
pub mod response;
pub mod wallet;

pub use position::*;
pub use response::*;
pub use wallet::*;
