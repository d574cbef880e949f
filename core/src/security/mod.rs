pub mod bab;
pub mod block;
pub mod key;
pub mod mac;
pub mod serializer;

pub use bab::*;
pub use block::*;
pub use key::*;
pub use mac::*;
pub use serializer::*;
