//! Record model

mod entity_ref;
mod record;
mod record_serde;
mod value;

pub use entity_ref::*;
pub use record::*;
pub use value::*;
