//! # Field Type System
//!
//! The per-field half of the crate: the closed variant set, the descriptor
//! value that locates a field inside a record, and the codec operations the
//! record layer dispatches through.
//!
//! ## Module Structure
//!
//! - `types`: [`FieldType`] enum with fixed widths and sort direction
//! - `descriptor`: [`FieldDescriptor`] — type + offset, width derived
//! - `codec`: the uniform per-variant operation set over field slots
//! - `text`: shared textual conversion routines behind the codec
//!
//! Everything here is schema-agnostic: a codec operation sees only the
//! field-sized slot the record layer hands it, never a whole record.

pub mod codec;
pub mod descriptor;
pub(crate) mod text;
pub mod types;


pub use descriptor::FieldDescriptor;
pub use types::FieldType;
