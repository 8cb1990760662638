//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod toggle_field;
mod toggle_state;

pub use toggle_field::{
    COMPANY_TOGGLE_FIELDS, EMPLOYEE_TOGGLE_FIELDS, EntityId, EntityType, FieldCatalog,
    ToggleableField,
};
pub use toggle_state::{Marker, MarkerGlyphs, TogglePhase, ToggleState};
