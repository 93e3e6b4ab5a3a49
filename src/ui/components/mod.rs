pub mod document_section;
pub mod form_field;
pub mod load_card;
pub mod status_badge;
pub mod toast;
