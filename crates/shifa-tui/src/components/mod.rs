pub mod header;
pub mod help_overlay;
pub mod home;
pub mod medicine_details;
pub mod medicine_list;
pub mod pharmacy_details;
pub mod pharmacy_list;
