pub mod controls;
pub mod panels;
pub mod plot;
pub mod table;
