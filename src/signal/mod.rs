pub mod bus;
pub mod source;
pub mod track;
