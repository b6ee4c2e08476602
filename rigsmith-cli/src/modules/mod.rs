pub mod catalog;
pub mod chat;
pub mod check;
pub mod compare;
pub mod recommend;
