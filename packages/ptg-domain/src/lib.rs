pub mod bm25;
pub mod city;
pub mod event;
pub mod reply;
pub mod text;
