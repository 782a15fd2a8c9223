//! Per-owner note CRUD

mod service;

pub use service::NoteService;
