// Cover letter documents: the draft template, markup cleaning and .docx
// assembly. Everything here is synchronous and deterministic.

pub mod cleaning;
pub mod docx;
pub mod draft;
pub mod handlers;
