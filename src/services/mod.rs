// src/services/mod.rs
pub mod config_store;
pub mod image_processor;
pub mod llm_service;
pub mod render_binding;
pub mod studio;
pub mod suggestion_adapter;
pub mod validation;

pub use image_processor::LogoProcessor;
pub use llm_service::LLMService;
pub use studio::Studio;
pub use suggestion_adapter::SuggestionAdapter;
