//! Análise de Crédito Library
//!
//! This library provides the core functionality for the credit analysis form:
//! CPF validation, the scoring webhook client, the eligibility response mapper,
//! the display cards and the HTTP handlers that tie them together.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `integrations`: External service integrations.
//! - `config`: Configuration management.
//! - `cpf`: CPF cleaning, formatting and checksum validation.
//! - `eligibility_models`: Nested eligibility webhook payload.
//! - `errors`: Error handling types.
//! - `form`: Form state (input, loading guard, error, results).
//! - `handlers`: HTTP request handlers.
//! - `mapper`: Eligibility payload to view-model mapping.
//! - `models`: View-model and request/response models.
//! - `pages`: HTML and text renderers.
//! - `presentation`: View-model to display cards.
//! - `routes`: Router construction.
//! - `services`: Credit analysis service and input adapters.
//! - `webhook_client`: Scoring webhook client.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod cpf;
pub mod eligibility_models;
pub mod errors;
pub mod form;
pub mod handlers;
pub mod mapper;
pub mod models;
pub mod pages;
pub mod presentation;
pub mod routes;
pub mod services;
pub mod webhook_client;
