//! Provider adapters. Each adapter owns its wire models and transport and
//! exposes only the [`ModelProvider`](crate::ModelProvider) contract.

pub mod anthropic;
