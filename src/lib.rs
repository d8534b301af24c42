//! growthboard — audiobook growth analytics dashboard with AI insights.
//!
//! A single binary that serves a browser dashboard (five Chart.js
//! visualizations plus an AI insight box), exposes two JSON endpoints, and
//! forwards free-text prompts to an OpenAI-compatible completion API.
//!
//! Module map:
//! - [`analytics`] — the canned analytics payload served at `GET /api/data`
//! - [`charts`] — chart slot registry, config builders, and the resilient
//!   initialization state machine mirrored by the browser script
//! - [`llm`] — prompt construction and the chat-completion client behind
//!   `POST /api/insight`
//! - [`web`] — tiny_http server, routing, and static asset serving
//! - [`config`] — layered TOML + environment configuration
//! - [`cli`] — terminal subcommand implementations

pub mod analytics;
pub mod charts;
pub mod cli;
pub mod config;
pub mod llm;
pub mod web;
