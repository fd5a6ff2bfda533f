//! Async Rust client library for the Microsoft Sentinel management API.
//!
//! Authenticates as a service principal (OAuth2 client credentials) and
//! performs create/read/delete operations on a workspace's alert rules,
//! rule templates, actions, bookmarks, data connectors, incidents and
//! incident comments. Response bodies are returned as opaque JSON text.
//!
//! # Modules
//!
//! - [`auth`] — token acquisition and caching.
//! - [`client`] — authenticated request execution and response
//!   classification.
//! - [`normalize`] — tolerant rendering of failure bodies.
//! - [`tracker`] — last-created id per resource kind.
//! - [`resource`] — resource kinds and the generic create/get/delete/list.
//! - [`actions`], [`alert_rules`], [`alert_rule_templates`], [`bookmarks`],
//!   [`data_connectors`], [`incidents`] — per-kind payloads and operations.
//! - [`config`] — TOML configuration.
//! - [`error`] — `SentinelError`.
//!
//! # Quick Start
//!
//! ```ignore
//! use sentinel_mgmt::bookmarks::{BookmarkProperties, create_bookmark, get_bookmark};
//! use sentinel_mgmt::config::SentinelConfig;
//! use sentinel_mgmt::resource::ResourceRef;
//!
//! let client = SentinelConfig::load("sentinel.toml".as_ref())?.client()?;
//! let created = create_bookmark(&client, &properties).await?;
//! let body = get_bookmark(&client, ResourceRef::LastCreated).await?;
//! ```

pub mod actions;
pub mod alert_rule_templates;
pub mod alert_rules;
pub mod auth;
pub mod bookmarks;
pub mod client;
pub mod config;
pub mod data_connectors;
pub mod error;
pub mod incidents;
pub mod normalize;
pub mod resource;
pub mod tracker;
