/*
 * settings.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Publishing settings consumed by the conversion pipeline.
 */

//! Conversion settings.
//!
//! The host application owns the settings file; this module only knows
//! how to read one. Two fields drive conversion:
//!
//! - `confluenceBaseUrl` - used to clean up self-referential link cards
//! - `jiraUrl` - enables the Jira link plugin when non-empty
//!
//! The remaining publishing fields are carried so a host settings file
//! round-trips unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plugin::JiraLinkPlugin;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionSettings {
    pub confluence_base_url: String,
    pub confluence_parent_id: String,
    pub atlassian_user_name: String,
    pub atlassian_api_token: String,
    pub folder_to_publish: String,
    pub content_root: String,
    pub first_heading_page_title: bool,
    pub jira_url: String,
    pub updatable_users: Vec<String>,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            confluence_base_url: String::new(),
            confluence_parent_id: String::new(),
            atlassian_user_name: String::new(),
            atlassian_api_token: String::new(),
            folder_to_publish: "Confluence Pages".to_string(),
            content_root: ".".to_string(),
            first_heading_page_title: false,
            jira_url: String::new(),
            updatable_users: Vec::new(),
        }
    }
}

impl ConversionSettings {
    /// Settings with only the base URL set.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            confluence_base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(source)?)
    }

    /// The Jira link plugin, when a Jira URL is configured.
    pub fn jira_plugin(&self) -> Option<JiraLinkPlugin> {
        let url = self.jira_url.trim();
        if url.is_empty() {
            None
        } else {
            Some(JiraLinkPlugin::new(url))
        }
    }
}
