//! Markdown to Atlassian Document Format conversion
//!
//! This crate turns markdown into an ADF document tree ready for
//! publishing to Confluence.
//!
//! # Architecture
//!
//! - [`MarkdownEncoder`] - Produces the raw ADF tree from markdown
//! - [`AdfConverter`] - Runs special-section extraction and the node
//!   handlers over the raw tree
//! - [`Traversal`] - Pre-order rewrite engine the handlers are built on
//! - [`PluginPipeline`] - Extract/transform/load plugins that run after
//!   conversion and perform side effects such as uploads
//!
//! # Example
//!
//! ```ignore
//! use adf_core::{AdfConverter, ConversionSettings, Frontmatter};
//!
//! let (frontmatter, body) = Frontmatter::split(source);
//! let converter = AdfConverter::new(ConversionSettings::default());
//! let conversion = converter.convert_markdown(&body, &frontmatter)?;
//!
//! for diagnostic in &conversion.diagnostics {
//!     eprintln!("{}", diagnostic.message);
//! }
//! ```

pub mod context;
pub mod convert;
pub mod diagnostic;
pub mod encoder;
pub mod error;
pub mod frontmatter;
pub mod frontmatter_table;
pub mod handlers;
pub mod plugin;
pub mod sections;
pub mod settings;
pub mod table;
pub mod traverse;
pub mod url;

// Re-export commonly used types
pub use context::{ConversionContext, MAX_NESTED_RENDERS, MAX_RENDER_DEPTH};
pub use convert::{AdfConverter, Conversion};
pub use diagnostic::{Diagnostic, DiagnosticLevel};
pub use encoder::{ComrakEncoder, MarkdownEncoder};
pub use error::{ConvertError, Result};
pub use frontmatter::Frontmatter;
pub use frontmatter_table::yaml_to_table;
pub use plugin::{
    AdfProcessingPlugin, AssetUploadPlugin, ChartData, ChartRenderer, DocumentPlugin,
    JiraLinkPlugin, MermaidRendererPlugin, PluginError, PluginPipeline, PublisherFunctions,
    UploadedAsset,
};
pub use sections::{SectionKind, SectionMarker, extract_special_sections};
pub use settings::{ConversionSettings, SettingsError};
pub use table::merge_cells;
pub use traverse::{Ancestors, Traversal, Visit};
pub use self::url::{clean_up_url_if_confluence, is_safe_url};
