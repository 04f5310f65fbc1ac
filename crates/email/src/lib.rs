//! UserHub Email Crate
//!
//! Renders Markdown email templates into inline-styled HTML and hands the
//! result to a [`Mailer`].

pub mod error;
pub mod mailer;
pub mod service;
pub mod template_manager;

pub use error::{EmailError, EmailResult};
pub use mailer::{EmailMessage, LogMailer, Mailer, MemoryMailer};
pub use service::{EmailService, EmailType};
pub use template_manager::{
    FileTemplateSource, StaticTemplateSource, TemplateContext, TemplateManager, TemplateSource,
};
