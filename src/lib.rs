//! Crew seat-voucher request form.
//!
//! The form engine in [`voucher`] owns user input, validation, the debounced
//! existing-voucher lookup and the generate/regenerate actions. It talks to
//! the voucher server only through [`api::VoucherApi`].

use std::sync::Arc;

pub mod api;
pub mod cli;
pub mod config;
pub mod voucher;

pub use crate::api::{ApiError, HttpVoucherApi, VoucherApi};
pub use crate::config::ClientConfig;
pub use crate::voucher::VoucherForm;

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ClientConfig::from_env()?;
    log::info!("Using voucher server at {}", config.api_base_url);

    let api: Arc<dyn VoucherApi> = Arc::new(HttpVoucherApi::new(&config)?);
    let form = VoucherForm::new(api, config.lookup_debounce);

    cli::run_terminal(form).await
}
