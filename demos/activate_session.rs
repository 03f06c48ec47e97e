//! Activates a session against `TOKEN_SESSION_BASE_URL` and sends one guarded request to
//! `TOKEN_SESSION_RESOURCE_URL`.

// crates.io
use color_eyre::{Result, eyre::WrapErr};
// self
use token_session::{config::SessionConfig, session::TokenSession, url::Url};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let base_url = std::env::var("TOKEN_SESSION_BASE_URL")
		.unwrap_or_else(|_| "http://localhost:5000".into());
	let resource_url = std::env::var("TOKEN_SESSION_RESOURCE_URL")
		.unwrap_or_else(|_| format!("{base_url}/users"));
	let config = SessionConfig::builder(Url::parse(&base_url).wrap_err("invalid base URL")?)
		.build()?;
	let session = TokenSession::activate(
		config,
		std::sync::Arc::new(|path: &str| println!("navigate -> {path}")),
	)
	.await?;

	println!(
		"session: name={:?} role={:?} user_id={:?} status={:?}",
		session.display_name(),
		session.role(),
		session.user_id(),
		session.status(),
	);

	let client = session.http_client();
	let response = client.send(client.get(&resource_url)).await?;

	println!("{resource_url} -> {}", response.status());

	session.deactivate();

	Ok(())
}
