//! Demonstrates a reqwest-backed store session that signs every request and reports rejected
//! credentials to a subscribed observer.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use signed_store::{
	auth::Credentials,
	error::Error,
	notify::UnauthorizedEvent,
	store::{AuthenticatedStore, StoreDescriptor},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let fetch_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/User/1").header_exists("authorization");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":1,\"name\":\"alice\"}");
		})
		.await;
	let delete_mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/User/1");
			then.status(401);
		})
		.await;
	let descriptor =
		StoreDescriptor::builder().server_url(Url::parse(&server.url("/api"))?).build()?;
	let session =
		AuthenticatedStore::connect(descriptor, Credentials::new("alice", "wonderland")?)?;

	session.subscribe(|event: &UnauthorizedEvent| {
		let name = UnauthorizedEvent::NAME;

		println!("{name}: {} rejected for {}.", event.operation, event.username);
	});

	let user = session.fetch("User", 1).await?.json::<serde_json::Value>()?;

	println!("Fetched user: {user}.");

	match session.delete("User", 1).await {
		Err(Error::Status { status, .. }) => println!("Delete failed with HTTP {status}."),
		other => println!("Unexpected delete result: {other:?}."),
	}

	fetch_mock.assert_async().await;
	delete_mock.assert_async().await;

	Ok(())
}
