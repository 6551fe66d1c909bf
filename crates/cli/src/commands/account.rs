//! Account and session commands.

use mercado_client::auth::{AuthApi, RegisterRequest};
use mercado_client::{ApiClient, Result};
use mercado_core::AdvisoryRole;

/// Log in and persist the session.
pub async fn login(
    api: ApiClient,
    email: &str,
    password: &str,
    redirect: Option<&str>,
) -> Result<()> {
    let outcome = AuthApi::new(api).login(email, password, redirect).await?;

    let role = outcome
        .session
        .role()
        .map_or("unknown", AdvisoryRole::as_str);
    println!("Signed in as {email} (role: {role}).");
    println!("(the app would navigate to {})", outcome.destination);
    Ok(())
}

/// Create an account, then point back at login.
pub async fn register(
    api: ApiClient,
    name: String,
    age: u32,
    email: String,
    password: String,
) -> Result<()> {
    let request = RegisterRequest {
        name,
        age,
        email,
        password,
    };
    let redirect = AuthApi::new(api).register(&request, None).await?;

    println!("{}", redirect.message());
    println!("(the app would navigate to {})", redirect.location());
    Ok(())
}

/// Drop the stored session.
pub fn logout(api: &ApiClient) {
    let redirect = AuthApi::new(api.clone()).logout();
    println!("Signed out.");
    println!("(the app would navigate to {})", redirect.location());
}

/// Show the current session.
pub fn status(api: &ApiClient) {
    let session = api.session().current();
    if session.is_authenticated() {
        let role = session.role().map_or("unknown", AdvisoryRole::as_str);
        println!("Signed in (advisory role: {role}).");
    } else {
        println!("Signed out.");
    }
}
