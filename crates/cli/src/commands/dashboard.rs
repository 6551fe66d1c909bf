//! Admin dashboard command.

use mercado_client::ApiClient;
use mercado_client::auth::AuthApi;
use mercado_client::metrics::{MetricsOutcome, load_dashboard_metrics};

/// View path of the admin panel, used for the login return target.
const ADMIN_VIEW: &str = "/adm";

/// Show the admin dashboard metrics.
///
/// The role gate here mirrors the browser app: it decides what to render.
/// The server enforces admin rights on every call regardless.
pub async fn show(api: ApiClient) {
    if let Err(redirect) = AuthApi::new(api.clone()).require_admin(ADMIN_VIEW) {
        println!("{}", redirect.message());
        println!("(the app would navigate to {})", redirect.location());
        return;
    }

    match load_dashboard_metrics(&api).await {
        MetricsOutcome::Available(metrics) => {
            println!("Users with active carts: {}", metrics.active_users);
            println!("Total across carts: R$ {}", metrics.total_value);
            if metrics.ranking.is_empty() {
                println!("No carted items found.");
            } else {
                println!("Top carted items:");
                for (position, row) in metrics.ranking.iter().enumerate() {
                    println!("  {}. {} - {}x", position + 1, row.name, row.count);
                }
            }
        }
        MetricsOutcome::Unavailable { reason } => {
            println!("Metrics unavailable: {reason}");
        }
    }
}
